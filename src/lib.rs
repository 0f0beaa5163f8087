#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A single-threaded FIFO channel for values of unrelated types.
//!
//! ## Overview
//!
//! A [`Channel`] accepts values of any `'static` type, in any mix, and hands
//! them back in insertion order. Inside the channel every value has lost its
//! static type. It can only be taken out again at the type it was stored
//! with: asking for another type is a [`TypeMismatch`], never a
//! reinterpretation.
//!
//! When a value is enqueued, a rendering [handler](handlers) is picked for its
//! static type and stored alongside it. Every dequeue uses that handler to
//! emit one trace line, `Print: <value>`, before the value is handed back.
//! Types without a `Display` implementation are accepted too and rendered as
//! `<<non-printable>>`.
//!
//! ## Quick Example
//!
//! ```
//! use polychan::{Channel, enqueue, hooks::trace_sink::CollectingSink};
//!
//! let sink = CollectingSink::new();
//! let mut channel = Channel::with_sink(sink.clone());
//!
//! enqueue!(channel, String::from("notasecret"));
//! enqueue!(channel, 42);
//! enqueue!(channel, 1 as *const i32);
//!
//! // Dequeue at a named type...
//! let text: String = channel.dequeue()?;
//! let mut number = 0;
//! channel.dequeue_into(&mut number)?;
//!
//! // ...or take the value first and name its type later
//! let pending = channel.dequeue_generic()?;
//! let pointer: *const i32 = pending.resolve().unwrap();
//!
//! assert_eq!((text.as_str(), number, pointer), ("notasecret", 42, 1 as *const i32));
//! assert_eq!(
//!     sink.lines(),
//!     ["Print: notasecret", "Print: 42", "Print: <<non-printable>>"]
//! );
//! # Ok::<(), polychan::DequeueError>(())
//! ```
//!
//! ## Core Concepts
//!
//! Each queued value lives in an [`Envelope`](envelope::Envelope): a single
//! allocation holding the value next to a pointer to a `'static` vtable. The
//! vtable records the value's [`TypeId`](core::any::TypeId) and the functions
//! of the handler chosen at enqueue time. Taking a value out compares type ids
//! first; rendering a value goes through the vtable and never needs to know
//! its type.
//!
//! Handlers are chosen at compile time:
//!
//! - [`Channel::enqueue`] requires `Display` and renders through it.
//! - [`Channel::enqueue_opaque`] accepts anything and renders the
//!   placeholder.
//! - [`Channel::enqueue_custom`] takes the handler as a type parameter.
//! - The [`enqueue!`] macro picks `Display` when the type implements it and
//!   the placeholder otherwise.
//!
//! Dequeueing has three forms:
//!
//! - [`Channel::dequeue`] returns the value.
//! - [`Channel::dequeue_into`] writes it into an existing destination.
//! - [`Channel::dequeue_generic`] returns a [`Pending`] that is resolved to a
//!   type later. The value leaves the channel and is traced immediately.
//!
//! A typed dequeue at the wrong type fails with
//! [`DequeueError::TypeMismatch`] and leaves the value at the head of the
//! channel. Dequeueing from an empty channel fails with
//! [`DequeueError::Underflow`].
//!
//! For the raw storage layer, see the [`polychan-internals`] crate.
//!
//! [`polychan-internals`]: polychan_internals
//!
//! ## Trace Output
//!
//! Trace lines go to the channel's own sink if it has one, otherwise to the
//! process-wide sink, otherwise to stdout. See [`hooks::trace_sink`] for the
//! available sinks and the `POLYCHAN_TRACE` environment variable, and
//! [`hooks::render_override`] for changing how one type is rendered.
//!
//! ## Features
//!
//! - `std` (default): stdout and stderr sinks, the `POLYCHAN_TRACE`
//!   environment variable, and `std::sync::RwLock` for hook storage. Without
//!   it the crate is `no_std` (it still needs `alloc`) and traces are
//!   discarded unless a sink is installed.
//! - `tracing`: [`TracingSink`](hooks::trace_sink::TracingSink), which emits
//!   every trace line as a `tracing` event.
//!
//! ## Thread Safety
//!
//! A [`Channel`] is meant for use on a single thread and is neither `Send`
//! nor `Sync`. Only the process-wide hooks are shared between threads.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

mod channel;
pub mod envelope;
mod error;
pub mod handlers;
pub mod hooks;
pub mod markers;
mod pending;
pub mod prelude;
mod util;

pub use self::{
    channel::Channel,
    error::{DequeueError, ResolveError, TypeMismatch},
    pending::Pending,
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub mod kind {
        use crate::handlers;

        #[doc(hidden)]
        pub struct Wrap<'a, T>(pub &'a T);

        #[doc(hidden)]
        pub trait HandlerDisplayKind {
            #[inline(always)]
            fn handler(&self) -> handlers::Display {
                handlers::Display
            }
        }

        impl<V> HandlerDisplayKind for &Wrap<'_, V> where handlers::Display: handlers::RenderHandler<V> {}

        #[doc(hidden)]
        pub trait HandlerNonPrintableKind {
            #[inline(always)]
            fn handler(&self) -> handlers::NonPrintable {
                handlers::NonPrintable
            }
        }

        impl<V> HandlerNonPrintableKind for Wrap<'_, V> {}
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use super::*;
    use crate::hooks::trace_sink::CollectingSink;

    struct NoDisplay;

    #[test]
    fn test_macro_handler_selection() {
        use core::any::TypeId;

        use crate::__private::kind::*;

        let printable = 5_u8;
        let opaque = NoDisplay;
        let pointer = core::ptr::null::<u8>();

        fn type_id_of<H: 'static>(_handler: H) -> TypeId {
            TypeId::of::<H>()
        }

        assert_eq!(
            type_id_of((&&Wrap(&printable)).handler()),
            TypeId::of::<handlers::Display>()
        );
        assert_eq!(
            type_id_of((&&Wrap(&opaque)).handler()),
            TypeId::of::<handlers::NonPrintable>()
        );
        assert_eq!(
            type_id_of((&&Wrap(&pointer)).handler()),
            TypeId::of::<handlers::NonPrintable>()
        );
    }

    #[test]
    fn test_macro_accepts_channel_and_reference() {
        let sink = CollectingSink::new();
        let mut channel = Channel::with_sink(sink.clone());

        fn through_reference(channel: &mut Channel) {
            enqueue!(channel, String::from("by reference"));
        }

        enqueue!(channel, NoDisplay);
        channel.enqueue(3);
        through_reference(&mut channel);
        assert_eq!(channel.len(), 3);

        let lines: Vec<String> = {
            while channel.dequeue_generic().is_ok() {}
            sink.lines()
        };
        assert_eq!(
            lines,
            ["Print: <<non-printable>>", "Print: 3", "Print: by reference"]
        );
    }
}
