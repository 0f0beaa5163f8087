#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`polychan`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased storage and the unsafe
//! operations that power the [`polychan`] heterogeneous channel. A value of
//! any `'static` type is boxed together with a `'static` vtable that remembers
//! the value's [`TypeId`] and the rendering handler that was chosen for it
//! when it was stored.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`polychan`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`envelope`]**: Type-erased value storage
//!   - [`RawEnvelope`]: Owned envelope with [`Box`]-based allocation
//!   - [`RawEnvelopeRef`]: Borrowed reference to an envelope
//!   - [`EnvelopeData`]: `#[repr(C)]` wrapper enabling field access on erased types
//!   - [`EnvelopeVtable`]: Function pointers for type-erased dispatch
//!
//! - **[`handlers`]**: The [`RenderHandler`] trait, which defines how a stored
//!   value is rendered once its static type has been forgotten.
//!
//! # Safety Strategy
//!
//! When we erase `EnvelopeData<MyValue>` to `EnvelopeData<Erased>`, the vtable
//! function pointers must still match the concrete type stored in memory.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: Safety-critical types keep fields
//!   module-private, making invariants locally verifiable within a single file
//! - **`#[repr(C)]` layout**: Enables safe field projection on type-erased
//!   pointers without constructing invalid references
//! - **Documented vtable contracts**: Each vtable method specifies exactly when
//!   it can be safely called
//!
//! [`polychan`]: https://docs.rs/polychan/latest/polychan/
//! [`TypeId`]: core::any::TypeId
//! [`EnvelopeData`]: envelope::data::EnvelopeData
//! [`EnvelopeVtable`]: envelope::vtable::EnvelopeVtable
//! [`RenderHandler`]: handlers::RenderHandler
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

mod envelope;
pub mod handlers;
mod util;

pub use envelope::{RawEnvelope, RawEnvelopeRef};
