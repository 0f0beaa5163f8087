//! Handlers that control how queued values are rendered in trace output.
//!
//! When a value is enqueued, a handler is picked for its static type and bound
//! to it. After the value has been erased inside the channel, that handler is
//! the only thing that still knows how to render it. Every dequeue renders the
//! removed value through its handler and emits a `Print: <value>` trace line.
//!
//! # Built-in Handlers
//!
//! ## [`Display`]
//!
//! For types implementing [`Display`](core::fmt::Display). This is the
//! handler used by [`Channel::enqueue`](crate::Channel::enqueue), and the one
//! the [`enqueue!`](crate::enqueue!) macro picks for every displayable type.
//!
//! ## [`struct@Debug`]
//!
//! For types implementing [`Debug`](core::fmt::Debug). Renders the value with
//! its `Debug` output. Never picked automatically, since `Debug` output is
//! meant for developers rather than humans reading a trace; pass it
//! explicitly with [`Channel::enqueue_custom`](crate::Channel::enqueue_custom).
//!
//! ## [`NonPrintable`]
//!
//! For any type. Renders the fixed placeholder [`NON_PRINTABLE_PLACEHOLDER`]
//! without reading the value, so rendering a value that has no textual
//! representation never fails.
//!
//! # When Handlers Are Selected
//!
//! Handlers are selected at compile time. The [`enqueue!`](crate::enqueue!)
//! macro tests whether the value's type implements `Display` and picks
//! [`Display`] or [`NonPrintable`] accordingly. The choice depends only on the
//! type, so two values of the same type always render through the same path.
//!
//! # Examples
//!
//! ```rust
//! use polychan::{Channel, enqueue, handlers};
//!
//! let mut channel = Channel::new();
//! enqueue!(channel, 42);                     // Display
//! enqueue!(channel, core::ptr::null::<u8>()); // NonPrintable
//! channel.enqueue_custom::<handlers::Debug, _>(vec![1, 2, 3]);
//! ```

pub use polychan_internals::handlers::RenderHandler;

/// The text rendered for values bound to the [`NonPrintable`] handler.
pub const NON_PRINTABLE_PLACEHOLDER: &str = "<<non-printable>>";

/// Handler for types implementing [`Display`](core::fmt::Display).
///
/// Delegates rendering to the type's `Display` implementation. A type opts
/// into being printable in traces by implementing `Display`.
///
/// # Example
///
/// ```rust
/// use polychan::{Channel, hooks::trace_sink::CollectingSink};
///
/// struct Secret {
///     value: i32,
/// }
///
/// impl core::fmt::Display for Secret {
///     fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
///         write!(f, "{}", self.value)
///     }
/// }
///
/// let sink = CollectingSink::new();
/// let mut channel = Channel::with_sink(sink.clone());
/// channel.enqueue(Secret { value: 42 });
/// let _secret: Secret = channel.dequeue().unwrap();
/// assert_eq!(sink.lines(), ["Print: 42"]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Display;

impl<V> RenderHandler<V> for Display
where
    V: core::fmt::Display,
{
    fn display(value: &V, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(value, f)
    }
}

/// Handler for types implementing [`Debug`](core::fmt::Debug).
///
/// Renders the value with its `Debug` implementation. Useful for collections
/// and internal data structures that have no `Display` implementation but are
/// still worth seeing in a trace.
///
/// # Example
///
/// ```rust
/// use polychan::{Channel, handlers, hooks::trace_sink::CollectingSink};
///
/// let sink = CollectingSink::new();
/// let mut channel = Channel::with_sink(sink.clone());
/// channel.enqueue_custom::<handlers::Debug, _>(vec!["a", "b"]);
/// let _items: Vec<&str> = channel.dequeue().unwrap();
/// assert_eq!(sink.lines(), [r#"Print: ["a", "b"]"#]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Debug;

impl<V> RenderHandler<V> for Debug
where
    V: core::fmt::Debug,
{
    fn display(value: &V, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(value, f)
    }
}

/// Handler for any type, regardless of implemented traits.
///
/// Renders [`NON_PRINTABLE_PLACEHOLDER`] without looking at the value. This is
/// the fallback picked by [`enqueue!`](crate::enqueue!) for types that do not
/// implement `Display`, and the handler used by
/// [`Channel::enqueue_opaque`](crate::Channel::enqueue_opaque).
///
/// # Example
///
/// ```rust
/// use polychan::{Channel, hooks::trace_sink::CollectingSink};
///
/// let sink = CollectingSink::new();
/// let mut channel = Channel::with_sink(sink.clone());
/// channel.enqueue_opaque(1 as *const i32);
/// let pending = channel.dequeue_generic().unwrap();
/// assert!(!pending.is_printable());
/// assert_eq!(sink.lines(), ["Print: <<non-printable>>"]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct NonPrintable;

impl<V> RenderHandler<V> for NonPrintable {
    const PRINTABLE: bool = false;

    fn display(_value: &V, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(NON_PRINTABLE_PLACEHOLDER)
    }
}
