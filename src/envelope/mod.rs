//! Envelopes: one erased value together with its bound renderer.
//!
//! An [`Envelope`] is what a [`Channel`](crate::Channel) stores for every
//! enqueued value. It owns the value and remembers, in a `'static` vtable,
//! the value's concrete type and the [handler](crate::handlers) that was
//! picked to render it.
//!
//! Envelopes come in two flavors:
//!
//! - `Envelope<V>` for a concrete `V`: the type is known statically, and the
//!   value can be borrowed with [`Envelope::inner`] or moved out with
//!   [`Envelope::into_inner`].
//! - `Envelope<Dynamic>`: the type has been forgotten. The value can only be
//!   reached again through a checked [`Envelope::downcast`].
//!
//! [`EnvelopeRef`] is the borrowed counterpart of both.
//!
//! # Examples
//!
//! ```
//! use polychan::{envelope::Envelope, handlers, markers::Dynamic};
//!
//! let envelope: Envelope<Dynamic> = Envelope::new(String::from("hello")).into_dynamic();
//! assert_eq!(envelope.format_inner().to_string(), "hello");
//!
//! // Downcasting to the wrong type hands the envelope back
//! let envelope = envelope.downcast::<i32>().unwrap_err();
//! let envelope = envelope.downcast::<String>().ok().unwrap();
//! assert_eq!(envelope.into_inner(), "hello");
//!
//! // Values without a `Display` implementation can still be stored
//! let opaque = Envelope::new_custom::<handlers::NonPrintable>(core::ptr::null::<u8>());
//! assert_eq!(opaque.format_inner().to_string(), "<<non-printable>>");
//! ```

mod owned;
mod ref_;

pub use self::{owned::Envelope, ref_::EnvelopeRef};
