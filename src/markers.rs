//! Marker types used as type parameters.
//!
//! An [`Envelope<V>`](crate::envelope::Envelope) either knows the concrete
//! type `V` of the value it stores, or it has forgotten it. The second case is
//! spelled `Envelope<Dynamic>`, which is also the type the
//! [`Channel`](crate::Channel) stores internally.
//!
//! # Examples
//!
//! ```
//! use polychan::{envelope::Envelope, markers::Dynamic};
//!
//! let typed: Envelope<u32> = Envelope::new(7);
//! let erased: Envelope<Dynamic> = typed.into_dynamic();
//! assert_eq!(erased.inner_type_name(), "u32");
//!
//! let typed: Envelope<u32> = erased.downcast::<u32>().ok().unwrap();
//! assert_eq!(*typed.inner(), 7);
//! ```

/// Marker for an envelope whose value type has been forgotten.
///
/// No instance of [`Dynamic`] is ever stored or created. The type is unsized
/// so that it can never be confused with a concrete value type: every method
/// that hands out the stored value requires `V: Sized`, and the only way to
/// get from `Envelope<Dynamic>` back to a concrete type is a checked
/// downcast.
pub struct Dynamic {
    _unsized: [()],
}
