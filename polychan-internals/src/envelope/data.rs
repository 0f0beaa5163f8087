//! This module encapsulates the fields of the [`EnvelopeData`]. Since this is
//! the only place they are visible, the [`EnvelopeVtable`] is guaranteed to
//! always be in sync with the type of the stored value. They are in sync when
//! created, and the API offers no way to change the [`EnvelopeVtable`] or the
//! value type after creation.

use crate::{
    envelope::{raw::RawEnvelopeRef, vtable::EnvelopeVtable},
    handlers::RenderHandler,
};

/// Type-erased envelope data structure with vtable-based dispatch.
///
/// This struct uses `#[repr(C)]` to enable safe field access in type-erased
/// contexts, allowing access to the vtable field even when the concrete
/// value type `V` is unknown.
#[repr(C)]
pub(super) struct EnvelopeData<V: 'static> {
    /// The vtable of this envelope
    vtable: &'static EnvelopeVtable,
    /// The stored value
    value: V,
}

impl<V: 'static> EnvelopeData<V> {
    /// Creates a new [`EnvelopeData`] with the specified handler and value.
    ///
    /// This method picks the vtable for type-erased dispatch and pairs it
    /// with the value.
    #[inline]
    pub(super) fn new<H: RenderHandler<V>>(value: V) -> Self {
        Self {
            vtable: EnvelopeVtable::new::<V, H>(),
            value,
        }
    }

    /// Consumes the [`EnvelopeData`] and returns the stored value.
    #[inline]
    pub(super) fn into_value(self) -> V {
        self.value
    }
}

impl<'a> RawEnvelopeRef<'a> {
    /// Returns a reference to the [`EnvelopeVtable`] of the [`EnvelopeData`]
    /// instance.
    #[inline]
    pub(super) fn vtable(self) -> &'static EnvelopeVtable {
        let ptr = self.as_ptr();
        // SAFETY: We don't know the actual value type, but we do know that the
        // pointer points to an instance of `EnvelopeData<V>` for some specific `V`.
        // Since `EnvelopeData<V>` is `#[repr(C)]`, it is safe to create pointers
        // to the fields before the actual value.
        //
        // We must not create a reference to the `EnvelopeData` itself, as that
        // would be undefined behavior since we don't have the right type.
        let vtable_ptr: *const &'static EnvelopeVtable = unsafe { &raw const (*ptr).vtable };

        // SAFETY: Dereferencing the pointer and getting out the `&'static
        // EnvelopeVtable` is valid for the same reasons
        unsafe { *vtable_ptr }
    }

    /// Accesses the stored value of the [`EnvelopeData`] instance as a
    /// reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `V` matches the actual value type
    /// stored in the [`EnvelopeData`].
    #[inline]
    pub unsafe fn value_downcast_unchecked<V: 'static>(self) -> &'a V {
        // SAFETY: The inner function requires that `V` matches the type stored, but
        // that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<V>() };
        &this.value
    }
}
