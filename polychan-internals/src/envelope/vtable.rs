//! Vtable for type-erased envelope operations.
//!
//! This module contains the [`EnvelopeVtable`] which enables rendering and
//! dropping a stored value after its concrete type `V` and the handler type
//! `H` have been erased. The vtable stores function pointers that dispatch to
//! the correct typed implementations.
//!
//! This module encapsulates the fields of [`EnvelopeVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameters must match the actual value type
//! and handler stored in the [`EnvelopeData`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`EnvelopeVtable::new`], which pairs the function pointers
//! with specific types `V` and `H` at compile time.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{
    envelope::{data::EnvelopeData, raw::RawEnvelopeRef},
    handlers::RenderHandler,
    util::Erased,
};

/// Vtable for type-erased envelope operations.
///
/// # Safety Invariant
///
/// The fields `drop`, `display` and `debug` are guaranteed to point to the
/// functions defined below instantiated with the value type `V` and handler
/// type `H` that were used to create this [`EnvelopeVtable`].
pub(crate) struct EnvelopeVtable {
    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`EnvelopeVtable`].
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the value type that was used to
    /// create this [`EnvelopeVtable`].
    type_name: fn() -> &'static str,
    /// Gets the [`TypeId`] of the handler that was used to create this
    /// [`EnvelopeVtable`].
    handler_type_id: fn() -> TypeId,
    /// Whether the handler renders the value itself, copied from
    /// [`RenderHandler::PRINTABLE`].
    printable: bool,
    /// Drops the [`Box<EnvelopeData<V>>`] instance pointed to by this pointer.
    drop: unsafe fn(NonNull<EnvelopeData<Erased>>),
    /// Renders the value using the `display` method on the handler.
    display: unsafe fn(RawEnvelopeRef<'_>, &mut core::fmt::Formatter<'_>) -> core::fmt::Result,
    /// Renders the value using the `debug` method on the handler.
    debug: unsafe fn(RawEnvelopeRef<'_>, &mut core::fmt::Formatter<'_>) -> core::fmt::Result,
}

impl EnvelopeVtable {
    /// Creates a new [`EnvelopeVtable`] for the value type `V` and the handler
    /// type `H`.
    pub(super) const fn new<V: 'static, H: RenderHandler<V>>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<V>,
                type_name: core::any::type_name::<V>,
                handler_type_id: TypeId::of::<H>,
                printable: H::PRINTABLE,
                drop: drop::<V>,
                display: display::<V, H>,
                debug: debug::<V, H>,
            }
        }
    }

    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`EnvelopeVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the value type that was used to
    /// create this [`EnvelopeVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Gets the [`TypeId`] of the handler that was used to create this
    /// [`EnvelopeVtable`].
    #[inline]
    pub(super) fn handler_type_id(&self) -> TypeId {
        (self.handler_type_id)()
    }

    /// Whether the handler used to create this [`EnvelopeVtable`] renders the
    /// value itself.
    #[inline]
    pub(super) fn printable(&self) -> bool {
        self.printable
    }

    /// Drops the `Box<EnvelopeData<V>>` instance pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`Box<EnvelopeData<V>>`] via
    ///    [`Box::into_raw`]
    /// 2. This [`EnvelopeVtable`] must be a vtable for the value type stored
    ///    in the [`EnvelopeData`].
    /// 3. This method drops the [`Box<EnvelopeData<V>>`], so the caller must
    ///    ensure that the pointer has not previously been dropped, that it is
    ///    able to transfer ownership of the pointer, and that it will not use
    ///    the pointer after calling this method.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<EnvelopeData<Erased>>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<V>` below.
        // That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Renders the value using the [`H::display`] function used when creating
    /// this [`EnvelopeVtable`].
    ///
    /// [`H::display`]: RenderHandler::display
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`EnvelopeVtable`] must be a vtable for the value type stored
    ///    in the [`RawEnvelopeRef`].
    #[inline]
    pub(super) unsafe fn display(
        &self,
        ptr: RawEnvelopeRef<'_>,
        formatter: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        // SAFETY: We know that the `self.display` field points to the function
        // `display::<V, H>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.display)(ptr, formatter) }
    }

    /// Renders the value using the [`H::debug`] function used when creating
    /// this [`EnvelopeVtable`].
    ///
    /// [`H::debug`]: RenderHandler::debug
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`EnvelopeVtable`] must be a vtable for the value type stored
    ///    in the [`RawEnvelopeRef`].
    #[inline]
    pub(super) unsafe fn debug(
        &self,
        ptr: RawEnvelopeRef<'_>,
        formatter: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        // SAFETY: We know that the `self.debug` field points to the function
        // `debug::<V, H>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.debug)(ptr, formatter) }
    }
}

/// Drops the [`Box<EnvelopeData<V>>`] instance pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`Box<EnvelopeData<V>>`] via [`Box::into_raw`]
/// 2. The value type `V` matches the actual value type stored in the
///    [`EnvelopeData`]
/// 3. This method drops the [`Box<EnvelopeData<V>>`], so the caller must
///    ensure that the pointer has not previously been dropped, that it is able
///    to transfer ownership of the pointer, and that it will not use the
///    pointer after calling this method.
unsafe fn drop<V: 'static>(ptr: NonNull<EnvelopeData<Erased>>) {
    let ptr: NonNull<EnvelopeData<V>> = ptr.cast();
    let ptr = ptr.as_ptr();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller, and it
    // came from a call to `Box::into_raw` as also guaranteed by our caller.
    let boxed = unsafe { Box::from_raw(ptr) };
    core::mem::drop(boxed);
}

/// Renders a value using its handler's display implementation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `V` matches the actual value type stored in the
///    [`EnvelopeData`]
unsafe fn display<V: 'static, H: RenderHandler<V>>(
    ptr: RawEnvelopeRef<'_>,
    formatter: &mut core::fmt::Formatter<'_>,
) -> core::fmt::Result {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &V = unsafe { ptr.value_downcast_unchecked::<V>() };
    H::display(value, formatter)
}

/// Renders a value using its handler's debug implementation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `V` matches the actual value type stored in the
///    [`EnvelopeData`]
unsafe fn debug<V: 'static, H: RenderHandler<V>>(
    ptr: RawEnvelopeRef<'_>,
    formatter: &mut core::fmt::Formatter<'_>,
) -> core::fmt::Result {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &V = unsafe { ptr.value_downcast_unchecked::<V>() };
    H::debug(value, formatter)
}
