//! Type-erased envelope pointer types.
//!
//! This module encapsulates the `ptr` field of [`RawEnvelope`] and
//! [`RawEnvelopeRef`], ensuring it is only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the pointer always
//! comes from `Box<EnvelopeData<V>>`**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` field can only be set via [`RawEnvelope::new`] (which
//! creates it from `Box::into_raw`), and cannot be modified afterward (no `pub`
//! or `pub(crate)` fields), the pointer provenance remains valid throughout the
//! value's lifetime.
//!
//! The [`RawEnvelope::drop`] implementation and
//! [`RawEnvelope::into_value_unchecked`] rely on this invariant to safely
//! reconstruct the `Box` and either drop the value or move it out.
//!
//! # Type Erasure
//!
//! The concrete type parameter `V` is erased by casting to
//! `EnvelopeData<Erased>`. The vtable stored within the `EnvelopeData`
//! provides the runtime type information needed to safely downcast and render
//! the value.

use alloc::boxed::Box;
use core::{any::TypeId, mem::ManuallyDrop, ptr::NonNull};

use crate::{envelope::data::EnvelopeData, handlers::RenderHandler, util::Erased};

/// A pointer to an [`EnvelopeData`] that is guaranteed to point to an
/// initialized instance of an [`EnvelopeData<V>`] for some specific `V`,
/// though we do not know which actual `V` it is.
///
/// However, the pointer is allowed to transition into a non-initialized state
/// inside the [`RawEnvelope::drop`] method.
///
/// The pointer is guaranteed to have been created using [`Box::into_raw`].
///
/// We cannot use a [`Box<EnvelopeData<V>>`] directly, because that does not
/// allow us to type-erase the `V`.
#[repr(transparent)]
pub struct RawEnvelope {
    /// Pointer to the inner envelope data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<EnvelopeData<V>>`
    ///    for some `V` using `Box::into_raw`.
    /// 2. The pointer will point to the same `EnvelopeData<V>` for the entire
    ///    lifetime of this object.
    /// 3. The pointee is properly initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation.
    ptr: NonNull<EnvelopeData<Erased>>,
}

impl RawEnvelope {
    /// Creates a new [`RawEnvelope`] storing `value` and rendering it with the
    /// handler `H`.
    ///
    /// The handler is bound here, once, against the static type `V`. Every
    /// later rendering of the envelope goes through that binding, even after
    /// `V` has been forgotten.
    #[inline]
    pub fn new<V, H>(value: V) -> Self
    where
        V: 'static,
        H: RenderHandler<V>,
    {
        let ptr = Box::new(EnvelopeData::new::<H>(value));
        let ptr: *mut EnvelopeData<V> = Box::into_raw(ptr);
        let ptr: *mut EnvelopeData<Erased> = ptr.cast::<EnvelopeData<Erased>>();

        // SAFETY: `Box::into_raw` returns a non-null pointer
        let ptr: NonNull<EnvelopeData<Erased>> = unsafe { NonNull::new_unchecked(ptr) };

        Self { ptr }
    }

    /// Returns a reference to the [`EnvelopeData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawEnvelopeRef<'_> {
        RawEnvelopeRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Consumes the envelope and moves the stored value out of it.
    ///
    /// The allocation is freed, but the value's destructor is not run: the
    /// value is handed to the caller instead.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `V` matches the actual value type stored in the
    ///    [`EnvelopeData`].
    #[inline]
    pub unsafe fn into_value_unchecked<V: 'static>(self) -> V {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.as_ref().value_type_id(), TypeId::of::<V>());

        let this = ManuallyDrop::new(self);
        let ptr: *mut EnvelopeData<V> = this.ptr.cast::<EnvelopeData<V>>().as_ptr();

        // SAFETY:
        // - The pointer comes from `Box::into_raw` on a `Box<EnvelopeData<V>>`
        //   (guaranteed by `RawEnvelope::new` together with the caller's promise
        //   that `V` is the stored type).
        // - `this` is wrapped in `ManuallyDrop`, so the `Drop` implementation will
        //   not run and the allocation is owned exclusively by the new `Box`.
        let boxed: Box<EnvelopeData<V>> = unsafe { Box::from_raw(ptr) };

        boxed.into_value()
    }
}

impl core::ops::Drop for RawEnvelope {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by
        //    `RawEnvelope::new`)
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to match the
        //    data in the `EnvelopeData`.
        // 3. The pointer is initialized and has not been previously freed as
        //    guaranteed by the invariants on this type. We are correctly transferring
        //    ownership here and the pointer is not used afterwards, as we are in the
        //    drop function.
        unsafe {
            vtable.drop(self.ptr);
        }
    }
}

/// A lifetime-bound pointer to an [`EnvelopeData`] that is guaranteed to
/// point to an initialized instance of an [`EnvelopeData<V>`] for some
/// specific `V`, though we do not know which actual `V` it is.
///
/// We cannot use a [`&'a EnvelopeData<V>`] directly, because that would
/// require us to know the actual type of the value, which we do not.
///
/// [`&'a EnvelopeData<V>`]: EnvelopeData
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct RawEnvelopeRef<'a> {
    /// Pointer to the inner envelope data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<EnvelopeData<V>>`
    ///    for some `V` using `Box::into_raw`.
    /// 2. The pointer will point to the same `EnvelopeData<V>` for the entire
    ///    lifetime of this object.
    ptr: NonNull<EnvelopeData<Erased>>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a EnvelopeData<Erased>`
    _marker: core::marker::PhantomData<&'a EnvelopeData<Erased>>,
}

impl<'a> RawEnvelopeRef<'a> {
    /// Casts the [`RawEnvelopeRef`] to an [`EnvelopeData<V>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `V` matches the actual value type stored in the
    ///    [`EnvelopeData`].
    #[inline]
    pub(super) unsafe fn cast_inner<V>(self) -> &'a EnvelopeData<V> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable().type_id(), TypeId::of::<V>());

        let this = self.ptr.cast::<EnvelopeData<V>>();
        // SAFETY: Converting the NonNull pointer to a reference is sound because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawEnvelopeRef's type invariants)
        // - The pointee is properly initialized (RawEnvelopeRef's doc comment
        //   guarantees it points to an initialized EnvelopeData<V> for some V)
        // - The type `V` matches the actual value type (guaranteed by caller)
        // - Shared access is allowed
        // - The reference lifetime 'a is valid (tied to RawEnvelopeRef<'a>'s
        //   lifetime)
        unsafe { this.as_ref() }
    }

    /// Returns a raw pointer to the [`EnvelopeData`] instance.
    #[inline]
    pub(super) fn as_ptr(self) -> *const EnvelopeData<Erased> {
        self.ptr.as_ptr()
    }

    /// Returns the [`TypeId`] of the stored value.
    #[inline]
    pub fn value_type_id(self) -> TypeId {
        self.vtable().type_id()
    }

    /// Returns the [`core::any::type_name`] of the stored value.
    #[inline]
    pub fn value_type_name(self) -> &'static str {
        self.vtable().type_name()
    }

    /// Returns the [`TypeId`] of the handler bound to the stored value.
    #[inline]
    pub fn handler_type_id(self) -> TypeId {
        self.vtable().handler_type_id()
    }

    /// Whether the bound handler renders the value itself rather than a
    /// placeholder. See [`RenderHandler::PRINTABLE`].
    #[inline]
    pub fn is_printable(self) -> bool {
        self.vtable().printable()
    }

    /// Renders the value by using the [`RenderHandler::display`] method of the
    /// handler used to create the [`EnvelopeData`].
    #[inline]
    pub fn value_display(self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `EnvelopeData`.
        unsafe { vtable.display(self, formatter) }
    }

    /// Renders the value by using the [`RenderHandler::debug`] method of the
    /// handler used to create the [`EnvelopeData`].
    #[inline]
    pub fn value_debug(self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `EnvelopeData`.
        unsafe { vtable.debug(self, formatter) }
    }
}
