use core::any::TypeId;

use polychan_internals::RawEnvelope;

use crate::{
    envelope::EnvelopeRef,
    handlers::{self, RenderHandler},
    markers::Dynamic,
    util::render_helper,
};

/// FIXME: Once rust-lang/rust#132922 gets resolved, we can make the `raw` field
/// an unsafe field and remove this module.
mod limit_field_access {
    use core::marker::PhantomData;

    use polychan_internals::{RawEnvelope, RawEnvelopeRef};

    use crate::markers::Dynamic;

    /// An owned value of any type, together with the handler that renders it.
    ///
    /// # Type Parameters
    /// - `Value`: The type of the stored value. This can either be a concrete
    ///   type, or [`Dynamic`].
    #[repr(transparent)]
    pub struct Envelope<Value: ?Sized + 'static = Dynamic> {
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. `V` must either be a type bounded by `Sized`, or `Dynamic`.
        /// 2. If `V` is a `Sized` type: The value embedded in the
        ///    [`RawEnvelope`] must be of type `V`.
        raw: RawEnvelope,
        _value: PhantomData<Value>,
    }

    impl<V: ?Sized> Envelope<V> {
        /// Creates a new Envelope from a raw envelope
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. `V` must either be a type bounded by `Sized`, or `Dynamic`.
        /// 2. If `V` is a `Sized` type: The value embedded in the
        ///    [`RawEnvelope`] must be of type `V`.
        #[must_use]
        pub(crate) unsafe fn from_raw(raw: RawEnvelope) -> Self {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Guaranteed by caller
            // 2. Guaranteed by caller
            Envelope {
                raw,
                _value: PhantomData,
            }
        }

        /// Consumes the [`Envelope`] and returns the inner [`RawEnvelope`].
        #[must_use]
        pub(crate) fn into_raw(self) -> RawEnvelope {
            // SAFETY: We are destroying `self`, so we no longer
            // need to uphold any safety invariants.
            self.raw
        }

        /// Creates a lifetime-bound [`RawEnvelopeRef`] from the inner
        /// [`RawEnvelope`].
        #[must_use]
        pub(crate) fn as_raw_ref(&self) -> RawEnvelopeRef<'_> {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Upheld as the type parameters do not change.
            // 2. No mutation is possible through the `RawEnvelopeRef`
            self.raw.as_ref()
        }
    }
}
pub use limit_field_access::Envelope;

impl<V: Sized + 'static> Envelope<V> {
    /// Allocates a new [`Envelope`] rendering its value through
    /// [`handlers::Display`].
    ///
    /// See [`Envelope::new_custom`] if you want to control the handler used.
    ///
    /// # Examples
    /// ```
    /// use polychan::envelope::Envelope;
    ///
    /// let envelope = Envelope::new(42_u8);
    /// assert_eq!(envelope.format_inner().to_string(), "42");
    /// ```
    #[must_use]
    pub fn new(value: V) -> Self
    where
        V: core::fmt::Display,
    {
        Self::new_custom::<handlers::Display>(value)
    }

    /// Allocates a new [`Envelope`] rendering its value through the handler
    /// `H`.
    ///
    /// The handler is bound to the static type `V` here. It keeps rendering
    /// the value correctly after the envelope has been turned into an
    /// `Envelope<Dynamic>`.
    ///
    /// # Examples
    /// ```
    /// use polychan::{envelope::Envelope, handlers};
    ///
    /// #[derive(Debug)]
    /// struct Point {
    ///     x: i32,
    ///     y: i32,
    /// }
    ///
    /// let envelope = Envelope::new_custom::<handlers::Debug>(Point { x: 1, y: 2 });
    /// assert_eq!(envelope.format_inner().to_string(), "Point { x: 1, y: 2 }");
    /// ```
    #[must_use]
    pub fn new_custom<H>(value: V) -> Self
    where
        H: RenderHandler<V>,
    {
        let raw = RawEnvelope::new::<V, H>(value);

        // SAFETY:
        // 1. `V` is bounded by `Sized` in this impl, so this is trivially true.
        // 2. We just created the `RawEnvelope` and it does indeed store a value of
        //    type `V`.
        unsafe { Envelope::from_raw(raw) }
    }

    /// Returns a reference to the stored value.
    #[must_use]
    pub fn inner(&self) -> &V {
        self.as_ref().inner()
    }

    /// Consumes the envelope and returns the stored value.
    ///
    /// The value is moved out; its destructor is not run.
    #[must_use]
    pub fn into_inner(self) -> V {
        let raw = self.into_raw();

        // SAFETY:
        // 1. `V` is `Sized`, so by the invariants of this type the raw envelope
        //    stores a value of type `V`.
        unsafe { raw.into_value_unchecked::<V>() }
    }
}

impl<V: ?Sized> Envelope<V> {
    /// Changes the value type of the [`Envelope`] to [`Dynamic`].
    ///
    /// This does not modify the envelope in any way. It only "forgets" that the
    /// stored value actually has the type `V`. To get the concrete type back,
    /// use [`Envelope::downcast`].
    #[must_use]
    pub fn into_dynamic(self) -> Envelope<Dynamic> {
        let raw = self.into_raw();

        // SAFETY:
        // 1. `V=Dynamic`, so this is trivially true.
        // 2. `V=Dynamic`, so this is trivially true.
        unsafe { Envelope::<Dynamic>::from_raw(raw) }
    }

    /// Returns the [`TypeId`] of the stored value.
    #[must_use]
    pub fn inner_type_id(&self) -> TypeId {
        self.as_raw_ref().value_type_id()
    }

    /// Returns the [`core::any::type_name`] of the stored value.
    #[must_use]
    pub fn inner_type_name(&self) -> &'static str {
        self.as_raw_ref().value_type_name()
    }

    /// Returns the [`TypeId`] of the handler bound to the stored value.
    #[must_use]
    pub fn inner_handler_type_id(&self) -> TypeId {
        self.as_raw_ref().handler_type_id()
    }

    /// Whether the bound handler renders the value itself, rather than the
    /// [non-printable placeholder](crate::handlers::NON_PRINTABLE_PLACEHOLDER).
    #[must_use]
    pub fn is_printable(&self) -> bool {
        self.as_raw_ref().is_printable()
    }

    /// Renders the stored value, applying any registered
    /// [render override](crate::hooks::render_override).
    #[must_use]
    pub fn format_inner(&self) -> impl core::fmt::Display + core::fmt::Debug + '_ {
        self.as_ref().format_inner()
    }

    /// Renders the stored value through its bound handler only, ignoring
    /// render overrides.
    #[must_use]
    pub fn format_inner_unhooked(&self) -> impl core::fmt::Display + core::fmt::Debug + '_ {
        render_helper(
            self.as_raw_ref(),
            |raw, formatter| raw.value_display(formatter),
            |raw, formatter| raw.value_debug(formatter),
        )
    }

    /// Returns a reference to the envelope.
    #[must_use]
    pub fn as_ref(&self) -> EnvelopeRef<'_, V> {
        let raw = self.as_raw_ref();

        // SAFETY:
        // 1. Guaranteed by the invariants of this type.
        // 2. Guaranteed by the invariants of this type.
        unsafe { EnvelopeRef::from_raw(raw) }
    }
}

impl Envelope<Dynamic> {
    /// Returns `true` if the stored value is of type `V`.
    #[must_use]
    pub fn is<V: Sized + 'static>(&self) -> bool {
        self.inner_type_id() == TypeId::of::<V>()
    }

    /// Attempts to downcast the stored value to a specific type.
    ///
    /// Returns `Some(&V)` if the stored value is of type `V`, otherwise
    /// returns `None`.
    #[must_use]
    pub fn downcast_inner<V>(&self) -> Option<&V>
    where
        V: Sized + 'static,
    {
        self.as_ref().downcast_inner()
    }

    /// Attempts to downcast the [`Envelope`] to a specific value type.
    ///
    /// Returns `Ok(envelope)` if the stored value is of type `V`, otherwise
    /// returns `Err(self)` with the original [`Envelope`].
    pub fn downcast<V>(self) -> Result<Envelope<V>, Self>
    where
        V: Sized + 'static,
    {
        if self.is::<V>() {
            // SAFETY:
            // 1. We just checked that the type IDs match
            let envelope = unsafe { self.downcast_unchecked() };

            Ok(envelope)
        } else {
            Err(self)
        }
    }

    /// Downcasts the [`Envelope`] to a specific value type without checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The stored value is actually of type `V` (can be verified by calling
    ///    [`inner_type_id()`] first)
    ///
    /// [`inner_type_id()`]: Envelope::inner_type_id
    #[must_use]
    pub unsafe fn downcast_unchecked<V>(self) -> Envelope<V>
    where
        V: Sized + 'static,
    {
        let raw = self.into_raw();

        // SAFETY:
        // 1. `V` is bounded by `Sized`, so this is trivially true.
        // 2. Guaranteed by the caller
        unsafe { Envelope::<V>::from_raw(raw) }
    }
}

impl<V: Sized + 'static> From<V> for Envelope<V>
where
    V: core::fmt::Display,
{
    fn from(value: V) -> Self {
        Envelope::new(value)
    }
}

impl<V: Sized + 'static> From<Envelope<V>> for Envelope<Dynamic> {
    fn from(envelope: Envelope<V>) -> Self {
        envelope.into_dynamic()
    }
}

impl<V: ?Sized> core::fmt::Debug for Envelope<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Envelope")
            .field("type", &self.inner_type_name())
            .field("value", &self.format_inner())
            .finish()
    }
}

impl<V: ?Sized> Unpin for Envelope<V> {}

#[cfg(test)]
mod tests {
    use alloc::{format, rc::Rc, string::String};
    use core::cell::Cell;

    use super::*;

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_envelope_not_send_sync() {
        static_assertions::assert_not_impl_any!(Envelope<u32>: Send, Sync);
        static_assertions::assert_not_impl_any!(Envelope<String>: Send, Sync);
        static_assertions::assert_not_impl_any!(Envelope<Dynamic>: Send, Sync);
    }

    #[test]
    fn test_envelope_not_copy_clone() {
        static_assertions::assert_not_impl_any!(Envelope<u32>: Copy, Clone);
        static_assertions::assert_not_impl_any!(Envelope<Dynamic>: Copy, Clone);
    }

    #[test]
    fn test_envelope_unpin() {
        static_assertions::assert_impl_all!(Envelope<u32>: Unpin);
        static_assertions::assert_impl_all!(Envelope<Dynamic>: Unpin);
    }

    #[test]
    fn test_envelope_pointer_sized() {
        assert_eq!(
            core::mem::size_of::<Envelope<Dynamic>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<Envelope<Dynamic>>>(),
            core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_downcast_round_trip() {
        let envelope = Envelope::new(String::from("notasecret")).into_dynamic();
        assert!(envelope.is::<String>());
        assert!(!envelope.is::<&str>());
        assert_eq!(envelope.downcast_inner::<i32>(), None);
        assert_eq!(
            envelope.downcast_inner::<String>().map(String::as_str),
            Some("notasecret")
        );

        let envelope = envelope.downcast::<i32>().unwrap_err();
        let envelope = envelope.downcast::<String>().unwrap();
        assert_eq!(envelope.into_inner(), "notasecret");
    }

    #[test]
    fn test_debug_output() {
        let envelope = Envelope::new(7_i64).into_dynamic();
        assert_eq!(
            format!("{envelope:?}"),
            r#"Envelope { type: "i64", value: 7 }"#
        );
    }

    #[test]
    fn test_drop_once() {
        let drops = Rc::new(Cell::new(0));

        let envelope = Envelope::new_custom::<handlers::NonPrintable>(DropCounter(drops.clone()));
        let envelope = envelope.into_dynamic();
        assert_eq!(drops.get(), 0);
        drop(envelope);
        assert_eq!(drops.get(), 1);

        let envelope = Envelope::new_custom::<handlers::NonPrintable>(DropCounter(drops.clone()));
        let value = envelope.into_inner();
        assert_eq!(drops.get(), 1);
        drop(value);
        assert_eq!(drops.get(), 2);
    }
}
