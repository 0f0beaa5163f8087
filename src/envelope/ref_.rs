use core::{any::TypeId, fmt, marker::PhantomData};

use polychan_internals::RawEnvelopeRef;

use crate::{markers::Dynamic, util::render_helper};

/// A reference to an [`Envelope`].
///
/// This is what [trace sinks](crate::hooks::trace_sink) and
/// [render overrides](crate::hooks::render_override) get to see of a value.
///
/// # Examples
/// ```
/// use polychan::{
///     envelope::{Envelope, EnvelopeRef},
///     markers::Dynamic,
/// };
///
/// let envelope: Envelope<&str> = Envelope::new("text data");
/// let envelope_ref: EnvelopeRef<'_, &str> = envelope.as_ref();
/// assert_eq!(*envelope_ref.inner(), "text data");
///
/// let erased: EnvelopeRef<'_, Dynamic> = envelope_ref.into_dynamic();
/// assert_eq!(erased.downcast_inner::<&str>(), Some(&"text data"));
/// assert_eq!(erased.downcast_inner::<String>(), None);
/// ```
///
/// [`Envelope`]: crate::envelope::Envelope
#[repr(transparent)]
pub struct EnvelopeRef<'a, Value: ?Sized + 'static = Dynamic> {
    raw: RawEnvelopeRef<'a>,
    _value: PhantomData<Value>,
}

impl<'a, V: ?Sized> Copy for EnvelopeRef<'a, V> {}
impl<'a, V: ?Sized> Clone for EnvelopeRef<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V: ?Sized> EnvelopeRef<'a, V> {
    /// Creates a new EnvelopeRef from a raw envelope reference
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `V` must either be a type bounded by `Sized`, or `Dynamic`.
    /// 2. If `V` is a `Sized` type: The value embedded in the
    ///    [`RawEnvelopeRef`] must be of type `V`.
    pub(crate) unsafe fn from_raw(raw: RawEnvelopeRef<'a>) -> Self {
        EnvelopeRef {
            raw,
            _value: PhantomData,
        }
    }

    /// Forgets the concrete type of the referenced value.
    #[must_use]
    pub fn into_dynamic(self) -> EnvelopeRef<'a, Dynamic> {
        // SAFETY:
        // 1. `V=Dynamic`, so this is trivially true.
        // 2. `V=Dynamic`, so this is trivially true.
        unsafe { EnvelopeRef::from_raw(self.raw) }
    }

    /// Returns the [`TypeId`] of the referenced value.
    #[must_use]
    pub fn inner_type_id(self) -> TypeId {
        self.raw.value_type_id()
    }

    /// Returns the [`core::any::type_name`] of the referenced value.
    #[must_use]
    pub fn inner_type_name(self) -> &'static str {
        self.raw.value_type_name()
    }

    /// Returns the [`TypeId`] of the handler that was bound to the value when
    /// it was enqueued.
    #[must_use]
    pub fn inner_handler_type_id(self) -> TypeId {
        self.raw.handler_type_id()
    }

    /// Whether the bound handler renders the value itself.
    #[must_use]
    pub fn is_printable(self) -> bool {
        self.raw.is_printable()
    }

    /// Renders the value through its bound handler, bypassing any registered
    /// [render override](crate::hooks::render_override).
    #[must_use]
    pub fn format_inner_unhooked(self) -> impl fmt::Display + fmt::Debug + 'a {
        render_helper(
            self.raw,
            |raw, formatter| raw.value_display(formatter),
            |raw, formatter| raw.value_debug(formatter),
        )
    }

    /// Renders the value, applying the
    /// [render override](crate::hooks::render_override) registered for its
    /// type, if any.
    #[must_use]
    pub fn format_inner(self) -> impl fmt::Display + fmt::Debug + 'a {
        render_helper(
            self.into_dynamic(),
            crate::hooks::render_override::display_value,
            crate::hooks::render_override::debug_value,
        )
    }
}

impl<'a, V: Sized + 'static> EnvelopeRef<'a, V> {
    /// Returns a reference to the value.
    #[must_use]
    pub fn inner(self) -> &'a V {
        // SAFETY:
        // 1. `V` is `Sized`, so by the invariants of this type the referenced
        //    value is of type `V`.
        unsafe { self.raw.value_downcast_unchecked::<V>() }
    }
}

impl<'a> EnvelopeRef<'a, Dynamic> {
    /// Returns `true` if the referenced value is of type `V`.
    #[must_use]
    pub fn is<V: Sized + 'static>(self) -> bool {
        self.inner_type_id() == TypeId::of::<V>()
    }

    /// Attempts to recover the concrete type of the referenced value.
    #[must_use]
    pub fn downcast_envelope<V>(self) -> Option<EnvelopeRef<'a, V>>
    where
        V: Sized + 'static,
    {
        if self.is::<V>() {
            // SAFETY:
            // 1. `V` is bounded by `Sized`, so this is trivially true.
            // 2. We just checked that the type IDs match.
            Some(unsafe { EnvelopeRef::from_raw(self.raw) })
        } else {
            None
        }
    }

    /// Attempts to downcast the referenced value to `V`.
    #[must_use]
    pub fn downcast_inner<V>(self) -> Option<&'a V>
    where
        V: Sized + 'static,
    {
        Some(self.downcast_envelope::<V>()?.inner())
    }
}

impl<'a, V: ?Sized> fmt::Display for EnvelopeRef<'a, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.format_inner(), formatter)
    }
}

impl<'a, V: ?Sized> fmt::Debug for EnvelopeRef<'a, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.format_inner(), formatter)
    }
}

impl<'a, V: Sized + 'static> From<EnvelopeRef<'a, V>> for EnvelopeRef<'a, Dynamic> {
    fn from(value: EnvelopeRef<'a, V>) -> Self {
        value.into_dynamic()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String};

    use super::*;
    use crate::{envelope::Envelope, handlers};

    #[test]
    fn test_envelope_ref_send_sync() {
        static_assertions::assert_not_impl_any!(EnvelopeRef<'static, ()>: Send, Sync);
        static_assertions::assert_not_impl_any!(EnvelopeRef<'static, String>: Send, Sync);
        static_assertions::assert_not_impl_any!(EnvelopeRef<'static, Dynamic>: Send, Sync);
    }

    #[test]
    fn test_envelope_ref_copy_clone() {
        static_assertions::assert_impl_all!(EnvelopeRef<'static, ()>: Copy, Clone);
        static_assertions::assert_impl_all!(EnvelopeRef<'static, String>: Copy, Clone);
        static_assertions::assert_impl_all!(EnvelopeRef<'static, Dynamic>: Copy, Clone);
    }

    #[test]
    fn test_type_information() {
        let envelope = Envelope::new(3.5_f64);
        let envelope_ref = envelope.as_ref().into_dynamic();
        assert_eq!(envelope_ref.inner_type_id(), TypeId::of::<f64>());
        assert_eq!(envelope_ref.inner_type_name(), "f64");
        assert_eq!(
            envelope_ref.inner_handler_type_id(),
            TypeId::of::<handlers::Display>()
        );
        assert!(envelope_ref.is_printable());
    }

    #[test]
    fn test_unhooked_rendering() {
        let printable = Envelope::new(String::from("notasecret"));
        assert_eq!(
            format!("{}", printable.as_ref().format_inner_unhooked()),
            "notasecret"
        );
        assert_eq!(
            format!("{:?}", printable.as_ref().format_inner_unhooked()),
            "notasecret"
        );

        let opaque = Envelope::new_custom::<handlers::NonPrintable>(1 as *const i32);
        assert!(!opaque.as_ref().is_printable());
        assert_eq!(
            format!("{}", opaque.as_ref().format_inner_unhooked()),
            handlers::NON_PRINTABLE_PLACEHOLDER
        );
    }

    #[test]
    fn test_downcast() {
        let envelope = Envelope::new(5_u16);
        let erased = envelope.as_ref().into_dynamic();
        assert!(erased.is::<u16>());
        assert!(erased.downcast_envelope::<u32>().is_none());
        assert_eq!(erased.downcast_inner::<u16>(), Some(&5));
    }
}
