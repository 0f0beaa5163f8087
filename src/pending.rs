use core::{any::TypeId, fmt};

use crate::{
    envelope::Envelope,
    error::{ResolveError, TypeMismatch},
    markers::Dynamic,
};

/// A value taken out of a [`Channel`] before its type was named.
///
/// Returned by [`Channel::dequeue_generic`]. The value has already left the
/// channel and its trace line has already been emitted; the only thing left
/// to do is to name its type with [`Pending::resolve`].
///
/// Dropping a `Pending` drops the value it holds.
///
/// # Examples
///
/// ```
/// use polychan::{Channel, hooks::trace_sink::NoopSink};
///
/// let mut channel = Channel::with_sink(NoopSink);
/// channel.enqueue(String::from("first"));
/// channel.enqueue(2_u8);
///
/// let first = channel.dequeue_generic().unwrap();
/// let second = channel.dequeue_generic().unwrap();
/// assert!(channel.is_empty());
///
/// // The values can be resolved in any order
/// assert_eq!(second.resolve::<u8>().unwrap(), 2);
/// assert_eq!(first.to_string(), "first");
/// assert_eq!(first.resolve::<String>().unwrap(), "first");
/// ```
///
/// [`Channel`]: crate::Channel
/// [`Channel::dequeue_generic`]: crate::Channel::dequeue_generic
pub struct Pending {
    envelope: Envelope<Dynamic>,
}

impl Pending {
    pub(crate) fn new(envelope: Envelope<Dynamic>) -> Self {
        Self { envelope }
    }

    /// Moves the value out as a `T`.
    ///
    /// # Errors
    ///
    /// If the value is not a `T`, returns a [`ResolveError`] that hands this
    /// `Pending` back unchanged.
    pub fn resolve<T: 'static>(self) -> Result<T, ResolveError> {
        match self.envelope.downcast::<T>() {
            Ok(envelope) => Ok(envelope.into_inner()),
            Err(envelope) => {
                let mismatch =
                    TypeMismatch::new::<T>(envelope.inner_type_id(), envelope.inner_type_name());
                Err(ResolveError::new(mismatch, Pending::new(envelope)))
            }
        }
    }

    /// Borrows the value as a `T`, if it is one.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.envelope.downcast_inner()
    }

    /// Returns `true` if the value is a `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.envelope.is::<T>()
    }

    /// The [`TypeId`] of the held value.
    #[must_use]
    pub fn value_type_id(&self) -> TypeId {
        self.envelope.inner_type_id()
    }

    /// The [`core::any::type_name`] of the held value.
    #[must_use]
    pub fn value_type_name(&self) -> &'static str {
        self.envelope.inner_type_name()
    }

    /// Whether the value was bound to a printable handler when it was
    /// enqueued.
    #[must_use]
    pub fn is_printable(&self) -> bool {
        self.envelope.is_printable()
    }

    /// Returns the underlying envelope.
    #[must_use]
    pub fn into_envelope(self) -> Envelope<Dynamic> {
        self.envelope
    }
}

impl From<Pending> for Envelope<Dynamic> {
    fn from(pending: Pending) -> Self {
        pending.into_envelope()
    }
}

impl fmt::Display for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.envelope.format_inner(), f)
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("type", &self.value_type_name())
            .field("value", &self.envelope.format_inner())
            .finish()
    }
}
