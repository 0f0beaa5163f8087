//! Errors returned when taking values out of a [`Channel`](crate::Channel).
//!
//! Rendering never fails: a value whose type cannot be printed is rendered as
//! the [non-printable placeholder](crate::handlers::NON_PRINTABLE_PLACEHOLDER)
//! rather than reported as an error.

use core::any::TypeId;

use crate::pending::Pending;

/// A value was requested at a type other than the one it was stored with.
///
/// # Examples
///
/// ```
/// use polychan::{Channel, DequeueError};
///
/// let mut channel = Channel::new();
/// channel.enqueue(17_i32);
///
/// let mut destination = String::new();
/// let Err(DequeueError::TypeMismatch(mismatch)) = channel.dequeue_into(&mut destination) else {
///     panic!("expected a type mismatch");
/// };
/// assert_eq!(mismatch.expected(), "alloc::string::String");
/// assert_eq!(mismatch.found(), "i32");
/// assert_eq!(
///     mismatch.to_string(),
///     "type mismatch: expected `alloc::string::String`, found `i32`"
/// );
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("type mismatch: expected `{expected}`, found `{found}`")]
pub struct TypeMismatch {
    expected: &'static str,
    found: &'static str,
    expected_id: TypeId,
    found_id: TypeId,
}

impl TypeMismatch {
    pub(crate) fn new<Expected: 'static>(found_id: TypeId, found: &'static str) -> Self {
        Self {
            expected: core::any::type_name::<Expected>(),
            found,
            expected_id: TypeId::of::<Expected>(),
            found_id,
        }
    }

    /// The [`core::any::type_name`] of the requested type.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// The [`core::any::type_name`] of the stored value.
    #[must_use]
    pub fn found(&self) -> &'static str {
        self.found
    }

    /// The [`TypeId`] of the requested type.
    #[must_use]
    pub fn expected_type_id(&self) -> TypeId {
        self.expected_id
    }

    /// The [`TypeId`] of the stored value.
    #[must_use]
    pub fn found_type_id(&self) -> TypeId {
        self.found_id
    }
}

/// Failure of a dequeue operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DequeueError {
    /// The channel was empty.
    #[error("dequeue from an empty channel")]
    Underflow,
    /// The value at the head of the channel has a different type than the one
    /// requested. The value stays in the channel.
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),
}

/// A [`Pending`] value was resolved at the wrong type.
///
/// The value has already left the channel, so the error hands the
/// [`Pending`] back to let the caller try another type.
///
/// # Examples
///
/// ```
/// use polychan::{Channel, hooks::trace_sink::NoopSink};
///
/// let mut channel = Channel::with_sink(NoopSink);
/// channel.enqueue(2.5_f64);
///
/// let pending = channel.dequeue_generic().unwrap();
/// let error = pending.resolve::<f32>().unwrap_err();
/// assert_eq!(error.mismatch().found(), "f64");
///
/// let value: f64 = error.into_pending().resolve().unwrap();
/// assert_eq!(value, 2.5);
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{mismatch}")]
pub struct ResolveError {
    mismatch: TypeMismatch,
    pending: Pending,
}

impl ResolveError {
    pub(crate) fn new(mismatch: TypeMismatch, pending: Pending) -> Self {
        Self { mismatch, pending }
    }

    /// Describes the requested and the stored type.
    #[must_use]
    pub fn mismatch(&self) -> &TypeMismatch {
        &self.mismatch
    }

    /// Returns the unresolved value.
    #[must_use]
    pub fn into_pending(self) -> Pending {
        self.pending
    }
}

impl From<ResolveError> for TypeMismatch {
    fn from(error: ResolveError) -> Self {
        error.mismatch
    }
}
