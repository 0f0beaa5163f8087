use alloc::{boxed::Box, collections::VecDeque};
use core::fmt;

use crate::{
    envelope::Envelope,
    error::{DequeueError, TypeMismatch},
    handlers::{self, RenderHandler},
    hooks::trace_sink::{self, TraceRecord, TraceSink},
    markers::Dynamic,
    pending::Pending,
};

/// A first-in, first-out queue of values of unrelated types.
///
/// Values of any `'static` type can be enqueued. Each value is stored together
/// with a [handler](crate::handlers) chosen for its static type, which renders
/// it in the `Print: <value>` trace line emitted when it is dequeued.
///
/// Values come back out in insertion order, either at a named type
/// ([`dequeue`](Channel::dequeue), [`dequeue_into`](Channel::dequeue_into)),
/// which is checked against the stored type, or without naming the type
/// ([`dequeue_generic`](Channel::dequeue_generic)).
///
/// A `Channel` is neither `Send` nor `Sync`, since it may hold values that are
/// neither.
///
/// # Examples
///
/// ```
/// use polychan::{Channel, DequeueError, enqueue, hooks::trace_sink::CollectingSink};
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
///
/// enqueue!(channel, "notasecret");
/// enqueue!(channel, Secret { value: 42 });
/// enqueue!(channel, 42);
///
/// let mut text = "";
/// let mut secret = Secret { value: 0 };
/// let mut number = 0;
/// channel.dequeue_into(&mut text)?;
/// channel.dequeue_into(&mut secret)?;
/// channel.dequeue_into(&mut number)?;
///
/// assert_eq!((text, secret.value, number), ("notasecret", 42, 42));
/// assert_eq!(
///     sink.lines(),
///     ["Print: notasecret", "Print: 42", "Print: 42"]
/// );
/// assert_eq!(channel.dequeue::<i32>(), Err(DequeueError::Underflow));
/// # Ok::<(), DequeueError>(())
/// ```
#[derive(Default)]
pub struct Channel {
    queue: VecDeque<Envelope<Dynamic>>,
    sink: Option<Box<dyn TraceSink>>,
}

impl Channel {
    /// Creates an empty channel that traces to the global sink, or to the
    /// [default sink](crate::hooks::trace_sink::DefaultSink) if none is
    /// installed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            sink: None,
        }
    }

    /// Creates an empty channel that traces to `sink`.
    #[must_use]
    pub fn with_sink(sink: impl TraceSink) -> Self {
        Self {
            queue: VecDeque::new(),
            sink: Some(trace_sink::boxed(sink)),
        }
    }

    /// Sets the sink this channel traces to, returning the previous one.
    pub fn set_sink(&mut self, sink: impl TraceSink) -> Option<Box<dyn TraceSink>> {
        self.sink.replace(trace_sink::boxed(sink))
    }

    /// Removes this channel's sink, so it traces to the global sink again.
    pub fn take_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    /// Appends a printable value at the tail of the channel.
    ///
    /// The value is rendered through its [`Display`](core::fmt::Display)
    /// implementation when it is dequeued. Use the [`enqueue!`](crate::enqueue!)
    /// macro to also accept types that are not printable.
    pub fn enqueue<V>(&mut self, value: V) -> &mut Self
    where
        V: fmt::Display + 'static,
    {
        self.enqueue_custom::<handlers::Display, V>(value)
    }

    /// Appends a value of any type at the tail of the channel.
    ///
    /// The value is rendered as the
    /// [non-printable placeholder](crate::handlers::NON_PRINTABLE_PLACEHOLDER)
    /// when it is dequeued, whether or not its type is printable.
    pub fn enqueue_opaque<V>(&mut self, value: V) -> &mut Self
    where
        V: 'static,
    {
        self.enqueue_custom::<handlers::NonPrintable, V>(value)
    }

    /// Appends a value at the tail of the channel, rendered by the handler
    /// `H`.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychan::{Channel, handlers, hooks::trace_sink::CollectingSink};
    ///
    /// let sink = CollectingSink::new();
    /// let mut channel = Channel::with_sink(sink.clone());
    /// channel.enqueue_custom::<handlers::Debug, _>(Some("x"));
    /// channel.dequeue_generic().unwrap();
    /// assert_eq!(sink.lines(), [r#"Print: Some("x")"#]);
    /// ```
    pub fn enqueue_custom<H, V>(&mut self, value: V) -> &mut Self
    where
        H: RenderHandler<V>,
        V: 'static,
    {
        self.enqueue_envelope(Envelope::new_custom::<H>(value))
    }

    /// Appends an already built envelope at the tail of the channel.
    pub fn enqueue_envelope<V: ?Sized>(&mut self, envelope: Envelope<V>) -> &mut Self {
        self.queue.push_back(envelope.into_dynamic());
        self
    }

    /// Used by the [`enqueue!`](crate::enqueue!) macro, which picks the
    /// handler.
    #[doc(hidden)]
    pub fn enqueue_with<H, V>(&mut self, _handler: H, value: V) -> &mut Self
    where
        H: RenderHandler<V>,
        V: 'static,
    {
        self.enqueue_custom::<H, V>(value)
    }

    /// Removes the value at the head of the channel, writes it into
    /// `destination` and returns `destination`.
    ///
    /// The previous content of `destination` is dropped.
    ///
    /// # Errors
    ///
    /// - [`DequeueError::Underflow`] if the channel is empty.
    /// - [`DequeueError::TypeMismatch`] if the value at the head is not a `T`.
    ///   The value stays at the head and `destination` is left untouched.
    pub fn dequeue_into<'a, T>(&mut self, destination: &'a mut T) -> Result<&'a mut T, DequeueError>
    where
        T: 'static,
    {
        *destination = self.dequeue::<T>()?;
        Ok(destination)
    }

    /// Removes the value at the head of the channel and returns it.
    ///
    /// # Errors
    ///
    /// - [`DequeueError::Underflow`] if the channel is empty.
    /// - [`DequeueError::TypeMismatch`] if the value at the head is not a `T`.
    ///   The value stays at the head and no trace line is emitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychan::{Channel, DequeueError, hooks::trace_sink::NoopSink};
    ///
    /// let mut channel = Channel::with_sink(NoopSink);
    /// channel.enqueue(10_i32);
    ///
    /// assert!(matches!(
    ///     channel.dequeue::<String>(),
    ///     Err(DequeueError::TypeMismatch(_))
    /// ));
    /// assert_eq!(channel.len(), 1);
    /// assert_eq!(channel.dequeue::<i32>(), Ok(10));
    /// ```
    pub fn dequeue<T>(&mut self) -> Result<T, DequeueError>
    where
        T: 'static,
    {
        let envelope = self.queue.pop_front().ok_or(DequeueError::Underflow)?;
        match envelope.downcast::<T>() {
            Ok(envelope) => {
                self.trace(envelope.as_ref().into_dynamic());
                Ok(envelope.into_inner())
            }
            Err(envelope) => {
                let mismatch =
                    TypeMismatch::new::<T>(envelope.inner_type_id(), envelope.inner_type_name());
                self.queue.push_front(envelope);
                Err(mismatch.into())
            }
        }
    }

    /// Removes the value at the head of the channel without naming its type.
    ///
    /// The trace line is emitted now. The type is named later, with
    /// [`Pending::resolve`].
    ///
    /// # Errors
    ///
    /// [`DequeueError::Underflow`] if the channel is empty.
    pub fn dequeue_generic(&mut self) -> Result<Pending, DequeueError> {
        let envelope = self.queue.pop_front().ok_or(DequeueError::Underflow)?;
        self.trace(envelope.as_ref());
        Ok(Pending::new(envelope))
    }

    /// Returns `true` if the channel holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns the [`core::any::type_name`] of the value at the head, or
    /// `None` if the channel is empty.
    #[must_use]
    pub fn head_type_name(&self) -> Option<&'static str> {
        self.queue.front().map(Envelope::inner_type_name)
    }

    fn trace(&self, value: crate::envelope::EnvelopeRef<'_, Dynamic>) {
        trace_sink::emit(self.sink.as_deref(), TraceRecord::new(value));
    }
}

struct QueuedTypes<'a>(&'a VecDeque<Envelope<Dynamic>>);

impl fmt::Debug for QueuedTypes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(Envelope::inner_type_name))
            .finish()
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("len", &self.len())
            .field("types", &QueuedTypes(&self.queue))
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        // Remaining values go in FIFO order and are not traced.
        while let Some(envelope) = self.queue.pop_front() {
            drop(envelope);
        }
    }
}
