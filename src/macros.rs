/// Appends a value to a [`Channel`](crate::Channel), picking its handler from
/// its type.
///
/// Types implementing [`Display`](core::fmt::Display) are rendered through it,
/// like with [`Channel::enqueue`](crate::Channel::enqueue). Every other type
/// is accepted too, and rendered as the
/// [non-printable placeholder](crate::handlers::NON_PRINTABLE_PLACEHOLDER).
/// The choice is made at compile time and only depends on the type.
///
/// The first argument can be a `Channel` or a `&mut Channel`. The macro
/// evaluates to the `&mut Channel`, like the `enqueue` methods.
///
/// # Examples
///
/// ```
/// use polychan::{Channel, enqueue, hooks::trace_sink::CollectingSink};
///
/// struct NoDisplay;
///
/// fn fill(channel: &mut Channel) {
///     enqueue!(channel, 1.5_f32);
/// }
///
/// let sink = CollectingSink::new();
/// let mut channel = Channel::with_sink(sink.clone());
/// enqueue!(channel, NoDisplay);
/// enqueue!(channel, core::ptr::null::<u8>());
/// fill(&mut channel);
///
/// while let Ok(value) = channel.dequeue_generic() {
///     drop(value);
/// }
/// assert_eq!(
///     sink.lines(),
///     [
///         "Print: <<non-printable>>",
///         "Print: <<non-printable>>",
///         "Print: 1.5",
///     ]
/// );
/// ```
#[macro_export]
macro_rules! enqueue {
    ($channel:expr, $value:expr $(,)?) => {{
        use $crate::__private::kind::*;
        let value = $value;
        let handler = (&&Wrap(&value)).handler();
        $channel.enqueue_with(handler, value)
    }};
}
