//! Destinations for the `Print: <value>` lines emitted on every dequeue.
//!
//! Every successful dequeue renders the removed value and hands a
//! [`TraceRecord`] to exactly one sink. The sink is resolved per record:
//!
//! 1. the sink set on the channel itself ([`Channel::with_sink`],
//!    [`Channel::set_sink`]),
//! 2. otherwise the process-wide sink installed with [`install_global_sink`],
//! 3. otherwise [`DefaultSink`], which writes to stdout when the `std` feature
//!    is enabled and discards the record when it is not.
//!
//! Any `Fn(TraceRecord<'_>)` closure can be used as a sink.
//!
//! # Examples
//!
//! ```rust
//! use polychan::{Channel, hooks::trace_sink::CollectingSink};
//!
//! let sink = CollectingSink::new();
//! let mut channel = Channel::with_sink(sink.clone());
//! channel.enqueue(String::from("notasecret"));
//! channel.enqueue(42);
//!
//! let _text: String = channel.dequeue().unwrap();
//! let _number: i32 = channel.dequeue().unwrap();
//! assert_eq!(sink.lines(), ["Print: notasecret", "Print: 42"]);
//! ```
//!
//! Using a closure:
//!
//! ```rust
//! use polychan::{Channel, hooks::trace_sink::TraceRecord};
//!
//! let mut channel = Channel::with_sink(|record: TraceRecord<'_>| {
//!     eprintln!("[{}] {record}", record.type_name());
//! });
//! channel.enqueue(1_u8);
//! channel.dequeue::<u8>().unwrap();
//! ```
//!
//! # Environment Variables
//!
//! With the `std` feature, [`DefaultSink`] reads `POLYCHAN_TRACE` once. It is
//! a comma-separated list of options:
//!
//! - `off` - Discard all records
//! - `stderr` - Write to stderr instead of stdout
//! - `type_names` - Append the value's type name to every line, as in
//!   `Print: 42 (i32)`
//!
//! The variable never affects a sink installed explicitly.
//!
//! [`Channel::with_sink`]: crate::Channel::with_sink
//! [`Channel::set_sink`]: crate::Channel::set_sink

use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt::{self, Write as _};

use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::{envelope::EnvelopeRef, hooks::hook_lock::HookLock, markers::Dynamic};

/// One dequeue, as seen by a [`TraceSink`].
///
/// Formatting a record with `Display` produces the full trace line without a
/// trailing newline, for example `Print: 42`.
#[derive(Copy, Clone, Debug)]
pub struct TraceRecord<'a> {
    value: EnvelopeRef<'a, Dynamic>,
}

impl<'a> TraceRecord<'a> {
    pub(crate) fn new(value: EnvelopeRef<'a, Dynamic>) -> Self {
        Self { value }
    }

    /// The rendered value, with any
    /// [render override](crate::hooks::render_override) applied.
    pub fn value(self) -> impl fmt::Display + fmt::Debug + 'a {
        self.value.format_inner()
    }

    /// The dequeued value itself.
    pub fn envelope(self) -> EnvelopeRef<'a, Dynamic> {
        self.value
    }

    /// The [`core::any::type_name`] of the dequeued value.
    pub fn type_name(self) -> &'static str {
        self.value.inner_type_name()
    }

    /// Whether the value was rendered by a printable handler, as opposed to
    /// the non-printable placeholder.
    pub fn is_printable(self) -> bool {
        self.value.is_printable()
    }
}

impl fmt::Display for TraceRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Print: {}", self.value.format_inner())
    }
}

/// A destination for trace records.
pub trait TraceSink: 'static {
    /// Consumes one record.
    ///
    /// Called once per dequeue, after the value has been removed from the
    /// channel.
    fn emit(&self, record: TraceRecord<'_>);
}

impl<F> TraceSink for F
where
    F: Fn(TraceRecord<'_>) + 'static,
{
    fn emit(&self, record: TraceRecord<'_>) {
        self(record)
    }
}

/// Discards every record.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn emit(&self, _record: TraceRecord<'_>) {}
}

/// Buffers trace lines in memory.
///
/// Clones share the same buffer, so one handle can be given to a channel and
/// another kept for inspecting what was emitted.
#[derive(Clone, Default)]
pub struct CollectingSink {
    lines: Arc<spin::Mutex<Vec<String>>>,
}

impl CollectingSink {
    /// Creates a sink with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line collected so far, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Removes and returns every line collected so far.
    pub fn take(&self) -> Vec<String> {
        core::mem::take(&mut *self.lines.lock())
    }
}

impl TraceSink for CollectingSink {
    fn emit(&self, record: TraceRecord<'_>) {
        let mut line = String::new();
        // A failing handler keeps whatever it rendered before the error.
        let _ = write!(line, "{record}");
        self.lines.lock().push(line);
    }
}

impl fmt::Debug for CollectingSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectingSink")
            .field("lines", &*self.lines.lock())
            .finish()
    }
}

/// Writes every record as one line to stdout.
///
/// Lines have the same shape as [`CollectingSink`] lines, followed by a
/// newline. A write error, such as a closed stdout, is ignored.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug, Default)]
pub struct StdoutSink;

#[cfg(feature = "std")]
impl TraceSink for StdoutSink {
    fn emit(&self, record: TraceRecord<'_>) {
        write_line(&mut std::io::stdout().lock(), record, false);
    }
}

/// Writes every record as one line to stderr.
///
/// Behaves like [`StdoutSink`] apart from the stream.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug, Default)]
pub struct StderrSink;

#[cfg(feature = "std")]
impl TraceSink for StderrSink {
    fn emit(&self, record: TraceRecord<'_>) {
        write_line(&mut std::io::stderr().lock(), record, false);
    }
}

#[cfg(feature = "std")]
fn write_line(writer: &mut impl std::io::Write, record: TraceRecord<'_>, type_name: bool) {
    // Rendered up front: `io::Write::write_fmt` panics on a failing handler.
    let mut line = String::new();
    let _ = write!(line, "{record}");
    if type_name {
        let _ = write!(line, " ({})", record.type_name());
    }
    line.push('\n');

    // A closed stdout must not turn a dequeue into a panic.
    let _ = writer.write_all(line.as_bytes());
}

/// Emits every record as a `tracing` event.
///
/// Events are emitted at `INFO` level with target `polychan`. The message is
/// the trace line; the value's type name and printability are attached as the
/// fields `type_name` and `printable`.
///
/// # Examples
///
/// ```rust
/// use polychan::{Channel, hooks::trace_sink::TracingSink};
///
/// let mut channel = Channel::with_sink(TracingSink);
/// channel.enqueue("hello");
/// channel.dequeue::<&str>().unwrap();
/// ```
#[cfg(feature = "tracing")]
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl TraceSink for TracingSink {
    fn emit(&self, record: TraceRecord<'_>) {
        tracing::info!(
            target: "polychan",
            type_name = record.type_name(),
            printable = record.is_printable(),
            "{record}"
        );
    }
}

#[cfg(feature = "std")]
#[derive(Debug, Default, PartialEq, Eq)]
struct PolychanTraceEnvOptions {
    off: bool,
    stderr: bool,
    type_names: bool,
}

#[cfg(feature = "std")]
impl PolychanTraceEnvOptions {
    fn get() -> &'static Self {
        static POLYCHAN_TRACE_FLAGS: std::sync::OnceLock<PolychanTraceEnvOptions> =
            std::sync::OnceLock::new();

        POLYCHAN_TRACE_FLAGS.get_or_init(|| {
            std::env::var_os("POLYCHAN_TRACE")
                .map(|var| Self::parse(&var.to_string_lossy()))
                .unwrap_or_default()
        })
    }

    /// Parses a comma-separated option list. Unknown entries are ignored.
    fn parse(var: &str) -> Self {
        let mut options = Self::default();
        for v in var.split(',') {
            let v = v.trim();
            if v.eq_ignore_ascii_case("off") {
                options.off = true;
            } else if v.eq_ignore_ascii_case("stderr") {
                options.stderr = true;
            } else if v.eq_ignore_ascii_case("type_names") {
                options.type_names = true;
            }
        }
        options
    }
}

/// The sink used when neither the channel nor the process has one installed.
///
/// With the `std` feature, writes every record to stdout, configured by the
/// `POLYCHAN_TRACE` environment variable (see the [module docs](self)).
/// Without `std`, discards every record.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultSink;

impl TraceSink for DefaultSink {
    #[cfg(feature = "std")]
    fn emit(&self, record: TraceRecord<'_>) {
        let options = PolychanTraceEnvOptions::get();
        if options.off {
            return;
        }

        if options.stderr {
            write_line(&mut std::io::stderr().lock(), record, options.type_names);
        } else {
            write_line(&mut std::io::stdout().lock(), record, options.type_names);
        }
    }

    #[cfg(not(feature = "std"))]
    fn emit(&self, _record: TraceRecord<'_>) {}
}

/// A [`TraceSink`] that may be shared across threads.
trait SharedTraceSink: TraceSink + Send + Sync {}

impl<S: TraceSink + Send + Sync> SharedTraceSink for S {}

static GLOBAL_SINK: HookLock<Arc<dyn SharedTraceSink>> = HookLock::new();

/// Installs `sink` as the process-wide trace sink.
///
/// The global sink receives the records of every channel that has no sink of
/// its own. Returns `true` if an earlier global sink was replaced.
///
/// # Examples
///
/// ```rust
/// use polychan::hooks::trace_sink::{NoopSink, install_global_sink, remove_global_sink};
///
/// install_global_sink(NoopSink);
/// assert!(remove_global_sink());
/// ```
pub fn install_global_sink<S>(sink: S) -> bool
where
    S: TraceSink + Send + Sync,
{
    let sink: Arc<S> = Arc::new(sink);
    let sink = sink.unsize(unsize::Coercion!(to dyn SharedTraceSink));
    GLOBAL_SINK.replace(Some(sink)).is_some()
}

/// Removes the process-wide trace sink, falling back to [`DefaultSink`].
///
/// Returns `true` if a global sink was installed.
pub fn remove_global_sink() -> bool {
    GLOBAL_SINK.replace(None).is_some()
}

/// Routes one record to the first sink in resolution order.
pub(crate) fn emit(channel_sink: Option<&dyn TraceSink>, record: TraceRecord<'_>) {
    if let Some(sink) = channel_sink {
        sink.emit(record);
    } else if let Some(sink) = GLOBAL_SINK.get_cloned() {
        sink.emit(record);
    } else {
        DefaultSink.emit(record);
    }
}

/// Boxes a sink for storage in a channel.
pub(crate) fn boxed(sink: impl TraceSink) -> Box<dyn TraceSink> {
    Box::new(sink)
}

#[cfg(test)]
mod tests {
    use alloc::{format, rc::Rc, string::ToString};
    use core::cell::RefCell;

    use super::*;
    use crate::{
        envelope::Envelope,
        handlers::{self, RenderHandler},
    };

    struct FailingHandler;

    impl RenderHandler<u8> for FailingHandler {
        fn display(value: &u8, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "{value} and then")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_sink_auto_traits() {
        static_assertions::assert_impl_all!(CollectingSink: TraceSink, Send, Sync, Clone);
        static_assertions::assert_impl_all!(NoopSink: TraceSink, Send, Sync, Copy);
        static_assertions::assert_impl_all!(DefaultSink: TraceSink, Send, Sync);
        static_assertions::assert_not_impl_any!(TraceRecord<'static>: Send, Sync);
    }

    #[test]
    fn test_record_line() {
        let envelope = Envelope::new(42_i32).into_dynamic();
        let record = TraceRecord::new(envelope.as_ref());
        assert_eq!(format!("{record}"), "Print: 42");
        assert_eq!(format!("{}", record.value()), "42");
        assert_eq!(record.type_name(), "i32");
        assert!(record.is_printable());
    }

    #[test]
    fn test_record_line_non_printable() {
        let envelope = Envelope::new_custom::<handlers::NonPrintable>(1 as *const i32).into_dynamic();
        let record = TraceRecord::new(envelope.as_ref());
        assert_eq!(format!("{record}"), "Print: <<non-printable>>");
        assert!(!record.is_printable());
    }

    #[test]
    fn test_collecting_sink_shares_buffer() {
        let sink = CollectingSink::new();
        let handle = sink.clone();

        let envelope = Envelope::new("hello").into_dynamic();
        sink.emit(TraceRecord::new(envelope.as_ref()));
        sink.emit(TraceRecord::new(envelope.as_ref()));

        assert_eq!(handle.lines(), ["Print: hello", "Print: hello"]);
        assert_eq!(handle.take().len(), 2);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_collecting_sink_keeps_partial_line() {
        let sink = CollectingSink::new();
        let envelope = Envelope::new_custom::<FailingHandler>(3_u8).into_dynamic();
        sink.emit(TraceRecord::new(envelope.as_ref()));
        sink.emit(TraceRecord::new(envelope.as_ref()));
        assert_eq!(sink.lines(), ["Print: 3 and then", "Print: 3 and then"]);
    }

    #[test]
    fn test_channel_sink_wins() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = boxed({
            let seen = seen.clone();
            move |record: TraceRecord<'_>| seen.borrow_mut().push(record.to_string())
        });

        let envelope = Envelope::new('x').into_dynamic();
        emit(Some(&*sink), TraceRecord::new(envelope.as_ref()));
        assert_eq!(*seen.borrow(), ["Print: x"]);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_write_line() {
        let envelope = Envelope::new(7_u64).into_dynamic();
        let record = TraceRecord::new(envelope.as_ref());

        let mut buffer = Vec::new();
        write_line(&mut buffer, record, false);
        write_line(&mut buffer, record, true);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Print: 7\nPrint: 7 (u64)\n"
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_write_line_failing_handler() {
        let envelope = Envelope::new_custom::<FailingHandler>(9_u8).into_dynamic();
        let record = TraceRecord::new(envelope.as_ref());

        let mut buffer = Vec::new();
        write_line(&mut buffer, record, true);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Print: 9 and then (u8)\n"
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_parse_env_options() {
        assert_eq!(
            PolychanTraceEnvOptions::parse(""),
            PolychanTraceEnvOptions::default()
        );

        let options = PolychanTraceEnvOptions::parse("Type_Names, STDERR");
        assert!(!options.off);
        assert!(options.stderr);
        assert!(options.type_names);

        let options = PolychanTraceEnvOptions::parse("  off  ");
        assert!(options.off);
        assert!(!options.stderr);
        assert!(!options.type_names);

        let options = PolychanTraceEnvOptions::parse("bogus,stdout,,type-names");
        assert_eq!(options, PolychanTraceEnvOptions::default());

        let options = PolychanTraceEnvOptions::parse("bogus,OFF,type_names");
        assert!(options.off);
        assert!(!options.stderr);
        assert!(options.type_names);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_std_stream_sinks() {
        let envelope = Envelope::new_custom::<FailingHandler>(9_u8).into_dynamic();
        StdoutSink.emit(TraceRecord::new(envelope.as_ref()));
        StderrSink.emit(TraceRecord::new(envelope.as_ref()));

        let envelope = Envelope::new("to a stream").into_dynamic();
        StdoutSink.emit(TraceRecord::new(envelope.as_ref()));
        StderrSink.emit(TraceRecord::new(envelope.as_ref()));

        static_assertions::assert_impl_all!(StdoutSink: TraceSink, Send, Sync, Copy);
        static_assertions::assert_impl_all!(StderrSink: TraceSink, Send, Sync, Copy);
    }
}
