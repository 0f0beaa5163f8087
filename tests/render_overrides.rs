use core::fmt;

use polychan::{
    Channel, enqueue,
    envelope::EnvelopeRef,
    hooks::{
        render_override::{RenderOverride, register_render_override, unregister_render_override},
        trace_sink::CollectingSink,
    },
};

#[derive(derive_more::Display)]
#[display("{_0}")]
struct ApiKey(&'static str);

struct RedactApiKey;

impl RenderOverride<ApiKey> for RedactApiKey {
    fn display(&self, _value: EnvelopeRef<'_, ApiKey>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

// Stands in for a foreign type that cannot be given a `Display` implementation
struct RawFd(i32);

struct ShowRawFd;

impl RenderOverride<RawFd> for ShowRawFd {
    fn display(&self, value: EnvelopeRef<'_, RawFd>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fd {}", value.inner().0)
    }
}

#[test]
fn override_takes_precedence_over_bound_handler() {
    register_render_override::<ApiKey, _>(RedactApiKey);

    let sink = CollectingSink::new();
    let mut channel = Channel::with_sink(sink.clone());
    enqueue!(channel, ApiKey("hunter2"));
    enqueue!(channel, ApiKey("swordfish"));

    let key: ApiKey = channel.dequeue().unwrap();
    assert_eq!(key.0, "hunter2");

    let pending = channel.dequeue_generic().unwrap();
    assert_eq!(pending.to_string(), "<redacted>");
    assert_eq!(
        pending.into_envelope().format_inner_unhooked().to_string(),
        "swordfish"
    );

    assert_eq!(sink.lines(), ["Print: <redacted>", "Print: <redacted>"]);
}

#[test]
fn override_makes_foreign_type_printable() {
    let sink = CollectingSink::new();
    let mut channel = Channel::with_sink(sink.clone());

    enqueue!(channel, RawFd(3));
    channel.dequeue::<RawFd>().unwrap();

    register_render_override::<RawFd, _>(ShowRawFd);
    enqueue!(channel, RawFd(4));
    channel.dequeue::<RawFd>().unwrap();

    assert!(unregister_render_override::<RawFd>());
    enqueue!(channel, RawFd(5));
    channel.dequeue::<RawFd>().unwrap();

    assert_eq!(
        sink.lines(),
        [
            "Print: <<non-printable>>",
            "Print: fd 4",
            "Print: <<non-printable>>",
        ]
    );
}
