#![cfg(feature = "tracing")]

use std::{
    io,
    sync::{Arc, Mutex},
};

use polychan::{Channel, enqueue, hooks::trace_sink::TracingSink};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn trace_lines_become_tracing_events() {
    let buffer = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut channel = Channel::with_sink(TracingSink);
        enqueue!(channel, 42_u16);
        enqueue!(channel, core::ptr::null::<u8>());
        channel.dequeue::<u16>().unwrap();
        channel.dequeue_generic().unwrap();
    });

    let output = buffer.contents();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected output: {output}");

    assert!(lines[0].contains("INFO"));
    assert!(lines[0].contains("polychan"));
    assert!(lines[0].contains("Print: 42"));
    assert!(lines[0].contains("type_name=\"u16\"") || lines[0].contains("type_name=u16"));
    assert!(lines[0].contains("printable=true"));

    assert!(lines[1].contains("Print: <<non-printable>>"));
    assert!(lines[1].contains("printable=false"));
}
