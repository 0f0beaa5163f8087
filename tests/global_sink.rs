//! Installs a process-wide sink, so it lives in its own test binary and runs
//! as a single test.

use polychan::{
    Channel, enqueue,
    hooks::trace_sink::{CollectingSink, NoopSink, install_global_sink, remove_global_sink},
};

#[test]
fn channel_sink_takes_precedence_over_global_sink() {
    let global = CollectingSink::new();
    assert!(!install_global_sink(global.clone()));

    let mut unconfigured = Channel::new();
    enqueue!(unconfigured, "to the global sink");
    unconfigured.dequeue::<&str>().unwrap();

    let local = CollectingSink::new();
    let mut configured = Channel::with_sink(local.clone());
    enqueue!(configured, "to the channel sink");
    configured.dequeue::<&str>().unwrap();

    assert_eq!(global.lines(), ["Print: to the global sink"]);
    assert_eq!(local.lines(), ["Print: to the channel sink"]);

    // Dropping the channel sink falls back to the global one
    assert!(configured.take_sink().is_some());
    enqueue!(configured, 5_u8);
    configured.dequeue::<u8>().unwrap();
    assert_eq!(
        global.lines(),
        ["Print: to the global sink", "Print: 5"]
    );

    assert!(install_global_sink(NoopSink));
    enqueue!(unconfigured, 6_u8);
    unconfigured.dequeue::<u8>().unwrap();
    assert_eq!(global.lines().len(), 2);

    assert!(remove_global_sink());
    assert!(!remove_global_sink());
}
