//! Process-wide hooks for customizing trace output.
//!
//! **Most users don't need hooks.** Every channel writes its `Print: <value>`
//! lines to stdout by default, and a single channel can be pointed somewhere
//! else with [`Channel::with_sink`](crate::Channel::with_sink).
//!
//! Use hooks when you need to:
//!
//! - Route the trace lines of every channel in the process somewhere else
//!   ([`trace_sink::install_global_sink`])
//! - Change how values of one type are rendered, for example to show a
//!   foreign type that has no `Display` implementation, or to redact one
//!   that does ([`render_override::register_render_override`])
//!
//! Hooks are stored behind a lock and cloned out before they are called, so
//! a hook may itself use channels without deadlocking.
//!
//! # Example
//!
//! ```rust
//! use polychan::{
//!     Channel,
//!     hooks::trace_sink::{CollectingSink, install_global_sink, remove_global_sink},
//! };
//!
//! let sink = CollectingSink::new();
//! install_global_sink(sink.clone());
//!
//! let mut channel = Channel::new();
//! channel.enqueue(5);
//! channel.dequeue::<i32>().unwrap();
//!
//! remove_global_sink();
//! assert_eq!(sink.lines(), ["Print: 5"]);
//! ```

mod hook_lock;
pub mod render_override;
pub mod trace_sink;
