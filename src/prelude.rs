//! Commonly used items for convenient importing.
//!
//! ```rust
//! use polychan::prelude::*;
//!
//! let mut channel = Channel::new();
//! enqueue!(channel, 1_u8);
//! let value: u8 = channel.dequeue()?;
//! assert_eq!(value, 1);
//! # Ok::<(), DequeueError>(())
//! ```

pub use crate::{Channel, DequeueError, Pending, ResolveError, TypeMismatch, enqueue, handlers};
