//! Module containing the type-erased envelope data structure

mod data;
mod raw;
mod vtable;

pub use self::raw::{RawEnvelope, RawEnvelopeRef};
