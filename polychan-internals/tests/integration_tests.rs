//! Integration tests for the polychan-internals crate.
//!
//! ## Envelope Tests
//! - `test_envelope_creation_and_type_tags`: Envelope creation, type tags and
//!   handler tags
//! - `test_envelope_rendering_with_custom_handler`: Custom handler display and
//!   debug rendering
//! - `test_mixed_envelopes`: Many envelopes of unrelated types side by side
//! - `test_placeholder_handler_never_reads_value`: A placeholder handler
//!   renders without touching the value
//!
//! ## Memory Management Tests
//! - `test_drop_and_move_out_accounting`: Every value is dropped exactly once,
//!   whether the envelope is dropped or the value moved out

use std::{
    any::TypeId,
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt,
    rc::Rc,
};

use polychan_internals::{RawEnvelope, RawEnvelopeRef, handlers::RenderHandler};

#[derive(Debug, PartialEq)]
struct Secret {
    value: i32,
}

struct DisplayHandler;

impl<V: fmt::Display + 'static> RenderHandler<V> for DisplayHandler {
    fn display(value: &V, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(value, f)
    }
}

struct SecretHandler;

impl RenderHandler<Secret> for SecretHandler {
    fn display(value: &Secret, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", value.value)
    }

    fn debug(value: &Secret, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret {{ value: {} }}", value.value)
    }
}

struct PlaceholderHandler;

impl<V: 'static> RenderHandler<V> for PlaceholderHandler {
    const PRINTABLE: bool = false;

    fn display(_value: &V, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<<non-printable>>")
    }
}

/// Renders a [`RawEnvelopeRef`] through `Display` so it can be used with
/// `format!`.
struct Rendered<'a>(RawEnvelopeRef<'a>);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.value_display(f)
    }
}

impl fmt::Debug for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.value_debug(f)
    }
}

#[test]
fn test_envelope_creation_and_type_tags() {
    let envelope = RawEnvelope::new::<String, DisplayHandler>("notasecret".to_owned());
    let envelope_ref = envelope.as_ref();

    assert_eq!(envelope_ref.value_type_id(), TypeId::of::<String>());
    assert_ne!(envelope_ref.value_type_id(), TypeId::of::<&str>());
    assert_eq!(envelope_ref.handler_type_id(), TypeId::of::<DisplayHandler>());
    assert_eq!(envelope_ref.value_type_name(), core::any::type_name::<String>());
    assert!(envelope_ref.is_printable());

    // SAFETY: the envelope was created with a `String`
    let value: &String = unsafe { envelope_ref.value_downcast_unchecked::<String>() };
    assert_eq!(value, "notasecret");
}

#[test]
fn test_envelope_rendering_with_custom_handler() {
    let envelope = RawEnvelope::new::<Secret, SecretHandler>(Secret { value: 42 });

    assert_eq!(format!("{}", Rendered(envelope.as_ref())), "42");
    assert_eq!(
        format!("{:?}", Rendered(envelope.as_ref())),
        "Secret { value: 42 }"
    );

    // SAFETY: the envelope was created with a `Secret`
    let secret = unsafe { envelope.into_value_unchecked::<Secret>() };
    assert_eq!(secret, Secret { value: 42 });
}

#[test]
fn test_mixed_envelopes() {
    let mut queue: VecDeque<RawEnvelope> = VecDeque::new();
    queue.push_back(RawEnvelope::new::<String, DisplayHandler>("a".to_owned()));
    queue.push_back(RawEnvelope::new::<i32, DisplayHandler>(42));
    queue.push_back(RawEnvelope::new::<Secret, SecretHandler>(Secret { value: 7 }));
    queue.push_back(RawEnvelope::new::<*const i32, PlaceholderHandler>(
        core::ptr::dangling(),
    ));
    queue.push_back(RawEnvelope::new::<(), PlaceholderHandler>(()));

    let rendered: Vec<String> = queue
        .iter()
        .map(|envelope| Rendered(envelope.as_ref()).to_string())
        .collect();
    assert_eq!(
        rendered,
        ["a", "42", "7", "<<non-printable>>", "<<non-printable>>"]
    );

    let type_ids: Vec<TypeId> = queue
        .iter()
        .map(|envelope| envelope.as_ref().value_type_id())
        .collect();
    assert_eq!(
        type_ids,
        [
            TypeId::of::<String>(),
            TypeId::of::<i32>(),
            TypeId::of::<Secret>(),
            TypeId::of::<*const i32>(),
            TypeId::of::<()>(),
        ]
    );

    let head = queue.pop_front().unwrap();
    assert_eq!(head.as_ref().value_type_id(), TypeId::of::<String>());
    // SAFETY: checked above
    let head = unsafe { head.into_value_unchecked::<String>() };
    assert_eq!(head, "a");
}

#[test]
fn test_placeholder_handler_never_reads_value() {
    struct Tripwire(Rc<Cell<bool>>);

    impl fmt::Display for Tripwire {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.set(true);
            f.write_str("tripped")
        }
    }

    let touched = Rc::new(Cell::new(false));
    let envelope =
        RawEnvelope::new::<Tripwire, PlaceholderHandler>(Tripwire(touched.clone()));

    assert!(!envelope.as_ref().is_printable());
    assert_eq!(
        format!("{}", Rendered(envelope.as_ref())),
        "<<non-printable>>"
    );
    assert!(!touched.get());
}

#[test]
fn test_drop_and_move_out_accounting() {
    struct Tracked {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.log.borrow_mut().push(self.name);
        }
    }

    let log = Rc::new(RefCell::new(Vec::new()));
    let make = |name| Tracked {
        name,
        log: log.clone(),
    };

    let mut queue: VecDeque<RawEnvelope> = VecDeque::new();
    for name in ["first", "second", "third"] {
        queue.push_back(RawEnvelope::new::<Tracked, PlaceholderHandler>(make(name)));
    }

    let first = queue.pop_front().unwrap();
    // SAFETY: every envelope in the queue stores a `Tracked`
    let first = unsafe { first.into_value_unchecked::<Tracked>() };
    assert!(log.borrow().is_empty());

    drop(queue);
    assert_eq!(*log.borrow(), ["second", "third"]);

    drop(first);
    assert_eq!(*log.borrow(), ["second", "third", "first"]);
}
