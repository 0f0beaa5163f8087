//! Per-type overrides for how values are rendered in traces.
//!
//! A value's handler is fixed when it is enqueued. A render override replaces
//! that handler's output for every value of one type, wherever the value is
//! rendered through the hooked path: trace lines, [`Pending`]'s `Display` and
//! `Debug` output, and [`Envelope::format_inner`].
//!
//! This is mostly useful for foreign types: a type from another crate that
//! does not implement `Display` is rendered as the non-printable placeholder
//! by default, and cannot be given a `Display` implementation locally.
//!
//! Registering a second override for the same type replaces the first.
//!
//! # Example
//!
//! ```rust
//! use core::fmt;
//!
//! use polychan::{
//!     Channel, enqueue,
//!     envelope::EnvelopeRef,
//!     hooks::{
//!         render_override::{RenderOverride, register_render_override},
//!         trace_sink::CollectingSink,
//!     },
//! };
//!
//! // Imagine this comes from another crate
//! struct SocketHandle(u32);
//!
//! struct ShowSocketHandle;
//!
//! impl RenderOverride<SocketHandle> for ShowSocketHandle {
//!     fn display(
//!         &self,
//!         value: EnvelopeRef<'_, SocketHandle>,
//!         f: &mut fmt::Formatter<'_>,
//!     ) -> fmt::Result {
//!         write!(f, "socket #{}", value.inner().0)
//!     }
//! }
//!
//! register_render_override::<SocketHandle, _>(ShowSocketHandle);
//!
//! let sink = CollectingSink::new();
//! let mut channel = Channel::with_sink(sink.clone());
//! enqueue!(channel, SocketHandle(3));
//! let _handle: SocketHandle = channel.dequeue().unwrap();
//! assert_eq!(sink.lines(), ["Print: socket #3"]);
//! ```
//!
//! [`Pending`]: crate::Pending
//! [`Envelope::format_inner`]: crate::envelope::Envelope::format_inner

use core::{any::TypeId, fmt, marker::PhantomData, panic::Location};

use hashbrown::HashMap;
use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::{envelope::EnvelopeRef, hooks::hook_lock::HookLock, markers::Dynamic};

#[derive(Default)]
struct OverrideMap {
    /// The override stored under `TypeId::of::<V>()` is always an instance of
    /// `Hook<V, H>`.
    map: HashMap<TypeId, Arc<dyn UntypedRenderOverride>, rustc_hash::FxBuildHasher>,
}

impl OverrideMap {
    fn get(&self, type_id: TypeId) -> Option<Arc<dyn UntypedRenderOverride>> {
        self.map.get(&type_id).cloned()
    }

    fn insert<V, H>(&mut self, hook: Hook<V, H>) -> Option<Arc<dyn UntypedRenderOverride>>
    where
        V: 'static,
        H: RenderOverride<V>,
    {
        let hook: Arc<Hook<V, H>> = Arc::new(hook);
        let hook = hook.unsize(unsize::Coercion!(to dyn UntypedRenderOverride));
        self.map.insert(TypeId::of::<V>(), hook)
    }

    fn remove(&mut self, type_id: TypeId) -> Option<Arc<dyn UntypedRenderOverride>> {
        self.map.remove(&type_id)
    }
}

static OVERRIDES: HookLock<OverrideMap> = HookLock::new();

fn get_override(type_id: TypeId) -> Option<Arc<dyn UntypedRenderOverride>> {
    OVERRIDES.read().get()?.get(type_id)
}

struct Hook<V, H>
where
    V: 'static,
{
    hook: H,
    added_at: &'static Location<'static>,
    _hooked_type: PhantomData<fn(V) -> V>,
}

impl<V, H> fmt::Display for Hook<V, H>
where
    V: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Render override {} for value type {} registered at {}:{}",
            core::any::type_name::<H>(),
            core::any::type_name::<V>(),
            self.added_at.file(),
            self.added_at.line()
        )
    }
}

/// Object-safe view of a [`Hook<V, H>`].
trait UntypedRenderOverride: 'static + Send + Sync + fmt::Display {
    fn display(&self, value: EnvelopeRef<'_, Dynamic>, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    fn debug(&self, value: EnvelopeRef<'_, Dynamic>, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Replaces the rendering of every value of type `V`.
///
/// Both methods default to the value's own handler, so an implementation
/// only overrides the output it cares about.
///
/// # Examples
///
/// Redacting a type that would otherwise be printed:
///
/// ```rust
/// use core::fmt;
///
/// use polychan::{envelope::EnvelopeRef, hooks::render_override::RenderOverride};
///
/// struct Password(String);
///
/// impl fmt::Display for Password {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str(&self.0)
///     }
/// }
///
/// struct Redact;
///
/// impl RenderOverride<Password> for Redact {
///     fn display(&self, _value: EnvelopeRef<'_, Password>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("********")
///     }
/// }
/// ```
pub trait RenderOverride<V>: 'static + Send + Sync
where
    V: 'static,
{
    /// Renders the value for trace lines and `Display` output.
    fn display(&self, value: EnvelopeRef<'_, V>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&value.format_inner_unhooked(), f)
    }

    /// Renders the value for `Debug` output.
    fn debug(&self, value: EnvelopeRef<'_, V>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&value.format_inner_unhooked(), f)
    }
}

impl<V, H> UntypedRenderOverride for Hook<V, H>
where
    V: 'static,
    H: RenderOverride<V>,
{
    fn display(&self, value: EnvelopeRef<'_, Dynamic>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match value.downcast_envelope::<V>() {
            Some(value) => self.hook.display(value, f),
            None => fmt::Display::fmt(&value.format_inner_unhooked(), f),
        }
    }

    fn debug(&self, value: EnvelopeRef<'_, Dynamic>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match value.downcast_envelope::<V>() {
            Some(value) => self.hook.debug(value, f),
            None => fmt::Debug::fmt(&value.format_inner_unhooked(), f),
        }
    }
}

/// Registers `hook` as the render override for values of type `V`.
///
/// Returns `true` if an earlier override for `V` was replaced.
///
/// The call site is recorded and shown by [`debug_render_overrides`].
#[track_caller]
pub fn register_render_override<V, H>(hook: H) -> bool
where
    V: 'static,
    H: RenderOverride<V>,
{
    let hook: Hook<V, H> = Hook {
        hook,
        added_at: Location::caller(),
        _hooked_type: PhantomData,
    };

    let previous = OVERRIDES.write().get().get_or_insert_default().insert(hook);
    previous.is_some()
}

/// Removes the render override for values of type `V`.
///
/// Returns `true` if an override was registered.
pub fn unregister_render_override<V>() -> bool
where
    V: 'static,
{
    let previous = OVERRIDES
        .write()
        .get()
        .as_mut()
        .and_then(|map| map.remove(TypeId::of::<V>()));
    previous.is_some()
}

/// Calls `f` once for every registered render override, with a description
/// naming the override, the value type, and where it was registered.
pub fn debug_render_overrides(mut f: impl FnMut(&dyn fmt::Display)) {
    let hooks: alloc::vec::Vec<Arc<dyn UntypedRenderOverride>> = OVERRIDES
        .read()
        .get()
        .map(|map| map.map.values().cloned().collect())
        .unwrap_or_default();

    for hook in &hooks {
        f(&**hook as &dyn fmt::Display);
    }
}

pub(crate) fn display_value(
    value: EnvelopeRef<'_, Dynamic>,
    formatter: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    if let Some(hook) = get_override(value.inner_type_id()) {
        hook.display(value, formatter)
    } else {
        fmt::Display::fmt(&value.format_inner_unhooked(), formatter)
    }
}

pub(crate) fn debug_value(
    value: EnvelopeRef<'_, Dynamic>,
    formatter: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    if let Some(hook) = get_override(value.inner_type_id()) {
        hook.debug(value, formatter)
    } else {
        fmt::Debug::fmt(&value.format_inner_unhooked(), formatter)
    }
}
