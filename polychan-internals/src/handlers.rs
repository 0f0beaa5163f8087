//! Handlers that define how a stored value is rendered after its static type
//! has been erased.
//!
//! This module provides the [`RenderHandler`] trait. A handler is chosen once,
//! when a value is stored, and baked into the envelope's vtable together with
//! the value's concrete type.

/// Trait for implementing the rendering behavior of a stored value.
///
/// A handler is a zero-sized policy type. It is never instantiated: the
/// envelope only remembers which handler was picked for which value type,
/// and calls the associated functions through its vtable.
///
/// # When to Implement
///
/// You typically don't need to implement this trait directly. The polychan
/// library provides built-in handlers (`Display`, `Debug`, `NonPrintable`)
/// that cover most use cases. Implement it when a value needs a rendering that
/// differs from its own formatting traits, for example to redact secrets.
///
/// # Required Methods
///
/// - [`display`](RenderHandler::display): Renders the value for trace output
///
/// # Optional Items
///
/// - [`debug`](RenderHandler::debug): Renders the value for debug output. The
///   default implementation delegates to
///   [`display`](RenderHandler::display).
/// - [`PRINTABLE`](RenderHandler::PRINTABLE): Whether the handler renders the
///   value itself. Defaults to `true`.
///
/// # Examples
///
/// ```
/// use polychan_internals::handlers::RenderHandler;
///
/// struct Password(String);
///
/// struct RedactingHandler;
///
/// impl RenderHandler<Password> for RedactingHandler {
///     fn display(value: &Password, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "{} redacted characters", value.0.len())
///     }
/// }
/// ```
pub trait RenderHandler<V>: 'static {
    /// Whether this handler renders the value itself.
    ///
    /// Handlers that write a fixed placeholder without looking at the value
    /// set this to `false`. The flag is fixed per handler and value type, so
    /// every value of the same type stored with the same handler reports the
    /// same capability.
    const PRINTABLE: bool = true;

    /// Renders the value in human-readable form.
    ///
    /// This method is called whenever the value is traced after being removed
    /// from a channel. It must not fail for reasons other than the formatter
    /// itself failing.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychan_internals::handlers::RenderHandler;
    ///
    /// struct Celsius(f64);
    ///
    /// struct CelsiusHandler;
    ///
    /// impl RenderHandler<Celsius> for CelsiusHandler {
    ///     fn display(value: &Celsius, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    ///         write!(f, "{:.1}°C", value.0)
    ///     }
    /// }
    /// ```
    fn display(value: &V, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result;

    /// Renders the value for debugging purposes.
    ///
    /// The default implementation delegates to
    /// [`display`](RenderHandler::display).
    fn debug(value: &V, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Self::display(value, formatter)
    }
}
