use core::fmt;

/// Wraps a pair of rendering functions into a value implementing both
/// [`fmt::Display`] and [`fmt::Debug`].
///
/// `state` is handed to whichever function matches the formatting trait in
/// use. It must be `Copy` since formatting only gets `&self`.
pub(crate) fn render_helper<State, DisplayFn, DebugFn>(
    state: State,
    display_fn: DisplayFn,
    debug_fn: DebugFn,
) -> impl fmt::Display + fmt::Debug
where
    State: Copy,
    for<'a, 'b> DisplayFn: Fn(State, &'a mut fmt::Formatter<'b>) -> fmt::Result,
    for<'a, 'b> DebugFn: Fn(State, &'a mut fmt::Formatter<'b>) -> fmt::Result,
{
    RenderHelper {
        state,
        display_fn,
        debug_fn,
    }
}

struct RenderHelper<State, DisplayFn, DebugFn> {
    state: State,
    display_fn: DisplayFn,
    debug_fn: DebugFn,
}

impl<State, DisplayFn, DebugFn> fmt::Display for RenderHelper<State, DisplayFn, DebugFn>
where
    State: Copy,
    for<'a, 'b> DisplayFn: Fn(State, &'a mut fmt::Formatter<'b>) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.display_fn)(self.state, f)
    }
}

impl<State, DisplayFn, DebugFn> fmt::Debug for RenderHelper<State, DisplayFn, DebugFn>
where
    State: Copy,
    for<'a, 'b> DebugFn: Fn(State, &'a mut fmt::Formatter<'b>) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug_fn)(self.state, f)
    }
}
