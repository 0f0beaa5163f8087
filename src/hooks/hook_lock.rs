#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

/// A process-wide slot holding an optional hook value.
///
/// Backed by the std `RwLock` when `std` is enabled and by `spin::RwLock`
/// otherwise. Callers clone what they need out of a read guard and drop the
/// guard before running any user code.
#[repr(transparent)]
pub(crate) struct HookLock<T: 'static + Send + Sync>(impl_::RwLock<Option<T>>);

#[repr(transparent)]
pub(crate) struct HookLockReadGuard<T: 'static + Send + Sync>(
    impl_::RwLockReadGuard<'static, Option<T>>,
);

#[repr(transparent)]
pub(crate) struct HookLockWriteGuard<T: 'static + Send + Sync>(
    impl_::RwLockWriteGuard<'static, Option<T>>,
);

impl<T: 'static + Send + Sync> HookLock<T> {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self(impl_::RwLock::new(None))
    }

    #[inline]
    pub(crate) fn read(&'static self) -> HookLockReadGuard<T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.read();

        // A poisoned lock means a panic happened while the slot was being
        // replaced, which only ever moves a value in or out.
        #[cfg(feature = "std")]
        let guard = self
            .0
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        HookLockReadGuard(guard)
    }

    #[inline]
    pub(crate) fn write(&'static self) -> HookLockWriteGuard<T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.write();

        #[cfg(feature = "std")]
        let guard = self
            .0
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        HookLockWriteGuard(guard)
    }

    /// Stores `value` in the slot and returns what was there before.
    ///
    /// The previous value is returned rather than dropped so that its
    /// destructor runs after the write guard has been released.
    #[must_use]
    pub(crate) fn replace(&'static self, value: Option<T>) -> Option<T> {
        core::mem::replace(self.write().get(), value)
    }
}

impl<T: 'static + Send + Sync + Clone> HookLock<T> {
    /// Clones the current value out of the slot.
    #[inline]
    pub(crate) fn get_cloned(&'static self) -> Option<T> {
        self.read().get().cloned()
    }
}

impl<T: 'static + Send + Sync> HookLockReadGuard<T> {
    #[inline]
    pub(crate) fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T: 'static + Send + Sync> HookLockWriteGuard<T> {
    #[inline]
    pub(crate) fn get(&mut self) -> &mut Option<T> {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_lock_replace() {
        static SLOT: HookLock<u32> = HookLock::new();

        assert_eq!(SLOT.get_cloned(), None);
        assert_eq!(SLOT.replace(Some(1)), None);
        assert_eq!(SLOT.read().get(), Some(&1));
        *SLOT.write().get() = Some(2);
        assert_eq!(SLOT.replace(None), Some(2));
        assert_eq!(SLOT.get_cloned(), None);
    }
}
