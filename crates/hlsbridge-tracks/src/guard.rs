use std::sync::atomic::{AtomicBool, Ordering};

/// Marks a shared flag as held for the lifetime of the guard.
///
/// Entering fails when the flag is already held, which is how nested
/// notifications detect that they run inside another mutation. The flag is
/// released on drop, including early returns.
#[derive(Debug)]
#[must_use = "the flag is released as soon as the guard is dropped"]
pub struct ReentrancyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ReentrancyGuard<'a> {
    /// Take the flag, or `None` if someone up the stack already holds it.
    pub fn enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
