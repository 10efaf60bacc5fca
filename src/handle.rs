//! Owned release tokens for scheduled callbacks and host registrations.

use std::fmt;

/// Token for one pending timer or frame request.
///
/// Dropping the handle cancels the callback if it has not run yet. Holding
/// it in an `Option` field gives the "at most one outstanding timer"
/// invariant for free: replacing the field cancels the previous request.
#[must_use = "dropping an AnimationHandle cancels the scheduled callback"]
pub struct AnimationHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl AnimationHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHandle").field("armed", &self.cancel.is_some()).finish()
    }
}

/// Registration with the host (event listener, observer, state subscriber).
///
/// Dropping it unregisters.
#[must_use = "dropping a Subscription unregisters it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.release.is_some()).finish()
    }
}
