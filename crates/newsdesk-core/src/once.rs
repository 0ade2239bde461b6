//! Lazy, memoized, shared one-shot future.
//!
//! The first caller of [`OnceShared::get_or_start`] builds the future; every
//! later caller, concurrent or not, gets a handle to that same future and
//! observes the same output. The output (success or failure) is never
//! recomputed.

use std::future::Future;
use std::sync::Mutex;

use futures_util::future::{BoxFuture, FutureExt, Shared};

pub type SharedOutput<T> = Shared<BoxFuture<'static, T>>;

pub struct OnceShared<T: Clone> {
    slot: Mutex<Option<SharedOutput<T>>>,
}

impl<T> OnceShared<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the stored future, creating it with `start` if this is the
    /// first call. `start` runs at most once over the lifetime of `self`.
    ///
    /// The future makes progress while any handle is polled. Dropping every
    /// handle does not discard it: the next call resumes the same attempt.
    pub fn get_or_start<F, Fut>(&self, start: F) -> SharedOutput<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut slot = match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.get_or_insert_with(|| start().boxed().shared()).clone()
    }

    /// The output, if the future has already completed.
    pub fn peek(&self) -> Option<T> {
        let slot = match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.as_ref().and_then(|fut| fut.peek().cloned())
    }
}

impl<T> Default for OnceShared<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
