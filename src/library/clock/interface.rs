use crate::library::cancel_token::CancelToken;
use std::time::Duration;

pub trait Clock: Send + Sync {
    /// Suspends the calling thread for `duration`. Returns `true` if `cancel`
    /// fired before the duration elapsed.
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool;
}
