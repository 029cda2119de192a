use crate::library::cancel_token::CancelToken;
use crate::library::clock::interface::Clock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Never blocks. Records every requested delay.
#[derive(Debug, Clone, Default)]
pub struct ClockFake {
    sleeps: Arc<Mutex<Vec<Duration>>>,
    cancel_after: Option<usize>,
    blocking: bool,
}

impl ClockFake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the caller's cancel token on the `n`th sleep (1-based).
    pub fn cancelling_on_sleep(n: usize) -> Self {
        Self {
            cancel_after: Some(n),
            ..Self::default()
        }
    }

    /// Every sleep parks until the caller's token is cancelled.
    pub fn blocking_until_cancelled() -> Self {
        Self {
            blocking: true,
            ..Self::default()
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        match self.sleeps.lock() {
            Ok(sleeps) => sleeps.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Clock for ClockFake {
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        let count = match self.sleeps.lock() {
            Ok(mut sleeps) => {
                sleeps.push(duration);
                sleeps.len()
            }
            Err(poisoned) => {
                let mut sleeps = poisoned.into_inner();
                sleeps.push(duration);
                sleeps.len()
            }
        };

        if self.cancel_after == Some(count) {
            cancel.cancel();
        }

        if self.blocking {
            return cancel.wait_for(Duration::from_secs(30));
        }

        cancel.is_cancelled()
    }
}
