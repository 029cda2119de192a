use crate::library::clock::interface::Clock;
use crate::library::cancel_token::CancelToken;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ClockSystem;

impl ClockSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for ClockSystem {
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        cancel.wait_for(duration)
    }
}
