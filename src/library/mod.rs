pub mod cancel_token;
pub mod clock;
pub mod logger;
pub mod state_machine;
