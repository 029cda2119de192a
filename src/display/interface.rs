use std::error::Error;

/// Where the run's progress and outcome are shown to the user.
pub trait Display: Send + Sync {
    /// Replace the current screen with `lines`.
    fn show(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// A notification the user must see, shown once per verdict.
    fn alert(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}
