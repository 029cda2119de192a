use crate::display::interface::Display;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Keeps every screen and alert. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct DisplayFake {
    screens: Arc<Mutex<Vec<Vec<String>>>>,
    alerts: Arc<Mutex<Vec<String>>>,
}

impl DisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screens(&self) -> Vec<Vec<String>> {
        match self.screens.lock() {
            Ok(screens) => screens.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        match self.alerts.lock() {
            Ok(alerts) => alerts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Display for DisplayFake {
    fn show(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.screens
            .lock()
            .map_err(|_| "fake display poisoned")?
            .push(lines.to_vec());
        Ok(())
    }

    fn alert(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.alerts
            .lock()
            .map_err(|_| "fake display poisoned")?
            .push(message.to_string());
        Ok(())
    }
}
