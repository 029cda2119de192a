use crate::library::logger::interface::{join_namespace, Logger};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub namespace: Option<String>,
    pub message: String,
}

/// Records every message. Namespaced children share the same record.
#[derive(Debug, Clone, Default)]
pub struct LoggerFake {
    namespace: Option<String>,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl LoggerFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn errors(&self) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == LogLevel::Error)
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| "fake logger poisoned")?;
        entries.push(LogEntry {
            level,
            namespace: self.namespace.clone(),
            message: message.to_string(),
        });
        Ok(())
    }
}

impl Logger for LoggerFake {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.push(LogLevel::Info, message)
    }

    fn error(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.push(LogLevel::Error, message)
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerFake {
            namespace: Some(join_namespace(self.namespace.as_deref(), namespace)),
            entries: self.entries.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_share_entries() {
        let logger = LoggerFake::new();
        let child = logger.with_namespace("sampling_run").with_namespace("effect");

        child.error("camera denied").unwrap();
        logger.info("started").unwrap();

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].namespace.as_deref(), Some("sampling_run:effect"));
        assert_eq!(entries[0].level, LogLevel::Error);
        assert_eq!(logger.errors().len(), 1);
    }
}
