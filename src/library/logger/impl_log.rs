use crate::library::logger::interface::{join_namespace, Logger};
use std::sync::Arc;

const ROOT_TARGET: &str = "stress_sampler";

/// Forwards to the `log` facade, using the namespace as the log target.
#[derive(Debug, Clone, Default)]
pub struct LoggerLog {
    namespace: Option<String>,
}

impl LoggerLog {
    pub fn new() -> Self {
        Self { namespace: None }
    }

    fn target(&self) -> &str {
        self.namespace.as_deref().unwrap_or(ROOT_TARGET)
    }
}

impl Logger for LoggerLog {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        log::info!(target: self.target(), "{}", message);
        Ok(())
    }

    fn error(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        log::error!(target: self.target(), "{}", message);
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerLog {
            namespace: Some(join_namespace(self.namespace.as_deref(), namespace)),
        })
    }
}
