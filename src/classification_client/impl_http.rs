use crate::classification_client::interface::{
    ClassificationClient, ClassificationResult, ClassifyError,
};
use crate::classification_client::wire::{parse_response, UploadRequest};
use crate::frame_sampler::frame::Frame;
use crate::library::logger::interface::Logger;
use std::sync::Arc;
use std::time::Duration;
use ureq::{Agent, AgentBuilder};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/upload";

/// Posts the whole batch as `{ "frames": [data-url, ...] }` in a single request.
pub struct ClassificationClientHttp {
    agent: Agent,
    endpoint: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ClassificationClientHttp {
    pub fn new(
        endpoint: &str,
        timeout: Option<Duration>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        let mut builder = AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
            endpoint: endpoint.to_string(),
            logger: logger
                .with_namespace("classification_client")
                .with_namespace("http"),
        }
    }
}

impl ClassificationClient for ClassificationClientHttp {
    fn classify(&self, frames: &[Frame]) -> Result<Vec<ClassificationResult>, ClassifyError> {
        let body = serde_json::to_string(&UploadRequest::from_frames(frames))
            .map_err(|e| ClassifyError::Transport(format!("encoding request failed: {}", e)))?;

        let _ = self.logger.info(&format!(
            "Submitting {} frames ({} bytes) to {}",
            frames.len(),
            body.len(),
            self.endpoint
        ));

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => ClassifyError::Status {
                    code,
                    message: response.into_string().unwrap_or_default(),
                },
                ureq::Error::Transport(transport) => {
                    ClassifyError::Transport(transport.to_string())
                }
            })?;

        let text = response
            .into_string()
            .map_err(|e| ClassifyError::Transport(format!("reading response failed: {}", e)))?;

        let results = parse_response(&text, frames.len())?;

        let _ = self
            .logger
            .info(&format!("Received {} results", results.len()));

        Ok(results)
    }
}
