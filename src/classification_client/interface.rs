use crate::emotion::Emotion;
use crate::frame_sampler::frame::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameLabel {
    Classified(Emotion),
    Unclassified { reason: String },
}

/// The label the endpoint gave to the frame with the same index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub frame_index: usize,
    pub label: FrameLabel,
}

impl ClassificationResult {
    pub fn classified(frame_index: usize, emotion: Emotion) -> Self {
        Self {
            frame_index,
            label: FrameLabel::Classified(emotion),
        }
    }

    pub fn emotion(&self) -> Option<Emotion> {
        match self.label {
            FrameLabel::Classified(emotion) => Some(emotion),
            FrameLabel::Unclassified { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("request to classification endpoint failed: {0}")]
    Transport(String),

    #[error("classification endpoint answered with HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("classification endpoint reported an error: {0}")]
    Endpoint(String),

    #[error("malformed classification response: {0}")]
    Schema(String),
}

impl ClassifyError {
    pub fn is_schema(&self) -> bool {
        matches!(self, ClassifyError::Schema(_))
    }
}

pub trait ClassificationClient {
    /// Submits every frame in one batch. On success, `result[i]` belongs to `frames[i]`.
    fn classify(&self, frames: &[Frame]) -> Result<Vec<ClassificationResult>, ClassifyError>;
}
