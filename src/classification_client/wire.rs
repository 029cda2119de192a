use crate::classification_client::interface::{ClassificationResult, ClassifyError, FrameLabel};
use crate::emotion::Emotion;
use crate::frame_sampler::frame::Frame;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadRequest {
    pub frames: Vec<String>,
}

impl UploadRequest {
    pub fn from_frames(frames: &[Frame]) -> Self {
        Self {
            frames: frames.iter().map(Frame::to_data_url).collect(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ResultEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_stressed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEntry {
    pub fn emotion(emotion: Emotion) -> Self {
        Self {
            emotion: Some(emotion.label().to_string()),
            error: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            emotion: None,
            error: Some(message.to_string()),
        }
    }

    fn into_label(self) -> FrameLabel {
        match (self.emotion, self.error) {
            (Some(emotion), _) => match emotion.parse::<Emotion>() {
                Ok(emotion) => FrameLabel::Classified(emotion),
                Err(e) => FrameLabel::Unclassified {
                    reason: e.to_string(),
                },
            },
            (None, Some(error)) => FrameLabel::Unclassified { reason: error },
            (None, None) => FrameLabel::Unclassified {
                reason: "entry has neither emotion nor error".to_string(),
            },
        }
    }
}

/// Checks a response body against the number of frames submitted and pairs
/// each entry with its frame index.
pub fn parse_response(
    body: &str,
    submitted: usize,
) -> Result<Vec<ClassificationResult>, ClassifyError> {
    let response: UploadResponse = serde_json::from_str(body)
        .map_err(|e| ClassifyError::Schema(format!("response is not valid JSON: {}", e)))?;

    if response.status.as_deref() == Some("error") {
        return Err(ClassifyError::Endpoint(
            response
                .message
                .unwrap_or_else(|| "no message given".to_string()),
        ));
    }

    let results = response
        .results
        .ok_or_else(|| ClassifyError::Schema("missing `results` field".to_string()))?;

    if results.len() != submitted {
        return Err(ClassifyError::Schema(format!(
            "expected {} results, got {}",
            submitted,
            results.len()
        )));
    }

    Ok(results
        .into_iter()
        .enumerate()
        .map(|(frame_index, entry)| ClassificationResult {
            frame_index,
            label: entry.into_label(),
        })
        .collect())
}
