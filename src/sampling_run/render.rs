use crate::classification_client::interface::FrameLabel;
use crate::display::interface::Display;
use crate::sampling_run::core::State;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Render {
    display: Arc<Mutex<dyn Display + Send + Sync>>,
    frame_count: usize,
}

impl Render {
    pub fn new(display: Arc<Mutex<dyn Display + Send + Sync>>, frame_count: usize) -> Self {
        Self {
            display,
            frame_count,
        }
    }

    pub fn render(&self, state: &State) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let lines = self.lines(state);
        let mut display = self.display.lock().map_err(|_| "display lock poisoned")?;
        display.show(&lines)
    }

    pub fn lines(&self, state: &State) -> Vec<String> {
        match state {
            State::Idle => vec![
                "Stress check ready".to_string(),
                "Enter: start   c: cancel   q: quit".to_string(),
            ],
            State::AwaitingConsent { run_id } => {
                vec![format!("Run {}: waiting for camera access...", run_id)]
            }
            State::Sampling { run_id, captured } => vec![format!(
                "Run {}: sampling frame {}/{}",
                run_id, captured, self.frame_count
            )],
            State::Submitting { run_id, frames } => vec![format!(
                "Run {}: classifying {} frames...",
                run_id,
                frames.len()
            )],
            State::Verdicted {
                run_id,
                results,
                verdict,
                histogram,
                ..
            } => {
                let mut lines = vec![
                    format!("Run {}: {}", run_id, verdict.message()),
                    format!(
                        "Stress frames: {} of {} classified",
                        verdict.stress_count, verdict.classified
                    ),
                    String::new(),
                    "Emotions:".to_string(),
                ];
                lines.extend(
                    histogram
                        .iter()
                        .map(|(emotion, count)| format!("  {:<9} {:>3}", emotion.label(), count)),
                );
                lines.push(String::new());
                lines.push("Frames:".to_string());
                lines.extend(results.iter().map(|result| {
                    let label = match &result.label {
                        FrameLabel::Classified(emotion) => emotion.label().to_string(),
                        FrameLabel::Unclassified { reason } => format!("? ({})", reason),
                    };
                    format!("  Frame {}: {}", result.frame_index + 1, label)
                }));
                lines
            }
            State::Failed {
                run_id, failure, ..
            } => {
                let mut lines = vec![format!("Run {} failed: {}", run_id, failure)];
                if let Some(verdict) = state.verdict() {
                    lines.push(verdict.message().to_string());
                }
                lines.push("Enter: try again   q: quit".to_string());
                lines
            }
        }
    }
}
