use crate::classification_client::interface::{
    ClassificationClient, ClassificationResult, ClassifyError,
};
use crate::emotion::Emotion;
use crate::frame_sampler::frame::Frame;
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Script {
    Random,
    Labels(Vec<Emotion>),
    Fail(ClassifyError),
}

/// In-process classifier. Counts the batches it was asked to classify.
pub struct ClassificationClientFake {
    script: Script,
    requests: Arc<AtomicUsize>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ClassificationClientFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            script: Script::Random,
            requests: Arc::default(),
            logger: logger
                .with_namespace("classification_client")
                .with_namespace("fake"),
        }
    }

    /// Answers frame `i` with `labels[i % labels.len()]`.
    #[allow(dead_code)]
    pub fn with_labels(logger: Arc<dyn Logger + Send + Sync>, labels: Vec<Emotion>) -> Self {
        Self {
            script: Script::Labels(labels),
            ..Self::new(logger)
        }
    }

    #[allow(dead_code)]
    pub fn failing(logger: Arc<dyn Logger + Send + Sync>, error: ClassifyError) -> Self {
        Self {
            script: Script::Fail(error),
            ..Self::new(logger)
        }
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl ClassificationClient for ClassificationClientFake {
    fn classify(&self, frames: &[Frame]) -> Result<Vec<ClassificationResult>, ClassifyError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let _ = self
            .logger
            .info(&format!("Classifying {} frames with fake classifier", frames.len()));

        match &self.script {
            Script::Fail(error) => Err(error.clone()),
            Script::Labels(labels) if labels.is_empty() => Ok(vec![]),
            Script::Labels(labels) => Ok(frames
                .iter()
                .map(|frame| {
                    ClassificationResult::classified(
                        frame.index(),
                        labels[frame.index() % labels.len()],
                    )
                })
                .collect()),
            Script::Random => {
                let mut rng = rand::rng();
                let index_dist = Uniform::new(0, Emotion::ALL.len())
                    .map_err(|e| ClassifyError::Transport(e.to_string()))?;

                Ok(frames
                    .iter()
                    .map(|frame| {
                        ClassificationResult::classified(
                            frame.index(),
                            Emotion::ALL[index_dist.sample(&mut rng)],
                        )
                    })
                    .collect())
            }
        }
    }
}
