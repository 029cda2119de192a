use crate::classification_client::interface::{ClassificationResult, ClassifyError};
use crate::frame_sampler::frame::Frame;
use crate::frame_sampler::sampler::SampleError;
use crate::stress_verdict::{EmotionHistogram, StressVerdict};
use std::sync::Arc;

pub type RunId = u64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunFailure {
    #[error("camera could not be acquired: {0}")]
    AcquisitionFailed(String),
    #[error("sampling failed: {0}")]
    SamplingFailed(String),
    #[error("classification request failed: {0}")]
    TransmissionFailed(String),
    #[error("classification response rejected: {0}")]
    MalformedResponse(String),
    #[error("cancelled by user")]
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub enum State {
    #[default]
    Idle,
    AwaitingConsent {
        run_id: RunId,
    },
    Sampling {
        run_id: RunId,
        captured: usize,
    },
    Submitting {
        run_id: RunId,
        frames: Arc<[Frame]>,
    },
    Verdicted {
        run_id: RunId,
        frames: Arc<[Frame]>,
        results: Arc<[ClassificationResult]>,
        verdict: StressVerdict,
        histogram: EmotionHistogram,
    },
    Failed {
        run_id: RunId,
        frames: Arc<[Frame]>,
        failure: RunFailure,
    },
}

impl State {
    pub fn run_id(&self) -> Option<RunId> {
        match self {
            State::Idle => None,
            State::AwaitingConsent { run_id }
            | State::Sampling { run_id, .. }
            | State::Submitting { run_id, .. }
            | State::Verdicted { run_id, .. }
            | State::Failed { run_id, .. } => Some(*run_id),
        }
    }

    /// A run is in progress and a new trigger would be rejected.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            State::AwaitingConsent { .. } | State::Sampling { .. } | State::Submitting { .. }
        )
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, State::Verdicted { .. } | State::Failed { .. })
    }

    #[allow(dead_code)]
    pub fn frames(&self) -> &[Frame] {
        match self {
            State::Submitting { frames, .. }
            | State::Verdicted { frames, .. }
            | State::Failed { frames, .. } => &frames[..],
            _ => &[],
        }
    }

    #[allow(dead_code)]
    pub fn results(&self) -> &[ClassificationResult] {
        match self {
            State::Verdicted { results, .. } => &results[..],
            _ => &[],
        }
    }

    /// A rejected response counts as zero classified frames; other failures have no verdict.
    pub fn verdict(&self) -> Option<StressVerdict> {
        match self {
            State::Verdicted { verdict, .. } => Some(*verdict),
            State::Failed {
                failure: RunFailure::MalformedResponse(_),
                ..
            } => Some(StressVerdict::from_results(&[])),
            _ => None,
        }
    }

    #[allow(dead_code)]
    pub fn failure(&self) -> Option<&RunFailure> {
        match self {
            State::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            State::Idle => "Idle".to_string(),
            State::AwaitingConsent { run_id } => format!("AwaitingConsent(run {})", run_id),
            State::Sampling { run_id, captured } => {
                format!("Sampling(run {}, {} captured)", run_id, captured)
            }
            State::Submitting { run_id, frames } => {
                format!("Submitting(run {}, {} frames)", run_id, frames.len())
            }
            State::Verdicted {
                run_id, verdict, ..
            } => format!("Verdicted(run {}, {:?})", run_id, verdict),
            State::Failed {
                run_id, failure, ..
            } => format!("Failed(run {}, {})", run_id, failure),
        }
    }
}

#[derive(Debug)]
pub enum Event {
    UserTriggered,
    UserCancelled,
    UserQuit,
    VideoAcquired {
        run_id: RunId,
    },
    FrameCaptured {
        run_id: RunId,
        index: usize,
    },
    SamplingDone {
        run_id: RunId,
        result: Result<Vec<Frame>, SampleError>,
    },
    ClassifyDone {
        run_id: RunId,
        result: Result<Vec<ClassificationResult>, ClassifyError>,
    },
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::SamplingDone {
                run_id,
                result: Ok(frames),
            } => format!("SamplingDone(run {}, {} frames)", run_id, frames.len()),
            Event::ClassifyDone {
                run_id,
                result: Ok(results),
            } => format!("ClassifyDone(run {}, {} results)", run_id, results.len()),
            event => format!("{:?}", event),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SubscribeToUserInput,
    AcquireAndSample { run_id: RunId },
    CancelSampling,
    Classify { run_id: RunId, frames: Arc<[Frame]> },
    Notify { message: String },
    ReportFailure { run_id: RunId, failure: RunFailure },
    Exit,
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::Classify { run_id, frames } => {
                format!("Classify(run {}, {} frames)", run_id, frames.len())
            }
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init(interactive: bool) -> (State, Vec<Effect>) {
    let effects = if interactive {
        vec![Effect::SubscribeToUserInput]
    } else {
        vec![]
    };
    (State::Idle, effects)
}

fn no_frames() -> Arc<[Frame]> {
    Arc::from(Vec::new())
}

fn failed(run_id: RunId, frames: Arc<[Frame]>, failure: RunFailure) -> (State, Vec<Effect>) {
    let effects = match failure {
        RunFailure::Cancelled => vec![],
        _ => vec![Effect::ReportFailure {
            run_id,
            failure: failure.clone(),
        }],
    };
    (
        State::Failed {
            run_id,
            frames,
            failure,
        },
        effects,
    )
}

fn sample_failure(error: SampleError) -> RunFailure {
    match error {
        SampleError::Acquire(source) => RunFailure::AcquisitionFailed(source.to_string()),
        SampleError::Cancelled { .. } => RunFailure::Cancelled,
        other => RunFailure::SamplingFailed(other.to_string()),
    }
}

fn classify_done(
    run_id: RunId,
    frames: Arc<[Frame]>,
    result: Result<Vec<ClassificationResult>, ClassifyError>,
) -> (State, Vec<Effect>) {
    let results = match result {
        Ok(results) => results,
        Err(error) if error.is_schema() => {
            return malformed(run_id, frames, error.to_string());
        }
        Err(error) => {
            return failed(
                run_id,
                frames,
                RunFailure::TransmissionFailed(error.to_string()),
            );
        }
    };

    let misattributed = results.len() != frames.len()
        || results
            .iter()
            .zip(frames.iter())
            .any(|(result, frame)| result.frame_index != frame.index());
    if misattributed {
        let reason = format!(
            "{} results do not line up with {} frames",
            results.len(),
            frames.len()
        );
        return malformed(run_id, frames, reason);
    }

    let verdict = StressVerdict::from_results(&results);
    let histogram = EmotionHistogram::from_results(&results);

    (
        State::Verdicted {
            run_id,
            frames,
            results: Arc::from(results),
            verdict,
            histogram,
        },
        vec![Effect::Notify {
            message: verdict.message().to_string(),
        }],
    )
}

fn malformed(run_id: RunId, frames: Arc<[Frame]>, reason: String) -> (State, Vec<Effect>) {
    let (state, mut effects) = failed(run_id, frames, RunFailure::MalformedResponse(reason));
    effects.push(Effect::Notify {
        message: StressVerdict::from_results(&[]).message().to_string(),
    });
    (state, effects)
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match (state.clone(), event) {
        // Starting a run. Triggers during an active run are rejected.
        (State::Idle | State::Verdicted { .. } | State::Failed { .. }, Event::UserTriggered) => {
            let run_id = state.run_id().map_or(1, |previous| previous + 1);
            (
                State::AwaitingConsent { run_id },
                vec![Effect::AcquireAndSample { run_id }],
            )
        }

        // Sampling
        (State::AwaitingConsent { run_id }, Event::VideoAcquired { run_id: event_run })
            if event_run == run_id =>
        {
            (State::Sampling { run_id, captured: 0 }, vec![])
        }
        (
            State::Sampling { run_id, captured },
            Event::FrameCaptured {
                run_id: event_run,
                index,
            },
        ) if event_run == run_id => (
            State::Sampling {
                run_id,
                captured: captured.max(index + 1),
            },
            vec![],
        ),
        (
            State::AwaitingConsent { run_id } | State::Sampling { run_id, .. },
            Event::SamplingDone {
                run_id: event_run,
                result,
            },
        ) if event_run == run_id => match result {
            Ok(frames) => {
                let frames: Arc<[Frame]> = Arc::from(frames);
                (
                    State::Submitting {
                        run_id,
                        frames: frames.clone(),
                    },
                    vec![Effect::Classify { run_id, frames }],
                )
            }
            Err(error) => failed(run_id, no_frames(), sample_failure(error)),
        },

        // Classification
        (
            State::Submitting { run_id, frames },
            Event::ClassifyDone {
                run_id: event_run,
                result,
            },
        ) if event_run == run_id => classify_done(run_id, frames, result),

        // Cancellation
        (
            State::AwaitingConsent { run_id } | State::Sampling { run_id, .. },
            Event::UserCancelled,
        ) => {
            let (state, mut effects) = failed(run_id, no_frames(), RunFailure::Cancelled);
            effects.insert(0, Effect::CancelSampling);
            (state, effects)
        }
        (State::Submitting { run_id, frames }, Event::UserCancelled) => {
            failed(run_id, frames, RunFailure::Cancelled)
        }

        (_, Event::UserQuit) => {
            let mut effects = vec![];
            if matches!(
                state,
                State::AwaitingConsent { .. } | State::Sampling { .. }
            ) {
                effects.push(Effect::CancelSampling);
            }
            effects.push(Effect::Exit);
            (state, effects)
        }

        // Stale events from earlier runs, rejected triggers
        _ => (state, vec![]),
    }
}
