use super::fixture::{frames, labels, results};
use crate::classification_client::interface::ClassifyError;
use crate::emotion::Emotion;
use crate::frame_sampler::frame::Frame;
use crate::frame_sampler::sampler::SampleError;
use crate::sampling_run::core::{init, transition, Effect, Event, RunFailure, State};
use crate::stress_verdict::StressVerdict;
use crate::video_source::interface::VideoSourceError;
use std::sync::Arc;

fn submitting(run_id: u64, count: usize) -> State {
    State::Submitting {
        run_id,
        frames: Arc::from(frames(count)),
    }
}

fn verdicted(run_id: u64, stress: usize, calm: usize) -> State {
    let (state, _) = transition(
        submitting(run_id, stress + calm),
        Event::ClassifyDone {
            run_id,
            result: Ok(results(&labels(stress, calm))),
        },
    );
    state
}

#[test]
fn test_init() {
    let (state, effects) = init(true);
    assert!(matches!(state, State::Idle));
    assert_eq!(effects, vec![Effect::SubscribeToUserInput]);

    let (state, effects) = init(false);
    assert!(matches!(state, State::Idle));
    assert!(effects.is_empty());
}

#[test]
fn test_trigger_starts_first_run() {
    let (state, effects) = transition(State::Idle, Event::UserTriggered);

    assert!(matches!(state, State::AwaitingConsent { run_id: 1 }));
    assert_eq!(effects, vec![Effect::AcquireAndSample { run_id: 1 }]);
}

#[test]
fn test_trigger_during_active_run_is_rejected() {
    let active = vec![
        State::AwaitingConsent { run_id: 1 },
        State::Sampling {
            run_id: 1,
            captured: 7,
        },
        submitting(1, 50),
    ];

    for state in active {
        let before = state.to_display_string();
        let (after, effects) = transition(state, Event::UserTriggered);
        assert_eq!(after.to_display_string(), before);
        assert!(effects.is_empty());
    }
}

#[test]
fn test_sampling_progress() {
    let (state, effects) = transition(
        State::AwaitingConsent { run_id: 1 },
        Event::VideoAcquired { run_id: 1 },
    );
    assert!(matches!(
        state,
        State::Sampling {
            run_id: 1,
            captured: 0
        }
    ));
    assert!(effects.is_empty());

    let (state, _) = transition(state, Event::FrameCaptured { run_id: 1, index: 4 });
    assert!(matches!(
        state,
        State::Sampling {
            run_id: 1,
            captured: 5
        }
    ));
}

#[test]
fn test_sampling_done_submits_all_frames_in_one_batch() {
    let state = State::Sampling {
        run_id: 1,
        captured: 50,
    };

    let (state, effects) = transition(
        state,
        Event::SamplingDone {
            run_id: 1,
            result: Ok(frames(50)),
        },
    );

    assert!(matches!(state, State::Submitting { run_id: 1, .. }));
    assert_eq!(state.frames().len(), 50);
    match &effects[..] {
        [Effect::Classify { run_id: 1, frames }] => {
            assert_eq!(frames.len(), 50);
            let indices: Vec<_> = frames.iter().map(Frame::index).collect();
            assert_eq!(indices, (0..50).collect::<Vec<_>>());
        }
        other => panic!("Unexpected effects: {:?}", other),
    }
}

#[test]
fn test_stale_events_are_ignored() {
    let state = State::Sampling {
        run_id: 2,
        captured: 3,
    };

    let (state, effects) = transition(
        state,
        Event::SamplingDone {
            run_id: 1,
            result: Ok(frames(50)),
        },
    );
    assert!(matches!(
        state,
        State::Sampling {
            run_id: 2,
            captured: 3
        }
    ));
    assert!(effects.is_empty());

    let (state, effects) = transition(
        submitting(2, 50),
        Event::ClassifyDone {
            run_id: 1,
            result: Ok(results(&labels(50, 0))),
        },
    );
    assert!(matches!(state, State::Submitting { run_id: 2, .. }));
    assert!(effects.is_empty());
}

#[test]
fn test_thirty_stress_labels_is_stressed() {
    let (state, effects) = transition(
        submitting(1, 50),
        Event::ClassifyDone {
            run_id: 1,
            result: Ok(results(&labels(30, 20))),
        },
    );

    let verdict = state.verdict().unwrap();
    assert!(verdict.stressed);
    assert_eq!(verdict.stress_count, 30);
    assert_eq!(state.results().len(), 50);
    assert_eq!(
        effects,
        vec![Effect::Notify {
            message: "Stress detected! Take a break.".to_string()
        }]
    );
}

#[test]
fn test_ten_stress_labels_is_not_stressed() {
    let (state, effects) = transition(
        submitting(1, 50),
        Event::ClassifyDone {
            run_id: 1,
            result: Ok(results(&labels(10, 40))),
        },
    );

    assert!(!state.verdict().unwrap().stressed);
    assert_eq!(
        effects,
        vec![Effect::Notify {
            message: "No stress detected.".to_string()
        }]
    );
}

#[test]
fn test_threshold_boundary() {
    assert!(!verdicted(1, 25, 25).verdict().unwrap().stressed);
    assert!(verdicted(1, 26, 24).verdict().unwrap().stressed);
}

#[test]
fn test_result_i_belongs_to_frame_i() {
    let state = verdicted(1, 4, 3);

    for (frame, result) in state.frames().iter().zip(state.results()) {
        assert_eq!(result.frame_index, frame.index());
    }
    assert_eq!(state.results()[0].emotion(), Some(Emotion::Angry));
    assert_eq!(state.results()[4].emotion(), Some(Emotion::Happy));
}

#[test]
fn test_acquisition_denied_fails_without_frames_or_request() {
    let (state, effects) = transition(
        State::AwaitingConsent { run_id: 1 },
        Event::SamplingDone {
            run_id: 1,
            result: Err(SampleError::Acquire(VideoSourceError::PermissionDenied(
                "user declined camera access".to_string(),
            ))),
        },
    );

    assert!(matches!(
        state.failure(),
        Some(RunFailure::AcquisitionFailed(_))
    ));
    assert!(state.frames().is_empty());
    assert!(state.verdict().is_none());
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::ReportFailure { run_id: 1, .. }));
}

#[test]
fn test_capture_failure_mid_run() {
    let (state, effects) = transition(
        State::Sampling {
            run_id: 1,
            captured: 10,
        },
        Event::SamplingDone {
            run_id: 1,
            result: Err(SampleError::Capture {
                index: 10,
                source: VideoSourceError::Capture("camera disconnected".to_string()),
            }),
        },
    );

    assert!(matches!(state.failure(), Some(RunFailure::SamplingFailed(_))));
    assert!(state.frames().is_empty());
    assert!(matches!(effects[..], [Effect::ReportFailure { .. }]));
}

#[test]
fn test_missing_results_counts_as_zero_classified() {
    let (state, effects) = transition(
        submitting(1, 50),
        Event::ClassifyDone {
            run_id: 1,
            result: Err(ClassifyError::Schema("missing `results` field".to_string())),
        },
    );

    assert!(matches!(
        state.failure(),
        Some(RunFailure::MalformedResponse(_))
    ));
    assert_eq!(
        state.verdict(),
        Some(StressVerdict {
            stressed: false,
            stress_count: 0,
            classified: 0
        })
    );
    assert!(state.results().is_empty());
    assert!(matches!(
        &effects[..],
        [Effect::ReportFailure { .. }, Effect::Notify { .. }]
    ));
}

#[test]
fn test_results_that_do_not_line_up_are_rejected() {
    let (state, _) = transition(
        submitting(1, 50),
        Event::ClassifyDone {
            run_id: 1,
            result: Ok(results(&labels(30, 0))),
        },
    );

    assert_eq!(
        state.failure(),
        Some(&RunFailure::MalformedResponse(
            "30 results do not line up with 50 frames".to_string()
        ))
    );
    assert!(!state.verdict().unwrap().stressed);
    assert_eq!(state.frames().len(), 50);
}

#[test]
fn test_results_for_the_wrong_frames_are_rejected() {
    let mut shuffled = results(&labels(30, 20));
    shuffled.swap(0, 1);

    let (state, effects) = transition(
        submitting(1, 50),
        Event::ClassifyDone {
            run_id: 1,
            result: Ok(shuffled),
        },
    );

    assert!(matches!(
        state.failure(),
        Some(RunFailure::MalformedResponse(_))
    ));
    assert!(state.results().is_empty());
    assert!(matches!(
        &effects[..],
        [Effect::ReportFailure { .. }, Effect::Notify { .. }]
    ));
}

#[test]
fn test_transmission_failure_has_no_verdict() {
    let (state, effects) = transition(
        submitting(1, 50),
        Event::ClassifyDone {
            run_id: 1,
            result: Err(ClassifyError::Transport("connection refused".to_string())),
        },
    );

    assert!(matches!(
        state.failure(),
        Some(RunFailure::TransmissionFailed(_))
    ));
    assert!(state.verdict().is_none());
    assert_eq!(state.frames().len(), 50);
    assert!(matches!(&effects[..], [Effect::ReportFailure { run_id: 1, .. }]));
}

#[test]
fn test_cancel_while_sampling() {
    let (state, effects) = transition(
        State::Sampling {
            run_id: 1,
            captured: 12,
        },
        Event::UserCancelled,
    );

    assert_eq!(state.failure(), Some(&RunFailure::Cancelled));
    assert_eq!(effects, vec![Effect::CancelSampling]);

    // The sampler's own report of the cancellation arrives afterwards.
    let (state, effects) = transition(
        state,
        Event::SamplingDone {
            run_id: 1,
            result: Err(SampleError::Cancelled { captured: 12 }),
        },
    );
    assert_eq!(state.failure(), Some(&RunFailure::Cancelled));
    assert!(effects.is_empty());
}

#[test]
fn test_cancel_while_submitting_ignores_late_results() {
    let (state, effects) = transition(submitting(1, 50), Event::UserCancelled);
    assert_eq!(state.failure(), Some(&RunFailure::Cancelled));
    assert!(effects.is_empty());

    let (state, effects) = transition(
        state,
        Event::ClassifyDone {
            run_id: 1,
            result: Ok(results(&labels(50, 0))),
        },
    );
    assert!(state.verdict().is_none());
    assert!(effects.is_empty());
}

#[test]
fn test_retrigger_after_verdict_starts_clean_run() {
    let finished = verdicted(1, 30, 20);
    assert_eq!(finished.frames().len(), 50);

    let (state, effects) = transition(finished, Event::UserTriggered);

    assert!(matches!(state, State::AwaitingConsent { run_id: 2 }));
    assert!(state.frames().is_empty());
    assert!(state.results().is_empty());
    assert!(state.verdict().is_none());
    assert_eq!(effects, vec![Effect::AcquireAndSample { run_id: 2 }]);
}

#[test]
fn test_retrigger_after_failure() {
    let (failed, _) = transition(submitting(4, 50), Event::UserCancelled);

    let (state, _) = transition(failed, Event::UserTriggered);

    assert!(matches!(state, State::AwaitingConsent { run_id: 5 }));
}

#[test]
fn test_quit() {
    let (state, effects) = transition(State::Idle, Event::UserQuit);
    assert!(matches!(state, State::Idle));
    assert_eq!(effects, vec![Effect::Exit]);

    let (_, effects) = transition(
        State::Sampling {
            run_id: 1,
            captured: 1,
        },
        Event::UserQuit,
    );
    assert_eq!(effects, vec![Effect::CancelSampling, Effect::Exit]);
}
