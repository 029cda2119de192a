use crate::classification_client::interface::ClassificationClient;
use crate::display::interface::Display;
use crate::frame_sampler::sampler::FrameSampler;
use crate::library::cancel_token::CancelToken;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::sampling_run::core::{init, transition, Effect, Event, State};
use crate::sampling_run::render::Render;
use crate::video_source::interface::VideoSource;
use std::io::Read;
use std::sync::mpsc::RecvError;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Runs are started and cancelled from the input stream until it asks to quit.
    Interactive,
    /// Starts one run and returns once it has a verdict or has failed.
    Once,
}

pub(super) struct ActiveSampling {
    pub(super) cancel: CancelToken,
    pub(super) handle: JoinHandle<()>,
}

pub struct SamplingRun {
    pub(super) logger: Arc<dyn Logger + Send + Sync>,
    pub(super) sampler: Arc<FrameSampler>,
    pub(super) video_source: Arc<dyn VideoSource + Send + Sync>,
    pub(super) classifier: Arc<dyn ClassificationClient + Send + Sync>,
    pub(super) display: Arc<Mutex<dyn Display + Send + Sync>>,
    pub(super) input: Mutex<Option<Box<dyn Read + Send>>>,
    pub(super) active_sampling: Mutex<Option<ActiveSampling>>,
    render: Render,
}

impl SamplingRun {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        sampler: FrameSampler,
        video_source: Arc<dyn VideoSource + Send + Sync>,
        classifier: Arc<dyn ClassificationClient + Send + Sync>,
        display: Arc<Mutex<dyn Display + Send + Sync>>,
        input: Box<dyn Read + Send>,
    ) -> Self {
        let render = Render::new(display.clone(), sampler.settings().frame_count);

        Self {
            logger: logger.with_namespace("sampling_run"),
            sampler: Arc::new(sampler),
            video_source,
            classifier,
            display,
            input: Mutex::new(Some(input)),
            active_sampling: Mutex::new(None),
            render,
        }
    }

    pub fn run(&self, mode: RunMode) -> Result<State, RecvError> {
        let machine = StateMachine::new(
            init(mode == RunMode::Interactive),
            |state, event| self.transition_logged(state, event),
            |state| {
                if let Err(e) = self.render.render(state) {
                    let _ = self.logger.error(&format!("Render failed: {}", e));
                }
            },
            |effect, sender| self.run_effect(effect, sender),
        );

        let seed_events = match mode {
            RunMode::Interactive => vec![],
            RunMode::Once => vec![Event::UserTriggered],
        };

        let result = machine.run(seed_events, |state, effects| match mode {
            RunMode::Interactive => effects.contains(&Effect::Exit),
            RunMode::Once => state.is_finished(),
        });

        self.release_active_sampling();

        result
    }

    fn transition_logged(&self, state: State, event: Event) -> (State, Vec<Effect>) {
        let old = state.to_display_string();
        let event_string = event.to_display_string();
        let rejected_trigger = state.is_active() && matches!(event, Event::UserTriggered);

        let (new_state, effects) = transition(state, event);

        if rejected_trigger {
            let _ = self
                .logger
                .info("Ignoring start request: a run is already in progress");
        }
        let _ = self.logger.info(&format!(
            "{} --{}--> {} effects: [{}]",
            old,
            event_string,
            new_state.to_display_string(),
            effects
                .iter()
                .map(Effect::to_display_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));

        (new_state, effects)
    }

    /// Cancels an in-flight sampling thread and waits for it, so the camera is
    /// released before returning.
    pub(super) fn release_active_sampling(&self) {
        let active = match self.active_sampling.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(active) = active {
            active.cancel.cancel();
            if active.handle.join().is_err() {
                let _ = self.logger.error("Sampling thread panicked");
            }
        }
    }
}
