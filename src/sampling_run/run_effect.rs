use crate::frame_sampler::sampler::SampleError;
use crate::library::cancel_token::CancelToken;
use crate::sampling_run::core::{Effect, Event};
use crate::sampling_run::main::{ActiveSampling, SamplingRun};
use std::io::{BufRead, BufReader};
use std::sync::mpsc::Sender;

fn input_event(line: &str) -> Option<Event> {
    match line.trim().to_lowercase().as_str() {
        "" | "s" | "start" => Some(Event::UserTriggered),
        "c" | "cancel" => Some(Event::UserCancelled),
        "q" | "quit" | "exit" => Some(Event::UserQuit),
        _ => None,
    }
}

impl SamplingRun {
    pub fn run_effect(&self, effect: Effect, sender: &Sender<Event>) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::SubscribeToUserInput => {
                let input = match self.input.lock() {
                    Ok(mut guard) => guard.take(),
                    Err(poisoned) => poisoned.into_inner().take(),
                };
                let Some(input) = input else {
                    return;
                };
                let sender = sender.clone();
                let logger = self.logger.clone();

                std::thread::spawn(move || {
                    for line in BufReader::new(input).lines() {
                        let line = match line {
                            Ok(line) => line,
                            Err(e) => {
                                let _ = logger.error(&format!("Reading input failed: {}", e));
                                break;
                            }
                        };
                        match input_event(&line) {
                            Some(event) => {
                                if sender.send(event).is_err() {
                                    return;
                                }
                            }
                            None => {
                                let _ = logger.info(&format!("Unknown command: {:?}", line));
                            }
                        }
                    }
                    let _ = sender.send(Event::UserQuit);
                });
            }
            Effect::AcquireAndSample { run_id } => {
                self.release_active_sampling();

                let cancel = CancelToken::new();
                let thread_cancel = cancel.clone();
                let sender = sender.clone();
                let video_source = self.video_source.clone();
                let sampler = self.sampler.clone();

                let handle = std::thread::spawn(move || {
                    // The stream is dropped, releasing the camera, before the
                    // outcome is reported.
                    let result = (|| {
                        let mut stream = video_source.acquire().map_err(SampleError::Acquire)?;
                        let _ = sender.send(Event::VideoAcquired { run_id });
                        sampler.sample(stream.as_mut(), &thread_cancel, |frame| {
                            let _ = sender.send(Event::FrameCaptured {
                                run_id,
                                index: frame.index(),
                            });
                        })
                    })();
                    let _ = sender.send(Event::SamplingDone { run_id, result });
                });

                let active = ActiveSampling { cancel, handle };
                match self.active_sampling.lock() {
                    Ok(mut guard) => *guard = Some(active),
                    Err(poisoned) => *poisoned.into_inner() = Some(active),
                }
            }
            Effect::CancelSampling => {
                let guard = match self.active_sampling.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                if let Some(active) = guard.as_ref() {
                    active.cancel.cancel();
                }
            }
            Effect::Classify { run_id, frames } => {
                let sender = sender.clone();
                let classifier = self.classifier.clone();

                std::thread::spawn(move || {
                    let result = classifier.classify(&frames);
                    let _ = sender.send(Event::ClassifyDone { run_id, result });
                });
            }
            Effect::Notify { message } => {
                let _ = self.logger.info(&format!("Notifying user: {}", message));
                let alerted = match self.display.lock() {
                    Ok(mut display) => display.alert(&message),
                    Err(poisoned) => poisoned.into_inner().alert(&message),
                };
                if let Err(e) = alerted {
                    let _ = self.logger.error(&format!("Notification failed: {}", e));
                }
            }
            Effect::ReportFailure { run_id, failure } => {
                let _ = self
                    .logger
                    .error(&format!("Run {} failed: {}", run_id, failure));
            }
            Effect::Exit => {
                let _ = self.logger.info("Exiting");
            }
        }
    }
}
