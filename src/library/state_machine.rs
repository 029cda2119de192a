use std::marker::PhantomData;
use std::sync::mpsc::{channel, RecvError, Sender};

/// Drives a pure `transition` function with events fed back by effects.
///
/// Effects are handed to `run_effect_fn` on the loop thread, in the order the
/// transition produced them. Long-running effects are expected to spawn their
/// own thread and report back through the provided sender.
pub struct StateMachine<TState, TEvent, TEffect, T, R, E>
where
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>),
    R: Fn(&TState),
    E: Fn(TEffect, &Sender<TEvent>),
{
    pub init: (TState, Vec<TEffect>),
    pub transition_fn: T,
    pub render_fn: R,
    pub run_effect_fn: E,
    _event: PhantomData<TEvent>,
}

impl<TState, TEvent, TEffect, T, R, E> StateMachine<TState, TEvent, TEffect, T, R, E>
where
    TState: Clone,
    TEvent: Send + 'static,
    TEffect: Clone,
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>),
    R: Fn(&TState),
    E: Fn(TEffect, &Sender<TEvent>),
{
    pub fn new(
        init: (TState, Vec<TEffect>),
        transition_fn: T,
        render_fn: R,
        run_effect_fn: E,
    ) -> Self {
        Self {
            init,
            transition_fn,
            render_fn,
            run_effect_fn,
            _event: PhantomData,
        }
    }

    /// Runs until `is_done` holds for a new state and the effects that produced it.
    /// The effects of the final transition still run before returning.
    pub fn run<D>(&self, seed_events: Vec<TEvent>, is_done: D) -> Result<TState, RecvError>
    where
        D: Fn(&TState, &[TEffect]) -> bool,
    {
        let (event_sender, event_receiver) = channel();
        let mut state = self.init.0.clone();

        (self.render_fn)(&state);

        for effect in self.init.1.iter().cloned() {
            (self.run_effect_fn)(effect, &event_sender);
        }

        for event in seed_events {
            // The receiver is alive for the whole call.
            let _ = event_sender.send(event);
        }

        loop {
            let event = event_receiver.recv()?;
            let (new_state, new_effects) = (self.transition_fn)(state, event);
            (self.render_fn)(&new_state);

            let done = is_done(&new_state, &new_effects);

            for effect in new_effects {
                (self.run_effect_fn)(effect, &event_sender);
            }

            if done {
                return Ok(new_state);
            }

            state = new_state;
        }
    }
}
