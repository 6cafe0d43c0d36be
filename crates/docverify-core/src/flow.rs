//! Verification flow controller
//!
//! Drives one verification from raw input to rendered result:
//!
//! 1. normalize the input; blank input renders `AwaitingInput` and stops
//! 2. render `Checking` (with the pulse indicator)
//! 3. resolve the code through the configured [`Resolver`]
//! 4. render the terminal state (which always clears the pulse)
//!
//! ## Overlapping submissions
//!
//! Lookups are not cancelled. Every submission (and every return to the
//! ready screen) takes a new generation number; a lookup that finishes
//! after a newer action is discarded instead of rendered, so the page
//! always reflects the most recent action.

use std::cell::Cell;

use tracing::{debug, info, warn};

use crate::code::{normalize_code, Code};
use crate::config::VerifierConfig;
use crate::error::{ConfigError, FlowError};
use crate::outcome::Verification;
use crate::resolver::{ConfiguredResolver, HttpTransport, Resolver};
use crate::view::{render, render_result, PresentationState, ViewModel, ViewSink};

/// Inputs to the presentation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent<'a> {
    /// A non-empty code was submitted
    Submitted,
    /// A blank code was submitted
    EmptySubmitted,
    /// The lookup answered
    Resolved(&'a Verification),
    /// The lookup failed
    Failed,
}

impl FlowEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::Submitted => "submitted",
            FlowEvent::EmptySubmitted => "empty_submitted",
            FlowEvent::Resolved(_) => "resolved",
            FlowEvent::Failed => "failed",
        }
    }
}

impl PresentationState {
    /// Transition function of the verification state machine
    pub fn on(self, event: FlowEvent<'_>) -> Result<PresentationState, FlowError> {
        use PresentationState::*;

        match (self, event) {
            (_, FlowEvent::EmptySubmitted) => Ok(AwaitingInput),
            (_, FlowEvent::Submitted) => Ok(Checking),
            (Checking, FlowEvent::Resolved(Verification::Valid { .. })) => Ok(Valid),
            (Checking, FlowEvent::Resolved(Verification::Revoked { .. })) => Ok(Revoked),
            (Checking, FlowEvent::Resolved(Verification::NotFound { .. })) => Ok(NotFound),
            (Checking, FlowEvent::Failed) => Ok(LookupError),
            (from, event) => Err(FlowError::InvalidTransition {
                from,
                event: event.name(),
            }),
        }
    }
}

/// How a call to [`VerificationFlow::submit`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Input was blank; no lookup was made
    Absent,
    /// The lookup finished and its state was rendered
    Completed(PresentationState),
    /// A newer submission started while this lookup was in flight
    Superseded,
}

/// Controller for the verification page
///
/// Single-threaded by construction: the flow runs on the event loop that
/// delivered the submission.
pub struct VerificationFlow<R> {
    resolver: R,
    uppercase: bool,
    generation: Cell<u64>,
    state: Cell<PresentationState>,
}

impl<T: HttpTransport> VerificationFlow<ConfiguredResolver<T>> {
    /// Build a controller with the strategy the configuration selects
    ///
    /// The configuration is validated first, so table keys are matched
    /// in the same form as normalized input.
    pub fn from_config(config: &VerifierConfig, transport: T) -> Result<Self, ConfigError> {
        let config = config.clone().validated()?;
        Ok(Self::new(config.resolver(transport)?, config.uppercase))
    }
}

impl<R: Resolver> VerificationFlow<R> {
    pub fn new(resolver: R, uppercase: bool) -> Self {
        Self {
            resolver,
            uppercase,
            generation: Cell::new(0),
            state: Cell::new(PresentationState::AwaitingInput),
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn state(&self) -> PresentationState {
        self.state.get()
    }

    /// Number of submissions and ready-screen resets so far
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Normalize input with this controller's settings
    pub fn normalize(&self, raw: &str) -> Option<Code> {
        normalize_code(raw, self.uppercase)
    }

    /// Render the initial screen
    ///
    /// Any lookup still in flight is discarded when it finishes.
    pub fn show_ready<V: ViewSink>(&self, view: &V) {
        let generation = self.next_generation();
        debug!(generation, "showing ready screen");
        self.state.set(PresentationState::AwaitingInput);
        view.render(&ViewModel::ready());
    }

    /// Run one verification for raw input
    pub async fn submit<V: ViewSink>(&self, raw: &str, view: &V) -> FlowOutcome {
        let generation = self.next_generation();

        let Some(code) = self.normalize(raw) else {
            debug!(generation, "blank code submitted");
            self.advance_input(FlowEvent::EmptySubmitted);
            view.sync_code(None);
            view.render(&render(PresentationState::AwaitingInput, None, None));
            return FlowOutcome::Absent;
        };

        self.advance_input(FlowEvent::Submitted);
        view.sync_code(Some(&code));
        view.render(&render(PresentationState::Checking, Some(&code), None));

        debug!(
            generation,
            code = %code,
            strategy = self.resolver.strategy(),
            "verifying code"
        );
        let result = self.resolver.resolve(&code).await;

        if generation != self.generation.get() {
            debug!(
                generation,
                latest = self.generation.get(),
                code = %code,
                "discarding stale lookup result"
            );
            return FlowOutcome::Superseded;
        }

        let event = match &result {
            Ok(verification) => FlowEvent::Resolved(verification),
            Err(e) => {
                warn!(code = %code, error = %e, "verification lookup failed");
                FlowEvent::Failed
            }
        };
        let state = match self.advance(event) {
            Ok(state) => state,
            Err(e) => {
                warn!(code = %code, error = %e, "dropping lookup result");
                return FlowOutcome::Superseded;
            }
        };
        info!(code = %code, state = ?state, "verification finished");

        view.render(&render_result(&code, &result));
        FlowOutcome::Completed(state)
    }

    fn next_generation(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    fn advance(&self, event: FlowEvent<'_>) -> Result<PresentationState, FlowError> {
        let next = self.state.get().on(event)?;
        self.state.set(next);
        Ok(next)
    }

    /// Apply a submission event; these are accepted from every state
    fn advance_input(&self, event: FlowEvent<'_>) {
        if let Err(e) = self.advance(event) {
            warn!(error = %e, "ignoring flow event");
        }
    }
}
