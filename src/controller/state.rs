//! Form state record and its transition function
//!
//! [`FormState`] is never mutated in place. Every user edit, submit attempt and backend
//! resolution is an [`Event`] fed through [`FormState::apply`], which returns the next state
//! together with the [`Phase`] the submission reached. Loading and a visible result cannot
//! coexist because both live in the same [`Status`] enum.

use tracing::debug;

use super::validation;
use crate::errors::FormError;
use crate::models::{Accent, Airline, BoardingPass, FieldName, FormData, ResultState};

/// Submission status of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// No submission in flight; holds the outcome of the last attempt, if any
    Idle { result: Option<ResultState> },
    /// Waiting on the backend for the given attempt
    Pending { attempt: u64 },
}

impl Default for Status {
    fn default() -> Self {
        Status::Idle { result: None }
    }
}

/// Phases of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Rejected,
    Pending,
    Fulfilled,
}

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum Event {
    Edit { field: FieldName, value: String },
    Submit,
    Resolved {
        attempt: u64,
        outcome: Result<BoardingPass, FormError>,
    },
}

/// Result of applying an event
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: FormState,
    pub phase: Phase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    data: FormData,
    status: Status,
    attempts: u64,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::Pending { .. })
    }

    pub fn result(&self) -> Option<&ResultState> {
        match &self.status {
            Status::Idle { result } => result.as_ref(),
            Status::Pending { .. } => None,
        }
    }

    pub fn pending_attempt(&self) -> Option<u64> {
        match self.status {
            Status::Pending { attempt } => Some(attempt),
            Status::Idle { .. } => None,
        }
    }

    /// Resting phase: either idle or waiting on the backend
    pub fn phase(&self) -> Phase {
        if self.is_loading() {
            Phase::Pending
        } else {
            Phase::Idle
        }
    }

    /// Whether the submit button is enabled
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && self.data.is_complete()
    }

    pub fn selected_airline(&self) -> Option<Airline> {
        Airline::from_id(&self.data.airline)
    }

    /// Accent of the selected airline, or the default accent when none matches
    pub fn accent(&self) -> Accent {
        self.selected_airline()
            .map(|airline| airline.accent())
            .unwrap_or_default()
    }

    /// Compute the state that follows `event`
    pub fn apply(&self, event: Event) -> Transition {
        match event {
            Event::Edit { field, value } => {
                let mut data = self.data.clone();
                match field {
                    FieldName::Pnr => data.pnr = value.to_uppercase(),
                    FieldName::LastName => data.last_name = value.to_uppercase(),
                    FieldName::Airline => data.airline = value,
                }
                Transition {
                    state: FormState { data, ..self.clone() },
                    phase: self.phase(),
                }
            }
            Event::Submit => {
                debug!(phase = ?Phase::Validating, "Validating form");
                match validation::validate(&self.data) {
                    Err(err) => self.settle(Phase::Rejected, ResultState::failure(err.to_string())),
                    Ok(()) => {
                        let attempt = self.attempts + 1;
                        debug!(phase = ?Phase::Pending, attempt, "Form accepted");
                        Transition {
                            state: FormState {
                                data: self.data.clone(),
                                status: Status::Pending { attempt },
                                attempts: attempt,
                            },
                            phase: Phase::Pending,
                        }
                    }
                }
            }
            Event::Resolved { attempt, outcome } => {
                if self.pending_attempt() != Some(attempt) {
                    debug!(attempt, "Ignoring resolution for superseded attempt");
                    return Transition {
                        state: self.clone(),
                        phase: self.phase(),
                    };
                }
                match outcome {
                    Ok(pass) => self.settle(Phase::Fulfilled, ResultState::success(pass)),
                    Err(err) => self.settle(Phase::Rejected, ResultState::failure(err.to_string())),
                }
            }
        }
    }

    fn settle(&self, phase: Phase, result: ResultState) -> Transition {
        debug!(phase = ?phase, success = result.success, "Submission settled");
        Transition {
            state: FormState {
                data: self.data.clone(),
                status: Status::Idle {
                    result: Some(result),
                },
                attempts: self.attempts,
            },
            phase,
        }
    }
}
