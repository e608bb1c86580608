//! Form controller for the boarding pass request form
//!
//! Owns the [`FormState`], runs the backend call for each accepted submit on a tokio task and
//! folds the outcome back into the state. Only the most recent attempt may settle the form:
//! starting a new submit aborts the previous task, and resolutions that still arrive for an
//! older attempt are discarded.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::FormError;
use crate::models::{Accent, Airline, BoardingPass, FieldName, FormData, ResultState};
use crate::service::{self, BoardingPassService};

pub mod state;
pub mod validation;

pub use state::{Event, FormState, Phase, Status};

/// Backend outcome for one submit attempt
#[derive(Debug)]
struct Completion {
    attempt: u64,
    outcome: Result<BoardingPass, FormError>,
}

/// Task running the backend call for the pending attempt
struct InFlight {
    attempt: u64,
    handle: JoinHandle<()>,
}

pub struct FormController {
    state: FormState,
    service: Arc<dyn BoardingPassService>,
    timeout: Duration,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: Option<InFlight>,
}

impl FormController {
    pub fn new(service: Arc<dyn BoardingPassService>, timeout: Duration) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            state: FormState::new(),
            service,
            timeout,
            completions_tx,
            completions_rx,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn form_data(&self) -> &FormData {
        self.state.data()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn result(&self) -> Option<&ResultState> {
        self.state.result()
    }

    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    pub fn selected_airline(&self) -> Option<Airline> {
        self.state.selected_airline()
    }

    pub fn accent(&self) -> Accent {
        self.state.accent()
    }

    /// Store a new value for `field`. PNR and last name are upper-cased.
    pub fn on_field_change(&mut self, field: FieldName, raw_value: &str) {
        self.state = self
            .state
            .apply(Event::Edit {
                field,
                value: raw_value.to_string(),
            })
            .state;
    }

    /// Validate the form and, if it passes, start the backend call.
    ///
    /// Must be called from within a tokio runtime. Any attempt still in flight is aborted.
    pub fn on_submit(&mut self) -> Phase {
        self.cancel_in_flight();

        let transition = self.state.apply(Event::Submit);
        self.state = transition.state;

        if let Some(attempt) = self.state.pending_attempt() {
            info!(
                "Requesting boarding pass for PNR {} on {}",
                self.state.data().pnr,
                self.state.data().airline
            );
            self.spawn_attempt(attempt);
        }

        transition.phase
    }

    /// Apply every completion that has already arrived without waiting.
    ///
    /// Returns the phase reached if the pending attempt settled.
    pub fn try_resolve(&mut self) -> Option<Phase> {
        let mut settled = None;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if let Some(phase) = self.resolve(completion) {
                settled = Some(phase);
            }
        }
        settled
    }

    /// Wait for the pending attempt to settle. Returns `None` when nothing is in flight.
    pub async fn resolve_next(&mut self) -> Option<Phase> {
        while self.in_flight.is_some() {
            let completion = self.completions_rx.recv().await?;
            if let Some(phase) = self.resolve(completion) {
                return Some(phase);
            }
        }
        None
    }

    /// Abort any in-flight attempt. The form keeps its data but stops loading.
    pub fn dispose(&mut self) {
        if self.cancel_in_flight() {
            info!("Form controller disposed with a submission in flight");
        }
    }

    fn spawn_attempt(&mut self, attempt: u64) {
        let service = Arc::clone(&self.service);
        let request = self.state.data().to_request();
        let timeout = self.timeout;
        let tx = self.completions_tx.clone();

        let handle = tokio::spawn(async move {
            let outcome = service::generate_with_timeout(service.as_ref(), request, timeout)
                .await
                .map_err(FormError::from);
            // Receiver is gone once the controller is dropped
            let _ = tx.send(Completion { attempt, outcome });
        });

        self.in_flight = Some(InFlight { attempt, handle });
    }

    fn resolve(&mut self, completion: Completion) -> Option<Phase> {
        let Completion { attempt, outcome } = completion;

        if self.state.pending_attempt() != Some(attempt) {
            debug!(attempt, "Discarding completion for superseded attempt");
            return None;
        }

        if let Err(ref err) = outcome {
            warn!("Boarding pass request failed: {}", err);
        }

        let transition = self.state.apply(Event::Resolved { attempt, outcome });
        self.state = transition.state;
        self.in_flight = None;

        if transition.phase == Phase::Fulfilled {
            info!("Boarding pass generated for attempt {}", attempt);
        }
        Some(transition.phase)
    }

    fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                debug!(attempt = in_flight.attempt, "Aborting in-flight submission");
                in_flight.handle.abort();
                if self.state.pending_attempt() == Some(in_flight.attempt) {
                    self.state = self
                        .state
                        .apply(Event::Resolved {
                            attempt: in_flight.attempt,
                            outcome: Err(FormError::SubmissionFailed(
                                "Submission cancelled".to_string(),
                            )),
                        })
                        .state;
                }
                true
            }
            None => false,
        }
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use crate::models::{BoardingPassRequest, SUCCESS_MESSAGE};
    use crate::service::SimulatedService;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    const TIMEOUT: Duration = Duration::from_secs(30);

    /// Replies to each call with the next scripted delay and outcome
    struct ScriptedService {
        script: Mutex<VecDeque<(Duration, Result<(), ServiceError>)>>,
    }

    impl ScriptedService {
        fn new(script: Vec<(Duration, Result<(), ServiceError>)>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    #[async_trait]
    impl BoardingPassService for ScriptedService {
        async fn generate(&self, request: BoardingPassRequest) -> Result<BoardingPass, ServiceError> {
            let next = self.script.lock().unwrap().pop_front();
            let (delay, outcome) = next.expect("unexpected backend call");
            tokio::time::sleep(delay).await;
            outcome.map(|()| sample_pass(&request))
        }
    }

    fn sample_pass(request: &BoardingPassRequest) -> BoardingPass {
        BoardingPass {
            passenger_name: request.last_name.clone(),
            flight_number: "AI-101".to_string(),
            departure: "DEL".to_string(),
            arrival: "MAA".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
            seat: "21F".to_string(),
            gate: "G3".to_string(),
            boarding_time: "13:45".to_string(),
            pnr: request.pnr.clone(),
            booking_reference: None,
        }
    }

    fn simulated() -> FormController {
        let service = SimulatedService::new(Duration::from_millis(2000)).with_seed(1);
        FormController::new(Arc::new(service), TIMEOUT)
    }

    fn fill(controller: &mut FormController, airline: &str, pnr: &str, last_name: &str) {
        controller.on_field_change(FieldName::Airline, airline);
        controller.on_field_change(FieldName::Pnr, pnr);
        controller.on_field_change(FieldName::LastName, last_name);
    }

    #[test]
    fn test_field_changes_are_normalized() {
        let service = Arc::new(ScriptedService::new(vec![]));
        let mut controller = FormController::new(service, TIMEOUT);

        controller.on_field_change(FieldName::Pnr, "ab1");
        assert_eq!(controller.form_data().pnr, "AB1");

        controller.on_field_change(FieldName::LastName, "Menon");
        controller.on_field_change(FieldName::Airline, "spicejet");
        assert_eq!(controller.form_data().last_name, "MENON");
        assert_eq!(controller.form_data().airline, "spicejet");
        assert_eq!(controller.selected_airline(), Some(Airline::SpiceJet));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_form_rejects_immediately() {
        let mut controller = simulated();
        fill(&mut controller, "indigo", "abc123", "");

        assert_eq!(controller.on_submit(), Phase::Rejected);
        assert!(!controller.is_loading());
        assert_eq!(
            controller.result().map(|r| r.message.as_str()),
            Some("Please fill in all required fields")
        );
        assert_eq!(controller.resolve_next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_pnr_length_rejects_immediately() {
        let mut controller = simulated();
        fill(&mut controller, "indigo", "abc1234", "rao");

        assert_eq!(controller.on_submit(), Phase::Rejected);
        assert!(!controller.is_loading());
        assert_eq!(
            controller.result(),
            Some(&ResultState::failure("PNR must be exactly 6 characters"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_submit_resolves_after_delay() {
        let mut controller = simulated();
        fill(&mut controller, "indigo", "abc123", "rao");
        let started = Instant::now();

        assert_eq!(controller.on_submit(), Phase::Pending);
        assert!(controller.is_loading());
        assert!(controller.result().is_none());
        assert!(!controller.can_submit());

        assert_eq!(controller.resolve_next().await, Some(Phase::Fulfilled));
        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert!(!controller.is_loading());

        let result = controller.result().unwrap();
        assert!(result.success);
        assert_eq!(result.message, SUCCESS_MESSAGE);
        assert_eq!(result.boarding_pass.as_ref().unwrap().pnr, "ABC123");
        assert!(controller.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_try_resolve_waits_for_delay() {
        let mut controller = simulated();
        fill(&mut controller, "akasa", "qwe789", "bose");
        controller.on_submit();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(controller.try_resolve(), None);
        assert!(controller.is_loading());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(controller.try_resolve(), Some(Phase::Fulfilled));
        assert!(controller.result().unwrap().success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_is_not_overwritten_by_first() {
        let service = Arc::new(ScriptedService::new(vec![
            (
                Duration::from_millis(2000),
                Err(ServiceError::Unavailable("first attempt".to_string())),
            ),
            (Duration::from_millis(100), Ok(())),
        ]));
        let mut controller = FormController::new(service, TIMEOUT);
        fill(&mut controller, "airindia", "abc123", "nair");

        assert_eq!(controller.on_submit(), Phase::Pending);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(controller.on_submit(), Phase::Pending);

        assert_eq!(controller.resolve_next().await, Some(Phase::Fulfilled));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(controller.try_resolve(), None);
        assert!(controller.result().unwrap().success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_resubmit_cancels_pending_attempt() {
        let mut controller = simulated();
        fill(&mut controller, "indigo", "abc123", "rao");
        assert_eq!(controller.on_submit(), Phase::Pending);

        controller.on_field_change(FieldName::Pnr, "abc");
        assert_eq!(controller.on_submit(), Phase::Rejected);
        assert!(!controller.is_loading());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(controller.try_resolve(), None);
        assert_eq!(
            controller.result(),
            Some(&ResultState::failure("PNR must be exactly 6 characters"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_completion_in_channel_is_discarded() {
        let mut controller = simulated();
        fill(&mut controller, "indigo", "abc123", "rao");
        controller.on_submit();

        controller
            .completions_tx
            .send(Completion {
                attempt: 99,
                outcome: Err(FormError::SubmissionFailed("stale".to_string())),
            })
            .unwrap();

        assert_eq!(controller.try_resolve(), None);
        assert!(controller.is_loading());
        assert_eq!(controller.resolve_next().await, Some(Phase::Fulfilled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_aborts_pending_attempt() {
        let mut controller = simulated();
        fill(&mut controller, "indigo", "abc123", "rao");
        controller.on_submit();

        controller.dispose();
        assert!(!controller.is_loading());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(controller.try_resolve(), None);
        assert!(!controller.result().unwrap().success);
        assert_eq!(controller.resolve_next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_while_pending() {
        let mut controller = simulated();
        fill(&mut controller, "indigo", "abc123", "rao");
        controller.on_submit();
        drop(controller);

        // The aborted task must not panic on a closed channel
        tokio::time::sleep(Duration::from_secs(3)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_timeout_is_a_submission_failure() {
        let service = Arc::new(ScriptedService::new(vec![(Duration::from_secs(60), Ok(()))]));
        let mut controller = FormController::new(service, Duration::from_secs(1));
        fill(&mut controller, "spicejet", "zz99zz", "das");

        controller.on_submit();
        assert_eq!(controller.resolve_next().await, Some(Phase::Rejected));
        assert_eq!(
            controller.result(),
            Some(&ResultState::failure("Request timed out after 1000ms"))
        );
        assert!(controller.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_airline_is_reported() {
        let mut controller = simulated();
        fill(&mut controller, "vistara", "abc123", "rao");

        assert_eq!(controller.on_submit(), Phase::Pending);
        assert_eq!(controller.resolve_next().await, Some(Phase::Rejected));
        assert_eq!(
            controller.result(),
            Some(&ResultState::failure("Unsupported airline"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_cleared_falls_back_to_default_accent() {
        let mut controller = simulated();
        controller.on_field_change(FieldName::Airline, "indigo");
        assert_eq!(controller.accent(), Airline::Indigo.accent());

        controller.on_field_change(FieldName::Airline, "");
        assert_eq!(controller.selected_airline(), None);
        assert_eq!(controller.accent(), Accent::default());
    }
}
