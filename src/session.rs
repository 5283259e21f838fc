//! The upload-and-result state machine.
//!
//! A submission cycle moves `Idle -> Processing -> Settled -> Idle`. The
//! settled state carries either the analysis result or a classified
//! failure - never both, and never alongside an in-flight request. The
//! session is the exclusive writer of this state; views only read it.
//!
//! There is no transition from `Processing` back to `Idle` except through
//! a settled state: no mid-flight cancel exists. A fresh submission while
//! one is outstanding is a programming-contract violation (the acquisition
//! surface disables input during `Processing`), reported as an error
//! rather than silently coalesced.

use thiserror::Error;

use crate::candidate::UploadCandidate;
use crate::classify::Failure;
use crate::client::AnalysisClient;
use crate::models::AnalysisResult;

/// Where a settled cycle ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum SettledOutcome {
    /// The service returned a parsed result.
    Result(AnalysisResult),
    /// The exchange failed; exactly one classified message.
    Failure(Failure),
}

/// The three-way lifecycle state driving the presentation layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProcessingState {
    /// Awaiting input; the acquisition surface is active.
    #[default]
    Idle,
    /// One exchange outstanding; acquisition input is rejected.
    Processing,
    /// Terminal for this cycle until the user resets.
    Settled(SettledOutcome),
}

/// Violations of the state-machine contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("a submission is already in flight")]
    AlreadyProcessing,

    #[error("no submission is in flight to settle")]
    NotProcessing,

    #[error("cannot reset while a submission is in flight")]
    ResetWhileProcessing,
}

/// Owner and sole writer of the processing state.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: ProcessingState,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, ProcessingState::Processing)
    }

    /// Whether the acquisition surface should accept new input.
    pub fn accepts_input(&self) -> bool {
        matches!(self.state, ProcessingState::Idle)
    }

    /// The stored result, if the cycle settled successfully.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            ProcessingState::Settled(SettledOutcome::Result(result)) => Some(result),
            _ => None,
        }
    }

    /// The stored failure, if the cycle settled with one.
    pub fn failure(&self) -> Option<&Failure> {
        match &self.state {
            ProcessingState::Settled(SettledOutcome::Failure(failure)) => Some(failure),
            _ => None,
        }
    }

    /// Start a submission cycle, clearing any previous settled outcome.
    pub fn begin(&mut self) -> Result<(), StateError> {
        match self.state {
            ProcessingState::Processing => Err(StateError::AlreadyProcessing),
            _ => {
                self.state = ProcessingState::Processing;
                Ok(())
            }
        }
    }

    /// Settle the outstanding submission with a result.
    pub fn settle_success(&mut self, result: AnalysisResult) -> Result<(), StateError> {
        if !self.is_processing() {
            return Err(StateError::NotProcessing);
        }
        self.state = ProcessingState::Settled(SettledOutcome::Result(result));
        Ok(())
    }

    /// Settle the outstanding submission with a classified failure.
    pub fn settle_failure(&mut self, failure: Failure) -> Result<(), StateError> {
        if !self.is_processing() {
            return Err(StateError::NotProcessing);
        }
        self.state = ProcessingState::Settled(SettledOutcome::Failure(failure));
        Ok(())
    }

    /// User-triggered return to `Idle`, clearing the settled outcome.
    ///
    /// A no-op from `Idle`; illegal while a submission is outstanding.
    pub fn reset(&mut self) -> Result<(), StateError> {
        match self.state {
            ProcessingState::Processing => Err(StateError::ResetWhileProcessing),
            _ => {
                self.state = ProcessingState::Idle;
                Ok(())
            }
        }
    }

    /// Run one complete submission cycle against the service.
    ///
    /// This is the single suspension point of the cycle: the settle is
    /// always applied before this returns, so callers never observe the
    /// surface re-enabled ahead of the outcome.
    pub async fn submit(
        &mut self,
        client: &AnalysisClient,
        candidate: UploadCandidate,
    ) -> Result<&SettledOutcome, StateError> {
        self.begin()?;

        match client.analyze(&candidate).await {
            Ok(result) => self.settle_success(result)?,
            Err(outcome) => self.settle_failure(Failure::classify(&outcome))?,
        }

        match &self.state {
            ProcessingState::Settled(outcome) => Ok(outcome),
            // begin() + settle above make anything else unrepresentable.
            _ => Err(StateError::NotProcessing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FailureKind;

    fn sample_result() -> AnalysisResult {
        serde_json::from_str(r#"{"effective_date": "2024-01-01"}"#).unwrap()
    }

    fn sample_failure() -> Failure {
        Failure {
            kind: FailureKind::Unknown,
            message: "Failed to analyze the document. Please try again.".to_string(),
        }
    }

    #[test]
    fn test_initial_state_is_idle_and_accepts_input() {
        let session = AnalysisSession::new();
        assert_eq!(*session.state(), ProcessingState::Idle);
        assert!(session.accepts_input());
    }

    #[test]
    fn test_full_success_cycle() {
        let mut session = AnalysisSession::new();

        session.begin().unwrap();
        assert!(session.is_processing());
        assert!(!session.accepts_input());

        session.settle_success(sample_result()).unwrap();
        assert!(session.result().is_some());
        assert!(session.failure().is_none());
        assert!(!session.accepts_input());

        session.reset().unwrap();
        assert_eq!(*session.state(), ProcessingState::Idle);
        assert!(session.result().is_none());
    }

    #[test]
    fn test_failure_cycle_clears_on_reset() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        session.settle_failure(sample_failure()).unwrap();

        assert!(session.failure().is_some());
        assert!(session.result().is_none());

        session.reset().unwrap();
        assert!(session.failure().is_none());
        assert!(session.accepts_input());
    }

    #[test]
    fn test_second_begin_while_processing_is_rejected() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        assert_eq!(session.begin(), Err(StateError::AlreadyProcessing));
        // Still processing; the violation does not corrupt the state.
        assert!(session.is_processing());
    }

    #[test]
    fn test_begin_from_settled_clears_previous_outcome() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        session.settle_success(sample_result()).unwrap();

        session.begin().unwrap();
        assert!(session.is_processing());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_settle_without_submission_is_rejected() {
        let mut session = AnalysisSession::new();
        assert_eq!(
            session.settle_success(sample_result()),
            Err(StateError::NotProcessing)
        );
        assert_eq!(
            session.settle_failure(sample_failure()),
            Err(StateError::NotProcessing)
        );
    }

    #[test]
    fn test_no_reset_while_processing() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        assert_eq!(session.reset(), Err(StateError::ResetWhileProcessing));
        assert!(session.is_processing());
    }

    #[test]
    fn test_reset_from_idle_is_a_noop() {
        let mut session = AnalysisSession::new();
        session.reset().unwrap();
        assert_eq!(*session.state(), ProcessingState::Idle);
    }

    #[test]
    fn test_exactly_one_observable_aspect_per_state() {
        let mut session = AnalysisSession::new();
        let observable = |s: &AnalysisSession| {
            [
                s.accepts_input(),
                s.is_processing(),
                s.result().is_some(),
                s.failure().is_some(),
            ]
            .iter()
            .filter(|v| **v)
            .count()
        };

        assert_eq!(observable(&session), 1);
        session.begin().unwrap();
        assert_eq!(observable(&session), 1);
        session.settle_failure(sample_failure()).unwrap();
        assert_eq!(observable(&session), 1);
        session.reset().unwrap();
        assert_eq!(observable(&session), 1);
    }
}
