//! Trigger signal published to the workflow scheduler.

use serde::{Deserialize, Serialize};

use super::action::Action;
use crate::error::Result;

/// The single boolean plus report location a scheduler branches on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSignal {
    pub drift_detected: bool,
    pub report_location: String,
}

/// External collaborator able to start a retraining workflow
pub trait RetrainTrigger {
    /// Start retraining; returns the job ID
    fn trigger(&self, signal: &TriggerSignal) -> Result<String>;
}

/// Callback type for retrain triggers
pub type RetrainCallback = Box<dyn Fn(&TriggerSignal) -> Result<String> + Send + Sync>;

/// Trigger backed by a closure
pub struct CallbackTrigger {
    callback: RetrainCallback,
}

impl CallbackTrigger {
    /// Wrap a closure returning a job ID
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&TriggerSignal) -> Result<String> + Send + Sync + 'static,
    {
        Self { callback: Box::new(callback) }
    }
}

impl RetrainTrigger for CallbackTrigger {
    fn trigger(&self, signal: &TriggerSignal) -> Result<String> {
        (self.callback)(signal)
    }
}

/// Invoke the trigger when the signal reports drift.
///
/// A trigger error is returned to the caller; it never touches the report.
pub fn dispatch(signal: &TriggerSignal, trigger: &dyn RetrainTrigger) -> Result<Action> {
    if !signal.drift_detected {
        tracing::info!(report = %signal.report_location, "no drift, retraining skipped");
        return Ok(Action::Skip);
    }
    let job_id = trigger.trigger(signal)?;
    tracing::info!(report = %signal.report_location, %job_id, "retraining triggered");
    Ok(Action::RetrainTriggered(job_id))
}
