//! Actions taken after a drift verdict.

/// Action taken by the retraining trigger
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// No drift: retraining skipped
    Skip,
    /// Retraining was triggered with given job ID
    RetrainTriggered(String),
}

impl Action {
    /// Branch name a workflow scheduler would follow
    pub fn branch(&self) -> &'static str {
        match self {
            Action::Skip => "skip_retraining",
            Action::RetrainTriggered(_) => "trigger_retraining",
        }
    }
}
