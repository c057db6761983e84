//! Retraining trigger
//!
//! Turns a drift report into the boolean verdict a workflow scheduler
//! consumes, and hands that verdict to whatever starts retraining.

mod action;
mod policy;
mod trigger;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use policy::{QualityTrigger, Verdict, VerdictPolicy};
pub use trigger::{dispatch, CallbackTrigger, RetrainCallback, RetrainTrigger, TriggerSignal};
