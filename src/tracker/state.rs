//! Reconstruction aggregate state

use std::fmt;

use serde::{Deserialize, Serialize};

use super::recompute::completion_percentage;

/// Overall percentage at which a reconstruction is ready for submission
pub const READINESS_THRESHOLD: u8 = 80;

/// Lifecycle of a reconstruction, derived from its completion counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Initialized,
    InProgress,
    ReadyForSubmission,
    Complete,
}

impl LifecycleStatus {
    /// Nothing completed is `initialized` and everything completed is
    /// `complete`. In between, the rounded percentage decides between
    /// `in_progress` and `ready_for_submission`, so 199 of 200 is ready but
    /// not complete and 1 of 201 is in progress.
    pub fn from_counts(completed: u32, total: u32) -> Self {
        if completed == 0 {
            return LifecycleStatus::Initialized;
        }
        if completed >= total {
            return LifecycleStatus::Complete;
        }
        if completion_percentage(completed, total) >= READINESS_THRESHOLD {
            LifecycleStatus::ReadyForSubmission
        } else {
            LifecycleStatus::InProgress
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Initialized => "initialized",
            LifecycleStatus::InProgress => "in_progress",
            LifecycleStatus::ReadyForSubmission => "ready_for_submission",
            LifecycleStatus::Complete => "complete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "initialized" => Some(LifecycleStatus::Initialized),
            "in_progress" => Some(LifecycleStatus::InProgress),
            "ready_for_submission" => Some(LifecycleStatus::ReadyForSubmission),
            "complete" => Some(LifecycleStatus::Complete),
            _ => None,
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate counts over every category of a reconstruction.
///
/// Always produced by [`aggregate`](super::aggregate) from the full item
/// set; never adjusted in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionState {
    pub total_documents: u32,
    /// Items uploaded or verified
    pub completed_documents: u32,
    pub missing_documents: u32,
    /// Items requested or being processed by a custodian
    pub requested_documents: u32,
    pub rejected_documents: u32,
    /// Missing items obtainable through a records request
    pub outstanding_requestable: u32,
    pub completion_percentage: u8,
    pub ready: bool,
    pub lifecycle: LifecycleStatus,
}

impl ReconstructionState {
    /// State of a reconstruction with no items
    pub fn empty() -> Self {
        Self {
            total_documents: 0,
            completed_documents: 0,
            missing_documents: 0,
            requested_documents: 0,
            rejected_documents: 0,
            outstanding_requestable: 0,
            completion_percentage: 0,
            ready: false,
            lifecycle: LifecycleStatus::Initialized,
        }
    }

    /// Percentage points missing to reach readiness; 0 when ready
    pub fn readiness_shortfall(&self) -> u8 {
        READINESS_THRESHOLD.saturating_sub(self.completion_percentage)
    }

    /// Human-readable gap report, `None` once ready
    pub fn gap_message(&self) -> Option<String> {
        if self.ready {
            return None;
        }
        Some(format!(
            "{}% complete; {} percentage points short of the {}% readiness threshold",
            self.completion_percentage,
            self.readiness_shortfall(),
            READINESS_THRESHOLD
        ))
    }

    /// Outstanding gaps should be escalated to a formal records request
    pub fn should_escalate_gaps(&self) -> bool {
        !self.ready && self.outstanding_requestable > 0
    }
}
