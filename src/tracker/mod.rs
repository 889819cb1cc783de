//! Completion tracker
//!
//! Two-level completion state: per-category counters and the
//! reconstruction aggregate.
//!
//! # Invariants
//!
//! - A category's `total_items` equals the number of its items
//! - A category's `completed_items` equals its items that are uploaded or
//!   verified
//! - Reconstruction totals equal the sums over all categories
//!
//! Every mutation recomputes both levels from item state.

mod recompute;
mod state;

pub use recompute::{aggregate, completion_percentage, recompute_all, recompute_category};
pub use state::{LifecycleStatus, ReconstructionState, READINESS_THRESHOLD};
