//! Observability for the reconstruction engine
//!
//! - Structured logging through `tracing`; every event carries a stable
//!   [`Event`] name in its `event` field
//! - Monotonic counters in [`MetricsRegistry`]
//!
//! Observability is read-only: nothing here influences engine results.

mod events;
mod logging;
mod metrics;

pub use events::Event;
pub use logging::init_tracing;
pub use metrics::{MetricsRegistry, MetricsSnapshot};
