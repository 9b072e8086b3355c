//! Internal telemetry for the resume engine: tracing setup, component
//! health, and in-memory counters surfaced by the health endpoint.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
