//! Process-lifetime utilities: shutdown signaling, logging setup, and metrics.

pub mod metrics;
pub mod sig_down;
pub mod telemetry;

pub use sig_down::SigDown;
pub use telemetry::Telemetry;
