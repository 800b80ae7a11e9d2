//! This crate checks a batch of Rocket Pool minipools before an automated
//! arbitrage run. It includes modules for data types, chain access, rate
//! limiting, cancellation, validation, and configuration.

pub mod types; // Request, status codes, thresholds and the error type.
pub mod chain; // Read-only chain access: minipool delegate bindings and balances.
pub mod ratelimit; // Pacing of remote reads.
pub mod validation; // Per-minipool checks and node address reconciliation.
pub mod config; // Defines and loads validator configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use validation::PreflightValidator;
