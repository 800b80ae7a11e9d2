//! Pre-flight Validation Module
//! 
//! This module checks a batch of minipools before the arbitrage flow runs.
//! Performs tip bounds checking, delegate version and status checks, and
//! node address reconciliation across all minipools.

mod checks;
mod reconcile;
mod validator;


pub use checks::{check_status, check_tip, check_version, CheckOutcome};
pub use reconcile::Reconciliation;
pub use validator::PreflightValidator;
