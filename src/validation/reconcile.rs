//! Node address reconciliation across minipools.
//!
//! The accepted node address is threaded through the minipool loop as a
//! value: each step consumes the previous state and returns the next one.
//! Nothing is written back to the request until the whole run succeeds.

use crate::{OwnerMode, PreflightError};
use ethers::types::{Address, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    mode: OwnerMode,
    accepted: Option<Address>,
}

impl Reconciliation {
    /// Start a run; a supplied node address switches to verify-only mode
    pub fn new(supplied: Option<Address>) -> Self {
        Self {
            mode: OwnerMode::from_supplied(supplied),
            accepted: supplied,
        }
    }

    pub fn mode(&self) -> OwnerMode {
        self.mode
    }

    pub fn accepted(&self) -> Option<Address> {
        self.accepted
    }

    /// Whether every minipool's node address has to be read
    pub fn reads_every_owner(&self) -> bool {
        self.mode == OwnerMode::Discover
    }

    /// Fold in a node address read in discover mode
    ///
    /// The first one is adopted, every later one must match it exactly.
    pub fn observe(self, pool: Address, found: Address) -> Result<Self, PreflightError> {
        match self.accepted {
            None => Ok(Self {
                accepted: Some(found),
                ..self
            }),
            Some(expected) if expected == found => Ok(self),
            Some(expected) => Err(PreflightError::OwnerMismatch {
                pool,
                expected,
                found,
            }),
        }
    }

    /// Minipools over the balance threshold must belong to the accepted node
    /// address, whatever the mode.
    pub fn confirm_high_balance(
        self,
        pool: Address,
        found: Address,
        balance: U256,
    ) -> Result<Self, PreflightError> {
        match self.accepted {
            Some(expected) if expected != found => Err(PreflightError::OwnerMismatchHighBalance {
                pool,
                expected,
                found,
                balance,
            }),
            Some(_) => Ok(self),
            // discover mode adopts before this point; kept total for direct callers
            None => Ok(Self {
                accepted: Some(found),
                ..self
            }),
        }
    }
}
