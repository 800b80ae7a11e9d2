//! Stateless checks and the outcome type every remote step reports through.

use crate::chain::ChainError;
use crate::{MAX_TIP_WEI, MinipoolField, MinipoolStatus, PreflightError, SUPPORTED_DELEGATE_VERSION};
use ethers::types::{Address, I256};
use tracing::warn;

/// Result of one check step on one minipool
#[derive(Debug)]
pub enum CheckOutcome<T> {
    /// Check passed, carry the value on
    Pass(T),
    /// Advisory check could not run; skip the rest of this minipool
    SoftFail {
        field: MinipoolField,
        source: ChainError,
    },
    /// Abort the whole run
    HardFail(PreflightError),
}

impl<T> CheckOutcome<T> {
    /// Wrap a result whose failure must abort the run
    pub fn hard<E>(result: Result<T, E>, on_err: impl FnOnce(E) -> PreflightError) -> Self {
        match result {
            Ok(value) => CheckOutcome::Pass(value),
            Err(e) => CheckOutcome::HardFail(on_err(e)),
        }
    }

    /// Wrap a result whose failure only skips the remaining checks of this minipool
    pub fn soft(result: Result<T, ChainError>, field: MinipoolField) -> Self {
        match result {
            Ok(value) => CheckOutcome::Pass(value),
            Err(source) => CheckOutcome::SoftFail { field, source },
        }
    }

    /// Decide between continue, skip and abort
    ///
    /// * `Ok(Some(value))` - keep checking this minipool
    /// * `Ok(None)` - soft failure, already logged; move on to the next minipool
    /// * `Err` - abort the run
    pub fn resolve(self, pool: Address) -> Result<Option<T>, PreflightError> {
        match self {
            CheckOutcome::Pass(value) => Ok(Some(value)),
            CheckOutcome::SoftFail { field, source } => {
                warn!(minipool = ?pool, error = %source, "failed to get minipool {field}, skipping remaining checks");
                Ok(None)
            }
            CheckOutcome::HardFail(e) => Err(e),
        }
    }

    /// Dispatch for steps that must pass
    ///
    /// A soft failure reaching a mandatory step is escalated to `ReadFailed`
    /// instead of silently skipping the minipool.
    pub fn resolve_hard(self, pool: Address) -> Result<T, PreflightError> {
        match self {
            CheckOutcome::Pass(value) => Ok(value),
            CheckOutcome::SoftFail { field, source } => {
                Err(PreflightError::ReadFailed { pool, field, source })
            }
            CheckOutcome::HardFail(e) => Err(e),
        }
    }
}

/// Tip override must lie in `[0, MAX_TIP_WEI]`
pub fn check_tip(tip: Option<&I256>) -> Result<(), PreflightError> {
    let Some(tip) = tip else {
        return Ok(());
    };
    if tip.is_negative() {
        return Err(PreflightError::InvalidTip { tip: *tip });
    }
    // guards against gwei being passed where wei is expected
    if *tip > I256::from(MAX_TIP_WEI) {
        return Err(PreflightError::TipTooHigh {
            tip: *tip,
            max: MAX_TIP_WEI,
        });
    }
    Ok(())
}

pub fn check_version(pool: Address, version: u8) -> Result<(), PreflightError> {
    if version != SUPPORTED_DELEGATE_VERSION {
        return Err(PreflightError::UnsupportedVersion { pool, version });
    }
    Ok(())
}

pub fn check_status(pool: Address, status: u8) -> Result<(), PreflightError> {
    if MinipoolStatus::from_code(status) != Some(MinipoolStatus::Staking) {
        return Err(PreflightError::NotEligibleStatus { pool, status });
    }
    Ok(())
}
