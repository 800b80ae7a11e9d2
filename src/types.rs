use crate::chain::ChainError;
use ethers::types::{Address, I256, U256};
use ethers::utils::WEI_IN_ETHER;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest accepted priority-fee tip override, in wei (5 gwei).
///
/// Anything above this is almost certainly a gwei/wei mix-up.
pub const MAX_TIP_WEI: i64 = 5_000_000_000;

/// The only minipool delegate version the arbitrage flow understands.
pub const SUPPORTED_DELEGATE_VERSION: u8 = 3;

/// Balance above which a minipool must be finalized by its node operator.
pub fn high_balance_threshold() -> U256 {
    WEI_IN_ETHER * U256::from(8u64)
}

/// Minipool lifecycle codes as reported by `getStatus()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MinipoolStatus {
    Initialised = 0,
    Prelaunch = 1,
    Staking = 2,
    Withdrawable = 3,
    Dissolved = 4,
}

impl MinipoolStatus {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Initialised),
            1 => Some(Self::Prelaunch),
            2 => Some(Self::Staking),
            3 => Some(Self::Withdrawable),
            4 => Some(Self::Dissolved),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Input to a pre-flight validation run.
///
/// `node_address` is the only field the validator writes, and only when the
/// run succeeds.
#[derive(Debug, Clone, Default)]
pub struct ValidationRequest {
    /// Node operator address; `None` means discover it from the first minipool
    pub node_address: Option<Address>,
    /// Priority-fee tip override in wei; `None` means use the default tip
    pub tip_override: Option<I256>,
    /// Minipools to check, in order
    pub minipools: Vec<Address>,
    /// Delay inserted after every successful remote read; when non-zero it
    /// replaces the validator's own rate limiter for this run
    pub rate_limit_ms: u64,
}

/// How the validator treats node addresses for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerMode {
    /// No node address supplied: adopt the first minipool's and hold every other one to it
    Discover,
    /// Node address supplied: only minipools over the balance threshold are checked against it
    VerifyOnly,
}

impl OwnerMode {
    pub fn for_request(request: &ValidationRequest) -> Self {
        Self::from_supplied(request.node_address)
    }

    pub fn from_supplied(node_address: Option<Address>) -> Self {
        match node_address {
            Some(_) => OwnerMode::VerifyOnly,
            None => OwnerMode::Discover,
        }
    }
}

/// Minipool field a remote read was fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinipoolField {
    Version,
    Status,
    NodeAddress,
    Balance,
}

impl std::fmt::Display for MinipoolField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MinipoolField::Version => write!(f, "version"),
            MinipoolField::Status => write!(f, "status"),
            MinipoolField::NodeAddress => write!(f, "node address"),
            MinipoolField::Balance => write!(f, "balance"),
        }
    }
}

/// Pre-flight validation errors
///
/// Every per-minipool variant names the offending minipool. The first
/// error aborts the whole run.
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("tip cannot be negative: {tip}")]
    InvalidTip { tip: I256 },

    #[error("tip {tip} is too high, the limit is {max} wei")]
    TipTooHigh { tip: I256, max: i64 },

    #[error("{pool:?}: failed to create minipool instance")]
    Binding {
        pool: Address,
        #[source]
        source: ChainError,
    },

    #[error("{pool:?}: failed to get minipool {field}")]
    ReadFailed {
        pool: Address,
        field: MinipoolField,
        #[source]
        source: ChainError,
    },

    #[error("{pool:?}: only minipool V3 is supported, found V{version}")]
    UnsupportedVersion { pool: Address, version: u8 },

    #[error("{pool:?}: minipool is not staking (status {status})")]
    NotEligibleStatus { pool: Address, status: u8 },

    #[error("{pool:?}: node address does not match, expected {expected:?}, found {found:?}")]
    OwnerMismatch {
        pool: Address,
        expected: Address,
        found: Address,
    },

    #[error(
        "{pool:?}: node address does not match, expected {expected:?}, found {found:?}. \
         Minipools with over 8 ETH ({balance} wei) need to be finalized from the node operator address"
    )]
    OwnerMismatchHighBalance {
        pool: Address,
        expected: Address,
        found: Address,
        balance: U256,
    },

    #[error("validation cancelled")]
    Cancelled,
}

impl PreflightError {
    /// The minipool this error is about, if any
    pub fn minipool(&self) -> Option<Address> {
        match self {
            PreflightError::Binding { pool, .. }
            | PreflightError::ReadFailed { pool, .. }
            | PreflightError::UnsupportedVersion { pool, .. }
            | PreflightError::NotEligibleStatus { pool, .. }
            | PreflightError::OwnerMismatch { pool, .. }
            | PreflightError::OwnerMismatchHighBalance { pool, .. } => Some(*pool),
            PreflightError::InvalidTip { .. }
            | PreflightError::TipTooHigh { .. }
            | PreflightError::Cancelled => None,
        }
    }
}

/// Summary of a successful run, printed by the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightSummary {
    pub node_address: Option<Address>,
    pub mode: OwnerMode,
    pub minipools_checked: usize,
}
