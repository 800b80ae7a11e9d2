use async_trait::async_trait;
use ethers::types::{Address, U256};
use thiserror::Error;

/// Errors raised by the chain client
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    #[error("no contract can be bound at {0:?}")]
    InvalidAddress(Address),

    #[error("contract call failed: {0}")]
    Contract(String),

    #[error("provider request failed: {0}")]
    Provider(String),
}

/// Read-only access to the chain
/// 
/// Implementations are shared and externally synchronized; the validator only
/// issues reads and never holds a lock across them.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Typed reader over one minipool delegate contract
    type Minipool: MinipoolReader;

    /// Bind a reader to the minipool contract at `address`
    fn bind_minipool(&self, address: Address) -> Result<Self::Minipool, ChainError>;

    /// Current balance of any account, in wei
    async fn balance_of(&self, address: Address) -> Result<U256, ChainError>;
}

/// Field reads on a bound minipool delegate
#[async_trait]
pub trait MinipoolReader: Send + Sync {
    async fn version(&self) -> Result<u8, ChainError>;

    async fn status(&self) -> Result<u8, ChainError>;

    async fn node_address(&self) -> Result<Address, ChainError>;
}
