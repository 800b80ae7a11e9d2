//! Ethers-backed chain client
//! 
//! Binds the Rocket Pool minipool delegate ABI with `abigen!` and reads
//! balances straight from the middleware.

use super::{ChainClient, ChainError, MinipoolReader};
use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::providers::Middleware;
use ethers::types::{Address, U256};
use std::sync::Arc;
use tracing::trace;

abigen!(
    MinipoolDelegate,
    r#"[
        function version() external view returns (uint8)
        function getStatus() external view returns (uint8)
        function getNodeAddress() external view returns (address)
    ]"#
);

/// Chain client over any ethers middleware (HTTP, WS, signer stacks...)
pub struct EthersChainClient<M> {
    provider: Arc<M>,
}

impl<M: Middleware + 'static> EthersChainClient<M> {
    /// Creates a client over a shared middleware handle
    /// 
    /// # Arguments
    /// * `provider` - Connected middleware, e.g. `Provider<Http>`
    pub fn new(provider: Arc<M>) -> Self {
        Self { provider }
    }
}

impl<M> Clone for EthersChainClient<M> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

#[async_trait]
impl<M: Middleware + 'static> ChainClient for EthersChainClient<M> {
    type Minipool = EthersMinipool<M>;

    fn bind_minipool(&self, address: Address) -> Result<Self::Minipool, ChainError> {
        // calls against the zero address succeed with empty data and decode to garbage
        if address.is_zero() {
            return Err(ChainError::InvalidAddress(address));
        }
        Ok(EthersMinipool {
            contract: MinipoolDelegate::new(address, self.provider.clone()),
        })
    }

    async fn balance_of(&self, address: Address) -> Result<U256, ChainError> {
        trace!("eth_getBalance {:?}", address);
        self.provider
            .get_balance(address, None)
            .await
            .map_err(|e| ChainError::Provider(e.to_string()))
    }
}

/// Minipool delegate reader backed by the generated binding
pub struct EthersMinipool<M> {
    contract: MinipoolDelegate<M>,
}

#[async_trait]
impl<M: Middleware + 'static> MinipoolReader for EthersMinipool<M> {
    async fn version(&self) -> Result<u8, ChainError> {
        self.contract
            .version()
            .call()
            .await
            .map_err(|e| ChainError::Contract(e.to_string()))
    }

    async fn status(&self) -> Result<u8, ChainError> {
        self.contract
            .get_status()
            .call()
            .await
            .map_err(|e| ChainError::Contract(e.to_string()))
    }

    async fn node_address(&self) -> Result<Address, ChainError> {
        self.contract
            .get_node_address()
            .call()
            .await
            .map_err(|e| ChainError::Contract(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::providers::{MockProvider, Provider};

    fn client() -> EthersChainClient<Provider<MockProvider>> {
        let (provider, _mock) = Provider::mocked();
        EthersChainClient::new(Arc::new(provider))
    }

    #[test]
    fn test_binding_zero_address_fails() {
        let result = client().bind_minipool(Address::zero());
        assert!(matches!(result, Err(ChainError::InvalidAddress(a)) if a.is_zero()));
    }

    #[test]
    fn test_binding_real_address_succeeds() {
        assert!(client().bind_minipool(Address::repeat_byte(0x11)).is_ok());
    }

    #[tokio::test]
    async fn test_balance_is_read_from_provider() {
        let (provider, mock) = Provider::mocked();
        mock.push(U256::from(42u64)).unwrap();
        let client = EthersChainClient::new(Arc::new(provider));

        let balance = client.balance_of(Address::repeat_byte(0x22)).await.unwrap();
        assert_eq!(balance, U256::from(42u64));
    }

    #[tokio::test]
    async fn test_balance_error_maps_to_provider_error() {
        // nothing queued: the mock transport errors
        let result = client().balance_of(Address::repeat_byte(0x22)).await;
        assert!(matches!(result, Err(ChainError::Provider(_))));
    }
}
