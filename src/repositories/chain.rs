use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    contract::abigen,
    providers::{Http, Middleware, Provider, ProviderError},
    types::{transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest, U256},
};
use thiserror::Error;

use crate::config;

abigen!(
    GnosisSafe,
    r#"[
        function nonce() external view returns (uint256)
    ]"#
);

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid rpc url `{0}`")]
    InvalidUrl(String),
    #[error("rpc request failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("contract call failed: {0}")]
    Contract(String),
}

/// A read-only call used for gas estimation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub value: Option<U256>,
    pub data: Option<Bytes>,
}

impl From<&CallRequest> for TypedTransaction {
    fn from(call: &CallRequest) -> Self {
        let mut tx = TransactionRequest::new().to(call.to);
        if let Some(from) = call.from {
            tx = tx.from(from);
        }
        if let Some(value) = call.value {
            tx = tx.value(value);
        }
        if let Some(data) = &call.data {
            tx = tx.data(data.clone());
        }
        tx.into()
    }
}

/// Read access to the blockchain node.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Number of transactions sent from `address`, i.e. its next account nonce.
    async fn transaction_count(&self, address: Address) -> Result<U256, ChainError>;

    /// Nonce stored in the Safe contract at `safe`.
    async fn safe_nonce(&self, safe: Address) -> Result<U256, ChainError>;

    async fn estimate_gas(&self, call: &CallRequest) -> Result<U256, ChainError>;

    async fn gas_price(&self) -> Result<U256, ChainError>;
}

#[derive(Clone, Debug)]
pub struct EthRpcChain {
    provider: Arc<Provider<Http>>,
}

impl EthRpcChain {
    pub fn new(rpc_url: &str) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|_| ChainError::InvalidUrl(rpc_url.to_owned()))?;
        Ok(EthRpcChain {
            provider: Arc::new(provider),
        })
    }

    pub fn from_config() -> Result<Self, ChainError> {
        let rpc_url: String = config::get("rpc_url");
        Self::new(&rpc_url)
    }
}

#[async_trait]
impl ChainReader for EthRpcChain {
    async fn transaction_count(&self, address: Address) -> Result<U256, ChainError> {
        Ok(self.provider.get_transaction_count(address, None).await?)
    }

    async fn safe_nonce(&self, safe: Address) -> Result<U256, ChainError> {
        GnosisSafe::new(safe, self.provider.clone())
            .nonce()
            .call()
            .await
            .map_err(|err| ChainError::Contract(err.to_string()))
    }

    async fn estimate_gas(&self, call: &CallRequest) -> Result<U256, ChainError> {
        let tx: TypedTransaction = call.into();
        Ok(self.provider.estimate_gas(&tx, None).await?)
    }

    async fn gas_price(&self) -> Result<U256, ChainError> {
        Ok(self.provider.get_gas_price().await?)
    }
}
