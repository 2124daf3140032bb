//! Canned readers for service and handler tests.

use async_trait::async_trait;
use ethers::types::{Address, U256};

use super::{
    chain::{CallRequest, ChainError, ChainReader},
    gateway::{GatewayError, LastTx, TxServiceClient},
};
use crate::{
    models::{
        transaction::{Creation, TransactionInfo, TransactionStatus, TransactionSummary},
        tx_details::{DetailedExecutionInfo, ExpandedTxDetails},
    },
    serialize::ClientGatewayResponse,
};

pub const KNOWN_TX_ID: &str = "multisig_0x5a_0x01";

#[derive(Debug, Clone, Default)]
pub struct StaticChain {
    pub tx_count: Option<u64>,
    pub safe_nonce: Option<u64>,
    pub gas_estimate: Option<u64>,
    pub gas_price: Option<u64>,
}

fn answer(value: Option<u64>, what: &str) -> Result<U256, ChainError> {
    value
        .map(U256::from)
        .ok_or_else(|| ChainError::Contract(format!("no {} configured", what)))
}

#[async_trait]
impl ChainReader for StaticChain {
    async fn transaction_count(&self, _address: Address) -> Result<U256, ChainError> {
        answer(self.tx_count, "transaction count")
    }

    async fn safe_nonce(&self, _safe: Address) -> Result<U256, ChainError> {
        answer(self.safe_nonce, "safe nonce")
    }

    async fn estimate_gas(&self, _call: &CallRequest) -> Result<U256, ChainError> {
        answer(self.gas_estimate, "gas estimate")
    }

    async fn gas_price(&self) -> Result<U256, ChainError> {
        answer(self.gas_price, "gas price")
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticTxService {
    pub last_nonce: Option<u64>,
    pub history: Vec<TransactionSummary>,
    pub queued: Vec<TransactionSummary>,
}

fn page(results: Vec<TransactionSummary>, path: &str) -> ClientGatewayResponse<TransactionSummary> {
    ClientGatewayResponse {
        next: Some(format!(
            "https://gateway.example/v1/safes/0x5a/transactions/{}?cursor=limit%3D20%26offset%3D20",
            path
        )),
        previous: None,
        results,
    }
}

#[async_trait]
impl TxServiceClient for StaticTxService {
    async fn last_tx(&self, _safe: Address) -> Result<Option<LastTx>, GatewayError> {
        Ok(self.last_nonce.map(|nonce| LastTx { nonce }))
    }

    async fn history_page(
        &self,
        _safe: Address,
        _cursor: Option<&str>,
    ) -> Result<ClientGatewayResponse<TransactionSummary>, GatewayError> {
        Ok(page(self.history.clone(), "history"))
    }

    async fn queued_page(
        &self,
        _safe: Address,
        _cursor: Option<&str>,
    ) -> Result<ClientGatewayResponse<TransactionSummary>, GatewayError> {
        Ok(page(self.queued.clone(), "queued"))
    }

    async fn tx_details(&self, tx_id: &str) -> Result<ExpandedTxDetails, GatewayError> {
        if tx_id != KNOWN_TX_ID {
            return Err(GatewayError::NotFound("transaction".to_owned()));
        }
        Ok(ExpandedTxDetails {
            executed_at: Some(1_607_000_000_000),
            tx_status: TransactionStatus::Success,
            tx_info: TransactionInfo::Creation(Creation {
                creator: "0xcreator".to_owned(),
                transaction_hash: "0xexecuted".to_owned(),
                master_copy: None,
                factory: None,
            }),
            tx_data: None,
            detailed_execution_info: Some(DetailedExecutionInfo::Module {
                address: "0xmodule".to_owned(),
            }),
            tx_hash: Some("0xexecuted".to_owned()),
        })
    }
}
