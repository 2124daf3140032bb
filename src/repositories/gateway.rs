use async_trait::async_trait;
use ethers::{types::Address, utils::to_checksum};
use reqwest::{header, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use thiserror::Error;

use crate::{
    config,
    models::{transaction::TransactionSummary, tx_details::ExpandedTxDetails},
    serialize::ClientGatewayResponse,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

/// The only field of a transaction-service entry the resolver reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LastTx {
    pub nonce: u64,
}

#[derive(Debug, Deserialize)]
struct LastTxPage {
    results: Vec<LastTx>,
}

/// Indexing backends: the transaction service and the client gateway in front of it.
#[async_trait]
pub trait TxServiceClient: Send + Sync {
    /// Most recent multisig transaction known for `safe`, by nonce.
    async fn last_tx(&self, safe: Address) -> Result<Option<LastTx>, GatewayError>;

    async fn history_page(
        &self,
        safe: Address,
        cursor: Option<&str>,
    ) -> Result<ClientGatewayResponse<TransactionSummary>, GatewayError>;

    async fn queued_page(
        &self,
        safe: Address,
        cursor: Option<&str>,
    ) -> Result<ClientGatewayResponse<TransactionSummary>, GatewayError>;

    async fn tx_details(&self, tx_id: &str) -> Result<ExpandedTxDetails, GatewayError>;
}

#[derive(Clone, Debug)]
pub struct GatewayClient {
    client: Client,
    tx_service_url: String,
    client_gateway_url: String,
}

impl GatewayClient {
    pub fn new(client: Client, tx_service_url: &str, client_gateway_url: &str) -> Self {
        GatewayClient {
            client,
            tx_service_url: tx_service_url.trim_end_matches('/').to_owned(),
            client_gateway_url: client_gateway_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn from_config(client: Client) -> Self {
        let tx_service_url: String = config::get("tx_service_url");
        let client_gateway_url: String = config::get("client_gateway_url");
        Self::new(client, &tx_service_url, &client_gateway_url)
    }

    fn safe_url(&self, safe: Address, path: &str) -> Result<Url, GatewayError> {
        let raw = format!(
            "{}/v1/safes/{}/{}",
            self.client_gateway_url,
            to_checksum(&safe, None),
            path
        );
        Url::parse(&raw).map_err(|err| GatewayError::InvalidUrl(format!("{}: {}", raw, err)))
    }

    async fn transactions_page(
        &self,
        safe: Address,
        path: &str,
        cursor: Option<&str>,
    ) -> Result<ClientGatewayResponse<TransactionSummary>, GatewayError> {
        let mut url = self.safe_url(safe, path)?;
        if let Some(cursor) = cursor {
            url.query_pairs_mut().append_pair("cursor", cursor);
        }
        self.get_json(url, "safe").await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, GatewayError> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound(what.to_owned())),
            status if !status.is_success() => Err(GatewayError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            _ => Ok(response.json::<T>().await?),
        }
    }
}

#[async_trait]
impl TxServiceClient for GatewayClient {
    async fn last_tx(&self, safe: Address) -> Result<Option<LastTx>, GatewayError> {
        let raw = format!(
            "{}/safes/{}/multisig-transactions/",
            self.tx_service_url,
            to_checksum(&safe, None)
        );
        let url = Url::parse_with_params(&raw, &[("limit", "1"), ("ordering", "-nonce")])
            .map_err(|err| GatewayError::InvalidUrl(format!("{}: {}", raw, err)))?;

        let page: LastTxPage = self.get_json(url, "safe").await?;
        Ok(page.results.into_iter().next())
    }

    async fn history_page(
        &self,
        safe: Address,
        cursor: Option<&str>,
    ) -> Result<ClientGatewayResponse<TransactionSummary>, GatewayError> {
        self.transactions_page(safe, "transactions/history", cursor).await
    }

    async fn queued_page(
        &self,
        safe: Address,
        cursor: Option<&str>,
    ) -> Result<ClientGatewayResponse<TransactionSummary>, GatewayError> {
        self.transactions_page(safe, "transactions/queued", cursor).await
    }

    async fn tx_details(&self, tx_id: &str) -> Result<ExpandedTxDetails, GatewayError> {
        let mut url = Url::parse(&format!("{}/v1/transactions/", self.client_gateway_url))
            .map_err(|err| GatewayError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.client_gateway_url.clone()))?
            .pop_if_empty()
            .push(tx_id);
        self.get_json(url, "transaction").await
    }
}
