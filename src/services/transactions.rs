use std::collections::BTreeMap;
use std::sync::Arc;

use ethers::types::{Address, U256};

use crate::{
    config,
    models::transaction::{Transaction, TransactionSummary},
    repositories::{
        chain::{ChainError, ChainReader},
        gateway::TxServiceClient,
    },
    serialize::{
        error::AppError,
        transaction::{HistoryRes, PaginationRes, QueuedRes, QueuedTransactions, TxDetailsRes},
    },
};

#[derive(Clone)]
pub struct TransactionSrv {
    tx_service: Arc<dyn TxServiceClient>,
    chain: Arc<dyn ChainReader>,
    explorer_url: String,
}

impl TransactionSrv {
    pub fn new(tx_service: Arc<dyn TxServiceClient>, chain: Arc<dyn ChainReader>, explorer_url: &str) -> Self {
        TransactionSrv {
            tx_service,
            chain,
            explorer_url: explorer_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn from_config(tx_service: Arc<dyn TxServiceClient>, chain: Arc<dyn ChainReader>) -> Self {
        let explorer_url: String = config::get("explorer_url");
        Self::new(tx_service, chain, &explorer_url)
    }

    pub async fn history(&self, safe: Address, cursor: Option<&str>) -> Result<HistoryRes, AppError> {
        let page = self.tx_service.history_page(safe, cursor).await?;
        Ok(HistoryRes {
            pagination: PaginationRes::from_page_urls(page.next.as_deref(), page.previous.as_deref()),
            history: group_history(page.results),
        })
    }

    pub async fn queued(&self, safe: Address, cursor: Option<&str>) -> Result<QueuedRes, AppError> {
        let (page, current_nonce) = tokio::join!(
            self.tx_service.queued_page(safe, cursor),
            self.chain.safe_nonce(safe)
        );
        let page = page?;
        let current_nonce = queue_head_nonce(safe, current_nonce);

        Ok(QueuedRes {
            pagination: PaginationRes::from_page_urls(page.next.as_deref(), page.previous.as_deref()),
            queued: split_queue(page.results, current_nonce),
        })
    }

    pub async fn details(&self, tx_id: &str) -> Result<TxDetailsRes, AppError> {
        let details = self.tx_service.tx_details(tx_id).await?;
        let explorer_link = details
            .tx_hash
            .as_deref()
            .map(|hash| explorer_tx_link(&self.explorer_url, hash));
        Ok(TxDetailsRes {
            details,
            explorer_link,
        })
    }
}

/// The on-chain nonce the queue starts at; `None` falls back to the lowest queued nonce.
fn queue_head_nonce(safe: Address, nonce: Result<U256, ChainError>) -> Option<u64> {
    match nonce {
        Ok(nonce) => match u64::try_from(nonce) {
            Ok(nonce) => Some(nonce),
            Err(_) => {
                log::warn!("nonce {} of safe {:?} does not fit u64, using lowest queued nonce", nonce, safe);
                None
            }
        },
        Err(err) => {
            log::warn!("failed to read nonce of safe {:?}, using lowest queued nonce: {}", safe, err);
            None
        }
    }
}

pub fn explorer_tx_link(explorer_url: &str, tx_hash: &str) -> String {
    format!("{}/tx/{}", explorer_url.trim_end_matches('/'), tx_hash)
}

/// Executed transactions keyed by their timestamp.
pub fn group_history(summaries: Vec<TransactionSummary>) -> BTreeMap<i64, Vec<Transaction>> {
    let mut history: BTreeMap<i64, Vec<Transaction>> = BTreeMap::new();
    for summary in summaries {
        history.entry(summary.timestamp).or_default().push(summary.into());
    }
    history
}

/// Splits queued transactions by nonce: the group at `current_nonce` (or the
/// lowest queued nonce when unknown) is `next`, everything else is `queue`.
pub fn split_queue(summaries: Vec<TransactionSummary>, current_nonce: Option<u64>) -> QueuedTransactions {
    let mut by_nonce: BTreeMap<u64, Vec<Transaction>> = BTreeMap::new();
    for summary in summaries {
        match summary.nonce() {
            Some(nonce) => by_nonce.entry(nonce).or_default().push(summary.into()),
            None => log::warn!("queued transaction {} has no execution info", summary.id),
        }
    }

    let next_nonce = current_nonce.or_else(|| by_nonce.keys().next().copied());
    let mut queued = QueuedTransactions::default();
    for (nonce, transactions) in by_nonce {
        if Some(nonce) == next_nonce {
            queued.next.insert(nonce, transactions);
        } else {
            queued.queue.insert(nonce, transactions);
        }
    }
    queued
}
