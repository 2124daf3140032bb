use std::collections::BTreeMap;

use reqwest::Url;
use serde_derive::{Deserialize, Serialize};

use crate::models::{transaction::Transaction, tx_details::ExpandedTxDetails};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CursorQuery {
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct PaginationRes {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PaginationRes {
    /// Re-exposes gateway page URLs as their opaque `cursor` values.
    pub fn from_page_urls(next: Option<&str>, previous: Option<&str>) -> Self {
        PaginationRes {
            next: next.and_then(cursor_of),
            previous: previous.and_then(cursor_of),
        }
    }
}

fn cursor_of(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    let cursor = url
        .query_pairs()
        .find(|(key, _)| key == "cursor")
        .map(|(_, value)| value.into_owned());
    cursor
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct HistoryRes {
    /// Executed transactions keyed by timestamp.
    pub history: BTreeMap<i64, Vec<Transaction>>,
    pub pagination: PaginationRes,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct QueuedTransactions {
    /// Transactions competing for the Safe's current nonce.
    pub next: BTreeMap<u64, Vec<Transaction>>,
    pub queue: BTreeMap<u64, Vec<Transaction>>,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct QueuedRes {
    #[serde(flatten)]
    pub queued: QueuedTransactions,
    pub pagination: PaginationRes,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TxDetailsRes {
    #[serde(flatten)]
    pub details: ExpandedTxDetails,
    pub explorer_link: Option<String>,
}
