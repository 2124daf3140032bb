use serde_derive::{Deserialize, Serialize};

/// One page of a paginated client-gateway listing. `next`/`previous` are page URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientGatewayResponse<T> {
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

pub mod error;
pub mod string_or_number;
pub mod transaction;
pub mod tx_parameters;
