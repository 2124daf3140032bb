use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

pub mod chain;
pub mod gas_oracle;
pub mod gateway;

/// Shared HTTP client for the indexing backends and the gas oracle.
pub static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(15))
        .user_agent(concat!("safe-tx-params-api/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
});

#[cfg(test)]
pub mod testing;
