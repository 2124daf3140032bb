use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::U256;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use super::chain::{ChainError, ChainReader};
use crate::config;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("oracle response has no usable `{0}` field")]
    MissingField(String),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("no gas price oracle answered")]
    Exhausted,
}

#[async_trait]
pub trait GasPriceOracle: Send + Sync {
    async fn gas_price_wei(&self) -> Result<U256, OracleError>;
}

/// JSON gas station: reads `body[gas_parameter] * gwei_factor` as the price in wei.
#[derive(Clone, Debug)]
pub struct HttpGasPriceOracle {
    client: Client,
    url: String,
    gas_parameter: String,
    gwei_factor: f64,
}

impl HttpGasPriceOracle {
    pub fn new(client: Client, url: &str, gas_parameter: &str, gwei_factor: f64) -> Self {
        HttpGasPriceOracle {
            client,
            url: url.to_owned(),
            gas_parameter: gas_parameter.to_owned(),
            gwei_factor,
        }
    }

    /// `None` when no oracle url is configured.
    pub fn from_config(client: Client) -> Option<Self> {
        let url: String = config::try_get("gas_price_oracle_url")?;
        let gas_parameter: String = config::get_or("gas_price_oracle_parameter", "fast".to_owned());
        let gwei_factor: f64 = config::get_or("gas_price_oracle_gwei_factor", 1e9);
        Some(Self::new(client, &url, &gas_parameter, gwei_factor))
    }
}

pub fn price_from_oracle_body(
    body: &Value,
    gas_parameter: &str,
    gwei_factor: f64,
) -> Result<U256, OracleError> {
    let raw = match body.get(gas_parameter) {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    let wei = raw
        .map(|price| (price * gwei_factor).round())
        .filter(|wei| wei.is_finite() && *wei >= 0.0 && *wei <= u128::MAX as f64)
        .ok_or_else(|| OracleError::MissingField(gas_parameter.to_owned()))?;

    Ok(U256::from(wei as u128))
}

#[async_trait]
impl GasPriceOracle for HttpGasPriceOracle {
    async fn gas_price_wei(&self) -> Result<U256, OracleError> {
        let body: Value = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        price_from_oracle_body(&body, &self.gas_parameter, self.gwei_factor)
    }
}

/// The node's own `eth_gasPrice`.
pub struct NodeGasPriceOracle {
    chain: Arc<dyn ChainReader>,
}

impl NodeGasPriceOracle {
    pub fn new(chain: Arc<dyn ChainReader>) -> Self {
        NodeGasPriceOracle { chain }
    }
}

#[async_trait]
impl GasPriceOracle for NodeGasPriceOracle {
    async fn gas_price_wei(&self) -> Result<U256, OracleError> {
        Ok(self.chain.gas_price().await?)
    }
}

/// Asks each oracle in order and returns the first answer.
pub struct FallbackGasPriceOracle {
    oracles: Vec<Arc<dyn GasPriceOracle>>,
}

impl FallbackGasPriceOracle {
    pub fn new(oracles: Vec<Arc<dyn GasPriceOracle>>) -> Self {
        FallbackGasPriceOracle { oracles }
    }
}

#[async_trait]
impl GasPriceOracle for FallbackGasPriceOracle {
    async fn gas_price_wei(&self) -> Result<U256, OracleError> {
        for (idx, oracle) in self.oracles.iter().enumerate() {
            match oracle.gas_price_wei().await {
                Ok(price) => return Ok(price),
                Err(err) => log::warn!("gas price oracle #{} failed: {}", idx, err),
            }
        }
        Err(OracleError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedOracle(Option<u64>);

    #[async_trait]
    impl GasPriceOracle for FixedOracle {
        async fn gas_price_wei(&self) -> Result<U256, OracleError> {
            self.0.map(U256::from).ok_or(OracleError::Exhausted)
        }
    }

    #[test]
    fn reads_numeric_and_string_fields() {
        let body = json!({ "fast": 450, "average": "21.5" });
        // gas station style: tenths of gwei
        assert_eq!(
            price_from_oracle_body(&body, "fast", 1e8).unwrap(),
            U256::from(45_000_000_000u64)
        );
        assert_eq!(
            price_from_oracle_body(&body, "average", 1e9).unwrap(),
            U256::from(21_500_000_000u64)
        );
    }

    #[test]
    fn missing_or_negative_field_is_an_error() {
        let body = json!({ "fast": -1, "slow": null });
        assert!(matches!(
            price_from_oracle_body(&body, "fast", 1e9),
            Err(OracleError::MissingField(_))
        ));
        assert!(price_from_oracle_body(&body, "slow", 1e9).is_err());
        assert!(price_from_oracle_body(&body, "standard", 1e9).is_err());
    }

    #[tokio::test]
    async fn fallback_uses_first_answer() {
        let oracle = FallbackGasPriceOracle::new(vec![
            Arc::new(FixedOracle(None)),
            Arc::new(FixedOracle(Some(7))),
            Arc::new(FixedOracle(Some(9))),
        ]);
        assert_eq!(oracle.gas_price_wei().await.unwrap(), U256::from(7u64));

        let empty = FallbackGasPriceOracle::new(vec![Arc::new(FixedOracle(None))]);
        assert!(matches!(empty.gas_price_wei().await, Err(OracleError::Exhausted)));
    }
}
