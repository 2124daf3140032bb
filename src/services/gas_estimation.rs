use std::sync::Arc;

use ethers::{
    types::{Address, Bytes, U256},
    utils::format_units,
};

use crate::{
    models::tx_parameters::ParametersStatus,
    repositories::{
        chain::{CallRequest, ChainReader},
        gas_oracle::GasPriceOracle,
    },
};

/// Values an estimation round hands to the resolver. Gas price is in gwei.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GasEstimation {
    pub eth_gas_price: Option<String>,
    pub eth_gas_limit: Option<String>,
    pub safe_tx_gas: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EstimationRequest {
    pub wallet: Option<Address>,
    pub safe: Option<Address>,
    /// Inner call executed by the Safe.
    pub to: Option<Address>,
    pub value: Option<U256>,
    pub data: Option<Bytes>,
    /// Outer `execTransaction` calldata sent by the wallet to the Safe.
    pub exec_data: Option<Bytes>,
}

pub struct GasEstimator {
    chain: Arc<dyn ChainReader>,
    oracle: Arc<dyn GasPriceOracle>,
}

impl GasEstimator {
    pub fn new(chain: Arc<dyn ChainReader>, oracle: Arc<dyn GasPriceOracle>) -> Self {
        GasEstimator { chain, oracle }
    }

    pub async fn estimate(&self, req: &EstimationRequest, status: ParametersStatus) -> GasEstimation {
        let (eth_gas_price, eth_gas_limit, safe_tx_gas) = tokio::join!(
            self.gas_price_gwei(),
            self.eth_gas_limit(req),
            self.safe_tx_gas(req, status)
        );
        GasEstimation {
            eth_gas_price,
            eth_gas_limit,
            safe_tx_gas,
        }
    }

    async fn gas_price_gwei(&self) -> Option<String> {
        match self.oracle.gas_price_wei().await {
            Ok(wei) => wei_to_gwei(wei),
            Err(err) => {
                log::warn!("gas price estimation failed: {}", err);
                None
            }
        }
    }

    async fn eth_gas_limit(&self, req: &EstimationRequest) -> Option<String> {
        let (wallet, safe, exec_data) = match (req.wallet, req.safe, &req.exec_data) {
            (Some(wallet), Some(safe), Some(exec_data)) => (wallet, safe, exec_data.clone()),
            _ => return None,
        };
        let call = CallRequest {
            from: Some(wallet),
            to: safe,
            value: None,
            data: Some(exec_data),
        };
        self.estimate_call(&call, "eth gas limit").await
    }

    async fn safe_tx_gas(&self, req: &EstimationRequest, status: ParametersStatus) -> Option<String> {
        if status.is_cancel() {
            return Some("0".to_owned());
        }
        let (safe, to) = match (req.safe, req.to) {
            (Some(safe), Some(to)) => (safe, to),
            _ => return None,
        };
        let call = CallRequest {
            from: Some(safe),
            to,
            value: req.value,
            data: req.data.clone(),
        };
        self.estimate_call(&call, "safe tx gas").await
    }

    async fn estimate_call(&self, call: &CallRequest, what: &str) -> Option<String> {
        match self.chain.estimate_gas(call).await {
            Ok(gas) => Some(gas.to_string()),
            Err(err) => {
                log::warn!("{} estimation failed for call to {:?}: {}", what, call.to, err);
                None
            }
        }
    }
}

/// Formats a wei amount in gwei without trailing zeros, e.g. `1.5`.
pub fn wei_to_gwei(wei: U256) -> Option<String> {
    let formatted = format_units(wei, "gwei").ok()?;
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    Some(trimmed.to_owned())
}
