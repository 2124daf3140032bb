use std::sync::Arc;

use ethers::types::{Address, Bytes, U256};

use crate::{
    models::tx_parameters::{ParametersStatus, TxParameters},
    repositories::{chain::ChainReader, gateway::TxServiceClient},
};

use super::{
    gas_estimation::{EstimationRequest, GasEstimator},
    resolver::{ResolverInputs, TxParametersResolver},
};

/// Caller-provided values that take precedence over anything derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOverrides {
    pub safe_nonce: Option<String>,
    pub safe_tx_gas: Option<String>,
    pub eth_nonce: Option<String>,
    pub eth_gas_limit: Option<String>,
    pub eth_gas_price: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    pub wallet: Option<Address>,
    pub safe: Address,
    pub status: ParametersStatus,
    pub calculate_safe_nonce: bool,
    pub to: Option<Address>,
    pub value: Option<U256>,
    pub data: Option<Bytes>,
    pub exec_data: Option<Bytes>,
    pub overrides: ParameterOverrides,
}

#[derive(Clone)]
pub struct TxParametersSrv {
    chain: Arc<dyn ChainReader>,
    tx_service: Arc<dyn TxServiceClient>,
    estimator: Arc<GasEstimator>,
}

impl TxParametersSrv {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        tx_service: Arc<dyn TxServiceClient>,
        estimator: Arc<GasEstimator>,
    ) -> Self {
        TxParametersSrv {
            chain,
            tx_service,
            estimator,
        }
    }

    /// One resolver session: overrides first, then derivations and gas
    /// estimation side by side.
    pub async fn resolve(&self, req: ResolveRequest) -> TxParameters {
        let resolver = TxParametersResolver::new(self.chain.clone(), self.tx_service.clone(), req.status);
        apply_overrides(&resolver, &req.overrides);

        let inputs = ResolverInputs {
            connected_wallet: req.wallet,
            safe_address: Some(req.safe),
            calculate_safe_nonce: req.calculate_safe_nonce,
        };
        let estimation_req = EstimationRequest {
            wallet: req.wallet,
            safe: Some(req.safe),
            to: req.to,
            value: req.value,
            data: req.data.clone(),
            exec_data: req.exec_data.clone(),
        };

        let (_, estimation) = tokio::join!(
            resolver.update_inputs(inputs),
            self.estimator.estimate(&estimation_req, req.status)
        );
        resolver.apply_gas_estimation(&estimation);

        let params = resolver.parameters();
        log::info!(
            "resolved parameters for safe {:?} (mode {:?}, complete: {})",
            req.safe,
            req.status,
            params.is_complete()
        );
        params
    }
}

fn apply_overrides(resolver: &TxParametersResolver, overrides: &ParameterOverrides) {
    if let Some(value) = &overrides.safe_nonce {
        resolver.set_safe_nonce(Some(value.clone()));
    }
    if let Some(value) = &overrides.safe_tx_gas {
        resolver.set_safe_tx_gas(Some(value.clone()));
    }
    if let Some(value) = &overrides.eth_nonce {
        resolver.set_eth_nonce(Some(value.clone()));
    }
    if let Some(value) = &overrides.eth_gas_limit {
        resolver.set_eth_gas_limit(Some(value.clone()));
    }
    if let Some(value) = &overrides.eth_gas_price {
        resolver.set_eth_gas_price(Some(value.clone()));
    }
}
