use std::sync::Arc;

use ethers::{
    types::{Address, U256},
    utils::parse_units,
};
use parking_lot::Mutex;

use crate::{
    models::tx_parameters::{ParametersStatus, TxParameters},
    repositories::{chain::ChainReader, gateway::TxServiceClient},
};

use super::gas_estimation::GasEstimation;

/// One resolver field. Once the caller sets a value it is never derived again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Slot {
    #[default]
    Unset,
    Derived(String),
    Overridden(Option<String>),
}

impl Slot {
    fn value(&self) -> Option<String> {
        match self {
            Slot::Unset => None,
            Slot::Derived(value) => Some(value.clone()),
            Slot::Overridden(value) => value.clone(),
        }
    }

    /// Returns false when the slot belongs to the caller.
    fn derive(&mut self, value: Option<String>) -> bool {
        if let Slot::Overridden(_) = self {
            return false;
        }
        *self = match value {
            Some(value) => Slot::Derived(value),
            None => Slot::Unset,
        };
        true
    }
}

/// Inputs the derivations depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverInputs {
    pub connected_wallet: Option<Address>,
    pub safe_address: Option<Address>,
    pub calculate_safe_nonce: bool,
}

#[derive(Debug, Default)]
struct ResolverState {
    inputs: Option<ResolverInputs>,
    wallet_generation: u64,
    safe_generation: u64,

    safe_nonce: Slot,
    safe_tx_gas: Slot,
    eth_nonce: Slot,
    eth_gas_limit: Slot,
    eth_gas_price: Slot,
    eth_gas_price_in_gwei: Slot,
}

/// Derives the parameters of one Safe transaction from the node and the
/// transaction service, and keeps whatever the caller overrides.
///
/// Derivations run when their inputs change (see [`update_inputs`]). A lookup
/// that fails leaves its field unset. A lookup that finishes after its inputs
/// changed again is dropped.
///
/// [`update_inputs`]: TxParametersResolver::update_inputs
pub struct TxParametersResolver {
    chain: Arc<dyn ChainReader>,
    tx_service: Arc<dyn TxServiceClient>,
    status: ParametersStatus,
    state: Mutex<ResolverState>,
}

impl TxParametersResolver {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        tx_service: Arc<dyn TxServiceClient>,
        status: ParametersStatus,
    ) -> Self {
        let mut state = ResolverState::default();
        if status.is_cancel() {
            state.safe_tx_gas = Slot::Derived("0".to_owned());
        }
        TxParametersResolver {
            chain,
            tx_service,
            status,
            state: Mutex::new(state),
        }
    }

    pub fn parameters(&self) -> TxParameters {
        let state = self.state.lock();
        TxParameters {
            safe_nonce: state.safe_nonce.value(),
            safe_tx_gas: state.safe_tx_gas.value(),
            eth_nonce: state.eth_nonce.value(),
            eth_gas_limit: state.eth_gas_limit.value(),
            eth_gas_price: state.eth_gas_price.value(),
            eth_gas_price_in_gwei: state.eth_gas_price_in_gwei.value(),
        }
    }

    /// Re-runs the derivations whose inputs differ from the previous call,
    /// concurrently. Unchanged inputs trigger nothing.
    pub async fn update_inputs(&self, inputs: ResolverInputs) {
        let (wallet_job, safe_job) = {
            let mut state = self.state.lock();
            let previous = state.inputs.replace(inputs.clone());

            let wallet_changed = previous
                .as_ref()
                .map_or(true, |prev| prev.connected_wallet != inputs.connected_wallet);
            let safe_changed = previous.as_ref().map_or(true, |prev| {
                prev.safe_address != inputs.safe_address
                    || prev.calculate_safe_nonce != inputs.calculate_safe_nonce
            });

            // a derived value belongs to the inputs it was fetched for
            let wallet_job = if wallet_changed {
                state.wallet_generation += 1;
                state.eth_nonce.derive(None);
                inputs
                    .connected_wallet
                    .map(|wallet| (wallet, state.wallet_generation))
            } else {
                None
            };
            let safe_job = if safe_changed {
                state.safe_generation += 1;
                state.safe_nonce.derive(None);
                inputs
                    .safe_address
                    .filter(|_| inputs.calculate_safe_nonce)
                    .map(|safe| (safe, state.safe_generation))
            } else {
                None
            };
            (wallet_job, safe_job)
        };

        tokio::join!(
            self.derive_eth_nonce(wallet_job),
            self.derive_safe_nonce(safe_job)
        );
    }

    async fn derive_eth_nonce(&self, job: Option<(Address, u64)>) {
        let Some((wallet, generation)) = job else {
            return;
        };

        let count = match self.chain.transaction_count(wallet).await {
            Ok(count) => count,
            Err(err) => {
                log::warn!("failed to fetch nonce of wallet {:?}: {}", wallet, err);
                return;
            }
        };

        let mut state = self.state.lock();
        if state.wallet_generation != generation {
            log::debug!("dropping stale nonce of wallet {:?}", wallet);
            return;
        }
        state.eth_nonce.derive(Some(count.to_string()));
    }

    async fn derive_safe_nonce(&self, job: Option<(Address, u64)>) {
        let Some((safe, generation)) = job else {
            return;
        };

        let last_tx_nonce = match self.tx_service.last_tx(safe).await {
            Ok(last_tx) => last_tx.map(|tx| tx.nonce),
            Err(err) => {
                log::warn!("failed to fetch last tx of safe {:?}: {}", safe, err);
                None
            }
        };

        let on_chain_nonce = match last_tx_nonce {
            Some(_) => None,
            None => match self.chain.safe_nonce(safe).await {
                Ok(nonce) => Some(nonce),
                Err(err) => {
                    log::warn!("failed to read nonce of safe {:?}: {}", safe, err);
                    return;
                }
            },
        };

        let mut state = self.state.lock();
        if state.safe_generation != generation {
            log::debug!("dropping stale nonce of safe {:?}", safe);
            return;
        }
        if let Some(nonce) = next_safe_nonce(last_tx_nonce, on_chain_nonce) {
            state.safe_nonce.derive(Some(nonce));
        }
    }

    /// Stores an upstream estimation as derived values.
    pub fn apply_gas_estimation(&self, estimation: &GasEstimation) {
        let mut state = self.state.lock();
        if let Some(limit) = &estimation.eth_gas_limit {
            state.eth_gas_limit.derive(Some(limit.clone()));
        }
        if let Some(gas) = &estimation.safe_tx_gas {
            let gas = if self.status.is_cancel() { "0".to_owned() } else { gas.clone() };
            state.safe_tx_gas.derive(Some(gas));
        }
        if let Some(price) = &estimation.eth_gas_price {
            self.store_gas_price(&mut state, Some(price.clone()), false);
        }
    }

    pub fn set_safe_nonce(&self, safe_nonce: Option<String>) {
        self.state.lock().safe_nonce = Slot::Overridden(safe_nonce);
    }

    pub fn set_safe_tx_gas(&self, safe_tx_gas: Option<String>) {
        let safe_tx_gas = if self.status.is_cancel() {
            Some("0".to_owned())
        } else {
            safe_tx_gas
        };
        self.state.lock().safe_tx_gas = Slot::Overridden(safe_tx_gas);
    }

    pub fn set_eth_nonce(&self, eth_nonce: Option<String>) {
        self.state.lock().eth_nonce = Slot::Overridden(eth_nonce);
    }

    pub fn set_eth_gas_limit(&self, eth_gas_limit: Option<String>) {
        self.state.lock().eth_gas_limit = Slot::Overridden(eth_gas_limit);
    }

    /// Gas price in gwei. Also refreshes the wei value unless that was overridden.
    pub fn set_eth_gas_price(&self, eth_gas_price: Option<String>) {
        let mut state = self.state.lock();
        self.store_gas_price(&mut state, eth_gas_price, true);
    }

    pub fn set_eth_gas_price_in_gwei(&self, in_wei: Option<String>) {
        self.state.lock().eth_gas_price_in_gwei = Slot::Overridden(in_wei);
    }

    fn store_gas_price(&self, state: &mut ResolverState, price: Option<String>, overridden: bool) {
        let cancel = self.status.is_cancel();
        let price = match price {
            Some(_) if cancel => Some("0".to_owned()),
            other => other,
        };

        if overridden {
            state.eth_gas_price = Slot::Overridden(price);
        } else if !state.eth_gas_price.derive(price) {
            return;
        }

        let in_wei = match state.eth_gas_price.value() {
            Some(price) if !cancel => gas_price_to_wei(&price),
            _ => None,
        };
        state.eth_gas_price_in_gwei.derive(in_wei);
    }
}

/// Next Safe nonce: one past the last known transaction, otherwise the
/// contract's own nonce (zero for a Safe that never executed anything).
pub fn next_safe_nonce(last_tx_nonce: Option<u64>, on_chain_nonce: Option<U256>) -> Option<String> {
    match last_tx_nonce {
        Some(nonce) => Some((U256::from(nonce) + U256::one()).to_string()),
        None => on_chain_nonce.map(|nonce| nonce.to_string()),
    }
}

/// Converts a gwei amount to wei. Zero, negative or malformed input yields `None`.
pub fn gas_price_to_wei(gwei: &str) -> Option<String> {
    let gwei = gwei.trim();
    if gwei.is_empty() || gwei.starts_with('-') {
        return None;
    }
    let wei: U256 = parse_units(gwei, "gwei").ok()?.into();
    if wei.is_zero() {
        None
    } else {
        Some(wei.to_string())
    }
}
