use serde_derive::Deserialize;

use crate::models::tx_parameters::ParametersStatus;

/// Query of `GET /tx-parameters/{safe_address}`.
///
/// `to`/`value`/`data` describe the inner Safe call, `execData` the outer
/// `execTransaction` calldata. The trailing fields are caller overrides and
/// are never replaced by derived values.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TxParametersQuery {
    pub wallet: Option<String>,
    pub mode: Option<ParametersStatus>,
    pub calculate_safe_nonce: Option<bool>,

    pub to: Option<String>,
    pub value: Option<String>,
    pub data: Option<String>,
    pub exec_data: Option<String>,

    pub safe_nonce: Option<String>,
    pub safe_tx_gas: Option<String>,
    pub eth_nonce: Option<String>,
    pub eth_gas_limit: Option<String>,
    pub eth_gas_price: Option<String>,
}
