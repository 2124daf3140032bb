use serde_derive::{Deserialize, Serialize};

/// Which parameter groups the form lets the user edit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParametersStatus {
    #[default]
    Enabled,
    Disabled,
    SafeDisabled,
    EthDisabled,
    CancelTransaction,
}

impl ParametersStatus {
    pub fn is_cancel(&self) -> bool {
        matches!(self, ParametersStatus::CancelTransaction)
    }
}

/// Resolved parameters for one transaction. All amounts are decimal strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TxParameters {
    pub safe_nonce: Option<String>,
    pub safe_tx_gas: Option<String>,
    pub eth_nonce: Option<String>,
    pub eth_gas_limit: Option<String>,
    /// Gas price in gwei.
    pub eth_gas_price: Option<String>,
    /// `eth_gas_price` converted to wei.
    #[serde(rename = "ethGasPriceInGWei")]
    pub eth_gas_price_in_gwei: Option<String>,
}

impl TxParameters {
    /// Whether every value needed to submit an execution is populated.
    pub fn is_complete(&self) -> bool {
        self.safe_nonce.is_some()
            && self.safe_tx_gas.is_some()
            && self.eth_nonce.is_some()
            && self.eth_gas_limit.is_some()
            && self.eth_gas_price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names() {
        let status: ParametersStatus = serde_json::from_str("\"CANCEL_TRANSACTION\"").unwrap();
        assert!(status.is_cancel());
        assert_eq!(serde_json::to_string(&ParametersStatus::EthDisabled).unwrap(), "\"ETH_DISABLED\"");
    }

    #[test]
    fn parameters_serialize_camel_case() {
        let params = TxParameters {
            eth_gas_price_in_gwei: Some("20000000000".to_owned()),
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["ethGasPriceInGWei"], "20000000000");
        assert!(value["safeNonce"].is_null());
        assert!(!params.is_complete());
    }
}
