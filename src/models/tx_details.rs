use serde_derive::{Deserialize, Serialize};

use super::transaction::{DataDecoded, Operation, TransactionInfo, TransactionStatus};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    Erc721,
    Erc20,
    Ether,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub token_type: TokenType,
    pub address: String,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub logo_uri: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub hex_data: Option<String>,
    pub data_decoded: Option<DataDecoded>,
    pub to: String,
    pub value: Option<String>,
    pub operation: Operation,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MultiSigConfirmation {
    pub signer: String,
    pub signature: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiSigExecutionDetails {
    pub submitted_at: i64,
    pub nonce: u64,
    pub safe_tx_gas: u64,
    pub base_gas: u64,
    pub gas_price: String,
    pub gas_token: String,
    pub refund_receiver: String,
    pub safe_tx_hash: String,
    pub executor: Option<String>,
    pub signers: Vec<String>,
    pub confirmations_required: u32,
    pub confirmations: Vec<MultiSigConfirmation>,
    #[serde(default)]
    pub gas_token_info: Option<TokenInfo>,
}

/// How a transaction reached execution: through a Safe module, or by owner confirmations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum DetailedExecutionInfo {
    Module { address: String },
    #[serde(rename = "MULTISIG")]
    MultiSig(MultiSigExecutionDetails),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedTxDetails {
    pub executed_at: Option<i64>,
    pub tx_status: TransactionStatus,
    pub tx_info: TransactionInfo,
    #[serde(default)]
    pub tx_data: Option<TransactionData>,
    #[serde(default)]
    pub detailed_execution_info: Option<DetailedExecutionInfo>,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn multisig_details_with_confirmations() {
        let raw = json!({
            "executedAt": null,
            "txStatus": "AWAITING_CONFIRMATIONS",
            "txInfo": {
                "type": "Custom",
                "to": "0xto",
                "dataSize": "0",
                "value": "1000",
                "methodName": null
            },
            "txData": {
                "hexData": null,
                "dataDecoded": null,
                "to": "0xto",
                "value": "1000",
                "operation": 0
            },
            "detailedExecutionInfo": {
                "type": "MULTISIG",
                "submittedAt": 1607000000000i64,
                "nonce": 4,
                "safeTxGas": 0,
                "baseGas": 0,
                "gasPrice": "0",
                "gasToken": "0x0000000000000000000000000000000000000000",
                "refundReceiver": "0x0000000000000000000000000000000000000000",
                "safeTxHash": "0xsafehash",
                "executor": null,
                "signers": ["0xOwnerA", "0xOwnerB"],
                "confirmationsRequired": 2,
                "confirmations": [{ "signer": "0xOwnerA", "signature": "0xsig" }],
                "gasTokenInfo": null
            },
            "txHash": null
        });

        let details: ExpandedTxDetails = serde_json::from_value(raw).unwrap();
        assert_eq!(details.tx_status, TransactionStatus::AwaitingConfirmations);
        assert_eq!(details.tx_data.as_ref().map(|data| data.operation), Some(Operation::Call));
        match details.detailed_execution_info {
            Some(DetailedExecutionInfo::MultiSig(multisig)) => {
                assert_eq!(multisig.nonce, 4);
                assert_eq!(multisig.confirmations_required, 2);
                assert_eq!(multisig.confirmations.len(), 1);
                assert_eq!(multisig.confirmations[0].signer, "0xOwnerA");
            }
            other => panic!("unexpected execution info: {:?}", other),
        }
    }

    #[test]
    fn module_execution_details() {
        let info: DetailedExecutionInfo =
            serde_json::from_value(json!({ "type": "MODULE", "address": "0xmodule" })).unwrap();
        assert_eq!(
            info,
            DetailedExecutionInfo::Module {
                address: "0xmodule".to_owned()
            }
        );
    }
}
