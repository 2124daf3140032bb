use serde_derive::{Deserialize, Serialize};

use super::tx_details::ExpandedTxDetails;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    AwaitingConfirmations,
    AwaitingExecution,
    Cancelled,
    Failed,
    Success,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferDirection {
    Incoming,
    Outgoing,
}

/// Call type of a Safe transaction. Encoded as its numeric value on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum Operation {
    Call = 0,
    Delegate = 1,
}

impl TryFrom<u8> for Operation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::Delegate),
            other => Err(format!("unknown operation: {}", other)),
        }
    }
}

impl From<Operation> for u8 {
    fn from(operation: Operation) -> u8 {
        operation as u8
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InternalTransaction {
    pub operation: Operation,
    pub to: String,
    #[serde(default, with = "crate::serialize::string_or_number")]
    pub value: Option<String>,
    pub data: Option<String>,
    pub data_decoded: Option<DataDecoded>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub value_decoded: Option<Vec<InternalTransaction>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataDecoded {
    pub method: String,
    #[serde(default)]
    pub parameters: Option<Vec<Parameter>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum TransferInfo {
    #[serde(rename = "ERC20", rename_all = "camelCase")]
    Erc20 {
        token_address: String,
        token_name: Option<String>,
        token_symbol: Option<String>,
        logo_uri: Option<String>,
        decimals: Option<u8>,
        value: String,
    },
    #[serde(rename = "ERC721", rename_all = "camelCase")]
    Erc721 {
        token_address: String,
        token_id: String,
        token_name: Option<String>,
        token_symbol: Option<String>,
        logo_uri: Option<String>,
    },
    #[serde(rename = "ETHER")]
    Native { value: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub sender: String,
    pub recipient: String,
    #[serde(default)]
    pub direction: Option<TransferDirection>,
    pub transfer_info: TransferInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingsInfo {
    SetFallbackHandler {
        handler: String,
    },
    AddOwner {
        owner: String,
        threshold: u32,
    },
    RemoveOwner {
        owner: String,
        threshold: u32,
    },
    #[serde(rename_all = "camelCase")]
    SwapOwner {
        old_owner: String,
        new_owner: String,
    },
    ChangeThreshold {
        threshold: u32,
    },
    ChangeImplementation {
        implementation: String,
    },
    EnableModule {
        module: String,
    },
    DisableModule {
        module: String,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChange {
    pub data_decoded: DataDecoded,
    #[serde(default)]
    pub settings_info: Option<SettingsInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Custom {
    pub to: String,
    pub data_size: String,
    pub value: String,
    #[serde(default)]
    pub method_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Creation {
    pub creator: String,
    pub transaction_hash: String,
    #[serde(default)]
    pub master_copy: Option<String>,
    #[serde(default)]
    pub factory: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum TransactionInfo {
    Transfer(Transfer),
    SettingsChange(SettingsChange),
    Custom(Custom),
    Creation(Creation),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    pub nonce: u64,
    pub confirmations_required: u32,
    pub confirmations_submitted: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub id: String,
    pub timestamp: i64,
    pub tx_status: TransactionStatus,
    pub tx_info: TransactionInfo,
    #[serde(default)]
    pub execution_info: Option<ExecutionInfo>,
}

impl TransactionSummary {
    pub fn nonce(&self) -> Option<u64> {
        self.execution_info.map(|info| info.nonce)
    }
}

/// A summary with its lazily fetched details attached.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(flatten)]
    pub summary: TransactionSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_details: Option<ExpandedTxDetails>,
}

impl From<TransactionSummary> for Transaction {
    fn from(summary: TransactionSummary) -> Self {
        Transaction {
            summary,
            tx_details: None,
        }
    }
}
