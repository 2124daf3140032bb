use std::str::FromStr;

use ethers::types::{Address, Bytes, U256};

use crate::serialize::error::AppError;

pub mod transactions;
pub mod tx_parameters;

pub fn parse_address(raw: &str, field: &str) -> Result<Address, AppError> {
    Address::from_str(raw.trim())
        .map_err(|err| AppError::new(400).cause(err).message(&format!("invalid {}", field)))
}

pub fn parse_opt_address(raw: Option<&str>, field: &str) -> Result<Option<Address>, AppError> {
    raw.filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_address(raw, field))
        .transpose()
}

pub fn parse_opt_amount(raw: Option<&str>, field: &str) -> Result<Option<U256>, AppError> {
    raw.filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            U256::from_dec_str(raw.trim())
                .map_err(|err| AppError::new(400).cause(err).message(&format!("invalid {}", field)))
        })
        .transpose()
}

pub fn parse_opt_bytes(raw: Option<&str>, field: &str) -> Result<Option<Bytes>, AppError> {
    raw.filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            Bytes::from_str(raw.trim())
                .map_err(|err| AppError::new(400).cause(err).message(&format!("invalid {}", field)))
        })
        .transpose()
}
