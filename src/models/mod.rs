pub mod transaction;
pub mod tx_details;
pub mod tx_parameters;
