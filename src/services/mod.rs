pub mod gas_estimation;
pub mod resolver;
pub mod transactions;
pub mod tx_parameters;
