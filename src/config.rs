use ::config::{Config, ConfigError, Environment};
use once_cell::sync::Lazy;
use serde::Deserialize;

static SETTINGS: Lazy<Config> = Lazy::new(|| load().expect("invalid service configuration"));

fn load() -> Result<Config, ConfigError> {
    // Values from .env are exported into the process environment first
    dotenv::dotenv().ok();

    Config::builder()
        .set_default("listen_address", "127.0.0.1:8080")?
        .set_default("rpc_url", "http://127.0.0.1:8545")?
        .set_default("tx_service_url", "https://safe-transaction.gnosis.io/api/v1")?
        .set_default("client_gateway_url", "https://safe-client.gnosis.io")?
        .set_default("explorer_url", "https://etherscan.io")?
        .add_source(Environment::default())
        .build()
}

/// Reads a required setting. Missing keys are a startup bug, so this panics.
pub fn get<'de, T: Deserialize<'de>>(key: &str) -> T {
    match SETTINGS.get::<T>(key) {
        Ok(value) => value,
        Err(err) => panic!("config key `{}` is not usable: {}", key, err),
    }
}

pub fn get_or<'de, T: Deserialize<'de>>(key: &str, default: T) -> T {
    SETTINGS.get::<T>(key).unwrap_or(default)
}

pub fn try_get<'de, T: Deserialize<'de>>(key: &str) -> Option<T> {
    SETTINGS.get::<T>(key).ok()
}
