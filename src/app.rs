use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use crate::{
    config,
    handlers::{transactions, tx_parameters},
    repositories::{
        chain::{ChainReader, EthRpcChain},
        gas_oracle::{FallbackGasPriceOracle, GasPriceOracle, HttpGasPriceOracle, NodeGasPriceOracle},
        gateway::{GatewayClient, TxServiceClient},
        HTTP_CLIENT,
    },
    services::{gas_estimation::GasEstimator, transactions::TransactionSrv, tx_parameters::TxParametersSrv},
};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    tx_parameters::route(cfg);
    transactions::route(cfg);
}

/// Gas price sources in order of preference: configured HTTP oracle, then the node.
pub fn gas_price_oracle(chain: Arc<dyn ChainReader>) -> Arc<dyn GasPriceOracle> {
    let mut oracles: Vec<Arc<dyn GasPriceOracle>> = vec![];
    if let Some(http_oracle) = HttpGasPriceOracle::from_config(HTTP_CLIENT.clone()) {
        oracles.push(Arc::new(http_oracle));
    }
    oracles.push(Arc::new(NodeGasPriceOracle::new(chain)));
    Arc::new(FallbackGasPriceOracle::new(oracles))
}

pub fn build_services() -> anyhow::Result<(TxParametersSrv, TransactionSrv)> {
    let chain: Arc<dyn ChainReader> = Arc::new(EthRpcChain::from_config()?);
    let tx_service: Arc<dyn TxServiceClient> = Arc::new(GatewayClient::from_config(HTTP_CLIENT.clone()));
    let estimator = Arc::new(GasEstimator::new(chain.clone(), gas_price_oracle(chain.clone())));

    let tx_parameters_srv = TxParametersSrv::new(chain.clone(), tx_service.clone(), estimator);
    let transaction_srv = TransactionSrv::from_config(tx_service, chain);
    Ok((tx_parameters_srv, transaction_srv))
}

pub async fn create_app() -> anyhow::Result<()> {
    let (tx_parameters_srv, transaction_srv) = build_services()?;
    let tx_parameters_srv = web::Data::new(tx_parameters_srv);
    let transaction_srv = web::Data::new(transaction_srv);

    let listen_address: String = config::get("listen_address");
    log::info!("Listening and serving HTTP on {}", listen_address);

    HttpServer::new(move || {
        let cors: Cors = Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method()
            .max_age(3600);

        App::new()
            .app_data(tx_parameters_srv.clone())
            .app_data(transaction_srv.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(init_routes)
    })
    .bind(listen_address)?
    .run()
    .await?;

    Ok(())
}
