use actix_web::{web, HttpResponse};

use crate::{
    serialize::{error::AppError, tx_parameters::TxParametersQuery},
    services::tx_parameters::{ParameterOverrides, ResolveRequest, TxParametersSrv},
};

use super::{parse_address, parse_opt_address, parse_opt_amount, parse_opt_bytes};

fn resolve_request(safe_address: &str, query: TxParametersQuery) -> Result<ResolveRequest, AppError> {
    Ok(ResolveRequest {
        wallet: parse_opt_address(query.wallet.as_deref(), "wallet address")?,
        safe: parse_address(safe_address, "safe address")?,
        status: query.mode.unwrap_or_default(),
        calculate_safe_nonce: query.calculate_safe_nonce.unwrap_or(true),
        to: parse_opt_address(query.to.as_deref(), "recipient")?,
        value: parse_opt_amount(query.value.as_deref(), "value")?,
        data: parse_opt_bytes(query.data.as_deref(), "data")?,
        exec_data: parse_opt_bytes(query.exec_data.as_deref(), "execution data")?,
        overrides: ParameterOverrides {
            safe_nonce: query.safe_nonce,
            safe_tx_gas: query.safe_tx_gas,
            eth_nonce: query.eth_nonce,
            eth_gas_limit: query.eth_gas_limit,
            eth_gas_price: query.eth_gas_price,
        },
    })
}

async fn request_tx_parameters(
    safe_address: web::Path<String>,
    query: web::Query<TxParametersQuery>,
    tx_parameters_srv: web::Data<TxParametersSrv>,
) -> Result<HttpResponse, AppError> {
    let req = resolve_request(&safe_address, query.into_inner())?;
    let res = tx_parameters_srv.resolve(req).await;
    Ok(HttpResponse::Ok().json(res))
}

pub fn route(conf: &mut web::ServiceConfig) {
    conf.service(
        web::scope("/tx-parameters").route("/{safe_address}", web::get().to(request_tx_parameters)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::tx_parameters::TxParameters,
        repositories::{
            gas_oracle::NodeGasPriceOracle,
            testing::{StaticChain, StaticTxService},
        },
        services::gas_estimation::GasEstimator,
    };
    use actix_web::{http::StatusCode, test, App};
    use std::sync::Arc;

    const SAFE: &str = "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a";
    const WALLET: &str = "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a";

    fn srv() -> TxParametersSrv {
        let chain = Arc::new(StaticChain {
            tx_count: Some(5),
            safe_nonce: Some(0),
            gas_estimate: Some(60_000),
            gas_price: Some(20_000_000_000),
        });
        let tx_service = Arc::new(StaticTxService {
            last_nonce: Some(12),
            ..Default::default()
        });
        let estimator = Arc::new(GasEstimator::new(
            chain.clone(),
            Arc::new(NodeGasPriceOracle::new(chain.clone())),
        ));
        TxParametersSrv::new(chain, tx_service, estimator)
    }

    #[actix_web::test]
    async fn resolves_parameters() {
        let app = test::init_service(App::new().app_data(web::Data::new(srv())).configure(route)).await;

        let req = test::TestRequest::get()
            .uri(&format!(
                "/tx-parameters/{}?wallet={}&to={}&value=1000&execData=0x6a761202",
                SAFE, WALLET, WALLET
            ))
            .to_request();
        let params: TxParameters = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            params,
            TxParameters {
                safe_nonce: Some("13".to_owned()),
                safe_tx_gas: Some("60000".to_owned()),
                eth_nonce: Some("5".to_owned()),
                eth_gas_limit: Some("60000".to_owned()),
                eth_gas_price: Some("20".to_owned()),
                eth_gas_price_in_gwei: Some("20000000000".to_owned()),
            }
        );
    }

    #[actix_web::test]
    async fn cancel_mode_with_overrides() {
        let app = test::init_service(App::new().app_data(web::Data::new(srv())).configure(route)).await;

        let req = test::TestRequest::get()
            .uri(&format!(
                "/tx-parameters/{}?wallet={}&mode=CANCEL_TRANSACTION&safeNonce=12&ethGasPrice=80",
                SAFE, WALLET
            ))
            .to_request();
        let params: TxParameters = test::call_and_read_body_json(&app, req).await;

        assert_eq!(params.safe_nonce.as_deref(), Some("12"));
        assert_eq!(params.safe_tx_gas.as_deref(), Some("0"));
        assert_eq!(params.eth_gas_price.as_deref(), Some("0"));
        assert_eq!(params.eth_gas_price_in_gwei, None);
        assert_eq!(params.eth_gas_limit, None);
    }

    #[actix_web::test]
    async fn invalid_safe_address_is_bad_request() {
        let app = test::init_service(App::new().app_data(web::Data::new(srv())).configure(route)).await;

        let req = test::TestRequest::get().uri("/tx-parameters/not-an-address").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
