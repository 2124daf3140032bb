use actix_web::{web, HttpResponse};

use crate::{
    serialize::{error::AppError, transaction::CursorQuery},
    services::transactions::TransactionSrv,
};

use super::parse_address;

async fn request_history(
    safe_address: web::Path<String>,
    query: web::Query<CursorQuery>,
    transaction_srv: web::Data<TransactionSrv>,
) -> Result<HttpResponse, AppError> {
    let safe = parse_address(&safe_address, "safe address")?;
    let res = transaction_srv.history(safe, query.cursor.as_deref()).await?;
    Ok(HttpResponse::Ok().json(res))
}

async fn request_queued(
    safe_address: web::Path<String>,
    query: web::Query<CursorQuery>,
    transaction_srv: web::Data<TransactionSrv>,
) -> Result<HttpResponse, AppError> {
    let safe = parse_address(&safe_address, "safe address")?;
    let res = transaction_srv.queued(safe, query.cursor.as_deref()).await?;
    Ok(HttpResponse::Ok().json(res))
}

async fn request_details(
    tx_id: web::Path<String>,
    transaction_srv: web::Data<TransactionSrv>,
) -> Result<HttpResponse, AppError> {
    let res = transaction_srv.details(&tx_id).await?;
    Ok(HttpResponse::Ok().json(res))
}

pub fn route(conf: &mut web::ServiceConfig) {
    conf.service(
        web::scope("/transactions")
            .route("/details/{tx_id}", web::get().to(request_details))
            .route("/{safe_address}/history", web::get().to(request_history))
            .route("/{safe_address}/queued", web::get().to(request_queued)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::transaction::{
            ExecutionInfo, Transfer, TransferInfo, TransactionInfo, TransactionStatus, TransactionSummary,
        },
        repositories::testing::{StaticChain, StaticTxService, KNOWN_TX_ID},
    };
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use std::sync::Arc;

    const SAFE: &str = "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a";

    fn ether_transfer(id: &str, timestamp: i64, nonce: u64) -> TransactionSummary {
        TransactionSummary {
            id: id.to_owned(),
            timestamp,
            tx_status: TransactionStatus::Success,
            tx_info: TransactionInfo::Transfer(Transfer {
                sender: SAFE.to_owned(),
                recipient: "0xrecipient".to_owned(),
                direction: None,
                transfer_info: TransferInfo::Native {
                    value: "1000".to_owned(),
                },
            }),
            execution_info: Some(ExecutionInfo {
                nonce,
                confirmations_required: 1,
                confirmations_submitted: 1,
            }),
        }
    }

    fn srv() -> TransactionSrv {
        TransactionSrv::new(
            Arc::new(StaticTxService {
                history: vec![ether_transfer("h1", 1000, 0), ether_transfer("h2", 2000, 1)],
                ..Default::default()
            }),
            Arc::new(StaticChain::default()),
            "https://etherscan.io",
        )
    }

    #[actix_web::test]
    async fn history_is_grouped_by_timestamp() {
        let app = test::init_service(App::new().app_data(web::Data::new(srv())).configure(route)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/transactions/{}/history", SAFE))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["history"]["1000"][0]["id"], "h1");
        assert_eq!(body["history"]["2000"][0]["txInfo"]["transferInfo"]["type"], "ETHER");
        assert_eq!(body["pagination"]["next"], "limit=20&offset=20");
    }

    #[actix_web::test]
    async fn details_not_found() {
        let app = test::init_service(App::new().app_data(web::Data::new(srv())).configure(route)).await;

        let req = test::TestRequest::get().uri("/transactions/details/missing").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/transactions/details/{}", KNOWN_TX_ID))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["explorerLink"], "https://etherscan.io/tx/0xexecuted");
        assert_eq!(body["detailedExecutionInfo"]["type"], "MODULE");
    }
}
