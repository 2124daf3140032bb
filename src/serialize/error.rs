use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_derive::Serialize;

use crate::repositories::{chain::ChainError, gateway::GatewayError};

#[derive(Debug, Serialize)]
struct AppErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug)]
pub struct AppError {
    pub code: u16,
    pub message: String,
    pub cause: Option<String>,
}

impl AppError {
    pub fn new(code: u16) -> Self {
        AppError {
            code,
            message: default_message(code).to_owned(),
            cause: None,
        }
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = message.to_owned();
        self
    }

    pub fn cause<E: fmt::Display>(mut self, cause: E) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

fn default_message(code: u16) -> &'static str {
    match code {
        400 => "bad request",
        401 => "unauthorized",
        404 => "not found",
        502 => "upstream service failed",
        _ => "internal server error",
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "[{}] {}: {}", self.code, self.message, cause),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if let Some(cause) = &self.cause {
            log::error!("request failed: {} ({})", self.message, cause);
        }
        HttpResponse::build(self.status_code()).json(AppErrorBody {
            code: self.code,
            message: self.message.clone(),
        })
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(ref what) => AppError::new(404).message(&format!("{} not found", what)),
            GatewayError::InvalidUrl(_) => AppError::new(500).cause(err),
            _ => AppError::new(502).message("transaction backend request failed").cause(err),
        }
    }
}

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        AppError::new(502).message("blockchain node request failed").cause(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_not_found_maps_to_404() {
        let err: AppError = GatewayError::NotFound("transaction".to_owned()).into();
        assert_eq!(err.code, 404);
        assert_eq!(err.message, "transaction not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn builder_keeps_cause_out_of_message() {
        let err = AppError::new(400).cause("bad hex").message("invalid address");
        assert_eq!(err.message, "invalid address");
        assert_eq!(err.cause.as_deref(), Some("bad hex"));
        assert_eq!(err.to_string(), "[400] invalid address: bad hex");
    }
}
