// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::engine::EngineError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let status = match &err {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::WalletUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::ConnectionRejected(_) => StatusCode::FORBIDDEN,
            EngineError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::InsufficientLedgerFunds(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::SubmissionExpired => StatusCode::GATEWAY_TIMEOUT,
            EngineError::RelayNotYetSynced => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::Relay(_) => StatusCode::BAD_GATEWAY,
            EngineError::Ledger(_) => StatusCode::BAD_GATEWAY,
            EngineError::Signer(_) => StatusCode::BAD_GATEWAY,
            EngineError::Identity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
