// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Pool funding endpoint.

use axum::{extract::State, Json};

use crate::config::LEDGER_DECIMALS;
use crate::error::ApiError;
use crate::ledger::{format_amount_short, parse_amount};
use crate::models::{FundRequest, FundResponse};
use crate::state::AppState;

/// Fund the pool from the connected signing wallet.
///
/// Transfers the requested amount plus a fixed fee buffer to the owner
/// address, waits for ledger finality, then deposits the requested
/// amount into the pool via the relay.
#[utoipa::path(
    post,
    path = "/v1/fund",
    tag = "Funding",
    request_body = FundRequest,
    responses(
        (status = 200, description = "Pool funded", body = FundResponse),
        (status = 400, description = "Invalid amount"),
        (status = 422, description = "Insufficient funds"),
        (status = 503, description = "Wallet unavailable or relay not yet synced"),
        (status = 504, description = "Funding transfer expired before finalization")
    )
)]
pub async fn fund_pool(
    State(state): State<AppState>,
    Json(request): Json<FundRequest>,
) -> Result<Json<FundResponse>, ApiError> {
    let amount = parse_amount(&request.amount, LEDGER_DECIMALS)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let outcome = state.engine.funding.fund(amount).await?;

    Ok(Json(FundResponse {
        transaction_id: outcome.transaction_id,
        pool_balance_raw: outcome.pool_balance.to_string(),
        pool_balance: format_amount_short(outcome.pool_balance, LEDGER_DECIMALS),
    }))
}
