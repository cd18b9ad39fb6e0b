// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Pool balance endpoint.

use axum::{extract::State, Json};

use crate::config::LEDGER_DECIMALS;
use crate::error::ApiError;
use crate::ledger::format_amount_short;
use crate::models::BalanceResponse;
use crate::state::AppState;

/// Get the pool balance from the relay.
///
/// Read-only; resets the relay session and fetches the balance the
/// relay attributes to the owner identity.
#[utoipa::path(
    get,
    path = "/v1/balance",
    tag = "Balance",
    responses(
        (status = 200, description = "Balance retrieved", body = BalanceResponse),
        (status = 502, description = "Relay unreachable"),
        (status = 503, description = "Relay has not observed the pool yet")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.engine.get_balance().await?;

    Ok(Json(BalanceResponse {
        balance_raw: balance.to_string(),
        balance: format_amount_short(balance, LEDGER_DECIMALS),
    }))
}
