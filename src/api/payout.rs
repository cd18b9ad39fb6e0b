// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Payout batch endpoint.

use axum::{extract::State, Json};

use crate::config::LEDGER_DECIMALS;
use crate::error::ApiError;
use crate::ledger::{format_amount_short, parse_amount};
use crate::models::{PayoutRequest, PayoutResponse, WithdrawalResult};
use crate::state::AppState;

/// Run the payout batch.
///
/// When `recipients` is present in the body it replaces the queue
/// before the run. Withdrawals execute sequentially in queue order and
/// the batch stops at the first failure; an abort is reported in the
/// response body, not as an error status, so completed receipts are
/// preserved.
#[utoipa::path(
    post,
    path = "/v1/payout",
    tag = "Payouts",
    request_body = PayoutRequest,
    responses(
        (status = 200, description = "Batch executed (possibly aborted mid-run)", body = PayoutResponse),
        (status = 400, description = "Invalid recipient entry or empty queue"),
        (status = 422, description = "Batch exceeds the tracked pool balance")
    )
)]
pub async fn run_payout(
    State(state): State<AppState>,
    Json(request): Json<PayoutRequest>,
) -> Result<Json<PayoutResponse>, ApiError> {
    if let Some(recipients) = request.recipients {
        let mut parsed = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            let amount = parse_amount(&recipient.amount, LEDGER_DECIMALS)
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            parsed.push((recipient.address, amount));
        }
        state.engine.payouts.set_recipients(&parsed).await?;
    }

    let outcome = state.engine.payouts.run().await?;

    Ok(Json(PayoutResponse {
        results: outcome
            .results
            .into_iter()
            .map(WithdrawalResult::from)
            .collect(),
        pool_balance_raw: outcome.pool_balance.map(|b| b.to_string()),
        pool_balance: outcome
            .pool_balance
            .map(|b| format_amount_short(b, LEDGER_DECIMALS)),
        aborted: outcome.aborted,
    }))
}
