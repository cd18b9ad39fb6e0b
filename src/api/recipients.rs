// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Payout recipient queue endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::config::LEDGER_DECIMALS;
use crate::error::ApiError;
use crate::ledger::parse_amount;
use crate::models::{RecipientRequest, RecipientResponse};
use crate::state::AppState;

/// List the queued payout recipients in execution order.
#[utoipa::path(
    get,
    path = "/v1/recipients",
    tag = "Payouts",
    responses(
        (status = 200, description = "Current queue", body = [RecipientResponse])
    )
)]
pub async fn list_recipients(State(state): State<AppState>) -> Json<Vec<RecipientResponse>> {
    let recipients = state
        .engine
        .payouts
        .recipients()
        .await
        .into_iter()
        .map(RecipientResponse::from)
        .collect();
    Json(recipients)
}

/// Append a recipient to the payout queue.
#[utoipa::path(
    post,
    path = "/v1/recipients",
    tag = "Payouts",
    request_body = RecipientRequest,
    responses(
        (status = 200, description = "Recipient queued", body = RecipientResponse),
        (status = 400, description = "Invalid address or amount")
    )
)]
pub async fn add_recipient(
    State(state): State<AppState>,
    Json(request): Json<RecipientRequest>,
) -> Result<Json<RecipientResponse>, ApiError> {
    let amount = parse_amount(&request.amount, LEDGER_DECIMALS)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let entry = state
        .engine
        .payouts
        .add_recipient(&request.address, amount)
        .await?;
    Ok(Json(RecipientResponse::from(entry)))
}

/// Remove a queued recipient.
#[utoipa::path(
    delete,
    path = "/v1/recipients/{recipient_id}",
    tag = "Payouts",
    params(
        ("recipient_id" = Uuid, Path, description = "Queued recipient id")
    ),
    responses(
        (status = 204, description = "Recipient removed"),
        (status = 404, description = "No such recipient")
    )
)]
pub async fn remove_recipient(
    State(state): State<AppState>,
    Path(recipient_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.engine.payouts.remove_recipient(recipient_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("No such recipient"))
    }
}
