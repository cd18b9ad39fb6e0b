// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Signing-wallet session endpoints.

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::models::{ConnectResponse, WalletStatusResponse};
use crate::state::AppState;

/// Current signing-wallet connection status.
///
/// Reports the last observed address without contacting the provider.
#[utoipa::path(
    get,
    path = "/v1/wallet",
    tag = "Wallet",
    responses(
        (status = 200, description = "Connection status", body = WalletStatusResponse)
    )
)]
pub async fn wallet_status(State(state): State<AppState>) -> Json<WalletStatusResponse> {
    let address = state.engine.session.current_address().await;
    Json(WalletStatusResponse {
        connected: address.is_some(),
        address,
    })
}

/// Connect the signing wallet.
///
/// Uses an already-authorized provider without prompting; requests
/// authorization only when no address is exposed.
#[utoipa::path(
    post,
    path = "/v1/wallet/connect",
    tag = "Wallet",
    responses(
        (status = 200, description = "Wallet connected", body = ConnectResponse),
        (status = 403, description = "Authorization rejected"),
        (status = 503, description = "No signing wallet available")
    )
)]
pub async fn connect_wallet(
    State(state): State<AppState>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let address = state.engine.session.ensure_connected().await?;
    Ok(Json(ConnectResponse { address }))
}
