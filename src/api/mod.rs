// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    engine::activity::{ActivityEntry, ActivityScope},
    engine::payout::BatchAbort,
    models::{
        BalanceResponse, ConnectResponse, FundRequest, FundResponse, PayoutRequest,
        PayoutResponse, RecipientRequest, RecipientResponse, WalletStatusResponse,
        WithdrawalResult,
    },
    state::AppState,
};

pub mod activity;
pub mod balance;
pub mod fund;
pub mod health;
pub mod payout;
pub mod recipients;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/fund", post(fund::fund_pool))
        .route("/balance", get(balance::get_balance))
        .route("/payout", post(payout::run_payout))
        .route(
            "/recipients",
            get(recipients::list_recipients).post(recipients::add_recipient),
        )
        .route(
            "/recipients/{recipient_id}",
            delete(recipients::remove_recipient),
        )
        .route("/wallet", get(wallet::wallet_status))
        .route("/wallet/connect", post(wallet::connect_wallet))
        .route("/activity", get(activity::list_activity))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        fund::fund_pool,
        balance::get_balance,
        payout::run_payout,
        recipients::list_recipients,
        recipients::add_recipient,
        recipients::remove_recipient,
        wallet::wallet_status,
        wallet::connect_wallet,
        activity::list_activity,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            FundRequest,
            FundResponse,
            BalanceResponse,
            RecipientRequest,
            RecipientResponse,
            PayoutRequest,
            PayoutResponse,
            WithdrawalResult,
            BatchAbort,
            WalletStatusResponse,
            ConnectResponse,
            ActivityEntry,
            ActivityScope,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Funding", description = "Fund the pool from the signing wallet"),
        (name = "Payouts", description = "Recipient queue and batch withdrawals"),
        (name = "Balance", description = "Relay-reported pool balance"),
        (name = "Wallet", description = "Signing-wallet session"),
        (name = "Activity", description = "Recent orchestration events"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettlePolicy;
    use crate::engine::identity::OwnerIdentity;
    use crate::engine::testkit::{MockLedger, MockRelay, MockSigner};
    use crate::engine::Engine;
    use std::sync::Arc;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let engine = Engine::new(
            OwnerIdentity::generate(),
            Arc::new(MockLedger::new(0, 0)),
            Arc::new(MockRelay::new()),
            Arc::new(MockSigner::with_current_address("sender-1")),
            SettlePolicy::immediate(1),
        );
        let app = router(AppState::new(engine));
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
