// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

use std::{env, net::SocketAddr, sync::Arc};

use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use veilpay_server::api::router;
use veilpay_server::config::{
    ACCOUNT_WATCH_INTERVAL, DATA_DIR_ENV, LEDGER_RPC_URL_ENV, LOG_FORMAT_ENV, RELAY_BASE_URL_ENV,
    SIGNER_BRIDGE_URL_ENV, SettlePolicy,
};
use veilpay_server::engine::identity::{load_or_generate, FileSecretStore};
use veilpay_server::engine::Engine;
use veilpay_server::ledger::{HttpSignerBridge, RpcLedgerClient};
use veilpay_server::relay::HttpRelayClient;
use veilpay_server::state::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn required_env(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

#[tokio::main]
async fn main() {
    init_tracing();

    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string());
    let store = FileSecretStore::new(&data_dir);
    let owner = load_or_generate(&store).expect("failed to load or create the owner identity");
    info!(owner_address = %owner.address(), "owner identity ready");

    let relay = HttpRelayClient::new(&required_env(RELAY_BASE_URL_ENV))
        .expect("invalid relay base URL");
    let ledger = RpcLedgerClient::new(&required_env(LEDGER_RPC_URL_ENV))
        .expect("invalid ledger RPC URL");
    let signer = HttpSignerBridge::new(&required_env(SIGNER_BRIDGE_URL_ENV))
        .expect("invalid signer bridge URL");

    let engine = Engine::new(
        owner,
        Arc::new(ledger),
        Arc::new(relay),
        Arc::new(signer),
        SettlePolicy::default(),
    );

    let shutdown = CancellationToken::new();
    let watcher = engine
        .session
        .spawn_account_watcher(ACCOUNT_WATCH_INTERVAL, shutdown.clone());

    let state = AppState::new(engine);
    let app = router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    info!("Veilpay server listening on http://{addr} (docs at /docs)");

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
            server_shutdown.cancel();
        })
        .await
        .expect("server failed");

    shutdown.cancel();
    let _ = watcher.await;
}
