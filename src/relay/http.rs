// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! HTTP client for the privacy-pool relay service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::client::{classify_relay_error, DepositReceipt, RelayClient, RelayError, WithdrawalReceipt};
use crate::engine::identity::OwnerIdentity;

/// reqwest-backed relay client.
///
/// The owner secret is presented as a bearer credential on every call;
/// the relay derives its internal session state from it. The secret is
/// never logged by this client.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct PoolBalanceBody {
    balance: u64,
}

impl HttpRelayClient {
    pub fn new(base_url: &str) -> Result<Self, RelayError> {
        let parsed: url::Url = base_url
            .parse()
            .map_err(|e: url::ParseError| RelayError::Transport(e.to_string()))?;

        // Withdrawals involve server-side proving; allow them time.
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| RelayError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: parsed.to_string().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str, owner: &OwnerIdentity) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(owner.secret_hex())
    }

    /// Send a relay call, surfacing relay-side rejections through the
    /// substring classifier. Returns the raw success response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, RelayError> {
        let response = request
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or(body);
            if status.is_server_error() && message.is_empty() {
                return Err(RelayError::Transport(format!("status {status}")));
            }
            return Err(classify_relay_error(&message));
        }

        Ok(response)
    }

    /// Execute a relay call expecting a JSON body.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RelayError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| RelayError::Transport(format!("invalid relay response: {e}")))
    }
}

/// Pull the `error` field out of a JSON error body, if there is one.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn reset_session(&self, owner: &OwnerIdentity) -> Result<(), RelayError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/session/reset", owner)
            .json(&json!({ "address": owner.address() }));
        // Success carries no meaningful body; some relays answer with
        // an empty one.
        self.send(request).await?;
        Ok(())
    }

    async fn deposit(
        &self,
        owner: &OwnerIdentity,
        amount: u64,
    ) -> Result<DepositReceipt, RelayError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/deposits", owner)
            .json(&json!({
                "address": owner.address(),
                "amount": amount,
            }));
        self.execute(request).await
    }

    async fn withdraw(
        &self,
        owner: &OwnerIdentity,
        recipient_address: &str,
        amount: u64,
    ) -> Result<WithdrawalReceipt, RelayError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/withdrawals", owner)
            .json(&json!({
                "address": owner.address(),
                "recipient_address": recipient_address,
                "amount": amount,
            }));
        self.execute(request).await
    }

    async fn get_pool_balance(&self, owner: &OwnerIdentity) -> Result<u64, RelayError> {
        let request = self.request(reqwest::Method::GET, "/v1/balance", owner);
        let body: PoolBalanceBody = self.execute(request).await?;
        Ok(body.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};

    #[test]
    fn rejects_invalid_base_url() {
        assert!(HttpRelayClient::new("not a url").is_err());
    }

    #[tokio::test]
    async fn reset_session_accepts_an_empty_success_body() {
        let app = Router::new().route("/v1/session/reset", post(|| async { StatusCode::OK }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = HttpRelayClient::new(&format!("http://{addr}")).unwrap();
        let owner = OwnerIdentity::generate();
        client.reset_session(&owner).await.unwrap();
    }

    #[test]
    fn extracts_error_field_from_json_bodies() {
        assert_eq!(
            extract_error_message(r#"{"error":"no prior credit observed"}"#).as_deref(),
            Some("no prior credit observed")
        );
        assert_eq!(extract_error_message("plain text"), None);
    }
}
