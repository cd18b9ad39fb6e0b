// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Signing capability seam.
//!
//! The external signing wallet is injected behind the [`SigningSession`]
//! trait so the orchestration core has no dependency on any particular
//! signer runtime. The shipped implementation bridges to an external
//! signer service over HTTP; the wallet's private key never enters this
//! process.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::types::TransferShape;

/// Errors raised by the signing capability.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("no signing provider available")]
    Unavailable,

    #[error("connection rejected: {0}")]
    Rejected(String),

    #[error("signer request failed: {0}")]
    Transport(String),

    #[error("signer response was invalid: {0}")]
    InvalidResponse(String),
}

/// Capability contract for an external signing wallet.
#[async_trait]
pub trait SigningSession: Send + Sync {
    /// The address the provider currently exposes, if it has already
    /// authorized this client. Never prompts.
    async fn current_address(&self) -> Result<Option<String>, SignerError>;

    /// Request authorization from the provider. May prompt the user.
    async fn connect(&self) -> Result<String, SignerError>;

    /// Sign the transfer and submit it to the ledger, returning the
    /// transaction identifier.
    async fn sign_and_submit(&self, transfer: &TransferShape) -> Result<String, SignerError>;
}

/// HTTP bridge to an external signer service.
#[derive(Debug, Clone)]
pub struct HttpSignerBridge {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct AddressBody {
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConnectBody {
    address: String,
}

#[derive(Debug, Deserialize)]
struct SubmitBody {
    transaction_id: String,
}

impl HttpSignerBridge {
    pub fn new(base_url: &str) -> Result<Self, SignerError> {
        let parsed: url::Url = base_url
            .parse()
            .map_err(|e: url::ParseError| SignerError::Transport(e.to_string()))?;

        // Submission blocks on user approval in the signer UI, so the
        // timeout is generous.
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| SignerError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: parsed.to_string().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl SigningSession for HttpSignerBridge {
    async fn current_address(&self) -> Result<Option<String>, SignerError> {
        let response = self
            .http
            .get(self.url("/v1/session/address"))
            .send()
            .await
            .map_err(|_| SignerError::Unavailable)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SignerError::Transport(format!(
                "status {}",
                response.status()
            )));
        }

        let body: AddressBody = response
            .json()
            .await
            .map_err(|e| SignerError::InvalidResponse(e.to_string()))?;
        Ok(body.address.filter(|a| !a.is_empty()))
    }

    async fn connect(&self) -> Result<String, SignerError> {
        let response = self
            .http
            .post(self.url("/v1/session/connect"))
            .send()
            .await
            .map_err(|_| SignerError::Unavailable)?;

        match response.status() {
            status if status.is_success() => {
                let body: ConnectBody = response
                    .json()
                    .await
                    .map_err(|e| SignerError::InvalidResponse(e.to_string()))?;
                Ok(body.address)
            }
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                let text = response.text().await.unwrap_or_default();
                Err(SignerError::Rejected(text))
            }
            status => Err(SignerError::Transport(format!("status {status}"))),
        }
    }

    async fn sign_and_submit(&self, transfer: &TransferShape) -> Result<String, SignerError> {
        let response = self
            .http
            .post(self.url("/v1/transfers"))
            .json(transfer)
            .send()
            .await
            .map_err(|e| SignerError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let body: SubmitBody = response
                    .json()
                    .await
                    .map_err(|e| SignerError::InvalidResponse(e.to_string()))?;
                Ok(body.transaction_id)
            }
            StatusCode::FORBIDDEN => {
                let text = response.text().await.unwrap_or_default();
                Err(SignerError::Rejected(text))
            }
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(SignerError::Transport(format!("status {status}: {text}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_rejects_invalid_url() {
        assert!(HttpSignerBridge::new("::::").is_err());
    }

    #[test]
    fn bridge_builds_urls_without_double_slash() {
        let bridge = HttpSignerBridge::new("http://signer.local:7700/").unwrap();
        assert_eq!(
            bridge.url("/v1/session/address"),
            "http://signer.local:7700/v1/session/address"
        );
    }
}
