// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Ledger gateway client.
//!
//! The ledger itself is an external collaborator reached through an RPC
//! gateway. This module defines the capability trait the orchestration
//! engine depends on, plus the HTTP implementation used by the server
//! binary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::types::{FinalityStatus, NetworkReference, TransferShape};

/// Errors that can occur during ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Ledger gateway request failed: {0}")]
    Rpc(String),

    #[error("Ledger gateway response was invalid: {0}")]
    InvalidResponse(String),
}

/// Capability contract for the ledger.
///
/// Every call is a suspension point; none of them mutates engine state.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Spendable balance of an address, in base units.
    async fn get_spendable_balance(&self, address: &str) -> Result<u64, LedgerError>;

    /// Estimated network fee for a transfer of this shape, in base units.
    async fn estimate_fee(&self, transfer: &TransferShape) -> Result<u64, LedgerError>;

    /// A fresh network reference with its validity bound.
    async fn latest_network_reference(&self) -> Result<NetworkReference, LedgerError>;

    /// Block until the transaction finalizes or its validity window
    /// closes. Uses the strongest finality level the ledger offers.
    async fn await_finality(
        &self,
        transaction_id: &str,
        validity_bound: u64,
    ) -> Result<FinalityStatus, LedgerError>;

    /// Total on-chain balance of an address, in base units.
    async fn get_address_balance(&self, address: &str) -> Result<u64, LedgerError>;
}

/// HTTP client for the ledger RPC gateway.
#[derive(Debug, Clone)]
pub struct RpcLedgerClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct BalanceBody {
    balance: u64,
}

#[derive(Debug, Deserialize)]
struct FeeBody {
    fee: u64,
}

#[derive(Debug, Deserialize)]
struct FinalityBody {
    status: String,
}

impl RpcLedgerClient {
    /// Create a new client for the given gateway base URL.
    pub fn new(base_url: &str) -> Result<Self, LedgerError> {
        let parsed: url::Url = base_url
            .parse()
            .map_err(|e: url::ParseError| LedgerError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LedgerError::Rpc(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: parsed.to_string().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, LedgerError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| LedgerError::Rpc(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Rpc(format!("{status}: {body}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, LedgerError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| LedgerError::Rpc(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LedgerError::Rpc(format!("{status}: {text}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn get_spendable_balance(&self, address: &str) -> Result<u64, LedgerError> {
        if address.is_empty() {
            return Err(LedgerError::InvalidAddress("empty address".to_string()));
        }
        let body: BalanceBody = self
            .get_json(&format!("/v1/addresses/{address}/spendable"))
            .await?;
        Ok(body.balance)
    }

    async fn estimate_fee(&self, transfer: &TransferShape) -> Result<u64, LedgerError> {
        let payload = serde_json::to_value(transfer)
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;
        let body: FeeBody = self.post_json("/v1/fees/estimate", &payload).await?;
        Ok(body.fee)
    }

    async fn latest_network_reference(&self) -> Result<NetworkReference, LedgerError> {
        self.get_json("/v1/network/reference").await
    }

    async fn await_finality(
        &self,
        transaction_id: &str,
        validity_bound: u64,
    ) -> Result<FinalityStatus, LedgerError> {
        let payload = json!({ "validity_bound": validity_bound });
        let body: FinalityBody = self
            .post_json(
                &format!("/v1/transactions/{transaction_id}/await-finality"),
                &payload,
            )
            .await?;

        match body.status.as_str() {
            "finalized" => Ok(FinalityStatus::Finalized),
            "expired" => Ok(FinalityStatus::Expired),
            other => Err(LedgerError::InvalidResponse(format!(
                "unknown finality status: {other}"
            ))),
        }
    }

    async fn get_address_balance(&self, address: &str) -> Result<u64, LedgerError> {
        if address.is_empty() {
            return Err(LedgerError::InvalidAddress("empty address".to_string()));
        }
        let body: BalanceBody = self
            .get_json(&format!("/v1/addresses/{address}/balance"))
            .await?;
        Ok(body.balance)
    }
}
