// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Shared API request and response types.
//!
//! Amounts cross the API boundary twice: `*_raw` fields carry exact
//! base units as decimal strings, the unsuffixed fields carry the
//! display-unit rendering. Requests accept display units only.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::LEDGER_DECIMALS;
use crate::engine::payout::{BatchAbort, RecipientEntry};
use crate::ledger::format_amount_short;
use crate::relay::WithdrawalReceipt;

/// Request to fund the pool.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FundRequest {
    /// Amount in display units, e.g. "1.5".
    pub amount: String,
}

/// Result of a funding run.
#[derive(Debug, Serialize, ToSchema)]
pub struct FundResponse {
    /// Relay transaction id for the pool deposit.
    pub transaction_id: String,
    /// Pool balance in base units.
    pub pool_balance_raw: String,
    /// Pool balance in display units.
    pub pool_balance: String,
}

/// Current pool balance as reported by the relay.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub balance_raw: String,
    pub balance: String,
}

/// Request to queue a payout recipient.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecipientRequest {
    pub address: String,
    /// Amount in display units.
    pub amount: String,
}

/// A queued payout recipient.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipientResponse {
    pub id: Uuid,
    pub address: String,
    pub amount_raw: String,
    pub amount: String,
}

impl From<RecipientEntry> for RecipientResponse {
    fn from(entry: RecipientEntry) -> Self {
        Self {
            id: entry.id,
            address: entry.address,
            amount_raw: entry.amount.to_string(),
            amount: format_amount_short(entry.amount, LEDGER_DECIMALS),
        }
    }
}

/// Request to run a payout batch. When `recipients` is present it
/// replaces the queue before the run.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PayoutRequest {
    #[serde(default)]
    pub recipients: Option<Vec<RecipientRequest>>,
}

/// One settled withdrawal inside a batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawalResult {
    pub transaction_id: String,
    pub recipient_address: String,
    pub amount_settled_raw: String,
    pub amount_settled: String,
    pub fee_charged_raw: String,
    pub fee_charged: String,
    /// The relay settled less than requested for this recipient.
    pub is_partial: bool,
}

impl From<WithdrawalReceipt> for WithdrawalResult {
    fn from(receipt: WithdrawalReceipt) -> Self {
        Self {
            transaction_id: receipt.transaction_id,
            recipient_address: receipt.recipient_address,
            amount_settled_raw: receipt.amount_settled.to_string(),
            amount_settled: format_amount_short(receipt.amount_settled, LEDGER_DECIMALS),
            fee_charged_raw: receipt.fee_charged.to_string(),
            fee_charged: format_amount_short(receipt.fee_charged, LEDGER_DECIMALS),
            is_partial: receipt.is_partial,
        }
    }
}

/// Outcome of a payout batch. `aborted` is set when the run stopped on
/// a failing recipient; `results` then covers the recipients processed
/// before it.
#[derive(Debug, Serialize, ToSchema)]
pub struct PayoutResponse {
    pub results: Vec<WithdrawalResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_balance_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<BatchAbort>,
}

/// Signing-wallet connection status.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletStatusResponse {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Result of a connect request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectResponse {
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn withdrawal_result_carries_raw_and_formatted_amounts() {
        let result = WithdrawalResult::from(WithdrawalReceipt {
            transaction_id: "wtx-1".to_string(),
            recipient_address: "r1".to_string(),
            amount_settled: 1_500_000_000,
            fee_charged: 1_000,
            is_partial: false,
        });
        assert_eq!(result.amount_settled_raw, "1500000000");
        assert_eq!(result.amount_settled, "1.5");
    }
}
