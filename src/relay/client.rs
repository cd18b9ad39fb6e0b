// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Relay capability contract.
//!
//! The privacy-pool relay is an opaque external collaborator. It exposes
//! four primitives (session reset, deposit, withdraw, balance query) and
//! may memoize derived proof state keyed by owner identity, which is why
//! `reset_session` must precede every other call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::identity::OwnerIdentity;

/// Errors raised by the relay capability.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The relay has not observed the funding transfer yet. Transient;
    /// safe to retry after a short delay.
    #[error("relay has not observed the funding transfer yet")]
    NotYetSynced,

    /// The relay reported an insufficient balance at the ledger level.
    #[error("insufficient ledger balance reported by relay")]
    InsufficientLedgerFunds,

    /// Any other relay-side rejection, message passed through verbatim.
    #[error("relay error: {0}")]
    Service(String),

    #[error("relay unreachable: {0}")]
    Transport(String),
}

/// Classify a relay error message into the taxonomy above.
///
/// The relay does not expose structured error codes, so known conditions
/// are matched on substrings. Kept in one place so a structured code can
/// replace it without touching the orchestrators.
pub fn classify_relay_error(message: &str) -> RelayError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("no prior credit") || lower.contains("not observed") {
        RelayError::NotYetSynced
    } else if lower.contains("insufficient balance") || lower.contains("insufficient funds") {
        RelayError::InsufficientLedgerFunds
    } else {
        RelayError::Service(message.to_string())
    }
}

/// Receipt returned by a successful pool deposit.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositReceipt {
    /// Relay-reported transaction identifier.
    pub transaction_id: String,
    /// Pool balance after the deposit, in base units.
    pub pool_balance: u64,
}

/// Receipt returned by a successful pool withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WithdrawalReceipt {
    /// Relay-reported transaction identifier.
    pub transaction_id: String,
    /// The destination address the relay paid.
    pub recipient_address: String,
    /// Amount actually settled, in base units.
    pub amount_settled: u64,
    /// Fee the relay charged, in base units.
    pub fee_charged: u64,
    /// True when the relay settled less than the requested amount
    /// (e.g., pool liquidity fragmentation).
    pub is_partial: bool,
}

/// Capability contract for the privacy-pool relay service.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Discard any cached session/proof state for the owner identity.
    /// Must precede every other call with the same identity.
    async fn reset_session(&self, owner: &OwnerIdentity) -> Result<(), RelayError>;

    /// Credit the pool with `amount` base units. Fails with
    /// [`RelayError::NotYetSynced`] if the funding transfer is not yet
    /// visible to the relay.
    async fn deposit(
        &self,
        owner: &OwnerIdentity,
        amount: u64,
    ) -> Result<DepositReceipt, RelayError>;

    /// Pay `amount` base units from the pool to `recipient_address`.
    async fn withdraw(
        &self,
        owner: &OwnerIdentity,
        recipient_address: &str,
        amount: u64,
    ) -> Result<WithdrawalReceipt, RelayError>;

    /// Current pool balance for the owner identity, in base units.
    async fn get_pool_balance(&self, owner: &OwnerIdentity) -> Result<u64, RelayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_unsynced_messages() {
        assert!(matches!(
            classify_relay_error("No prior credit observed for this identity"),
            RelayError::NotYetSynced
        ));
        assert!(matches!(
            classify_relay_error("funding transfer not observed on chain"),
            RelayError::NotYetSynced
        ));
    }

    #[test]
    fn classifies_ledger_insufficiency() {
        assert!(matches!(
            classify_relay_error("Insufficient balance at the ledger level"),
            RelayError::InsufficientLedgerFunds
        ));
    }

    #[test]
    fn passes_unknown_messages_through_verbatim() {
        match classify_relay_error("proof verification failed") {
            RelayError::Service(msg) => assert_eq!(msg, "proof verification failed"),
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
