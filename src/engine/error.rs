// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Orchestration error taxonomy.
//!
//! Every failure is returned to the caller as a structured result; none
//! is fatal to the process. Variants up to `InsufficientFunds` carry no
//! external side effects and are safe to retry after correction.
//! `SubmissionExpired` means a signed transfer may or may not land on
//! chain; it must never be auto-resubmitted.

use crate::ledger::{LedgerError, SignerError};
use crate::relay::RelayError;

use super::identity::IdentityError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Bad input; nothing was submitted anywhere.
    #[error("invalid request: {0}")]
    Validation(String),

    /// No signing provider is discoverable.
    #[error("no signing wallet available")]
    WalletUnavailable,

    /// The user declined authorization or the provider errored.
    #[error("wallet connection rejected: {0}")]
    ConnectionRejected(String),

    /// Computed locally before submission; carries the exact shortfall.
    #[error(
        "insufficient funds: required {required} base units, available {available} (short {shortfall})"
    )]
    InsufficientFunds {
        required: u64,
        available: u64,
        shortfall: u64,
    },

    /// The relay reported a ledger-level balance shortage after the fact.
    #[error("insufficient funds at the ledger level: {0}")]
    InsufficientLedgerFunds(String),

    /// The transfer was signed but did not finalize inside its validity
    /// window. On-chain outcome is ambiguous.
    #[error("funding transfer expired before finalization")]
    SubmissionExpired,

    /// The relay has not observed the funding transfer yet; safe to
    /// retry after a short delay.
    #[error("relay has not observed the funding transfer yet; retry shortly")]
    RelayNotYetSynced,

    /// Opaque relay failure, message passed through verbatim.
    #[error("relay error: {0}")]
    Relay(String),

    #[error("ledger error: {0}")]
    Ledger(String),

    #[error("signer error: {0}")]
    Signer(String),

    #[error("identity error: {0}")]
    Identity(String),
}

impl From<RelayError> for EngineError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::NotYetSynced => EngineError::RelayNotYetSynced,
            RelayError::InsufficientLedgerFunds => {
                EngineError::InsufficientLedgerFunds(err.to_string())
            }
            RelayError::Service(msg) => EngineError::Relay(msg),
            RelayError::Transport(msg) => EngineError::Relay(msg),
        }
    }
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        EngineError::Ledger(err.to_string())
    }
}

impl From<SignerError> for EngineError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::Unavailable => EngineError::WalletUnavailable,
            SignerError::Rejected(msg) => EngineError::ConnectionRejected(msg),
            other => EngineError::Signer(other.to_string()),
        }
    }
}

impl From<IdentityError> for EngineError {
    fn from(err: IdentityError) -> Self {
        EngineError::Identity(err.to_string())
    }
}
