// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Ledger-facing types.

use serde::{Deserialize, Serialize};

/// A freshly fetched network reference point.
///
/// Transfers built against a reference are only valid until the ledger
/// advances past `validity_bound`; after that the submission can never
/// finalize and must be treated as expired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkReference {
    /// Opaque recent-state handle (e.g., a recent block handle).
    pub reference: String,
    /// Ledger height after which the reference is no longer valid.
    pub validity_bound: u64,
}

/// The shape of a single funding transfer, as handed to the signer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferShape {
    /// Sender address (the external signing wallet).
    pub from: String,
    /// Destination address (the custodial owner address).
    pub to: String,
    /// Amount to move, in base units. Includes the fee buffer.
    pub amount: u64,
    /// Network reference the transfer is anchored to. Filled in just
    /// before signing; `None` while the shape is only used for fee
    /// estimation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<NetworkReference>,
}

/// Outcome of waiting for a submitted transfer to finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalityStatus {
    /// The transfer reached the strongest finality level.
    Finalized,
    /// The validity window closed before finalization.
    Expired,
}
