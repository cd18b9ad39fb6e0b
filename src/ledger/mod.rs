// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Ledger integration module.
//!
//! This module provides:
//! - The `LedgerClient` capability trait and its RPC gateway client
//! - The `SigningSession` capability trait and the HTTP signer bridge
//! - Amount/address conversion helpers

pub mod client;
pub mod signer;
pub mod types;
pub mod units;

pub use client::{LedgerClient, LedgerError, RpcLedgerClient};
pub use signer::{HttpSignerBridge, SignerError, SigningSession};
pub use types::*;
pub use units::{canonical_address, format_amount, format_amount_short, parse_amount};
