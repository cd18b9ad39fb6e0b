// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Privacy-pool relay integration.
//!
//! The relay service is a black box satisfying the capability contract in
//! [`client::RelayClient`]. The pool's cryptography, note scheme, and
//! accounting live entirely on the relay side.

pub mod client;
pub mod http;

pub use client::{
    classify_relay_error, DepositReceipt, RelayClient, RelayError, WithdrawalReceipt,
};
pub use http::HttpRelayClient;
