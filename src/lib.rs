// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Veilpay - Privacy-Pool Funding and Payout Service
//!
//! This crate orchestrates value movement through a privacy-pool relay:
//! funding a disposable custodial owner address from an external signing
//! wallet, depositing into the pool, and executing sequential payout
//! batches to multiple recipients.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `engine` - Funding and payout orchestration
//! - `ledger` - Ledger RPC and signer bridge clients
//! - `relay` - Privacy-pool relay client

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod models;
pub mod relay;
pub mod state;
