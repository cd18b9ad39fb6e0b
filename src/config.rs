// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the persisted owner identity | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `RELAY_BASE_URL` | Base URL of the privacy-pool relay service | Required |
//! | `LEDGER_RPC_URL` | Base URL of the ledger RPC gateway | Required |
//! | `SIGNER_BRIDGE_URL` | Base URL of the external signer bridge | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

/// Environment variable name for the data directory path.
///
/// The owner identity (secret plus derived address) is the only state
/// persisted here; everything else is rebuilt per session.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the relay service base URL.
pub const RELAY_BASE_URL_ENV: &str = "RELAY_BASE_URL";

/// Environment variable name for the ledger RPC gateway base URL.
pub const LEDGER_RPC_URL_ENV: &str = "LEDGER_RPC_URL";

/// Environment variable name for the signer bridge base URL.
pub const SIGNER_BRIDGE_URL_ENV: &str = "SIGNER_BRIDGE_URL";

/// Environment variable name for the log format selector.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Number of decimal places the ledger's base unit carries.
pub const LEDGER_DECIMALS: u8 = 9;

/// Fixed fee buffer added on top of every funding transfer, in base units.
///
/// Covers relayer-side ledger costs. The buffer is transfer overhead only:
/// the relay deposit is always made with the requested amount, excluding
/// this buffer.
pub const FEE_BUFFER_BASE_UNITS: u64 = 6_900_000;

/// How often the wallet session polls the signer bridge for account changes.
pub const ACCOUNT_WATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Bounded retry policy for the post-finality settle check.
///
/// After a funding transfer finalizes, the destination address is polled
/// at a fixed interval until its balance reflects the transfer or the
/// attempt budget runs out. Injected into the funding orchestrator so
/// tests can run with a zero interval.
#[derive(Debug, Clone)]
pub struct SettlePolicy {
    /// Maximum number of balance polls before giving up.
    pub max_attempts: u32,
    /// Fixed delay between polls.
    pub interval: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(3),
        }
    }
}

impl SettlePolicy {
    /// Policy with no inter-attempt delay, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            interval: Duration::ZERO,
        }
    }
}
