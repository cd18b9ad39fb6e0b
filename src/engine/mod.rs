// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Orchestration engine.
//!
//! Ties the capability handles together: the owner identity, the relay
//! client, the wallet session, and the funding and payout flows, plus
//! the relay-reported pool balance shared between them.
//!
//! | Module     | Responsibility                                   |
//! |------------|--------------------------------------------------|
//! | `identity` | Owner secret generation, derivation, persistence |
//! | `session`  | Signing-wallet connection lifecycle              |
//! | `funding`  | Fund-the-pool flow                               |
//! | `payout`   | Recipient queue and batch withdrawals            |
//! | `activity` | Bounded in-memory event log                      |
//! | `error`    | Orchestration error taxonomy                     |

pub mod activity;
pub mod error;
pub mod funding;
pub mod identity;
pub mod payout;
pub mod session;

#[cfg(test)]
pub(crate) mod testkit;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::config::SettlePolicy;
use crate::ledger::{LedgerClient, SigningSession};
use crate::relay::RelayClient;

use activity::{ActivityLog, ActivityScope};
pub use error::EngineError;
use funding::FundingOrchestrator;
use identity::OwnerIdentity;
use payout::PayoutBatchProcessor;
use session::WalletSession;

/// Last relay-reported pool balance.
///
/// Only ever written from relay responses. `None` until the relay has
/// reported at least once this session.
#[derive(Clone, Default)]
pub struct TrackedBalance {
    inner: Arc<RwLock<Option<u64>>>,
}

impl TrackedBalance {
    pub async fn get(&self) -> Option<u64> {
        *self.inner.read().await
    }

    /// Record a balance the relay reported.
    pub async fn set_from_relay(&self, balance: u64) {
        *self.inner.write().await = Some(balance);
    }
}

/// Reset the relay session, fetch the pool balance, and record it.
pub(crate) async fn refresh_tracked_balance(
    relay: &dyn RelayClient,
    owner: &OwnerIdentity,
    tracked: &TrackedBalance,
) -> Result<u64, EngineError> {
    relay.reset_session(owner).await?;
    let balance = relay.get_pool_balance(owner).await?;
    tracked.set_from_relay(balance).await;
    Ok(balance)
}

/// The assembled orchestration engine, shared across request handlers.
pub struct Engine {
    pub owner: Arc<OwnerIdentity>,
    pub relay: Arc<dyn RelayClient>,
    pub session: Arc<WalletSession>,
    pub funding: FundingOrchestrator,
    pub payouts: PayoutBatchProcessor,
    pub activity: Arc<ActivityLog>,
    tracked: TrackedBalance,
}

impl Engine {
    pub fn new(
        owner: OwnerIdentity,
        ledger: Arc<dyn LedgerClient>,
        relay: Arc<dyn RelayClient>,
        signer: Arc<dyn SigningSession>,
        settle: SettlePolicy,
    ) -> Self {
        let owner = Arc::new(owner);
        let activity = Arc::new(ActivityLog::new());
        let tracked = TrackedBalance::default();
        let session = Arc::new(WalletSession::new(signer, Arc::clone(&activity)));

        info!(owner_address = %owner.address(), "engine initialized");

        let funding = FundingOrchestrator::new(
            ledger,
            Arc::clone(&relay),
            Arc::clone(&session),
            Arc::clone(&owner),
            Arc::clone(&activity),
            tracked.clone(),
            settle,
        );
        let payouts = PayoutBatchProcessor::new(
            Arc::clone(&relay),
            Arc::clone(&owner),
            Arc::clone(&activity),
            tracked.clone(),
        );

        Self {
            owner,
            relay,
            session,
            funding,
            payouts,
            activity,
            tracked,
        }
    }

    /// Last relay-reported balance without contacting the relay.
    pub async fn tracked_balance(&self) -> Option<u64> {
        self.tracked.get().await
    }

    /// Fetch the pool balance from the relay and record it.
    ///
    /// Read-only with respect to the pool; safe to call repeatedly.
    pub async fn get_balance(&self) -> Result<u64, EngineError> {
        match refresh_tracked_balance(&*self.relay, &self.owner, &self.tracked).await {
            Ok(balance) => Ok(balance),
            Err(err) => {
                self.activity.append(
                    ActivityScope::Balance,
                    format!("balance query failed: {err}"),
                );
                Err(err)
            }
        }
    }
}
