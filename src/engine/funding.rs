// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Funding orchestration.
//!
//! Moves value from the external signing wallet into the custodial owner
//! address with a fixed fee buffer, waits for ledger finality, then
//! relays the requested amount (excluding the buffer) into the pool and
//! reconciles the tracked balance against the relay's report.
//!
//! Failure semantics: everything before signing is pure validation with
//! no side effects. Once the transfer is submitted it is never
//! resubmitted automatically; only the relay deposit step is safe for
//! the caller to retry, per the relay's session-reset contract.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{FEE_BUFFER_BASE_UNITS, LEDGER_DECIMALS, SettlePolicy};
use crate::ledger::{format_amount_short, FinalityStatus, LedgerClient, TransferShape};
use crate::relay::RelayClient;

use super::activity::{ActivityLog, ActivityScope};
use super::error::EngineError;
use super::identity::OwnerIdentity;
use super::session::WalletSession;
use super::{refresh_tracked_balance, TrackedBalance};

/// Successful funding result.
#[derive(Debug, Clone)]
pub struct FundOutcome {
    /// Relay-reported transaction identifier for the pool deposit.
    pub transaction_id: String,
    /// Pool balance after the deposit, as reported by the relay.
    pub pool_balance: u64,
}

pub struct FundingOrchestrator {
    ledger: Arc<dyn LedgerClient>,
    relay: Arc<dyn RelayClient>,
    session: Arc<WalletSession>,
    owner: Arc<OwnerIdentity>,
    activity: Arc<ActivityLog>,
    tracked: TrackedBalance,
    settle: SettlePolicy,
}

impl FundingOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        ledger: Arc<dyn LedgerClient>,
        relay: Arc<dyn RelayClient>,
        session: Arc<WalletSession>,
        owner: Arc<OwnerIdentity>,
        activity: Arc<ActivityLog>,
        tracked: TrackedBalance,
        settle: SettlePolicy,
    ) -> Self {
        Self {
            ledger,
            relay,
            session,
            owner,
            activity,
            tracked,
            settle,
        }
    }

    /// Fund the pool with `amount` base units.
    pub async fn fund(&self, amount: u64) -> Result<FundOutcome, EngineError> {
        let outcome = self.run(amount).await;
        if let Err(err) = &outcome {
            self.activity
                .append(ActivityScope::Funding, format!("funding failed: {err}"));
        }
        outcome
    }

    async fn run(&self, amount: u64) -> Result<FundOutcome, EngineError> {
        if amount == 0 {
            return Err(EngineError::Validation(
                "amount must be positive".to_string(),
            ));
        }

        let transfer_total = amount
            .checked_add(FEE_BUFFER_BASE_UNITS)
            .ok_or_else(|| EngineError::Validation("amount too large".to_string()))?;

        let sender = self.session.ensure_connected().await?;
        let spendable = self.ledger.get_spendable_balance(&sender).await?;

        let mut transfer = TransferShape {
            from: sender,
            to: self.owner.address().to_string(),
            amount: transfer_total,
            reference: None,
        };

        let network_fee = self.ledger.estimate_fee(&transfer).await?;
        let required = transfer_total
            .checked_add(network_fee)
            .ok_or_else(|| EngineError::Validation("amount too large".to_string()))?;

        if spendable < required {
            return Err(EngineError::InsufficientFunds {
                required,
                available: spendable,
                shortfall: required - spendable,
            });
        }

        let reference = self.ledger.latest_network_reference().await?;
        let validity_bound = reference.validity_bound;
        transfer.reference = Some(reference);

        // Side effects begin here: a real transfer may land on chain.
        let funding_tx = self.session.sign_and_submit(&transfer).await?;
        self.activity.append(
            ActivityScope::Funding,
            format!(
                "submitted funding transfer {} of {} units",
                funding_tx,
                format_amount_short(transfer_total, LEDGER_DECIMALS)
            ),
        );

        match self.ledger.await_finality(&funding_tx, validity_bound).await? {
            FinalityStatus::Finalized => {}
            FinalityStatus::Expired => return Err(EngineError::SubmissionExpired),
        }

        self.settle_check(transfer_total).await;

        self.relay.reset_session(&self.owner).await?;
        // The buffer is transfer overhead, not pool value: deposit the
        // requested amount only.
        let receipt = self.relay.deposit(&self.owner, amount).await?;

        let pool_balance =
            match refresh_tracked_balance(&*self.relay, &self.owner, &self.tracked).await {
                Ok(balance) => balance,
                Err(err) => {
                    warn!(error = %err, "balance re-fetch after deposit failed; using deposit receipt");
                    self.tracked.set_from_relay(receipt.pool_balance).await;
                    receipt.pool_balance
                }
            };

        info!(
            transaction_id = %receipt.transaction_id,
            pool_balance,
            "funding deposit acknowledged by relay"
        );
        self.activity.append(
            ActivityScope::Funding,
            format!(
                "deposited {} units into the pool ({})",
                format_amount_short(amount, LEDGER_DECIMALS),
                receipt.transaction_id
            ),
        );

        Ok(FundOutcome {
            transaction_id: receipt.transaction_id,
            pool_balance,
        })
    }

    /// Poll the owner address until the transfer is visible on chain.
    ///
    /// Exhaustion is non-fatal: the relay performs its own confirmation
    /// during deposit, so we log and continue.
    async fn settle_check(&self, transfer_total: u64) {
        for attempt in 1..=self.settle.max_attempts {
            match self.ledger.get_address_balance(self.owner.address()).await {
                Ok(balance) if balance >= transfer_total => return,
                Ok(balance) => {
                    tracing::debug!(attempt, balance, transfer_total, "transfer not yet visible");
                }
                Err(err) => {
                    tracing::debug!(attempt, error = %err, "settle check poll failed");
                }
            }
            if attempt < self.settle.max_attempts && !self.settle.interval.is_zero() {
                tokio::time::sleep(self.settle.interval).await;
            }
        }

        warn!(
            attempts = self.settle.max_attempts,
            "destination balance not yet visible; relying on relay-side confirmation"
        );
        self.activity.append(
            ActivityScope::Funding,
            "funding transfer not yet visible at destination; continuing",
        );
    }
}
