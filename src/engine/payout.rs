// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Payout batches.
//!
//! Holds the recipient queue and executes it as a sequential batch of
//! relay withdrawals: one session reset and one withdrawal per
//! recipient, in queue order, aborting on the first failure. Per-item
//! receipts are preserved so partial fulfilment by the relay is visible
//! to the caller rather than folded into an aggregate.
//!
//! The queue mutex is held for the whole batch run, which serializes
//! concurrent payout requests in-process.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::LEDGER_DECIMALS;
use crate::ledger::{canonical_address, format_amount_short};
use crate::relay::{RelayClient, WithdrawalReceipt};

use super::activity::{ActivityLog, ActivityScope};
use super::error::EngineError;
use super::identity::OwnerIdentity;
use super::{refresh_tracked_balance, TrackedBalance};

/// A queued payout recipient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipientEntry {
    pub id: Uuid,
    pub address: String,
    /// Base units to withdraw for this recipient.
    pub amount: u64,
}

impl RecipientEntry {
    pub fn new(address: &str, amount: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            address: canonical_address(address),
            amount,
        }
    }
}

/// Where and why a batch stopped early.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchAbort {
    pub recipient_id: Uuid,
    pub recipient_address: String,
    /// Withdrawals completed before the failing recipient.
    pub completed: usize,
    pub reason: String,
}

/// Outcome of a batch run. `aborted` is populated when the run stopped
/// early; `results` then covers only the recipients processed before
/// the failure.
#[derive(Debug, Clone)]
pub struct PayoutOutcome {
    pub results: Vec<WithdrawalReceipt>,
    /// Pool balance re-fetched from the relay after the run, when the
    /// re-fetch itself succeeded.
    pub pool_balance: Option<u64>,
    pub aborted: Option<BatchAbort>,
}

pub struct PayoutBatchProcessor {
    relay: Arc<dyn RelayClient>,
    owner: Arc<OwnerIdentity>,
    activity: Arc<ActivityLog>,
    tracked: TrackedBalance,
    queue: Mutex<Vec<RecipientEntry>>,
}

impl PayoutBatchProcessor {
    pub(super) fn new(
        relay: Arc<dyn RelayClient>,
        owner: Arc<OwnerIdentity>,
        activity: Arc<ActivityLog>,
        tracked: TrackedBalance,
    ) -> Self {
        Self {
            relay,
            owner,
            activity,
            tracked,
            queue: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the queue in execution order.
    pub async fn recipients(&self) -> Vec<RecipientEntry> {
        self.queue.lock().await.clone()
    }

    /// Append a recipient to the queue.
    pub async fn add_recipient(&self, address: &str, amount: u64) -> Result<RecipientEntry, EngineError> {
        let entry = validated_entry(address, amount)?;
        self.queue.lock().await.push(entry.clone());
        Ok(entry)
    }

    /// Remove a queued recipient by id.
    pub async fn remove_recipient(&self, id: Uuid) -> bool {
        let mut queue = self.queue.lock().await;
        let before = queue.len();
        queue.retain(|entry| entry.id != id);
        queue.len() != before
    }

    /// Replace the queue wholesale.
    pub async fn set_recipients(
        &self,
        recipients: &[(String, u64)],
    ) -> Result<Vec<RecipientEntry>, EngineError> {
        let mut entries = Vec::with_capacity(recipients.len());
        for (address, amount) in recipients {
            entries.push(validated_entry(address, *amount)?);
        }
        let mut queue = self.queue.lock().await;
        *queue = entries.clone();
        Ok(entries)
    }

    /// Run the queued batch.
    ///
    /// The whole batch is validated before any withdrawal is attempted;
    /// a bad entry rejects the batch without touching the relay. An
    /// abort mid-run is reported in the outcome, not as an error, so
    /// completed receipts are never lost. The queue is cleared only
    /// when every recipient completed.
    pub async fn run(&self) -> Result<PayoutOutcome, EngineError> {
        let mut queue = self.queue.lock().await;
        let outcome = self.execute(&queue).await;
        match &outcome {
            Ok(result) if result.aborted.is_none() => queue.clear(),
            Ok(_) => {}
            Err(err) => {
                self.activity
                    .append(ActivityScope::Payout, format!("payout failed: {err}"));
            }
        }
        outcome
    }

    async fn execute(&self, batch: &[RecipientEntry]) -> Result<PayoutOutcome, EngineError> {
        if batch.is_empty() {
            return Err(EngineError::Validation(
                "payout queue is empty".to_string(),
            ));
        }

        let mut total: u64 = 0;
        for entry in batch {
            if entry.address.is_empty() {
                return Err(EngineError::Validation(
                    "recipient address must not be empty".to_string(),
                ));
            }
            if entry.amount == 0 {
                return Err(EngineError::Validation(format!(
                    "recipient {} has a zero amount",
                    entry.address
                )));
            }
            total = total
                .checked_add(entry.amount)
                .ok_or_else(|| EngineError::Validation("batch total too large".to_string()))?;
        }

        // Advisory pre-check against the last relay-reported balance.
        // The relay remains the authority; this only rejects batches
        // that are already known not to fit.
        if let Some(available) = self.tracked.get().await {
            if total > available {
                return Err(EngineError::InsufficientFunds {
                    required: total,
                    available,
                    shortfall: total - available,
                });
            }
        }

        info!(
            recipients = batch.len(),
            total, "starting payout batch"
        );

        let mut results = Vec::with_capacity(batch.len());
        let mut aborted = None;

        for entry in batch {
            match self.withdraw_one(entry).await {
                Ok(receipt) => {
                    if receipt.is_partial {
                        self.activity.append(
                            ActivityScope::Payout,
                            format!(
                                "partial fulfilment for {}: {} of {} units settled",
                                entry.address,
                                format_amount_short(receipt.amount_settled, LEDGER_DECIMALS),
                                format_amount_short(entry.amount, LEDGER_DECIMALS)
                            ),
                        );
                    }
                    results.push(receipt);
                }
                Err(err) => {
                    warn!(
                        recipient = %entry.address,
                        completed = results.len(),
                        error = %err,
                        "payout batch aborted"
                    );
                    self.activity.append(
                        ActivityScope::Payout,
                        format!(
                            "payout aborted at {} after {} withdrawals: {err}",
                            entry.address,
                            results.len()
                        ),
                    );
                    aborted = Some(BatchAbort {
                        recipient_id: entry.id,
                        recipient_address: entry.address.clone(),
                        completed: results.len(),
                        reason: err.to_string(),
                    });
                    break;
                }
            }
        }

        // The balance after a batch is whatever the relay says it is,
        // never a local subtraction.
        let pool_balance =
            match refresh_tracked_balance(&*self.relay, &self.owner, &self.tracked).await {
                Ok(balance) => Some(balance),
                Err(err) => {
                    warn!(error = %err, "balance re-fetch after payout failed");
                    None
                }
            };

        if aborted.is_none() {
            self.activity.append(
                ActivityScope::Payout,
                format!(
                    "payout batch completed: {} withdrawals, {} units",
                    results.len(),
                    format_amount_short(total, LEDGER_DECIMALS)
                ),
            );
        }

        Ok(PayoutOutcome {
            results,
            pool_balance,
            aborted,
        })
    }

    async fn withdraw_one(&self, entry: &RecipientEntry) -> Result<WithdrawalReceipt, EngineError> {
        self.relay.reset_session(&self.owner).await?;
        let receipt = self
            .relay
            .withdraw(&self.owner, &entry.address, entry.amount)
            .await?;
        Ok(receipt)
    }
}

fn validated_entry(address: &str, amount: u64) -> Result<RecipientEntry, EngineError> {
    let entry = RecipientEntry::new(address, amount);
    if entry.address.is_empty() {
        return Err(EngineError::Validation(
            "recipient address must not be empty".to_string(),
        ));
    }
    if entry.amount == 0 {
        return Err(EngineError::Validation(
            "recipient amount must be positive".to_string(),
        ));
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testkit::{ok_withdrawal, MockRelay};
    use crate::relay::RelayError;

    const UNIT: u64 = 1_000_000_000;

    fn processor(relay: Arc<MockRelay>) -> PayoutBatchProcessor {
        PayoutBatchProcessor::new(
            relay,
            Arc::new(OwnerIdentity::generate()),
            Arc::new(ActivityLog::new()),
            TrackedBalance::default(),
        )
    }

    #[tokio::test]
    async fn batch_runs_in_order_and_clears_queue_on_success() {
        let relay = Arc::new(MockRelay::new());
        relay.script_withdraw(Ok(ok_withdrawal("r1", 100)));
        relay.script_withdraw(Ok(ok_withdrawal("r2", 200)));
        relay.script_balance(700);

        let processor = processor(Arc::clone(&relay));
        processor.add_recipient("r1", 100).await.unwrap();
        processor.add_recipient("r2", 200).await.unwrap();

        let outcome = processor.run().await.unwrap();
        assert!(outcome.aborted.is_none());
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].recipient_address, "r1");
        assert_eq!(outcome.results[1].recipient_address, "r2");
        assert_eq!(outcome.pool_balance, Some(700));
        assert!(processor.recipients().await.is_empty());

        // Every relay primitive, the final balance query included, is
        // preceded by its own session reset.
        let calls = relay.calls();
        assert_eq!(
            calls,
            vec![
                "reset",
                "withdraw:r1:100",
                "reset",
                "withdraw:r2:200",
                "reset",
                "balance"
            ]
        );
    }

    #[tokio::test]
    async fn batch_aborts_on_first_failure_and_keeps_queue() {
        let relay = Arc::new(MockRelay::new());
        relay.script_withdraw(Ok(ok_withdrawal("r1", 100)));
        relay.script_withdraw(Err(RelayError::Service("proof rejected".to_string())));
        relay.script_balance(900);

        let processor = processor(Arc::clone(&relay));
        processor.add_recipient("r1", 100).await.unwrap();
        processor.add_recipient("r2", 200).await.unwrap();
        processor.add_recipient("r3", 300).await.unwrap();

        let outcome = processor.run().await.unwrap();
        let abort = outcome.aborted.expect("batch should abort");
        assert_eq!(abort.recipient_address, "r2");
        assert_eq!(abort.completed, 1);
        assert!(abort.reason.contains("proof rejected"));

        // r1 completed, r3 was never attempted.
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].recipient_address, "r1");
        assert!(!relay
            .calls()
            .iter()
            .any(|c| c.starts_with("withdraw:r3")));

        // Queue survives for correction and retry.
        assert_eq!(processor.recipients().await.len(), 3);
        // Balance was still re-fetched from the relay.
        assert_eq!(outcome.pool_balance, Some(900));
    }

    #[tokio::test]
    async fn zero_amount_entry_rejects_whole_batch_before_any_relay_call() {
        let relay = Arc::new(MockRelay::new());
        let processor = processor(Arc::clone(&relay));

        // Inject the invalid entry directly; add_recipient would refuse it.
        {
            let mut queue = processor.queue.lock().await;
            queue.push(RecipientEntry::new("r1", 100));
            queue.push(RecipientEntry {
                id: Uuid::new_v4(),
                address: "r2".to_string(),
                amount: 0,
            });
        }

        let err = processor.run().await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(relay.calls().is_empty());
        assert_eq!(processor.recipients().await.len(), 2);
    }

    #[tokio::test]
    async fn empty_queue_is_a_validation_error() {
        let relay = Arc::new(MockRelay::new());
        let processor = processor(Arc::clone(&relay));
        let err = processor.run().await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(relay.calls().is_empty());
    }

    #[tokio::test]
    async fn tracked_balance_guard_rejects_oversized_batch() {
        let relay = Arc::new(MockRelay::new());
        let tracked = TrackedBalance::default();
        tracked.set_from_relay(UNIT / 10).await; // 0.1 units in the pool

        let processor = PayoutBatchProcessor::new(
            Arc::clone(&relay) as Arc<dyn RelayClient>,
            Arc::new(OwnerIdentity::generate()),
            Arc::new(ActivityLog::new()),
            tracked,
        );
        processor.add_recipient("r1", UNIT / 2).await.unwrap(); // 0.5 requested

        let err = processor.run().await.unwrap_err();
        match err {
            EngineError::InsufficientFunds {
                required,
                available,
                shortfall,
            } => {
                assert_eq!(required, UNIT / 2);
                assert_eq!(available, UNIT / 10);
                assert_eq!(shortfall, UNIT / 2 - UNIT / 10);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(relay.calls().is_empty());
    }

    #[tokio::test]
    async fn partial_fulfilment_is_surfaced_per_item() {
        let relay = Arc::new(MockRelay::new());
        relay.script_withdraw(Ok(WithdrawalReceipt {
            transaction_id: "wtx-r1".to_string(),
            recipient_address: "r1".to_string(),
            amount_settled: 60,
            fee_charged: 5,
            is_partial: true,
        }));
        relay.script_balance(0);

        let activity = Arc::new(ActivityLog::new());
        let processor = PayoutBatchProcessor::new(
            Arc::clone(&relay) as Arc<dyn RelayClient>,
            Arc::new(OwnerIdentity::generate()),
            Arc::clone(&activity),
            TrackedBalance::default(),
        );
        processor.add_recipient("r1", 100).await.unwrap();

        let outcome = processor.run().await.unwrap();
        assert!(outcome.aborted.is_none());
        assert!(outcome.results[0].is_partial);
        assert_eq!(outcome.results[0].amount_settled, 60);
        assert!(activity
            .entries()
            .iter()
            .any(|e| e.message.contains("partial fulfilment")));
    }

    #[tokio::test]
    async fn balance_refetch_failure_leaves_outcome_balance_unset() {
        struct BalanceFailingRelay(MockRelay);

        #[async_trait::async_trait]
        impl RelayClient for BalanceFailingRelay {
            async fn reset_session(&self, owner: &OwnerIdentity) -> Result<(), RelayError> {
                self.0.reset_session(owner).await
            }
            async fn deposit(
                &self,
                owner: &OwnerIdentity,
                amount: u64,
            ) -> Result<crate::relay::DepositReceipt, RelayError> {
                self.0.deposit(owner, amount).await
            }
            async fn withdraw(
                &self,
                owner: &OwnerIdentity,
                recipient: &str,
                amount: u64,
            ) -> Result<WithdrawalReceipt, RelayError> {
                self.0.withdraw(owner, recipient, amount).await
            }
            async fn get_pool_balance(&self, _owner: &OwnerIdentity) -> Result<u64, RelayError> {
                Err(RelayError::Transport("timed out".to_string()))
            }
        }

        let inner = MockRelay::new();
        inner.script_withdraw(Ok(ok_withdrawal("r1", 100)));
        let tracked = TrackedBalance::default();

        let processor = PayoutBatchProcessor::new(
            Arc::new(BalanceFailingRelay(inner)),
            Arc::new(OwnerIdentity::generate()),
            Arc::new(ActivityLog::new()),
            tracked.clone(),
        );
        processor.add_recipient("r1", 100).await.unwrap();

        let outcome = processor.run().await.unwrap();
        assert!(outcome.aborted.is_none());
        assert_eq!(outcome.pool_balance, None);
        // Tracked balance is never synthesized locally.
        assert_eq!(tracked.get().await, None);
    }

    #[tokio::test]
    async fn remove_recipient_drops_only_the_matching_entry() {
        let processor = processor(Arc::new(MockRelay::new()));
        let kept = processor.add_recipient("r1", 100).await.unwrap();
        let removed = processor.add_recipient("r2", 200).await.unwrap();

        assert!(processor.remove_recipient(removed.id).await);
        assert!(!processor.remove_recipient(removed.id).await);

        let remaining = processor.recipients().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);
    }
}
