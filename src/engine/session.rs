// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Wallet session lifecycle.
//!
//! Tracks the connection to the external signing wallet: connect without
//! prompting when the provider already exposes an address, otherwise
//! request authorization; watch for account changes in the background.
//! The session only ever holds the capability handle and the last
//! observed public address, never key material.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::ledger::{SigningSession, TransferShape};

use super::activity::{ActivityLog, ActivityScope};
use super::error::EngineError;

pub struct WalletSession {
    signer: Arc<dyn SigningSession>,
    address: RwLock<Option<String>>,
    activity: Arc<ActivityLog>,
}

impl WalletSession {
    pub fn new(signer: Arc<dyn SigningSession>, activity: Arc<ActivityLog>) -> Self {
        Self {
            signer,
            address: RwLock::new(None),
            activity,
        }
    }

    /// The last observed wallet address, if connected.
    pub async fn current_address(&self) -> Option<String> {
        self.address.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.address.read().await.is_some()
    }

    /// Return the connected address, connecting first if necessary.
    ///
    /// A provider that already exposes an address is used without
    /// prompting; only when none does is authorization requested.
    pub async fn ensure_connected(&self) -> Result<String, EngineError> {
        if let Some(address) = self.address.read().await.clone() {
            return Ok(address);
        }

        let address = match self.signer.current_address().await? {
            Some(address) => address,
            None => self.signer.connect().await?,
        };

        *self.address.write().await = Some(address.clone());
        self.activity.append(
            ActivityScope::Wallet,
            format!("wallet connected: {}", abbreviate(&address)),
        );
        Ok(address)
    }

    /// Sign a transfer with the connected wallet and submit it.
    pub async fn sign_and_submit(&self, transfer: &TransferShape) -> Result<String, EngineError> {
        let transaction_id = self.signer.sign_and_submit(transfer).await?;
        Ok(transaction_id)
    }

    /// Watch the provider for account changes until shutdown.
    ///
    /// An address change updates tracked state and logs an entry; an
    /// absent address is a disconnect event, not an error. Runs for the
    /// lifetime of the session as a background task.
    pub fn spawn_account_watcher(
        self: &Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "account watcher starting");
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {},
                    _ = shutdown.cancelled() => {
                        info!("account watcher shutting down");
                        return;
                    }
                }
                session.observe_account().await;
            }
        })
    }

    /// One watcher sweep: compare the provider's address to ours.
    async fn observe_account(&self) {
        let observed = match self.signer.current_address().await {
            Ok(observed) => observed,
            Err(err) => {
                // Provider unreachable is not an account event.
                debug!(error = %err, "account watch poll failed");
                return;
            }
        };

        let mut tracked = self.address.write().await;
        match (tracked.as_deref(), observed.as_deref()) {
            (Some(old), Some(new)) if old != new => {
                self.activity.append(
                    ActivityScope::Wallet,
                    format!("wallet account changed to {}", abbreviate(new)),
                );
                *tracked = observed;
            }
            (Some(_), None) => {
                self.activity
                    .append(ActivityScope::Wallet, "wallet disconnected");
                *tracked = None;
            }
            _ => {}
        }
    }
}

/// Short display form of an address for log lines.
///
/// Counts characters rather than bytes so multibyte input never splits
/// a char boundary.
fn abbreviate(address: &str) -> String {
    let count = address.chars().count();
    if count <= 12 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address.chars().skip(count - 4).collect();
    format!("{head}..{tail}")
}
