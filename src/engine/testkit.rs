// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! Scripted capability mocks shared by the engine tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ledger::{
    FinalityStatus, LedgerClient, LedgerError, NetworkReference, SignerError, SigningSession,
    TransferShape,
};
use crate::relay::{DepositReceipt, RelayClient, RelayError, WithdrawalReceipt};

use super::identity::OwnerIdentity;

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

pub(crate) struct MockSigner {
    pub current: Arc<Mutex<Option<String>>>,
    pub connect_address: Option<String>,
    pub reject_connect: Option<String>,
    pub unavailable: bool,
    pub submit_tx_id: String,
    pub submitted: Mutex<Vec<TransferShape>>,
}

impl MockSigner {
    fn base() -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            connect_address: None,
            reject_connect: None,
            unavailable: false,
            submit_tx_id: "tx-funding-1".to_string(),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Provider already authorized: exposes an address without prompting.
    pub fn with_current_address(address: &str) -> Self {
        let signer = Self::base();
        *signer.current.lock().unwrap() = Some(address.to_string());
        signer
    }

    /// Provider present but requires a connect prompt.
    pub fn prompting(address: &str) -> Self {
        Self {
            connect_address: Some(address.to_string()),
            ..Self::base()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::base()
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_connect: Some(message.to_string()),
            ..Self::base()
        }
    }
}

#[async_trait]
impl SigningSession for MockSigner {
    async fn current_address(&self) -> Result<Option<String>, SignerError> {
        if self.unavailable {
            return Err(SignerError::Unavailable);
        }
        Ok(self.current.lock().unwrap().clone())
    }

    async fn connect(&self) -> Result<String, SignerError> {
        if self.unavailable {
            return Err(SignerError::Unavailable);
        }
        if let Some(message) = &self.reject_connect {
            return Err(SignerError::Rejected(message.clone()));
        }
        match &self.connect_address {
            Some(address) => {
                *self.current.lock().unwrap() = Some(address.clone());
                Ok(address.clone())
            }
            None => Err(SignerError::Unavailable),
        }
    }

    async fn sign_and_submit(&self, transfer: &TransferShape) -> Result<String, SignerError> {
        self.submitted.lock().unwrap().push(transfer.clone());
        Ok(self.submit_tx_id.clone())
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

pub(crate) struct MockLedger {
    pub spendable: u64,
    pub fee: u64,
    pub reference: NetworkReference,
    pub finality: FinalityStatus,
    /// Scripted destination-balance poll responses, consumed in order.
    /// When exhausted, polls return 0.
    pub address_balances: Mutex<VecDeque<u64>>,
    pub balance_polls: AtomicU32,
}

impl MockLedger {
    pub fn new(spendable: u64, fee: u64) -> Self {
        Self {
            spendable,
            fee,
            reference: NetworkReference {
                reference: "ref-abc".to_string(),
                validity_bound: 1_000,
            },
            finality: FinalityStatus::Finalized,
            address_balances: Mutex::new(VecDeque::new()),
            balance_polls: AtomicU32::new(0),
        }
    }

    pub fn with_settle_balances(self, balances: &[u64]) -> Self {
        *self.address_balances.lock().unwrap() = balances.iter().copied().collect();
        self
    }

    pub fn with_finality(mut self, finality: FinalityStatus) -> Self {
        self.finality = finality;
        self
    }

    pub fn polls(&self) -> u32 {
        self.balance_polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_spendable_balance(&self, _address: &str) -> Result<u64, LedgerError> {
        Ok(self.spendable)
    }

    async fn estimate_fee(&self, _transfer: &TransferShape) -> Result<u64, LedgerError> {
        Ok(self.fee)
    }

    async fn latest_network_reference(&self) -> Result<NetworkReference, LedgerError> {
        Ok(self.reference.clone())
    }

    async fn await_finality(
        &self,
        _transaction_id: &str,
        _validity_bound: u64,
    ) -> Result<FinalityStatus, LedgerError> {
        Ok(self.finality)
    }

    async fn get_address_balance(&self, _address: &str) -> Result<u64, LedgerError> {
        self.balance_polls.fetch_add(1, Ordering::SeqCst);
        Ok(self.address_balances.lock().unwrap().pop_front().unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct MockRelay {
    /// Ordered record of primitive calls, for reset-precedes-call checks.
    pub calls: Mutex<Vec<String>>,
    pub deposit_responses: Mutex<VecDeque<Result<DepositReceipt, RelayError>>>,
    pub withdraw_responses: Mutex<VecDeque<Result<WithdrawalReceipt, RelayError>>>,
    pub balances: Mutex<VecDeque<u64>>,
    pub last_balance: Mutex<u64>,
}

impl MockRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_deposit(&self, response: Result<DepositReceipt, RelayError>) {
        self.deposit_responses.lock().unwrap().push_back(response);
    }

    pub fn script_withdraw(&self, response: Result<WithdrawalReceipt, RelayError>) {
        self.withdraw_responses.lock().unwrap().push_back(response);
    }

    pub fn script_balance(&self, balance: u64) {
        self.balances.lock().unwrap().push_back(balance);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl RelayClient for MockRelay {
    async fn reset_session(&self, _owner: &OwnerIdentity) -> Result<(), RelayError> {
        self.record("reset");
        Ok(())
    }

    async fn deposit(
        &self,
        _owner: &OwnerIdentity,
        amount: u64,
    ) -> Result<DepositReceipt, RelayError> {
        self.record(format!("deposit:{amount}"));
        self.deposit_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RelayError::Service("unscripted deposit".to_string())))
    }

    async fn withdraw(
        &self,
        _owner: &OwnerIdentity,
        recipient_address: &str,
        amount: u64,
    ) -> Result<WithdrawalReceipt, RelayError> {
        self.record(format!("withdraw:{recipient_address}:{amount}"));
        self.withdraw_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RelayError::Service("unscripted withdraw".to_string())))
    }

    async fn get_pool_balance(&self, _owner: &OwnerIdentity) -> Result<u64, RelayError> {
        self.record("balance");
        let mut last = self.last_balance.lock().unwrap();
        if let Some(next) = self.balances.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(*last)
    }
}

/// A full-success withdrawal receipt for scripting.
pub(crate) fn ok_withdrawal(recipient: &str, amount: u64) -> WithdrawalReceipt {
    WithdrawalReceipt {
        transaction_id: format!("wtx-{recipient}"),
        recipient_address: recipient.to_string(),
        amount_settled: amount,
        fee_charged: 1_000,
        is_partial: false,
    }
}
