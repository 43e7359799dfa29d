//! Credit ledger: per-user balances with an atomic check-and-debit.
//!
//! `CreditLedger` is the seam; `InMemoryLedger` is the only backend. Balance
//! check and decrement happen under one lock, so two concurrent debits for
//! the same user can never both pass the check against a stale balance.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::credits::ActionType;

/// Transactions retained per user; older entries are evicted first.
pub const MAX_HISTORY_PER_USER: usize = 500;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient credits: need {required}, have {available}")]
    InsufficientCredits { required: i64, available: i64 },

    #[error("Credit amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Adding {amount} credits to a balance of {balance} would overflow")]
    BalanceOverflow { balance: i64, amount: i64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Debit { action: ActionType },
    Credit { reason: String },
}

/// One balance change, recorded after it is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: i64,
    pub balance_before: i64,
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}

/// The ledger trait. Carried in `AppState` as `Arc<dyn CreditLedger>`.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Current balance. Unknown users are opened with the starting balance.
    async fn balance(&self, user_id: &str) -> i64;

    /// Atomically checks the balance and charges `action.cost()`.
    async fn debit(
        &self,
        user_id: &str,
        action: ActionType,
    ) -> Result<CreditTransaction, LedgerError>;

    /// Adds `amount` (> 0) to the balance. Fails without side effects if the
    /// new balance would not fit in an `i64`.
    async fn credit(
        &self,
        user_id: &str,
        amount: i64,
        reason: &str,
    ) -> Result<CreditTransaction, LedgerError>;

    /// Most recent transactions first, at most `limit`.
    async fn history(&self, user_id: &str, limit: usize) -> Vec<CreditTransaction>;
}

struct Account {
    balance: i64,
    transactions: VecDeque<CreditTransaction>,
}

impl Account {
    /// Applies `amount` and logs it. The caller has already validated the result.
    fn apply(&mut self, user_id: &str, kind: TransactionKind, amount: i64) -> CreditTransaction {
        let balance_before = self.balance;
        self.balance += amount;

        let transaction = CreditTransaction {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind,
            amount,
            balance_before,
            balance_after: self.balance,
            created_at: Utc::now(),
        };

        if self.transactions.len() == MAX_HISTORY_PER_USER {
            self.transactions.pop_front();
        }
        self.transactions.push_back(transaction.clone());
        transaction
    }
}

/// Process-local ledger. Balances reset on restart.
pub struct InMemoryLedger {
    starting_credits: i64,
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryLedger {
    pub fn new(starting_credits: i64) -> Self {
        Self {
            starting_credits,
            accounts: Mutex::new(HashMap::new()),
        }
    }
}

fn open_account<'a>(
    accounts: &'a mut HashMap<String, Account>,
    user_id: &str,
    starting_credits: i64,
) -> &'a mut Account {
    accounts.entry(user_id.to_string()).or_insert_with(|| {
        info!("Opening credit account for {user_id} with {starting_credits} credits");
        Account {
            balance: starting_credits,
            transactions: VecDeque::new(),
        }
    })
}

#[async_trait]
impl CreditLedger for InMemoryLedger {
    async fn balance(&self, user_id: &str) -> i64 {
        let mut accounts = self.accounts.lock().await;
        open_account(&mut accounts, user_id, self.starting_credits).balance
    }

    async fn debit(
        &self,
        user_id: &str,
        action: ActionType,
    ) -> Result<CreditTransaction, LedgerError> {
        let required = action.cost();
        let mut accounts = self.accounts.lock().await;
        let account = open_account(&mut accounts, user_id, self.starting_credits);

        if account.balance < required {
            return Err(LedgerError::InsufficientCredits {
                required,
                available: account.balance,
            });
        }

        let transaction = account.apply(user_id, TransactionKind::Debit { action }, -required);
        debug!(
            "Debited {required} credits from {user_id} for {action:?}: {} -> {}",
            transaction.balance_before, transaction.balance_after
        );
        Ok(transaction)
    }

    async fn credit(
        &self,
        user_id: &str,
        amount: i64,
        reason: &str,
    ) -> Result<CreditTransaction, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let mut accounts = self.accounts.lock().await;
        let account = open_account(&mut accounts, user_id, self.starting_credits);

        if account.balance.checked_add(amount).is_none() {
            warn!("Rejected credit of {amount} for {user_id}: balance would overflow");
            return Err(LedgerError::BalanceOverflow {
                balance: account.balance,
                amount,
            });
        }

        let kind = TransactionKind::Credit {
            reason: reason.to_string(),
        };
        let transaction = account.apply(user_id, kind, amount);
        info!(
            "Added {amount} credits to {user_id} ({reason}): {} -> {}",
            transaction.balance_before, transaction.balance_after
        );
        Ok(transaction)
    }

    async fn history(&self, user_id: &str, limit: usize) -> Vec<CreditTransaction> {
        let accounts = self.accounts.lock().await;
        accounts
            .get(user_id)
            .map(|account| account.transactions.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_new_user_gets_starting_balance() {
        let ledger = InMemoryLedger::new(10);
        assert_eq!(ledger.balance("alice").await, 10);
    }

    #[tokio::test]
    async fn test_debit_charges_action_cost() {
        let ledger = InMemoryLedger::new(10);
        let tx = ledger.debit("alice", ActionType::ResumeAnalysis).await.unwrap();
        assert_eq!(tx.balance_before, 10);
        assert_eq!(tx.balance_after, 8);
        assert_eq!(tx.amount, -2);
        assert_eq!(ledger.balance("alice").await, 8);
    }

    #[tokio::test]
    async fn test_debit_rejected_when_balance_too_low() {
        let ledger = InMemoryLedger::new(4);
        let err = ledger
            .debit("alice", ActionType::BulkApplication)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientCredits {
                required: 5,
                available: 4
            }
        );
        assert_eq!(ledger.balance("alice").await, 4);
        assert!(ledger.history("alice", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_credit_rejects_non_positive_amounts() {
        let ledger = InMemoryLedger::new(0);
        assert_eq!(
            ledger.credit("alice", 0, "manual").await.unwrap_err(),
            LedgerError::InvalidAmount(0)
        );
        assert_eq!(
            ledger.credit("alice", -3, "manual").await.unwrap_err(),
            LedgerError::InvalidAmount(-3)
        );
    }

    #[tokio::test]
    async fn test_credit_then_history_newest_first() {
        let ledger = InMemoryLedger::new(0);
        ledger.credit("alice", 20, "signup_bonus").await.unwrap();
        ledger.debit("alice", ActionType::SkillAnalysis).await.unwrap();
        ledger.credit("bob", 5, "manual").await.unwrap();

        let history = ledger.history("alice", 10).await;
        assert_eq!(history.len(), 2);
        assert_eq!(
            history[0].kind,
            TransactionKind::Debit {
                action: ActionType::SkillAnalysis
            }
        );
        assert_eq!(history[1].balance_after, 20);

        assert_eq!(ledger.history("alice", 1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_credit_overflow_rejected_and_balance_untouched() {
        let ledger = InMemoryLedger::new(10);
        let err = ledger.credit("alice", i64::MAX, "manual").await.unwrap_err();
        assert_eq!(
            err,
            LedgerError::BalanceOverflow {
                balance: 10,
                amount: i64::MAX
            }
        );
        assert_eq!(ledger.balance("alice").await, 10);
        assert!(ledger.history("alice", 10).await.is_empty());

        // Exactly reaching i64::MAX is still allowed.
        let tx = ledger.credit("alice", i64::MAX - 10, "manual").await.unwrap();
        assert_eq!(tx.balance_after, i64::MAX);
        assert!(ledger.credit("alice", 1, "manual").await.is_err());
    }

    #[tokio::test]
    async fn test_history_capped_per_user() {
        let ledger = InMemoryLedger::new(0);
        for _ in 0..MAX_HISTORY_PER_USER + 5 {
            ledger.credit("alice", 1, "manual").await.unwrap();
        }
        ledger.credit("bob", 3, "manual").await.unwrap();

        let history = ledger.history("alice", usize::MAX).await;
        assert_eq!(history.len(), MAX_HISTORY_PER_USER);
        assert_eq!(history[0].balance_after, (MAX_HISTORY_PER_USER + 5) as i64);
        assert_eq!(history.last().unwrap().balance_after, 6);
        assert_eq!(ledger.balance("alice").await, (MAX_HISTORY_PER_USER + 5) as i64);

        assert_eq!(ledger.history("bob", 10).await.len(), 1);
        assert!(ledger.history("carol", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_debits_never_overdraw() {
        let ledger = Arc::new(InMemoryLedger::new(5));
        let mut handles = Vec::new();
        for _ in 0..20 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.debit("alice", ActionType::SkillAnalysis).await.is_ok()
            }));
        }

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 5);
        assert_eq!(ledger.balance("alice").await, 0);
    }
}
