//! Finance accounts, transactions and subscriptions.
//!
//! # Invariants
//! - An account balance equals its opening balance plus the signed sum of
//!   its live transactions (`+amount` income, `-amount` expense).
//! - Transaction amounts are finite and strictly positive; the sign lives
//!   in `TransactionKind`.
//! - Subscription billing day is a day of month in `1..=31`.

use crate::model::{RefInput, UserId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AccountId = Uuid;
pub type TransactionId = Uuid;
pub type SubscriptionId = Uuid;

/// Money holder such as a bank account or wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceAccount {
    #[serde(rename = "_id")]
    pub id: AccountId,
    pub user: UserId,
    pub account_name: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinanceAccount {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.account_name.trim().is_empty() {
            return Err(ValidationError::Required("Please add an account name"));
        }
        if !self.balance.is_finite() {
            return Err(ValidationError::OutOfRange {
                field: "balance",
                expectation: "must be a finite number",
            });
        }
        Ok(())
    }
}

/// Account create payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub account_name: Option<String>,
    pub balance: Option<f64>,
}

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const LABELS: &'static [&'static str] = &["Income", "Expense"];

    pub fn from_label(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "Income" => Ok(Self::Income),
            "Expense" => Ok(Self::Expense),
            other => Err(ValidationError::InvalidChoice {
                field: "type",
                value: other.to_string(),
                allowed: Self::LABELS,
            }),
        }
    }

    pub fn as_db(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Balance change caused by recording `amount` of this kind.
    pub fn balance_delta(self, amount: f64) -> f64 {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

/// Embedded account reference returned with transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    #[serde(rename = "_id")]
    pub id: AccountId,
    pub account_name: String,
}

/// Single income or expense entry against an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: TransactionId,
    pub user: UserId,
    pub account: AccountRef,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::Required("Please add a description"));
        }
        validate_amount(self.amount)
    }
}

/// Transaction create payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub description: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
    pub account: Option<RefInput>,
}

/// Checks that a transaction amount is finite and positive.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "amount",
            expectation: "must be a positive number",
        })
    }
}

/// Recurring monthly charge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: SubscriptionId,
    pub user: UserId,
    pub name: String,
    pub monthly_cost: f64,
    /// Day of month the charge is billed on.
    pub billing_date: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub const BILLING_DAY_RANGE: std::ops::RangeInclusive<i64> = 1..=31;

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("Please add a subscription name"));
        }
        if !(self.monthly_cost.is_finite() && self.monthly_cost >= 0.0) {
            return Err(ValidationError::OutOfRange {
                field: "monthlyCost",
                expectation: "must be a non-negative number",
            });
        }
        if !Self::BILLING_DAY_RANGE.contains(&i64::from(self.billing_date)) {
            return Err(ValidationError::OutOfRange {
                field: "billingDate",
                expectation: "must be a day of month between 1 and 31",
            });
        }
        Ok(())
    }
}

/// Subscription create payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInput {
    pub name: Option<String>,
    pub monthly_cost: Option<f64>,
    pub billing_date: Option<i64>,
}

/// Dashboard totals across a user's finance records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_balance: f64,
    pub total_monthly_subscriptions: f64,
    pub account_count: usize,
    pub subscription_count: usize,
}
