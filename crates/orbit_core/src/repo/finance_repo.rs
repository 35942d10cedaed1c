//! Finance repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist accounts, transactions and subscriptions of one user.
//! - Keep account balances consistent with recorded transactions.
//!
//! # Invariants
//! - Recording or removing a transaction and the matching balance change
//!   commit together or not at all (`BEGIN IMMEDIATE` transaction).
//! - A stored balance is always finite; a transaction that would overflow it
//!   is refused.
//! - Deleting an account removes its transactions (FK cascade) without
//!   touching any other balance.

use crate::model::finance::{
    AccountId, AccountRef, FinanceAccount, FinanceSummary, Subscription, SubscriptionId,
    Transaction, TransactionId, TransactionKind,
};
use crate::model::{now_utc, UserId, ValidationError};
use crate::repo::{expect_changed, from_millis, parse_id, to_millis, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const ACCOUNT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    account_name,
    balance,
    created_at,
    updated_at
FROM finance_accounts";

const TRANSACTION_SELECT_SQL: &str = "SELECT
    t.id,
    t.user_id,
    t.account_id,
    a.account_name,
    t.description,
    t.amount,
    t.kind,
    t.occurred_at,
    t.created_at,
    t.updated_at
FROM transactions t
INNER JOIN finance_accounts a ON a.id = t.account_id";

const SUBSCRIPTION_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    monthly_cost,
    billing_day,
    created_at,
    updated_at
FROM subscriptions";

/// Repository interface for finance records.
pub trait FinanceRepository {
    fn create_account(&self, account: &FinanceAccount) -> RepoResult<AccountId>;
    fn get_account(&self, user: UserId, id: AccountId) -> RepoResult<Option<FinanceAccount>>;
    /// Lists accounts oldest first.
    fn list_accounts(&self, user: UserId) -> RepoResult<Vec<FinanceAccount>>;
    /// Deletes an account together with its transactions.
    fn delete_account(&self, user: UserId, id: AccountId) -> RepoResult<()>;

    /// Inserts a transaction and applies its balance delta atomically.
    ///
    /// Returns `NotFound(account id)` when the account is missing or owned by
    /// another user.
    fn record_transaction(&mut self, transaction: &Transaction) -> RepoResult<TransactionId>;
    fn get_transaction(&self, user: UserId, id: TransactionId) -> RepoResult<Option<Transaction>>;
    /// Lists transactions by transaction date, newest first.
    fn list_transactions(&self, user: UserId) -> RepoResult<Vec<Transaction>>;
    /// Deletes a transaction and reverts its balance delta atomically.
    fn remove_transaction(&mut self, user: UserId, id: TransactionId) -> RepoResult<Transaction>;

    fn create_subscription(&self, subscription: &Subscription) -> RepoResult<SubscriptionId>;
    /// Lists subscriptions by billing day ascending.
    fn list_subscriptions(&self, user: UserId) -> RepoResult<Vec<Subscription>>;
    fn delete_subscription(&self, user: UserId, id: SubscriptionId) -> RepoResult<()>;

    fn summarize(&self, user: UserId) -> RepoResult<FinanceSummary>;
}

/// SQLite-backed finance repository.
///
/// Holds a mutable connection because balance changes run inside explicit
/// transactions.
pub struct SqliteFinanceRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteFinanceRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl FinanceRepository for SqliteFinanceRepository<'_> {
    fn create_account(&self, account: &FinanceAccount) -> RepoResult<AccountId> {
        account.validate()?;

        self.conn.execute(
            "INSERT INTO finance_accounts (id, user_id, account_name, balance, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                account.id.to_string(),
                account.user.to_string(),
                account.account_name.as_str(),
                account.balance,
                to_millis(account.created_at),
                to_millis(account.updated_at),
            ],
        )?;

        Ok(account.id)
    }

    fn get_account(&self, user: UserId, id: AccountId) -> RepoResult<Option<FinanceAccount>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ACCOUNT_SELECT_SQL} WHERE id = ?1 AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), user.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }
        Ok(None)
    }

    fn list_accounts(&self, user: UserId) -> RepoResult<Vec<FinanceAccount>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ACCOUNT_SELECT_SQL} WHERE user_id = ?1 ORDER BY created_at ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query([user.to_string()])?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next()? {
            accounts.push(parse_account_row(row)?);
        }
        Ok(accounts)
    }

    fn delete_account(&self, user: UserId, id: AccountId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM finance_accounts WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user.to_string()],
        )?;
        expect_changed(changed, id)
    }

    fn record_transaction(&mut self, transaction: &Transaction) -> RepoResult<TransactionId> {
        transaction.validate()?;

        let account_id = transaction.account.id.to_string();
        let user_id = transaction.user.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = load_balance(&tx, account_id.as_str(), user_id.as_str())?
            .ok_or(RepoError::NotFound(transaction.account.id))?;
        let balance = shifted_balance(current, transaction.kind.balance_delta(transaction.amount))?;

        tx.execute(
            "INSERT INTO transactions (
                id,
                user_id,
                account_id,
                description,
                amount,
                kind,
                occurred_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                transaction.id.to_string(),
                user_id.as_str(),
                account_id.as_str(),
                transaction.description.as_str(),
                transaction.amount,
                transaction.kind.as_db(),
                to_millis(transaction.date),
                to_millis(transaction.created_at),
                to_millis(transaction.updated_at),
            ],
        )?;

        tx.execute(
            "UPDATE finance_accounts
             SET
                balance = ?1,
                updated_at = ?2
             WHERE id = ?3;",
            params![
                balance,
                to_millis(transaction.updated_at),
                account_id.as_str(),
            ],
        )?;

        tx.commit()?;
        Ok(transaction.id)
    }

    fn get_transaction(&self, user: UserId, id: TransactionId) -> RepoResult<Option<Transaction>> {
        load_transaction(self.conn, user, id)
    }

    fn list_transactions(&self, user: UserId) -> RepoResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TRANSACTION_SELECT_SQL}
             WHERE t.user_id = ?1
             ORDER BY t.occurred_at DESC, t.rowid DESC;"
        ))?;

        let mut rows = stmt.query([user.to_string()])?;
        let mut transactions = Vec::new();
        while let Some(row) = rows.next()? {
            transactions.push(parse_transaction_row(row)?);
        }
        Ok(transactions)
    }

    fn remove_transaction(&mut self, user: UserId, id: TransactionId) -> RepoResult<Transaction> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let transaction = load_transaction(&tx, user, id)?.ok_or(RepoError::NotFound(id))?;

        // The account may be gone already; its transactions went with it.
        let account_id = transaction.account.id.to_string();
        if let Some(current) = load_balance(&tx, account_id.as_str(), &user.to_string())? {
            let balance =
                shifted_balance(current, -transaction.kind.balance_delta(transaction.amount))?;
            tx.execute(
                "UPDATE finance_accounts
                 SET
                    balance = ?1,
                    updated_at = ?2
                 WHERE id = ?3
                   AND user_id = ?4;",
                params![
                    balance,
                    to_millis(now_utc()),
                    account_id.as_str(),
                    user.to_string(),
                ],
            )?;
        }

        let changed = tx.execute(
            "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user.to_string()],
        )?;
        expect_changed(changed, id)?;

        tx.commit()?;
        Ok(transaction)
    }

    fn create_subscription(&self, subscription: &Subscription) -> RepoResult<SubscriptionId> {
        subscription.validate()?;

        self.conn.execute(
            "INSERT INTO subscriptions (
                id,
                user_id,
                name,
                monthly_cost,
                billing_day,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                subscription.id.to_string(),
                subscription.user.to_string(),
                subscription.name.as_str(),
                subscription.monthly_cost,
                i64::from(subscription.billing_date),
                to_millis(subscription.created_at),
                to_millis(subscription.updated_at),
            ],
        )?;

        Ok(subscription.id)
    }

    fn list_subscriptions(&self, user: UserId) -> RepoResult<Vec<Subscription>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUBSCRIPTION_SELECT_SQL} WHERE user_id = ?1 ORDER BY billing_day ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query([user.to_string()])?;
        let mut subscriptions = Vec::new();
        while let Some(row) = rows.next()? {
            subscriptions.push(parse_subscription_row(row)?);
        }
        Ok(subscriptions)
    }

    fn delete_subscription(&self, user: UserId, id: SubscriptionId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM subscriptions WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user.to_string()],
        )?;
        expect_changed(changed, id)
    }

    fn summarize(&self, user: UserId) -> RepoResult<FinanceSummary> {
        let user_id = user.to_string();
        let (total_balance, account_count): (f64, i64) = self.conn.query_row(
            "SELECT COALESCE(SUM(balance), 0.0), COUNT(*)
             FROM finance_accounts
             WHERE user_id = ?1;",
            [user_id.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let (total_monthly_subscriptions, subscription_count): (f64, i64) = self.conn.query_row(
            "SELECT COALESCE(SUM(monthly_cost), 0.0), COUNT(*)
             FROM subscriptions
             WHERE user_id = ?1;",
            [user_id.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(FinanceSummary {
            total_balance,
            total_monthly_subscriptions,
            account_count: count_to_usize(account_count)?,
            subscription_count: count_to_usize(subscription_count)?,
        })
    }
}

fn load_transaction(
    conn: &Connection,
    user: UserId,
    id: TransactionId,
) -> RepoResult<Option<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "{TRANSACTION_SELECT_SQL}
         WHERE t.id = ?1
           AND t.user_id = ?2;"
    ))?;

    let mut rows = stmt.query(params![id.to_string(), user.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_transaction_row(row)?));
    }
    Ok(None)
}

fn load_balance(conn: &Connection, account_id: &str, user_id: &str) -> RepoResult<Option<f64>> {
    let balance = conn
        .query_row(
            "SELECT balance
             FROM finance_accounts
             WHERE id = ?1
               AND user_id = ?2;",
            params![account_id, user_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(balance)
}

/// Applies `delta` to `current`, refusing results that are not finite.
fn shifted_balance(current: f64, delta: f64) -> RepoResult<f64> {
    let balance = current + delta;
    if balance.is_finite() {
        Ok(balance)
    } else {
        Err(RepoError::Validation(ValidationError::OutOfRange {
            field: "amount",
            expectation: "would push the account balance out of range",
        }))
    }
}

fn count_to_usize(value: i64) -> RepoResult<usize> {
    usize::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid row count `{value}`")))
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<FinanceAccount> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;

    Ok(FinanceAccount {
        id: parse_id("finance_accounts.id", &id_text)?,
        user: parse_id("finance_accounts.user_id", &user_text)?,
        account_name: row.get("account_name")?,
        balance: row.get("balance")?,
        created_at: from_millis("finance_accounts.created_at", row.get("created_at")?)?,
        updated_at: from_millis("finance_accounts.updated_at", row.get("updated_at")?)?,
    })
}

fn parse_transaction_row(row: &Row<'_>) -> RepoResult<Transaction> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let account_text: String = row.get("account_id")?;
    let kind_text: String = row.get("kind")?;
    let kind = TransactionKind::from_db(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid transaction kind `{kind_text}` in transactions.kind"))
    })?;

    Ok(Transaction {
        id: parse_id("transactions.id", &id_text)?,
        user: parse_id("transactions.user_id", &user_text)?,
        account: AccountRef {
            id: parse_id("transactions.account_id", &account_text)?,
            account_name: row.get("account_name")?,
        },
        description: row.get("description")?,
        amount: row.get("amount")?,
        kind,
        date: from_millis("transactions.occurred_at", row.get("occurred_at")?)?,
        created_at: from_millis("transactions.created_at", row.get("created_at")?)?,
        updated_at: from_millis("transactions.updated_at", row.get("updated_at")?)?,
    })
}

fn parse_subscription_row(row: &Row<'_>) -> RepoResult<Subscription> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let billing_day: i64 = row.get("billing_day")?;
    let billing_date = u8::try_from(billing_day).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid billing day `{billing_day}` in subscriptions.billing_day"
        ))
    })?;

    let subscription = Subscription {
        id: parse_id("subscriptions.id", &id_text)?,
        user: parse_id("subscriptions.user_id", &user_text)?,
        name: row.get("name")?,
        monthly_cost: row.get("monthly_cost")?,
        billing_date,
        created_at: from_millis("subscriptions.created_at", row.get("created_at")?)?,
        updated_at: from_millis("subscriptions.updated_at", row.get("updated_at")?)?,
    };
    subscription.validate()?;
    Ok(subscription)
}
