//! Account, transaction and subscription use-cases.
//!
//! # Invariants
//! - Transactions are only recorded against the caller's accounts.
//! - Balance bookkeeping is delegated to the repository, which applies it
//!   in the same storage transaction as the row change.

use crate::model::finance::{
    validate_amount, AccountId, AccountInput, AccountRef, FinanceAccount, FinanceSummary,
    Subscription, SubscriptionId, SubscriptionInput, Transaction, TransactionId,
    TransactionInput, TransactionKind,
};
use crate::model::{now_utc, optional_text, parse_date_input, required_text, UserId, ValidationError};
use crate::repo::finance_repo::FinanceRepository;
use crate::service::{not_found_as, ServiceError, ServiceResult};
use uuid::Uuid;

const ACCOUNT_NOT_FOUND: &str = "Account not found";
const ASSOCIATED_ACCOUNT_NOT_FOUND: &str = "Associated account not found";
const TRANSACTION_NOT_FOUND: &str = "Transaction not found";
const SUBSCRIPTION_NOT_FOUND: &str = "Subscription not found";

/// Finance service facade over repository implementations.
pub struct FinanceService<R: FinanceRepository> {
    repo: R,
}

impl<R: FinanceRepository> FinanceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists accounts oldest first.
    pub fn list_accounts(&self, user: UserId) -> ServiceResult<Vec<FinanceAccount>> {
        Ok(self.repo.list_accounts(user)?)
    }

    /// Opens an account; balance defaults to zero.
    pub fn create_account(
        &self,
        user: UserId,
        input: &AccountInput,
    ) -> ServiceResult<FinanceAccount> {
        let account_name = required_text(input.account_name.as_deref())
            .ok_or(ValidationError::Required("Please add an account name"))?;
        let now = now_utc();
        let account = FinanceAccount {
            id: Uuid::new_v4(),
            user,
            account_name,
            balance: input.balance.unwrap_or(0.0),
            created_at: now,
            updated_at: now,
        };

        let id = self.repo.create_account(&account)?;
        self.repo
            .get_account(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "created account not found in read-back",
            ))
    }

    /// Deletes an account and every transaction recorded against it.
    pub fn delete_account(&self, user: UserId, id: AccountId) -> ServiceResult<()> {
        self.repo
            .delete_account(user, id)
            .map_err(not_found_as(ACCOUNT_NOT_FOUND))?;
        log::info!("event=account_delete module=service status=ok account_id={id}");
        Ok(())
    }

    /// Lists transactions newest first.
    pub fn list_transactions(&self, user: UserId) -> ServiceResult<Vec<Transaction>> {
        Ok(self.repo.list_transactions(user)?)
    }

    /// Records a transaction and moves the account balance with it.
    ///
    /// The account reference is resolved before field validation, so an
    /// unknown account always reports `Associated account not found`.
    pub fn create_transaction(
        &mut self,
        user: UserId,
        input: &TransactionInput,
    ) -> ServiceResult<Transaction> {
        let account_id = input
            .account
            .as_ref()
            .and_then(|reference| reference.parse())
            .ok_or(ServiceError::NotFound(ASSOCIATED_ACCOUNT_NOT_FOUND))?;
        let account = self
            .repo
            .get_account(user, account_id)?
            .ok_or(ServiceError::NotFound(ASSOCIATED_ACCOUNT_NOT_FOUND))?;

        let description = required_text(input.description.as_deref())
            .ok_or(ValidationError::Required("Please add a description"))?;
        let amount = input
            .amount
            .ok_or(ValidationError::Required("Please add a positive amount"))?;
        validate_amount(amount)?;
        let kind = optional_text(input.kind.as_deref())
            .ok_or(ValidationError::Required("Please specify the transaction type"))
            .and_then(|label| TransactionKind::from_label(&label))?;

        let now = now_utc();
        let date = match required_text(input.date.as_deref()) {
            Some(text) => parse_date_input("date", &text)?,
            None => now,
        };
        let transaction = Transaction {
            id: Uuid::new_v4(),
            user,
            account: AccountRef {
                id: account.id,
                account_name: account.account_name,
            },
            description,
            amount,
            kind,
            date,
            created_at: now,
            updated_at: now,
        };

        let id = self
            .repo
            .record_transaction(&transaction)
            .map_err(not_found_as(ASSOCIATED_ACCOUNT_NOT_FOUND))?;
        log::info!(
            "event=transaction_record module=service status=ok transaction_id={id} account_id={account_id}"
        );
        self.repo
            .get_transaction(user, id)?
            .ok_or(ServiceError::InconsistentState(
                "recorded transaction not found in read-back",
            ))
    }

    /// Deletes a transaction and reverts its balance change.
    pub fn delete_transaction(&mut self, user: UserId, id: TransactionId) -> ServiceResult<()> {
        let removed = self
            .repo
            .remove_transaction(user, id)
            .map_err(not_found_as(TRANSACTION_NOT_FOUND))?;
        log::info!(
            "event=transaction_remove module=service status=ok transaction_id={id} account_id={}",
            removed.account.id
        );
        Ok(())
    }

    /// Lists subscriptions by billing day.
    pub fn list_subscriptions(&self, user: UserId) -> ServiceResult<Vec<Subscription>> {
        Ok(self.repo.list_subscriptions(user)?)
    }

    pub fn create_subscription(
        &self,
        user: UserId,
        input: &SubscriptionInput,
    ) -> ServiceResult<Subscription> {
        let name = required_text(input.name.as_deref())
            .ok_or(ValidationError::Required("Please add a subscription name"))?;
        let monthly_cost = input
            .monthly_cost
            .ok_or(ValidationError::Required("Please add a monthly cost"))?;
        let billing_day = input
            .billing_date
            .ok_or(ValidationError::Required("Please add a billing day (1-31)"))?;
        let billing_date = u8::try_from(billing_day)
            .ok()
            .filter(|day| Subscription::BILLING_DAY_RANGE.contains(&i64::from(*day)))
            .ok_or(ValidationError::OutOfRange {
                field: "billingDate",
                expectation: "must be a day of month between 1 and 31",
            })?;

        let now = now_utc();
        let subscription = Subscription {
            id: Uuid::new_v4(),
            user,
            name,
            monthly_cost,
            billing_date,
            created_at: now,
            updated_at: now,
        };

        self.repo.create_subscription(&subscription)?;
        Ok(subscription)
    }

    pub fn delete_subscription(&self, user: UserId, id: SubscriptionId) -> ServiceResult<()> {
        self.repo
            .delete_subscription(user, id)
            .map_err(not_found_as(SUBSCRIPTION_NOT_FOUND))
    }

    /// Totals shown on the finance dashboard.
    pub fn summary(&self, user: UserId) -> ServiceResult<FinanceSummary> {
        Ok(self.repo.summarize(user)?)
    }
}
