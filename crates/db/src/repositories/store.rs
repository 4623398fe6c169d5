//! Loads a tenant's expense book and persists the change sets it produces.
//!
//! Every write runs in one transaction that locks the tenant's
//! `tenant_sequences` row first. Writers of the same tenant are therefore
//! serialized, which keeps voucher numbers, category codes and balances
//! consistent. Readers use a repeatable-read snapshot and never block.
//!
//! Journal history is not part of a loaded book unless the operation asks
//! for the entries of one voucher; single-voucher reads go straight to the
//! tables.

use chrono::{DateTime, Utc};
use expensa_core::account::AccountLinker;
use expensa_core::book::{BookSnapshot, ChangeSet, Outcome};
use expensa_core::voucher::JournalEntry;
use expensa_core::{ExpenseBook, ExpenseError, LedgerPolicy};
use expensa_shared::types::{AccountId, TenantId, VoucherId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbBackend, EntityTrait, IsolationLevel, QueryFilter, QueryOrder,
    QuerySelect, Statement, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use super::convert;
use super::error::RepositoryError;
use crate::entities::{
    accounts, expense_categories, expense_vouchers, journal_entries, journal_lines,
    payment_sources, sea_orm_active_enums::VoucherStatus, tenant_sequences,
};

const ENSURE_TENANT_SQL: &str =
    "INSERT INTO tenant_sequences (tenant_id) VALUES ($1) ON CONFLICT (tenant_id) DO NOTHING";

/// How much of a book an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadScope {
    /// Accounts, categories, payment sources and vouchers.
    Ledger,
    /// The ledger plus the journal entries of one voucher.
    Voucher(VoucherId),
}

/// Transactional access to per-tenant expense books.
#[derive(Debug, Clone)]
pub struct BookStore {
    db: DatabaseConnection,
    policy: LedgerPolicy,
}

impl BookStore {
    /// Creates a new store.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerPolicy) -> Self {
        Self { db, policy }
    }

    /// Policy applied to every book this store loads.
    #[must_use]
    pub const fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    /// Connection for queries that do not need a loaded book.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Runs a read-only query against a consistent snapshot of the book.
    ///
    /// A tenant that never wrote anything reads as an empty book.
    pub async fn read<T, F>(&self, tenant_id: TenantId, query: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&ExpenseBook) -> Result<T, ExpenseError> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await?;

        let book = match Self::find_sequences(&txn, tenant_id, false).await? {
            Some(row) => self.load(&txn, tenant_id, row, LoadScope::Ledger).await?,
            None => ExpenseBook::new(tenant_id, self.policy),
        };
        txn.commit().await?;

        Ok(query(&book)?)
    }

    /// Runs a mutating operation and persists its change set atomically.
    ///
    /// When the operation fails nothing is written.
    pub async fn write<T, F>(&self, tenant_id: TenantId, operation: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut ExpenseBook) -> Result<Outcome<T>, ExpenseError> + Send,
        T: Send,
    {
        self.write_scoped(tenant_id, LoadScope::Ledger, operation)
            .await
    }

    /// Like [`BookStore::write`], loading the book as far as `scope` asks.
    pub async fn write_scoped<T, F>(
        &self,
        tenant_id: TenantId,
        scope: LoadScope,
        operation: F,
    ) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut ExpenseBook) -> Result<Outcome<T>, ExpenseError> + Send,
        T: Send,
    {
        let txn = self.db.begin().await?;
        self.ensure_tenant(&txn, tenant_id).await?;

        let row = Self::find_sequences(&txn, tenant_id, true)
            .await?
            .ok_or_else(|| {
                RepositoryError::InvalidData(format!("tenant {tenant_id} has no sequence row"))
            })?;
        let mut book = self.load(&txn, tenant_id, row, scope).await?;

        let outcome = match operation(&mut book) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(tenant_id = %tenant_id, error = %e, "Expense ledger rejected operation");
                return Err(e.into());
            }
        };

        if !outcome.changes.is_empty() {
            Self::persist(&txn, tenant_id, &outcome.changes, Utc::now()).await?;
        }
        txn.commit().await?;

        Ok(outcome.value)
    }

    /// Creates the tenant's sequence row and expense root account on first use.
    async fn ensure_tenant(
        &self,
        txn: &DatabaseTransaction,
        tenant_id: TenantId,
    ) -> Result<(), RepositoryError> {
        let inserted = txn
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                ENSURE_TENANT_SQL,
                [tenant_id.into_inner().into()],
            ))
            .await?
            .rows_affected();

        if inserted > 0 {
            let root = AccountLinker::expense_root();
            convert::account_to_active(tenant_id, &root, Utc::now())
                .insert(txn)
                .await?;
            debug!(tenant_id = %tenant_id, "Initialized expense ledger for tenant");
        }
        Ok(())
    }

    async fn find_sequences(
        txn: &DatabaseTransaction,
        tenant_id: TenantId,
        lock: bool,
    ) -> Result<Option<tenant_sequences::Model>, RepositoryError> {
        let mut query = tenant_sequences::Entity::find_by_id(tenant_id.into_inner());
        if lock {
            // SELECT ... FOR UPDATE
            query = query.lock_exclusive();
        }
        Ok(query.one(txn).await?)
    }

    /// Journal entries of one voucher, oldest first.
    pub async fn voucher_journal<C: ConnectionTrait>(
        conn: &C,
        tenant_id: TenantId,
        voucher_id: VoucherId,
    ) -> Result<Vec<JournalEntry>, RepositoryError> {
        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(journal_entries::Column::VoucherId.eq(voucher_id.into_inner()))
            .order_by_asc(journal_entries::Column::CreatedAt)
            .order_by_asc(journal_entries::Column::Kind)
            .all(conn)
            .await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        let mut lines_by_entry: HashMap<Uuid, Vec<journal_lines::Model>> = HashMap::new();
        for line in journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.is_in(ids))
            .all(conn)
            .await?
        {
            lines_by_entry
                .entry(line.journal_entry_id)
                .or_default()
                .push(line);
        }

        Ok(entries
            .into_iter()
            .map(|entry| {
                let lines = lines_by_entry.remove(&entry.id).unwrap_or_default();
                convert::journal_from_models(entry, lines)
            })
            .collect())
    }

    async fn load(
        &self,
        txn: &DatabaseTransaction,
        tenant_id: TenantId,
        sequences: tenant_sequences::Model,
        scope: LoadScope,
    ) -> Result<ExpenseBook, RepositoryError> {
        let tenant = tenant_id.into_inner();

        let accounts = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant))
            .all(txn)
            .await?
            .into_iter()
            .map(convert::account_from_model)
            .collect();

        let categories = expense_categories::Entity::find()
            .filter(expense_categories::Column::TenantId.eq(tenant))
            .all(txn)
            .await?
            .into_iter()
            .map(convert::category_from_model)
            .collect::<Result<Vec<_>, _>>()?;

        let sources = payment_sources::Entity::find()
            .filter(payment_sources::Column::TenantId.eq(tenant))
            .all(txn)
            .await?
            .into_iter()
            .map(convert::source_from_model)
            .collect();

        let vouchers = expense_vouchers::Entity::find()
            .filter(expense_vouchers::Column::TenantId.eq(tenant))
            .all(txn)
            .await?
            .into_iter()
            .map(convert::voucher_from_model)
            .collect::<Result<Vec<_>, _>>()?;

        let journals = match scope {
            LoadScope::Ledger => Vec::new(),
            LoadScope::Voucher(id) => Self::voucher_journal(txn, tenant_id, id).await?,
        };

        let snapshot = BookSnapshot {
            tenant_id,
            policy: self.policy,
            accounts,
            categories,
            sources,
            vouchers,
            journals,
            sequences: convert::sequences_from_row(
                sequences.next_voucher_seq,
                sequences.next_root_seq,
            )?,
        };

        Ok(ExpenseBook::from_snapshot(snapshot)?)
    }

    /// Writes a change set. Rows are written parents first and removed
    /// children first so foreign keys hold at every statement.
    async fn persist(
        txn: &DatabaseTransaction,
        tenant_id: TenantId,
        changes: &ChangeSet,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let stamp = now.fixed_offset();

        for account in &changes.accounts_created {
            convert::account_to_active(tenant_id, account, now)
                .insert(txn)
                .await?;
        }

        for account in &changes.accounts_updated {
            let result = accounts::Entity::update_many()
                .col_expr(accounts::Column::Name, Expr::value(account.name.clone()))
                .col_expr(
                    accounts::Column::ParentId,
                    Expr::value(account.parent_id.map(AccountId::into_inner)),
                )
                .col_expr(accounts::Column::IsGroup, Expr::value(account.is_group))
                .col_expr(accounts::Column::Balance, Expr::value(account.balance))
                .col_expr(accounts::Column::UpdatedAt, Expr::value(stamp))
                .filter(accounts::Column::Id.eq(account.id.into_inner()))
                .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
                .exec(txn)
                .await?;
            if result.rows_affected == 0 {
                return Err(RepositoryError::InvalidData(format!(
                    "account {} no longer exists",
                    account.id
                )));
            }
        }

        for category in &changes.categories_created {
            convert::category_to_active(category)?.insert(txn).await?;
        }

        for category in &changes.categories_updated {
            let result = expense_categories::Entity::update_many()
                .set(convert::category_to_active(category)?)
                .filter(expense_categories::Column::Id.eq(category.id.into_inner()))
                .filter(expense_categories::Column::TenantId.eq(tenant_id.into_inner()))
                .exec(txn)
                .await?;
            if result.rows_affected == 0 {
                return Err(RepositoryError::InvalidData(format!(
                    "category {} no longer exists",
                    category.id
                )));
            }
        }

        for source in &changes.sources_created {
            convert::source_to_active(source, now).insert(txn).await?;
        }

        for voucher in &changes.vouchers_created {
            convert::voucher_to_active(voucher)?.insert(txn).await?;
        }

        for voucher in &changes.vouchers_updated {
            let result = expense_vouchers::Entity::update_many()
                .set(convert::voucher_to_active(voucher)?)
                .filter(expense_vouchers::Column::Id.eq(voucher.id.into_inner()))
                .filter(expense_vouchers::Column::Version.eq(voucher.version - 1))
                .exec(txn)
                .await?;
            if result.rows_affected == 0 {
                return Err(RepositoryError::Conflict(voucher.id));
            }
        }

        for entry in &changes.journals_created {
            let (header, lines) = convert::journal_to_active(entry)?;
            header.insert(txn).await?;
            for line in lines {
                line.insert(txn).await?;
            }
        }

        for id in &changes.vouchers_deleted {
            let result = expense_vouchers::Entity::delete_many()
                .filter(expense_vouchers::Column::Id.eq(id.into_inner()))
                .filter(expense_vouchers::Column::TenantId.eq(tenant_id.into_inner()))
                .filter(expense_vouchers::Column::Status.eq(VoucherStatus::Draft))
                .exec(txn)
                .await?;
            if result.rows_affected == 0 {
                return Err(RepositoryError::Conflict(*id));
            }
        }

        for id in &changes.categories_deleted {
            expense_categories::Entity::delete_many()
                .filter(expense_categories::Column::Id.eq(id.into_inner()))
                .filter(expense_categories::Column::TenantId.eq(tenant_id.into_inner()))
                .exec(txn)
                .await?;
        }

        for id in &changes.accounts_deleted {
            accounts::Entity::delete_many()
                .filter(accounts::Column::Id.eq(id.into_inner()))
                .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
                .exec(txn)
                .await?;
        }

        if let Some(sequences) = changes.sequences {
            let (next_voucher_seq, next_root_seq) = convert::sequences_to_row(sequences)?;
            tenant_sequences::Entity::update_many()
                .col_expr(
                    tenant_sequences::Column::NextVoucherSeq,
                    Expr::value(next_voucher_seq),
                )
                .col_expr(
                    tenant_sequences::Column::NextRootSeq,
                    Expr::value(next_root_seq),
                )
                .col_expr(tenant_sequences::Column::UpdatedAt, Expr::value(stamp))
                .filter(tenant_sequences::Column::TenantId.eq(tenant_id.into_inner()))
                .exec(txn)
                .await?;
        }

        debug!(
            tenant_id = %tenant_id,
            vouchers_created = changes.vouchers_created.len(),
            vouchers_updated = changes.vouchers_updated.len(),
            journals_created = changes.journals_created.len(),
            "Persisted expense ledger changes"
        );
        Ok(())
    }
}
