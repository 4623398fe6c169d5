//! Expense voucher repository.
//!
//! Single-voucher reads and listings query the voucher tables directly.
//! Lifecycle changes run against a loaded book.

use chrono::Utc;
use expensa_core::book::{VoucherDraft, VoucherFilter, VoucherPosted};
use expensa_core::voucher::{ExpenseVoucher, JournalEntry, Posting, VoucherInput};
use expensa_core::{ExpenseError, LedgerPolicy};
use expensa_shared::types::{PageRequest, PageResponse, TenantId, VoucherId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use tracing::info;

use super::convert;
use super::error::RepositoryError;
use super::store::{BookStore, LoadScope};
use crate::entities::{expense_vouchers, sea_orm_active_enums as db};

/// Vouchers of `tenant_id` narrowed by every set field of `filter`.
fn filtered(tenant_id: TenantId, filter: &VoucherFilter) -> Select<expense_vouchers::Entity> {
    let mut query = expense_vouchers::Entity::find()
        .filter(expense_vouchers::Column::TenantId.eq(tenant_id.into_inner()));

    if let Some(status) = filter.status {
        query = query.filter(expense_vouchers::Column::Status.eq(db::VoucherStatus::from(status)));
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(expense_vouchers::Column::CategoryId.eq(category_id.into_inner()));
    }
    if let Some(method) = filter.payment_method {
        query =
            query.filter(expense_vouchers::Column::PaymentMethod.eq(db::PaymentMethod::from(method)));
    }
    if let Some(supplier_id) = filter.supplier_id {
        query = query.filter(expense_vouchers::Column::SupplierId.eq(supplier_id.into_inner()));
    }
    if let Some(cost_center_id) = filter.cost_center_id {
        query =
            query.filter(expense_vouchers::Column::CostCenterId.eq(cost_center_id.into_inner()));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(expense_vouchers::Column::VoucherDate.gte(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(expense_vouchers::Column::VoucherDate.lte(to));
    }
    query
}

/// Voucher persistence and lifecycle.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    store: BookStore,
}

impl VoucherRepository {
    /// Creates a new voucher repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerPolicy) -> Self {
        Self {
            store: BookStore::new(db, policy),
        }
    }

    /// Lists vouchers, newest first.
    pub async fn list(
        &self,
        tenant_id: TenantId,
        filter: VoucherFilter,
        page: PageRequest,
    ) -> Result<PageResponse<ExpenseVoucher>, RepositoryError> {
        let db = self.store.connection();
        let page = page.normalized();

        let total = filtered(tenant_id, &filter).count(db).await?;
        let rows = filtered(tenant_id, &filter)
            .order_by_desc(expense_vouchers::Column::VoucherDate)
            .order_by_desc(expense_vouchers::Column::Sequence)
            .offset(page.offset())
            .limit(page.limit())
            .all(db)
            .await?;

        let data = rows
            .into_iter()
            .map(convert::voucher_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Finds a voucher.
    pub async fn find(
        &self,
        tenant_id: TenantId,
        id: VoucherId,
    ) -> Result<ExpenseVoucher, RepositoryError> {
        let model = expense_vouchers::Entity::find_by_id(id.into_inner())
            .filter(expense_vouchers::Column::TenantId.eq(tenant_id.into_inner()))
            .one(self.store.connection())
            .await?
            .ok_or(ExpenseError::VoucherNotFound(id))?;
        convert::voucher_from_model(model)
    }

    /// Journal entries written for a voucher.
    pub async fn journal(
        &self,
        tenant_id: TenantId,
        id: VoucherId,
    ) -> Result<Vec<JournalEntry>, RepositoryError> {
        self.find(tenant_id, id).await?;
        BookStore::voucher_journal(self.store.connection(), tenant_id, id).await
    }

    /// Creates a draft.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: VoucherInput,
    ) -> Result<VoucherDraft, RepositoryError> {
        let now = Utc::now();
        let draft = self
            .store
            .write(tenant_id, |book| book.create_voucher(input, now))
            .await?;

        info!(
            tenant_id = %tenant_id,
            voucher_id = %draft.voucher.id,
            voucher_number = %draft.voucher.voucher_number,
            amount = %draft.voucher.amount,
            "Expense voucher drafted"
        );
        Ok(draft)
    }

    /// Replaces the fields of a draft.
    pub async fn update(
        &self,
        tenant_id: TenantId,
        id: VoucherId,
        input: VoucherInput,
    ) -> Result<VoucherDraft, RepositoryError> {
        let now = Utc::now();
        let draft = self
            .store
            .write(tenant_id, |book| book.update_voucher(id, input, now))
            .await?;

        info!(
            tenant_id = %tenant_id,
            voucher_id = %id,
            version = draft.voucher.version,
            "Expense voucher updated"
        );
        Ok(draft)
    }

    /// Deletes a draft.
    pub async fn delete(&self, tenant_id: TenantId, id: VoucherId) -> Result<(), RepositoryError> {
        self.store
            .write(tenant_id, |book| book.delete_voucher(id))
            .await?;

        info!(tenant_id = %tenant_id, voucher_id = %id, "Expense voucher deleted");
        Ok(())
    }

    /// What confirming the draft would post, without posting it.
    pub async fn preview(
        &self,
        tenant_id: TenantId,
        id: VoucherId,
    ) -> Result<Posting, RepositoryError> {
        let now = Utc::now();
        self.store
            .read(tenant_id, |book| book.preview_voucher(id, now))
            .await
    }

    /// Confirms a draft and posts it to the ledger.
    pub async fn confirm(
        &self,
        tenant_id: TenantId,
        id: VoucherId,
    ) -> Result<VoucherPosted, RepositoryError> {
        let now = Utc::now();
        let posted = self
            .store
            .write(tenant_id, |book| book.confirm_voucher(id, now))
            .await?;

        info!(
            tenant_id = %tenant_id,
            voucher_id = %id,
            journal_entry_id = %posted.journal.id,
            over_budget = posted.budget_warning.is_some(),
            "Expense voucher confirmed"
        );
        Ok(posted)
    }

    /// Cancels a confirmed voucher and posts the reversal.
    pub async fn cancel(
        &self,
        tenant_id: TenantId,
        id: VoucherId,
        reason: Option<String>,
    ) -> Result<VoucherPosted, RepositoryError> {
        let now = Utc::now();
        let posted = self
            .store
            .write_scoped(tenant_id, LoadScope::Voucher(id), |book| {
                book.cancel_voucher(id, reason, now)
            })
            .await?;

        info!(
            tenant_id = %tenant_id,
            voucher_id = %id,
            journal_entry_id = %posted.journal.id,
            "Expense voucher cancelled"
        );
        Ok(posted)
    }
}
