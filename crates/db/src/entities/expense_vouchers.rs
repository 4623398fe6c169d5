//! `SeaORM` Entity for expense_vouchers table.

use super::sea_orm_active_enums::{PaymentMethod, VoucherStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_vouchers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub voucher_number: String,
    pub sequence: i32,
    pub voucher_date: Date,
    pub category_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub vault_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,
    pub check_number: Option<String>,
    pub check_date: Option<Date>,
    pub supplier_id: Option<Uuid>,
    pub cost_center_id: Option<Uuid>,
    pub reference_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub status: VoucherStatus,
    pub previous_voucher_number: Option<String>,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub confirmed_at: Option<DateTimeWithTimeZone>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cancel_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expense_categories::Entity",
        from = "Column::CategoryId",
        to = "super::expense_categories::Column::Id"
    )]
    ExpenseCategories,
    #[sea_orm(has_many = "super::journal_entries::Entity")]
    JournalEntries,
    #[sea_orm(
        belongs_to = "super::tenant_sequences::Entity",
        from = "Column::TenantId",
        to = "super::tenant_sequences::Column::TenantId"
    )]
    TenantSequences,
}

impl Related<super::tenant_sequences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantSequences.def()
    }
}

impl Related<super::expense_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseCategories.def()
    }
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
