//! `SeaORM` Entity for expense_categories table.

use super::sea_orm_active_enums::{ExpenseType, RecurringFrequency};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name_ar: String,
    pub name_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub is_group: bool,
    pub expense_type: ExpenseType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub budget_amount: Option<Decimal>,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub recurring_day: Option<i32>,
    pub default_supplier_id: Option<Uuid>,
    pub default_cost_center_id: Option<Uuid>,
    pub account_id: Uuid,
    pub owns_account: bool,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_spent: Decimal,
    pub next_child_seq: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    SelfRef,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(has_many = "super::expense_vouchers::Entity")]
    ExpenseVouchers,
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

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::expense_vouchers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseVouchers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
