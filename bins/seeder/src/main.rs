//! Database seeder for Expensa development and testing.
//!
//! Seeds a demo tenant with a vault, a bank, a small category tree and a
//! handful of vouchers so the API has something to show locally.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, NaiveDate, Utc};
use expensa_core::{
    LedgerPolicy,
    category::{ExpenseCategory, ExpenseType, NewCategory, RecurringFrequency},
    voucher::{NewPaymentSource, PaymentMethod, PaymentSource, PaymentSourceKind, VoucherInput},
};
use expensa_db::{CategoryRepository, PaymentSourceRepository, VoucherRepository, connect};
use expensa_shared::{AppConfig, types::TenantId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Demo tenant ID (consistent for all seeds)
const DEMO_TENANT_ID: Uuid = Uuid::from_u128(1);

struct Seeder {
    tenant: TenantId,
    categories: CategoryRepository,
    sources: PaymentSourceRepository,
    vouchers: VoucherRepository,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let policy = LedgerPolicy::from(&config.ledger);

    println!("Connecting to database...");
    let db = connect(&config.database).await?;

    let seeder = Seeder {
        tenant: TenantId::from_uuid(DEMO_TENANT_ID),
        categories: CategoryRepository::new(db.clone(), policy),
        sources: PaymentSourceRepository::new(db.clone(), policy),
        vouchers: VoucherRepository::new(db, policy),
    };

    if !seeder.categories.list(seeder.tenant).await?.is_empty() {
        println!("  Demo tenant already seeded, skipping...");
        return Ok(());
    }

    println!("Seeding payment sources...");
    let (vault, bank) = seeder.seed_sources().await?;

    println!("Seeding category tree...");
    let (rent, fuel, stationery) = seeder.seed_categories().await?;

    println!("Seeding vouchers...");
    seeder.seed_vouchers(&vault, &bank, &rent, &fuel, &stationery).await?;

    println!("Seeding complete! Tenant: {DEMO_TENANT_ID}");
    Ok(())
}

impl Seeder {
    async fn seed_sources(&self) -> anyhow::Result<(PaymentSource, PaymentSource)> {
        let vault = self
            .sources
            .create(
                self.tenant,
                NewPaymentSource {
                    kind: PaymentSourceKind::Vault,
                    name: "Main Vault".to_string(),
                    account_code: "1101".to_string(),
                    opening_balance: dec!(5000),
                },
            )
            .await?;
        println!("  Created vault: {}", vault.name);

        let bank = self
            .sources
            .create(
                self.tenant,
                NewPaymentSource {
                    kind: PaymentSourceKind::Bank,
                    name: "Operating Bank".to_string(),
                    account_code: "1102".to_string(),
                    opening_balance: dec!(50000),
                },
            )
            .await?;
        println!("  Created bank: {}", bank.name);

        Ok((vault, bank))
    }

    async fn seed_categories(
        &self,
    ) -> anyhow::Result<(ExpenseCategory, ExpenseCategory, ExpenseCategory)> {
        let operations = self
            .category(NewCategory {
                name_ar: "مصروفات تشغيلية".to_string(),
                name_en: Some("Operating Expenses".to_string()),
                budget_amount: Some(dec!(20000)),
                ..NewCategory::default()
            })
            .await?;

        let rent = self
            .category(NewCategory {
                parent_id: Some(operations.id),
                name_ar: "إيجار".to_string(),
                name_en: Some("Rent".to_string()),
                expense_type: ExpenseType::Recurring,
                budget_amount: Some(dec!(12000)),
                is_recurring: true,
                recurring_frequency: Some(RecurringFrequency::Monthly),
                recurring_day: Some(1),
                ..NewCategory::default()
            })
            .await?;

        let fuel = self
            .category(NewCategory {
                parent_id: Some(operations.id),
                name_ar: "وقود".to_string(),
                name_en: Some("Fuel".to_string()),
                budget_amount: Some(dec!(1500)),
                ..NewCategory::default()
            })
            .await?;

        let admin = self
            .category(NewCategory {
                name_ar: "مصروفات إدارية".to_string(),
                name_en: Some("Administrative Expenses".to_string()),
                ..NewCategory::default()
            })
            .await?;

        let stationery = self
            .category(NewCategory {
                parent_id: Some(admin.id),
                name_ar: "قرطاسية".to_string(),
                name_en: Some("Stationery".to_string()),
                expense_type: ExpenseType::SupplierRelated,
                budget_amount: Some(dec!(300)),
                ..NewCategory::default()
            })
            .await?;

        Ok((rent, fuel, stationery))
    }

    async fn category(&self, input: NewCategory) -> anyhow::Result<ExpenseCategory> {
        let category = self.categories.create(self.tenant, input).await?;
        println!("  Created {} {}", category.code, category.display_name());
        Ok(category)
    }

    async fn seed_vouchers(
        &self,
        vault: &PaymentSource,
        bank: &PaymentSource,
        rent: &ExpenseCategory,
        fuel: &ExpenseCategory,
        stationery: &ExpenseCategory,
    ) -> anyhow::Result<()> {
        let today = Utc::now().date_naive();
        let month_start =
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);

        let rent_input = voucher(month_start, rent, "Office rent", dec!(4000), PaymentMethod::Bank)
            .with_bank(bank);
        self.voucher(rent_input, true).await?;

        let fuel_input = voucher(today, fuel, "Delivery van fuel", dec!(350), PaymentMethod::Cash)
            .with_vault(vault);
        self.voucher(fuel_input, true).await?;

        // Over the stationery budget, left as a draft to show the warning.
        let paper_input = voucher(today, stationery, "Printer paper", dec!(420), PaymentMethod::Cash)
            .with_vault(vault);
        self.voucher(paper_input, false).await?;

        Ok(())
    }

    async fn voucher(&self, input: VoucherInput, confirm: bool) -> anyhow::Result<()> {
        let draft = self.vouchers.create(self.tenant, input).await?;
        if let Some(overrun) = &draft.budget_check {
            println!(
                "  {} would exceed budget by {}",
                draft.voucher.voucher_number, overrun.overage
            );
        }

        if confirm {
            self.vouchers.confirm(self.tenant, draft.voucher.id).await?;
            println!("  Confirmed {}", draft.voucher.voucher_number);
        } else {
            println!("  Drafted {}", draft.voucher.voucher_number);
        }
        Ok(())
    }
}

fn voucher(
    date: NaiveDate,
    category: &ExpenseCategory,
    description: &str,
    amount: Decimal,
    payment_method: PaymentMethod,
) -> VoucherInput {
    VoucherInput {
        date,
        category_id: category.id,
        description: description.to_string(),
        amount,
        payment_method,
        vault_id: None,
        bank_id: None,
        check_number: None,
        check_date: None,
        supplier_id: None,
        cost_center_id: None,
        reference_number: None,
        notes: None,
    }
}

trait WithSource {
    fn with_vault(self, vault: &PaymentSource) -> Self;
    fn with_bank(self, bank: &PaymentSource) -> Self;
}

impl WithSource for VoucherInput {
    fn with_vault(mut self, vault: &PaymentSource) -> Self {
        self.vault_id = Some(vault.id);
        self
    }

    fn with_bank(mut self, bank: &PaymentSource) -> Self {
        self.bank_id = Some(bank.id);
        self
    }
}
