//! Expense ledger schema.
//!
//! Creates the enums, the chart of accounts, the category tree, payment
//! sources, vouchers with their journal entries, and the per-tenant
//! sequence row every write locks.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANT SEQUENCES & ACCOUNTS
        // ============================================================
        db.execute_unprepared(TENANT_SEQUENCES_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: CATEGORY TREE & PAYMENT SOURCES
        // ============================================================
        db.execute_unprepared(EXPENSE_CATEGORIES_SQL).await?;
        db.execute_unprepared(PAYMENT_SOURCES_SQL).await?;

        // ============================================================
        // PART 4: VOUCHERS & JOURNAL
        // ============================================================
        db.execute_unprepared(EXPENSE_VOUCHERS_SQL).await?;
        db.execute_unprepared(JOURNAL_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

CREATE TYPE expense_type AS ENUM ('general', 'recurring', 'supplier_related');

CREATE TYPE recurring_frequency AS ENUM (
    'daily',
    'weekly',
    'monthly',
    'quarterly',
    'yearly'
);

CREATE TYPE payment_source_kind AS ENUM ('vault', 'bank');

CREATE TYPE payment_method AS ENUM ('cash', 'bank', 'check', 'card');

CREATE TYPE voucher_status AS ENUM ('draft', 'confirmed', 'cancelled');

CREATE TYPE journal_kind AS ENUM ('posting', 'reversal');
";

const TENANT_SEQUENCES_SQL: &str = r"
CREATE TABLE tenant_sequences (
    tenant_id UUID PRIMARY KEY,
    next_voucher_seq INTEGER NOT NULL DEFAULT 1 CHECK (next_voucher_seq > 0),
    next_root_seq INTEGER NOT NULL DEFAULT 1 CHECK (next_root_seq > 0),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenant_sequences(tenant_id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    parent_id UUID REFERENCES accounts(id),
    is_group BOOLEAN NOT NULL DEFAULT false,
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (tenant_id, code)
);

CREATE INDEX idx_accounts_tenant ON accounts(tenant_id);
CREATE INDEX idx_accounts_parent ON accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const EXPENSE_CATEGORIES_SQL: &str = r"
CREATE TABLE expense_categories (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenant_sequences(tenant_id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name_ar VARCHAR(255) NOT NULL,
    name_en VARCHAR(255),
    description TEXT,
    parent_id UUID REFERENCES expense_categories(id) ON DELETE RESTRICT,
    is_group BOOLEAN NOT NULL DEFAULT false,
    expense_type expense_type NOT NULL DEFAULT 'general',
    budget_amount NUMERIC(19, 4) CHECK (budget_amount IS NULL OR budget_amount >= 0),
    is_recurring BOOLEAN NOT NULL DEFAULT false,
    recurring_frequency recurring_frequency,
    recurring_day INTEGER CHECK (recurring_day BETWEEN 1 AND 28),
    default_supplier_id UUID,
    default_cost_center_id UUID,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    owns_account BOOLEAN NOT NULL DEFAULT true,
    total_spent NUMERIC(19, 4) NOT NULL DEFAULT 0,
    next_child_seq INTEGER NOT NULL DEFAULT 1 CHECK (next_child_seq > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (tenant_id, code),
    UNIQUE (tenant_id, account_id),
    CHECK (parent_id IS NULL OR parent_id <> id),
    CHECK (is_recurring OR (recurring_frequency IS NULL AND recurring_day IS NULL))
);

CREATE INDEX idx_expense_categories_tenant ON expense_categories(tenant_id);
CREATE INDEX idx_expense_categories_parent ON expense_categories(parent_id) WHERE parent_id IS NOT NULL;
";

const PAYMENT_SOURCES_SQL: &str = r"
CREATE TABLE payment_sources (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenant_sequences(tenant_id) ON DELETE CASCADE,
    kind payment_source_kind NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (tenant_id, account_id)
);

CREATE INDEX idx_payment_sources_tenant ON payment_sources(tenant_id);
";

const EXPENSE_VOUCHERS_SQL: &str = r"
CREATE TABLE expense_vouchers (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenant_sequences(tenant_id) ON DELETE CASCADE,
    voucher_number VARCHAR(30) NOT NULL,
    sequence INTEGER NOT NULL CHECK (sequence > 0),
    voucher_date DATE NOT NULL,
    category_id UUID NOT NULL REFERENCES expense_categories(id) ON DELETE RESTRICT,
    description TEXT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    payment_method payment_method NOT NULL,
    vault_id UUID REFERENCES payment_sources(id),
    bank_id UUID REFERENCES payment_sources(id),
    check_number VARCHAR(50),
    check_date DATE,
    supplier_id UUID,
    cost_center_id UUID,
    reference_number VARCHAR(100),
    notes TEXT,
    status voucher_status NOT NULL DEFAULT 'draft',
    previous_voucher_number VARCHAR(30),
    version INTEGER NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    confirmed_at TIMESTAMPTZ,
    cancelled_at TIMESTAMPTZ,
    cancel_reason TEXT,
    UNIQUE (tenant_id, voucher_number),
    UNIQUE (tenant_id, sequence),
    CHECK ((payment_method = 'cash') = (vault_id IS NOT NULL)),
    CHECK ((payment_method <> 'cash') = (bank_id IS NOT NULL)),
    CHECK ((payment_method = 'check') = (check_number IS NOT NULL AND check_date IS NOT NULL))
);

CREATE INDEX idx_expense_vouchers_tenant_date ON expense_vouchers(tenant_id, voucher_date);
CREATE INDEX idx_expense_vouchers_category ON expense_vouchers(category_id);
CREATE INDEX idx_expense_vouchers_status ON expense_vouchers(tenant_id, status);
";

const JOURNAL_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenant_sequences(tenant_id) ON DELETE CASCADE,
    voucher_id UUID NOT NULL REFERENCES expense_vouchers(id) ON DELETE RESTRICT,
    kind journal_kind NOT NULL,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (voucher_id, kind)
);

CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (debit >= 0),
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (credit >= 0),
    memo TEXT,
    UNIQUE (journal_entry_id, line_no),
    CHECK ((debit = 0) <> (credit = 0))
);

CREATE INDEX idx_journal_entries_tenant ON journal_entries(tenant_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_journal_balance
-- Rejects a commit that leaves a journal entry unbalanced
-- ============================================================
CREATE OR REPLACE FUNCTION check_journal_balance()
RETURNS TRIGGER AS $$
DECLARE
    total_debit NUMERIC(19, 4);
    total_credit NUMERIC(19, 4);
BEGIN
    SELECT COALESCE(SUM(debit), 0), COALESCE(SUM(credit), 0)
    INTO total_debit, total_credit
    FROM journal_lines
    WHERE journal_entry_id = NEW.journal_entry_id;

    IF total_debit <> total_credit THEN
        RAISE EXCEPTION 'Journal entry % is not balanced. Debit: %, Credit: %',
            NEW.journal_entry_id, total_debit, total_credit;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_journal_balance
    AFTER INSERT OR UPDATE ON journal_lines
    DEFERRABLE INITIALLY DEFERRED
    FOR EACH ROW EXECUTE FUNCTION check_journal_balance();

-- ============================================================
-- FUNCTION: prevent_confirmed_voucher_edit
-- Confirmed and cancelled vouchers only move forward
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_confirmed_voucher_edit()
RETURNS TRIGGER AS $$
BEGIN
    IF TG_OP = 'DELETE' THEN
        IF OLD.status <> 'draft' THEN
            RAISE EXCEPTION 'Cannot delete a % voucher', OLD.status;
        END IF;
        RETURN OLD;
    END IF;

    IF OLD.status = 'cancelled' THEN
        RAISE EXCEPTION 'Cannot modify a cancelled voucher';
    END IF;

    IF OLD.status = 'confirmed' AND NEW.status <> 'cancelled' THEN
        RAISE EXCEPTION 'A confirmed voucher can only be cancelled';
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_confirmed_voucher_edit
    BEFORE UPDATE OR DELETE ON expense_vouchers
    FOR EACH ROW EXECUTE FUNCTION prevent_confirmed_voucher_edit();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TRIGGER IF EXISTS trg_prevent_confirmed_voucher_edit ON expense_vouchers;
DROP TRIGGER IF EXISTS trg_check_journal_balance ON journal_lines;
DROP FUNCTION IF EXISTS prevent_confirmed_voucher_edit();
DROP FUNCTION IF EXISTS check_journal_balance();

DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS expense_vouchers CASCADE;
DROP TABLE IF EXISTS payment_sources CASCADE;
DROP TABLE IF EXISTS expense_categories CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS tenant_sequences CASCADE;

DROP TYPE IF EXISTS journal_kind;
DROP TYPE IF EXISTS voucher_status;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS payment_source_kind;
DROP TYPE IF EXISTS recurring_frequency;
DROP TYPE IF EXISTS expense_type;
DROP TYPE IF EXISTS account_type;
";
