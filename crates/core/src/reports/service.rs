//! Report generation.
//!
//! Spend reports only count confirmed vouchers. Listings show every status.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use expensa_shared::types::CategoryId;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::budget::BudgetAggregator;
use crate::category::CategoryTree;
use crate::error::ExpenseError;
use crate::reports::types::{
    BudgetComparisonRow, CategoryLedgerReport, CategoryLedgerRow, CostCenterReport,
    CostCenterTotal, DateRange, ExpenseTreeRow, ExportPayload, ExportRequest, ExportRows,
    HeatmapCell, HeatmapReport, MonthlyComparisonReport, MonthlyTotal, ReportType,
    SupplierReport, SupplierTotal, VoucherListRow,
};
use crate::voucher::types::{ExpenseVoucher, VoucherStatus};

/// Days covered by the heatmap, ending on `as_of`.
pub const HEATMAP_WINDOW_DAYS: u64 = 90;

/// Stateless report generator.
pub struct ReportService;

impl ReportService {
    fn confirmed<'a>(
        vouchers: &'a [ExpenseVoucher],
        range: DateRange,
    ) -> impl Iterator<Item = &'a ExpenseVoucher> {
        vouchers
            .iter()
            .filter(move |v| v.status == VoucherStatus::Confirmed && range.contains(v.date))
    }

    /// `part / whole * 100` rounded to two places; zero when `whole` is zero.
    fn percentage(part: Decimal, whole: Decimal) -> Decimal {
        if whole.is_zero() {
            Decimal::ZERO
        } else {
            (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
        }
    }

    /// Month-over-month totals.
    ///
    /// Months between the first and last (or the requested window) with no
    /// spend appear as zero months.
    #[must_use]
    pub fn monthly_comparison(
        vouchers: &[ExpenseVoucher],
        range: DateRange,
    ) -> MonthlyComparisonReport {
        let mut buckets: BTreeMap<(i32, u32), (Decimal, u32)> = BTreeMap::new();
        for v in Self::confirmed(vouchers, range) {
            let entry = buckets
                .entry((v.date.year(), v.date.month()))
                .or_insert((Decimal::ZERO, 0));
            entry.0 += v.amount;
            entry.1 += 1;
        }

        let first = range
            .date_from
            .map(|d| (d.year(), d.month()))
            .or_else(|| buckets.keys().next().copied());
        let last = range
            .date_to
            .map(|d| (d.year(), d.month()))
            .or_else(|| buckets.keys().next_back().copied());

        let mut months = Vec::new();
        let mut grand_total = Decimal::ZERO;
        if let (Some(first), Some(last)) = (first, last) {
            let mut cursor = NaiveDate::from_ymd_opt(first.0, first.1, 1);
            let mut previous: Option<Decimal> = None;
            while let Some(month_start) = cursor {
                let key = (month_start.year(), month_start.month());
                if key > last {
                    break;
                }
                let (total, voucher_count) = buckets.get(&key).copied().unwrap_or_default();
                let change_from_previous = previous.map_or(Decimal::ZERO, |p| total - p);
                let change_percentage = previous.map_or(Decimal::ZERO, |p| {
                    Self::percentage(change_from_previous, p)
                });
                months.push(MonthlyTotal {
                    year: key.0,
                    month: key.1,
                    period: format!("{:04}-{:02}", key.0, key.1),
                    total,
                    voucher_count,
                    change_from_previous,
                    change_percentage,
                });
                grand_total += total;
                previous = Some(total);
                cursor = month_start.checked_add_months(Months::new(1));
            }
        }

        MonthlyComparisonReport {
            months,
            grand_total,
        }
    }

    /// Spend per cost center, largest first.
    #[must_use]
    pub fn cost_center_report(vouchers: &[ExpenseVoucher], range: DateRange) -> CostCenterReport {
        let (groups, grand_total) =
            Self::group_totals(Self::confirmed(vouchers, range), |v| {
                v.cost_center_id.map(|c| c.into_inner())
            });
        let rows = groups
            .into_iter()
            .map(|(key, (total, voucher_count))| CostCenterTotal {
                cost_center_id: key.map(expensa_shared::types::CostCenterId::from_uuid),
                total,
                voucher_count,
                percentage: Self::percentage(total, grand_total),
            })
            .collect();
        CostCenterReport { rows, grand_total }
    }

    /// Spend per supplier, largest first.
    #[must_use]
    pub fn supplier_report(vouchers: &[ExpenseVoucher], range: DateRange) -> SupplierReport {
        let (groups, grand_total) =
            Self::group_totals(Self::confirmed(vouchers, range), |v| {
                v.supplier_id.map(|s| s.into_inner())
            });
        let rows = groups
            .into_iter()
            .map(|(key, (total, voucher_count))| SupplierTotal {
                supplier_id: key.map(expensa_shared::types::SupplierId::from_uuid),
                total,
                voucher_count,
                percentage: Self::percentage(total, grand_total),
            })
            .collect();
        SupplierReport { rows, grand_total }
    }

    fn group_totals<'a>(
        vouchers: impl Iterator<Item = &'a ExpenseVoucher>,
        key: impl Fn(&ExpenseVoucher) -> Option<Uuid>,
    ) -> (Vec<(Option<Uuid>, (Decimal, u32))>, Decimal) {
        let mut groups: BTreeMap<Option<Uuid>, (Decimal, u32)> = BTreeMap::new();
        let mut grand_total = Decimal::ZERO;
        for v in vouchers {
            let entry = groups.entry(key(v)).or_insert((Decimal::ZERO, 0));
            entry.0 += v.amount;
            entry.1 += 1;
            grand_total += v.amount;
        }
        let mut rows: Vec<_> = groups.into_iter().collect();
        rows.sort_by(|a, b| b.1.0.cmp(&a.1.0));
        (rows, grand_total)
    }

    /// Daily spend over the 90 days ending on `as_of`.
    #[must_use]
    pub fn heatmap(vouchers: &[ExpenseVoucher], as_of: NaiveDate) -> HeatmapReport {
        let from = as_of
            .checked_sub_days(Days::new(HEATMAP_WINDOW_DAYS - 1))
            .unwrap_or(as_of);
        let range = DateRange {
            date_from: Some(from),
            date_to: Some(as_of),
        };

        let mut per_day: HashMap<NaiveDate, (Decimal, u32)> = HashMap::new();
        for v in Self::confirmed(vouchers, range) {
            let entry = per_day.entry(v.date).or_insert((Decimal::ZERO, 0));
            entry.0 += v.amount;
            entry.1 += 1;
        }
        let max_amount = per_day
            .values()
            .map(|(amount, _)| *amount)
            .max()
            .unwrap_or(Decimal::ZERO);

        let cells = from
            .iter_days()
            .take_while(|d| *d <= as_of)
            .map(|date| {
                let (amount, voucher_count) = per_day.get(&date).copied().unwrap_or_default();
                let intensity = if max_amount.is_zero() {
                    Decimal::ZERO
                } else {
                    (amount / max_amount)
                        .round_dp(4)
                        .clamp(Decimal::ZERO, Decimal::ONE)
                };
                let week = date.iso_week();
                HeatmapCell {
                    date,
                    iso_year: week.year(),
                    iso_week: week.week(),
                    day_of_week: date.weekday().num_days_from_monday(),
                    amount,
                    voucher_count,
                    intensity,
                }
            })
            .collect();

        HeatmapReport {
            from,
            to: as_of,
            max_amount,
            cells,
        }
    }

    /// Categories in tree order with their depth.
    fn pre_order(tree: &CategoryTree) -> Vec<(CategoryId, usize)> {
        let mut out = Vec::with_capacity(tree.len());
        let mut stack: Vec<(CategoryId, usize)> =
            tree.roots().iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for child in tree.children(id).iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    /// Budget against rolled-up spend for every category, in tree order.
    #[must_use]
    pub fn budget_comparison(tree: &CategoryTree) -> Vec<BudgetComparisonRow> {
        let rollup = BudgetAggregator::rollup(tree);
        Self::pre_order(tree)
            .into_iter()
            .filter_map(|(id, depth)| {
                let category = tree.get(id)?;
                let figures = rollup.get(&id)?;
                Some(BudgetComparisonRow {
                    category_id: id,
                    code: category.code.clone(),
                    name: category.display_name().to_string(),
                    depth,
                    is_group: category.is_group,
                    budget_amount: figures.budget_amount,
                    actual: figures.total_spent,
                    variance: figures.variance.as_ref().map(|v| v.variance),
                    utilization_percent: figures
                        .variance
                        .as_ref()
                        .map_or(Decimal::ZERO, |v| v.utilization_percent),
                    is_over_budget: figures.is_over_budget,
                })
            })
            .collect()
    }

    /// Flattened tree with rolled-up figures.
    #[must_use]
    pub fn expense_tree_rows(tree: &CategoryTree) -> Vec<ExpenseTreeRow> {
        let rollup = BudgetAggregator::rollup(tree);
        Self::pre_order(tree)
            .into_iter()
            .filter_map(|(id, depth)| {
                let category = tree.get(id)?;
                let figures = rollup.get(&id)?;
                Some(ExpenseTreeRow {
                    category_id: id,
                    code: category.code.clone(),
                    name: category.display_name().to_string(),
                    depth,
                    is_group: category.is_group,
                    total_spent: figures.total_spent,
                    budget_amount: figures.budget_amount,
                })
            })
            .collect()
    }

    /// Confirmed vouchers of one leaf category with a running total.
    pub fn category_ledger(
        tree: &CategoryTree,
        vouchers: &[ExpenseVoucher],
        category_id: CategoryId,
        range: DateRange,
    ) -> Result<CategoryLedgerReport, ExpenseError> {
        let category = tree.require(category_id)?;
        let mut matching: Vec<&ExpenseVoucher> = Self::confirmed(vouchers, range)
            .filter(|v| v.category_id == category_id)
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date).then(a.sequence.cmp(&b.sequence)));

        let mut running_total = Decimal::ZERO;
        let rows = matching
            .into_iter()
            .map(|v| {
                running_total += v.amount;
                CategoryLedgerRow {
                    voucher_id: v.id,
                    voucher_number: v.voucher_number.clone(),
                    date: v.date,
                    description: v.description.clone(),
                    amount: v.amount,
                    running_total,
                }
            })
            .collect();

        Ok(CategoryLedgerReport {
            category_id,
            code: category.code.clone(),
            name: category.display_name().to_string(),
            rows,
            total: running_total,
        })
    }

    /// Every voucher in the window, ordered by `group_by` then date.
    pub fn vouchers_list(
        tree: &CategoryTree,
        vouchers: &[ExpenseVoucher],
        range: DateRange,
        group_by: Option<&str>,
    ) -> Result<Vec<VoucherListRow>, ExpenseError> {
        let mut rows: Vec<VoucherListRow> = vouchers
            .iter()
            .filter(|v| range.contains(v.date))
            .map(|v| VoucherListRow {
                voucher_number: v.voucher_number.clone(),
                date: v.date,
                category_code: tree
                    .get(v.category_id)
                    .map(|c| c.code.clone())
                    .unwrap_or_default(),
                description: v.description.clone(),
                amount: v.amount,
                payment_method: v.payment_method,
                status: v.status,
                cost_center_id: v.cost_center_id,
                supplier_id: v.supplier_id,
            })
            .collect();

        let by_date = |a: &VoucherListRow, b: &VoucherListRow| {
            a.date.cmp(&b.date).then_with(|| a.voucher_number.cmp(&b.voucher_number))
        };
        match group_by {
            None | Some("month") => rows.sort_by(by_date),
            Some("category") => {
                rows.sort_by(|a, b| a.category_code.cmp(&b.category_code).then_with(|| by_date(a, b)));
            }
            Some("cost_center") => rows.sort_by(|a, b| {
                a.cost_center_id
                    .map(|c| c.into_inner())
                    .cmp(&b.cost_center_id.map(|c| c.into_inner()))
                    .then_with(|| by_date(a, b))
            }),
            Some("supplier") => rows.sort_by(|a, b| {
                a.supplier_id
                    .map(|s| s.into_inner())
                    .cmp(&b.supplier_id.map(|s| s.into_inner()))
                    .then_with(|| by_date(a, b))
            }),
            Some(other) => {
                return Err(ExpenseError::validation(
                    "group_by",
                    format!("unsupported grouping {other}"),
                ));
            }
        }
        Ok(rows)
    }

    /// Builds the payload for an export request.
    pub fn export(
        request: &ExportRequest,
        tree: &CategoryTree,
        vouchers: &[ExpenseVoucher],
        currency_symbol: &str,
    ) -> Result<ExportPayload, ExpenseError> {
        if let (Some(from), Some(to)) = (request.date_from, request.date_to) {
            if from > to {
                return Err(ExpenseError::validation(
                    "date_from",
                    "must not be after date_to",
                ));
            }
        }
        let range = DateRange {
            date_from: request.date_from,
            date_to: request.date_to,
        };

        let rows = match request.report_type {
            ReportType::VouchersList => ExportRows::Vouchers(Self::vouchers_list(
                tree,
                vouchers,
                range,
                request.group_by.as_deref(),
            )?),
            ReportType::ExpenseTree => ExportRows::Tree(Self::expense_tree_rows(tree)),
            ReportType::BudgetComparison => ExportRows::Budget(Self::budget_comparison(tree)),
            ReportType::CostCenterReport => {
                ExportRows::CostCenters(Self::cost_center_report(vouchers, range).rows)
            }
            ReportType::SupplierReport => {
                ExportRows::Suppliers(Self::supplier_report(vouchers, range).rows)
            }
            ReportType::MonthlyComparison => {
                ExportRows::Months(Self::monthly_comparison(vouchers, range).months)
            }
            ReportType::CategoryLedger => {
                let category_id = request.category_id.ok_or_else(|| {
                    ExpenseError::validation("category_id", "is required for category_ledger")
                })?;
                ExportRows::Ledger(Self::category_ledger(tree, vouchers, category_id, range)?.rows)
            }
        };

        let window = match (request.date_from, request.date_to) {
            (Some(from), Some(to)) => format!("-{from}-{to}"),
            (Some(from), None) => format!("-from-{from}"),
            (None, Some(to)) => format!("-to-{to}"),
            (None, None) => String::new(),
        };

        Ok(ExportPayload {
            report_type: request.report_type,
            format: request.format,
            file_name: format!(
                "expenses-{}{window}.{}",
                request.report_type.as_str(),
                request.format.extension()
            ),
            currency_symbol: currency_symbol.to_string(),
            generated_at: Utc::now(),
            date_from: request.date_from,
            date_to: request.date_to,
            rows,
        })
    }
}
