//! # Chart Click Resolution
//!
//! Every chart on the dashboard and report pages is a shortcut into the
//! transactions list: clicking a bar, point or slice opens the list filtered
//! to what that element stands for. This module turns a hit on a chart
//! element into the [`FilterQuery`] for that navigation; hit testing and the
//! redirect itself belong to the page layer.

use crate::config::selects;
use crate::date_range::{parse_iso_date, parse_year, parse_year_month, DateWindow};
use crate::filter_query::{FilterQuery, TransactionKind};
use crate::page_context::{CategoryBreakdown, CategoryKey};
use chrono::NaiveDate;
use log::warn;

/// The chart element under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartHit {
    pub dataset_index: usize,
    pub index: usize,
}

impl ChartHit {
    pub fn new(dataset_index: usize, index: usize) -> Self {
        Self { dataset_index, index }
    }
}

/// Filter selects on the surrounding page, read at click time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectFilters {
    pub category: Option<String>,
    pub account: Option<String>,
}

impl SelectFilters {
    /// Empty select values mean "no filter".
    pub fn new(category: Option<String>, account: Option<String>) -> Self {
        Self {
            category: category.filter(|v| !v.is_empty()),
            account: account.filter(|v| !v.is_empty()),
        }
    }
}

/// DOM ids of the selects a chart carries forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectIds {
    pub category: &'static str,
    pub account: &'static str,
}

/// One clickable slice of a category pie: real category or the rest bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySlices {
    pub keys: Vec<CategoryKey>,
    pub rest_ids: Vec<u32>,
}

impl From<&CategoryBreakdown> for CategorySlices {
    fn from(breakdown: &CategoryBreakdown) -> Self {
        Self {
            keys: breakdown.keys(),
            rest_ids: breakdown.rest_ids.clone(),
        }
    }
}

impl CategorySlices {
    /// Real category ids behind the slice at `index`.
    pub fn ids_at(&self, index: usize) -> Option<Vec<u32>> {
        match self.keys.get(index)? {
            CategoryKey::Category(id) => Some(vec![*id]),
            CategoryKey::Rest if self.rest_ids.is_empty() => None,
            CategoryKey::Rest => Some(self.rest_ids.clone()),
        }
    }
}

/// What a click on a given chart means.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickTarget {
    /// Dashboard income/expense bars, one group per month from `first_month`.
    MonthlyBars { first_month: NaiveDate },
    /// Dashboard net line, one point per month from `first_month`.
    MonthlyNet { first_month: NaiveDate },
    /// Dashboard category pie or doughnut over the reporting period.
    CategoryPie {
        kind: TransactionKind,
        slices: CategorySlices,
        period: DateWindow,
    },
    /// Dashboard cumulative balance, one point per ISO date.
    CashFlow { dates: Vec<String> },
    /// Annual overview income/expense bars labelled by year.
    AnnualOverview { labels: Vec<String> },
    /// Income/expense report bars labelled `YYYY-MM`.
    IncomeExpenseReport { labels: Vec<String> },
    /// Monthly spending report, a single expense series labelled `YYYY-MM ...`.
    MonthlySpending { labels: Vec<String> },
}

impl ClickTarget {
    /// Selects whose values ride along with the navigation, if any.
    pub fn select_ids(&self) -> Option<SelectIds> {
        match self {
            ClickTarget::AnnualOverview { .. } | ClickTarget::IncomeExpenseReport { .. } => Some(SelectIds {
                category: selects::REPORT_CATEGORY,
                account: selects::ACCOUNT,
            }),
            ClickTarget::MonthlySpending { .. } => Some(SelectIds {
                category: selects::SPENDING_CATEGORY,
                account: selects::ACCOUNT,
            }),
            _ => None,
        }
    }

    /// Filters for the element that was hit, or `None` when the hit does not
    /// map to anything navigable (index out of range, unreadable label).
    pub fn resolve(&self, hit: ChartHit, selects: &SelectFilters) -> Option<FilterQuery> {
        let query = match self {
            ClickTarget::MonthlyBars { first_month } => {
                let window = DateWindow::nth_month_from(*first_month, hit.index)?;
                FilterQuery::new()
                    .with_window(&window)
                    .with_kind(TransactionKind::from_dataset_index(hit.dataset_index))
            }
            ClickTarget::MonthlyNet { first_month } => {
                let window = DateWindow::nth_month_from(*first_month, hit.index)?;
                FilterQuery::new().with_window(&window)
            }
            ClickTarget::CategoryPie { kind, slices, period } => {
                let Some(ids) = slices.ids_at(hit.index) else {
                    warn!("No categories behind slice {}", hit.index);
                    return None;
                };
                FilterQuery::new()
                    .with_kind(*kind)
                    .with_categories(&ids)
                    .with_window(period)
            }
            ClickTarget::CashFlow { dates } => {
                let raw = dates.get(hit.index)?;
                let date = parse_iso_date(raw).map_err(|e| warn!("{}", e)).ok()?;
                FilterQuery::new().with_window(&DateWindow::month_to_date(date))
            }
            ClickTarget::AnnualOverview { labels } => {
                let year = parse_year(labels.get(hit.index)?).map_err(|e| warn!("{}", e)).ok()?;
                let window = DateWindow::year(year)?;
                with_selects(
                    FilterQuery::new()
                        .with_window(&window)
                        .with_kind(TransactionKind::from_dataset_index(hit.dataset_index)),
                    selects,
                )
            }
            ClickTarget::IncomeExpenseReport { labels } => {
                let window = month_window_for_label(labels.get(hit.index)?)?;
                with_selects(
                    FilterQuery::new()
                        .with_window(&window)
                        .with_kind(TransactionKind::from_dataset_index(hit.dataset_index)),
                    selects,
                )
            }
            ClickTarget::MonthlySpending { labels } => {
                let window = month_window_for_label(labels.get(hit.index)?)?;
                with_selects(
                    FilterQuery::new()
                        .with_window(&window)
                        .with_kind(TransactionKind::Expense),
                    selects,
                )
            }
        };
        Some(query)
    }
}

fn month_window_for_label(label: &str) -> Option<DateWindow> {
    let (year, month) = parse_year_month(label).map_err(|e| warn!("{}", e)).ok()?;
    DateWindow::month(year, month)
}

fn with_selects(query: FilterQuery, selects: &SelectFilters) -> FilterQuery {
    query
        .with_category_value(selects.category.as_deref())
        .with_account_value(selects.account.as_deref())
}
