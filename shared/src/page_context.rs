//! # Page Context
//!
//! Pre-aggregated chart data the server renders into every page as a JSON
//! `<script type="application/json" id="page-context">` block. It is parsed
//! once at load and handed to the components that need it.

use crate::config::{LEGEND_LABEL_MAX_CHARS, REST_CATEGORY_SENTINEL};
use crate::date_range::DateWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PageContextError {
    #[error("page context is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{series}: {labels} labels but {values} values")]
    LengthMismatch {
        series: &'static str,
        labels: usize,
        values: usize,
    },
    #[error("reporting period ends ({end}) before it starts ({start})")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

/// Which page is being rendered, with the data its charts need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageContext {
    Dashboard(DashboardData),
    AnnualOverview(ReportData),
    IncomeExpense(ReportData),
    MonthlySpending(SpendingData),
    /// Form pages without charts.
    Plain,
}

impl PageContext {
    /// Parse and validate the JSON rendered by the server.
    pub fn from_json(raw: &str) -> Result<Self, PageContextError> {
        let context: PageContext = serde_json::from_str(raw)?;
        context.validate()?;
        Ok(context)
    }

    pub fn validate(&self) -> Result<(), PageContextError> {
        match self {
            PageContext::Dashboard(data) => data.validate(),
            PageContext::AnnualOverview(data) | PageContext::IncomeExpense(data) => data.validate(),
            PageContext::MonthlySpending(data) => data.validate(),
            PageContext::Plain => Ok(()),
        }
    }

    pub fn transactions_url(&self) -> Option<&str> {
        match self {
            PageContext::Dashboard(data) => Some(&data.transactions_url),
            PageContext::AnnualOverview(data) | PageContext::IncomeExpense(data) => Some(&data.transactions_url),
            PageContext::MonthlySpending(data) => Some(&data.transactions_url),
            PageContext::Plain => None,
        }
    }
}

fn check_len(series: &'static str, labels: usize, values: usize) -> Result<(), PageContextError> {
    if labels == values {
        Ok(())
    } else {
        Err(PageContextError::LengthMismatch { series, labels, values })
    }
}

/// Labels with a parallel series of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    fn validate(&self, series: &'static str) -> Result<(), PageContextError> {
        check_len(series, self.labels.len(), self.values.len())
    }
}

/// Whether a pie slice is a real category or the aggregated remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKey {
    Category(u32),
    Rest,
}

impl From<u32> for CategoryKey {
    fn from(id: u32) -> Self {
        if id == REST_CATEGORY_SENTINEL {
            CategoryKey::Rest
        } else {
            CategoryKey::Category(id)
        }
    }
}

/// Category totals for a pie/doughnut chart. On the wire the rest slice uses
/// id `0` and its member ids are listed in `rest_ids`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub ids: Vec<u32>,
    #[serde(default)]
    pub rest_ids: Vec<u32>,
}

impl CategoryBreakdown {
    fn validate(&self, series: &'static str) -> Result<(), PageContextError> {
        check_len(series, self.labels.len(), self.values.len())?;
        check_len(series, self.labels.len(), self.ids.len())
    }

    pub fn keys(&self) -> Vec<CategoryKey> {
        self.ids.iter().copied().map(CategoryKey::from).collect()
    }

    /// Labels shortened for the legend.
    pub fn legend_labels(&self) -> Vec<String> {
        self.labels
            .iter()
            .map(|label| truncate_label(label, LEGEND_LABEL_MAX_CHARS))
            .collect()
    }
}

/// Cut a label to `max_chars` characters, marking the cut with `...`.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let head: String = label.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub transactions_url: String,
    pub month_labels: Vec<String>,
    pub monthly_income: Vec<f64>,
    pub monthly_expenses: Vec<f64>,
    /// First day of the reporting period; also the month of the first bar.
    pub pie_start_date: NaiveDate,
    pub pie_end_date: NaiveDate,
    pub expense_categories: CategoryBreakdown,
    pub income_categories: CategoryBreakdown,
    pub cash_flow: ChartSeries,
}

impl DashboardData {
    fn validate(&self) -> Result<(), PageContextError> {
        check_len("monthly_income", self.month_labels.len(), self.monthly_income.len())?;
        check_len("monthly_expenses", self.month_labels.len(), self.monthly_expenses.len())?;
        self.expense_categories.validate("expense_categories")?;
        self.income_categories.validate("income_categories")?;
        self.cash_flow.validate("cash_flow")?;
        if self.pie_end_date < self.pie_start_date {
            return Err(PageContextError::InvalidPeriod {
                start: self.pie_start_date,
                end: self.pie_end_date,
            });
        }
        Ok(())
    }

    /// Income minus expenses, month by month.
    pub fn monthly_net(&self) -> Vec<f64> {
        self.monthly_income
            .iter()
            .zip(&self.monthly_expenses)
            .map(|(income, expense)| income - expense)
            .collect()
    }

    pub fn reporting_period(&self) -> DateWindow {
        DateWindow::new(self.pie_start_date, self.pie_end_date)
    }
}

/// Income/expense bars per label (years on the annual overview, `YYYY-MM`
/// on the income/expense report).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub transactions_url: String,
    pub labels: Vec<String>,
    pub incomes: Vec<f64>,
    pub expenses: Vec<f64>,
}

impl ReportData {
    fn validate(&self) -> Result<(), PageContextError> {
        check_len("incomes", self.labels.len(), self.incomes.len())?;
        check_len("expenses", self.labels.len(), self.expenses.len())
    }
}

/// Total spending per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingData {
    pub transactions_url: String,
    pub labels: Vec<String>,
    pub totals: Vec<f64>,
}

impl SpendingData {
    fn validate(&self) -> Result<(), PageContextError> {
        check_len("totals", self.labels.len(), self.totals.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DASHBOARD_JSON: &str = r#"{
        "page": "dashboard",
        "transactions_url": "/transactions",
        "month_labels": ["Jan", "Feb"],
        "monthly_income": [1000.0, 1200.0],
        "monthly_expenses": [400.0, 1500.0],
        "pie_start_date": "2024-01-01",
        "pie_end_date": "2024-02-29",
        "expense_categories": {
            "labels": ["Groceries", "Rest"],
            "values": [300.0, 120.0],
            "ids": [7, 0],
            "rest_ids": [5, 9, 12]
        },
        "income_categories": { "labels": ["Salary"], "values": [2200.0], "ids": [3] },
        "cash_flow": { "labels": ["2024-01-31", "2024-02-29"], "values": [600.0, 300.0] }
    }"#;

    #[test]
    fn test_parse_dashboard_context() {
        let context = PageContext::from_json(DASHBOARD_JSON).unwrap();
        let PageContext::Dashboard(data) = context else {
            panic!("expected dashboard context");
        };
        assert_eq!(data.pie_start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(data.monthly_net(), vec![600.0, -300.0]);
        assert_eq!(
            data.expense_categories.keys(),
            vec![CategoryKey::Category(7), CategoryKey::Rest]
        );
        assert!(data.income_categories.rest_ids.is_empty());
    }

    #[test]
    fn test_parse_report_and_plain_contexts() {
        let annual = r#"{"page":"annual_overview","transactions_url":"/t","labels":["2023"],"incomes":[1.0],"expenses":[2.0]}"#;
        assert!(matches!(PageContext::from_json(annual), Ok(PageContext::AnnualOverview(_))));

        let plain = PageContext::from_json(r#"{"page":"plain"}"#).unwrap();
        assert_eq!(plain, PageContext::Plain);
        assert_eq!(plain.transactions_url(), None);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let spending = r#"{"page":"monthly_spending","transactions_url":"/t","labels":["2024-01","2024-02"],"totals":[1.0]}"#;
        let err = PageContext::from_json(spending).unwrap_err();
        assert!(matches!(
            err,
            PageContextError::LengthMismatch { series: "totals", labels: 2, values: 1 }
        ));
    }

    #[test]
    fn test_inverted_period_is_rejected() {
        let json = DASHBOARD_JSON.replace(
            r#""pie_end_date": "2024-02-29""#,
            r#""pie_end_date": "2023-12-31""#,
        );
        assert!(matches!(
            PageContext::from_json(&json),
            Err(PageContextError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_extra_dashboard_keys_are_ignored() {
        let json = DASHBOARD_JSON.replace(
            r#""transactions_url": "/transactions","#,
            r#""transactions_url": "/transactions", "current_year": 2024,"#,
        );
        assert_eq!(
            PageContext::from_json(&json).unwrap(),
            PageContext::from_json(DASHBOARD_JSON).unwrap()
        );
    }

    #[test]
    fn test_unknown_page_is_a_parse_error() {
        assert!(matches!(
            PageContext::from_json(r#"{"page":"budgets"}"#),
            Err(PageContextError::Parse(_))
        ));
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Groceries", 10), "Groceries");
        assert_eq!(truncate_label("Entertainment", 10), "Entertainm...");
        assert_eq!(truncate_label("Café au lait!", 10), "Café au la...");
    }
}
