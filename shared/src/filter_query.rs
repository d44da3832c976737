//! Query parameters understood by the transactions view.

use crate::date_range::DateWindow;

pub mod keys {
    pub const TIME_FILTER: &str = "time_filter";
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
    pub const FILTER: &str = "filter";
    pub const CATEGORY_ID: &str = "category_id";
    pub const CATEGORY_IDS: &str = "category_ids";
    pub const ACCOUNT_ID: &str = "account_id";
}

/// Value of `time_filter` selecting an explicit start/end range.
pub const CUSTOM_TIME_FILTER: &str = "custom";

/// Which side of the ledger a chart element stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Income/expense bar charts always put income in the first dataset.
    pub fn from_dataset_index(dataset_index: usize) -> Self {
        if dataset_index == 0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }
}

/// Ordered set of filter parameters built fresh for every navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    params: Vec<(&'static str, String)>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `time_filter=custom` with the window's start and end dates.
    pub fn with_window(mut self, window: &DateWindow) -> Self {
        self.params.push((keys::TIME_FILTER, CUSTOM_TIME_FILTER.to_string()));
        self.params.push((keys::START_DATE, window.start_iso()));
        self.params.push((keys::END_DATE, window.end_iso()));
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.params.push((keys::FILTER, kind.as_str().to_string()));
        self
    }

    /// Adds the category filter, choosing the key by cardinality: several ids
    /// are comma-joined under `category_ids`, a single id goes under `category_id`.
    pub fn with_categories(mut self, ids: &[u32]) -> Self {
        match ids {
            [] => {}
            [id] => self.params.push((keys::CATEGORY_ID, id.to_string())),
            many => {
                let joined = many
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                self.params.push((keys::CATEGORY_IDS, joined));
            }
        }
        self
    }

    /// Carries a category select's raw value forward; empty values are skipped.
    pub fn with_category_value(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.params.push((keys::CATEGORY_ID, value.to_string()));
        }
        self
    }

    /// Carries an account select's raw value forward; empty values are skipped.
    pub fn with_account_value(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.params.push((keys::ACCOUNT_ID, value.to_string()));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Percent-encoded `key=value&...` string.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Appends the query to a base URL, respecting any query it already has.
    pub fn to_url(&self, base: &str) -> String {
        if self.params.is_empty() {
            return base.to_string();
        }
        let separator = if !base.contains('?') {
            "?"
        } else if base.ends_with('?') || base.ends_with('&') {
            ""
        } else {
            "&"
        };
        format!("{}{}{}", base, separator, self.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_2024() -> DateWindow {
        DateWindow::month(2024, 3).unwrap()
    }

    #[test]
    fn test_window_params() {
        let query = FilterQuery::new().with_window(&march_2024());
        assert_eq!(query.get(keys::TIME_FILTER), Some("custom"));
        assert_eq!(query.get(keys::START_DATE), Some("2024-03-01"));
        assert_eq!(query.get(keys::END_DATE), Some("2024-03-31"));
    }

    #[test]
    fn test_single_category_uses_singular_key() {
        let query = FilterQuery::new().with_categories(&[7]);
        assert_eq!(query.get(keys::CATEGORY_ID), Some("7"));
        assert!(!query.contains(keys::CATEGORY_IDS));
    }

    #[test]
    fn test_many_categories_use_plural_key() {
        let query = FilterQuery::new().with_categories(&[5, 9, 12]);
        assert_eq!(query.get(keys::CATEGORY_IDS), Some("5,9,12"));
        assert!(!query.contains(keys::CATEGORY_ID));
    }

    #[test]
    fn test_empty_select_values_are_skipped() {
        let query = FilterQuery::new()
            .with_category_value(Some(""))
            .with_account_value(None);
        assert!(query.is_empty());
    }

    #[test]
    fn test_to_url_keeps_parameter_order_and_encodes_values() {
        let url = FilterQuery::new()
            .with_window(&march_2024())
            .with_kind(TransactionKind::Expense)
            .with_categories(&[5, 9])
            .to_url("/transactions");
        assert_eq!(
            url,
            "/transactions?time_filter=custom&start_date=2024-03-01&end_date=2024-03-31&filter=expense&category_ids=5%2C9"
        );
    }

    #[test]
    fn test_to_url_appends_to_existing_query() {
        let url = FilterQuery::new()
            .with_kind(TransactionKind::Income)
            .to_url("/transactions?page=2");
        assert_eq!(url, "/transactions?page=2&filter=income");
        assert_eq!(FilterQuery::new().to_url("/transactions"), "/transactions");
    }

    #[test]
    fn test_kind_from_dataset_index() {
        assert_eq!(TransactionKind::from_dataset_index(0), TransactionKind::Income);
        assert_eq!(TransactionKind::from_dataset_index(1), TransactionKind::Expense);
    }
}
