//! Target-independent logic for the finance dashboard pages: date windows,
//! transaction filter queries, chart click resolution, dashboard layout and
//! theme persistence, and the page context the server renders.

pub mod chart_click;
pub mod config;
pub mod dashboard_layout;
pub mod date_range;
pub mod filter_query;
pub mod form_toggle;
pub mod page_context;
pub mod storage;
pub mod theme;

pub use chart_click::{CategorySlices, ChartHit, ClickTarget, SelectFilters, SelectIds};
pub use dashboard_layout::{
    apply_order, apply_visibility, CardSurface, DashboardCardPrefs, DashboardLayoutStore, ToggleState,
};
pub use date_range::{last_day_of_month, DateLabelError, DateWindow};
pub use filter_query::{FilterQuery, TransactionKind};
pub use form_toggle::{apply_field_state, dependent_field_state, DependentField, DependentFieldState};
pub use page_context::{
    CategoryBreakdown, CategoryKey, ChartSeries, DashboardData, PageContext, PageContextError, ReportData,
    SpendingData,
};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use theme::{apply_theme, Theme, ThemeSurface, ThemeToggle};
