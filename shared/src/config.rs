//! Fixed keys and identifiers shared by the page layer and the server templates.

/// `localStorage` key holding the card visibility record (JSON object of card id to bool).
pub const DASHBOARD_SETTINGS_KEY: &str = "dashboardSettings";

/// `localStorage` key holding the manual card order (JSON array of card ids).
pub const DASHBOARD_ORDER_KEY: &str = "dashboardOrder";

/// `localStorage` key holding the raw `light` / `dark` theme string.
pub const THEME_KEY: &str = "theme";

/// Cards rendered on the dashboard, all visible until the user says otherwise.
pub const DEFAULT_DASHBOARD_CARDS: [&str; 9] = [
    "card-monthlyCombined",
    "card-monthlyNet",
    "card-expenseCategoriesChart",
    "card-incomeCategoriesChart",
    "card-incomeCategoriesList",
    "card-expenseCategoriesList",
    "card-budgetActual",
    "card-recentTransactions",
    "card-cashFlow",
];

/// Category id the server uses for the aggregated "rest" slice.
pub const REST_CATEGORY_SENTINEL: u32 = 0;

/// Select option that reveals the free-text "new category" input.
pub const OTHER_OPTION_VALUE: &str = "other";

/// Legend labels longer than this are cut and suffixed with `...`.
pub const LEGEND_LABEL_MAX_CHARS: usize = 10;

/// Id of the `<script type="application/json">` element carrying the page context.
pub const PAGE_CONTEXT_ELEMENT_ID: &str = "page-context";

/// DOM ids of the filter selects carried forward by report chart clicks.
pub mod selects {
    pub const REPORT_CATEGORY: &str = "category";
    pub const SPENDING_CATEGORY: &str = "category_id";
    pub const ACCOUNT: &str = "account_id";
}
