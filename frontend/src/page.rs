//! Wires the page together from the server-rendered page context.

use crate::components::{charts, dashboard, form_toggles, theme_toggle};
use anyhow::Context as _;
use log::info;
use shared::config::PAGE_CONTEXT_ELEMENT_ID;
use shared::PageContext;
use web_sys::Document;

/// Page context from `<script id="page-context">`; form-only pages omit it.
pub fn read_page_context(document: &Document) -> anyhow::Result<PageContext> {
    let Some(element) = document.get_element_by_id(PAGE_CONTEXT_ELEMENT_ID) else {
        return Ok(PageContext::Plain);
    };
    let raw = element.text_content().unwrap_or_default();
    PageContext::from_json(&raw).context("page context could not be read")
}

/// Theme first so the page never flashes the wrong colors, then the layout
/// and form helpers, then whatever charts the page context asks for. Only the
/// charts depend on the page context parsing.
pub fn assemble(document: &Document) -> anyhow::Result<()> {
    theme_toggle::apply_stored_theme(document);
    theme_toggle::mount(document);
    dashboard::mount(document);
    form_toggles::mount(document);

    match read_page_context(document)? {
        PageContext::Dashboard(data) => charts::mount_dashboard_charts(document, &data)?,
        PageContext::AnnualOverview(data) => charts::mount_annual_overview(document, &data)?,
        PageContext::IncomeExpense(data) => charts::mount_income_expense(document, &data)?,
        PageContext::MonthlySpending(data) => charts::mount_monthly_spending(document, &data)?,
        PageContext::Plain => info!("No charts on this page"),
    }
    Ok(())
}
