//! Turning a chart click into a page navigation.

use crate::services::dom;
use log::{debug, error};
use shared::{ChartHit, ClickTarget, SelectFilters};

/// Values of the filter selects that travel with this target's clicks.
pub fn read_select_filters(target: &ClickTarget) -> SelectFilters {
    let Some(ids) = target.select_ids() else {
        return SelectFilters::default();
    };
    let document = gloo::utils::document();
    SelectFilters::new(
        dom::control_value(&document, ids.category),
        dom::control_value(&document, ids.account),
    )
}

/// Navigate to the filtered transaction list for `hit`. Clicks on empty
/// chart space and hits without a mapping do nothing.
pub fn follow_chart_click(target: &ClickTarget, transactions_url: &str, hit: Option<ChartHit>) {
    let Some(hit) = hit else {
        return;
    };
    let selects = read_select_filters(target);
    match target.resolve(hit, &selects) {
        Some(query) => navigate(&query.to_url(transactions_url)),
        None => debug!("Chart hit {:?} has no transactions to show", hit),
    }
}

pub fn navigate(url: &str) {
    debug!("Navigating to {}", url);
    if let Err(err) = gloo::utils::window().location().set_href(url) {
        error!("Navigation to {} failed: {:?}", url, err);
    }
}
