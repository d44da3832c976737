//! "New category" inputs that follow their category select, and the bulk
//! select-all checkbox.

use crate::services::dom;
use gloo::events::EventListener;
use log::debug;
use shared::form_toggle::{paired_input_id, INDEXED_SELECT_PREFIX};
use shared::{apply_field_state, dependent_field_state, DependentField};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement, HtmlSelectElement};

pub const OVERRIDE_SELECT_ID: &str = "override_category";
pub const NEW_CATEGORY_DIV_ID: &str = "new-category-div";
pub const SELECT_ALL_ID: &str = "select_all";
pub const TRANSACTION_CHECKBOX_SELECTOR: &str = "input[name=\"transaction_ids\"]";

/// A shown/hidden element and the text input it carries (itself, or the
/// first input inside a wrapper div).
struct DomField {
    container: HtmlElement,
    input: Option<HtmlInputElement>,
}

impl DomField {
    fn new(container: HtmlElement) -> Self {
        let input = match container.dyn_ref::<HtmlInputElement>() {
            Some(input) => Some(input.clone()),
            None => container
                .query_selector("input")
                .ok()
                .flatten()
                .and_then(|element| element.dyn_into::<HtmlInputElement>().ok()),
        };
        Self { container, input }
    }
}

impl DependentField for DomField {
    fn set_visible(&mut self, visible: bool) {
        dom::set_displayed(&self.container, visible);
    }

    fn set_required(&mut self, required: bool) {
        if let Some(input) = &self.input {
            input.set_required(required);
        }
    }

    fn clear_value(&mut self) {
        if let Some(input) = &self.input {
            input.set_value("");
        }
    }
}

/// Apply the rule now and again on every change of `select`.
fn bind_pair(select: HtmlSelectElement, field: HtmlElement) {
    let mut field = DomField::new(field);
    apply_field_state(dependent_field_state(&select.value()), &mut field);

    let target = select.clone();
    EventListener::new(&target, "change", move |_| {
        apply_field_state(dependent_field_state(&select.value()), &mut field);
    })
    .forget();
}

fn bind_override(document: &Document) -> usize {
    match (
        dom::element_by_id::<HtmlSelectElement>(document, OVERRIDE_SELECT_ID),
        dom::element_by_id::<HtmlElement>(document, NEW_CATEGORY_DIV_ID),
    ) {
        (Some(select), Some(field)) => {
            bind_pair(select, field);
            1
        }
        _ => 0,
    }
}

fn bind_indexed(document: &Document) -> usize {
    let selector = format!("select[id^='{}']", INDEXED_SELECT_PREFIX);
    let mut bound = 0;
    for select in dom::query_all::<HtmlSelectElement>(document, &selector) {
        let Some(input_id) = paired_input_id(&select.id()) else {
            continue;
        };
        if let Some(field) = dom::element_by_id::<HtmlElement>(document, &input_id) {
            bind_pair(select, field);
            bound += 1;
        }
    }
    bound
}

fn bind_select_all(document: &Document) -> bool {
    let Some(select_all) = dom::element_by_id::<HtmlInputElement>(document, SELECT_ALL_ID) else {
        return false;
    };
    let document = document.clone();
    let target = select_all.clone();
    EventListener::new(&target, "click", move |_| {
        let checked = select_all.checked();
        for checkbox in dom::query_all::<HtmlInputElement>(&document, TRANSACTION_CHECKBOX_SELECTOR) {
            checkbox.set_checked(checked);
        }
    })
    .forget();
    true
}

/// Wire every form helper present on the page.
pub fn mount(document: &Document) {
    let pairs = bind_override(document) + bind_indexed(document);
    let select_all = bind_select_all(document);
    if pairs > 0 || select_all {
        debug!("Bound {} category field pairs, select-all: {}", pairs, select_all);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::Event;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fixture(html: &str) -> web_sys::Element {
        let host = gloo::utils::document().create_element("div").unwrap();
        host.set_inner_html(html);
        gloo::utils::body().append_child(&host).unwrap();
        host
    }

    fn choose(document: &Document, select_id: &str, value: &str) {
        let select = dom::element_by_id::<HtmlSelectElement>(document, select_id).unwrap();
        select.set_value(value);
        select.dispatch_event(&Event::new("change").unwrap()).unwrap();
    }

    #[wasm_bindgen_test]
    fn test_indexed_pairs_follow_their_own_select() {
        let host = fixture(
            r#"<select id="category-select-0"><option value="1">Food</option><option value="other">Other</option></select>
               <input id="new-category-0" value="">
               <select id="category-select-1"><option value="1">Food</option><option value="other">Other</option></select>
               <input id="new-category-1" value="stale">"#,
        );
        let document = gloo::utils::document();
        bind_indexed(&document);

        let input0 = dom::element_by_id::<HtmlInputElement>(&document, "new-category-0").unwrap();
        let input1 = dom::element_by_id::<HtmlInputElement>(&document, "new-category-1").unwrap();
        // hidden and cleared at load
        assert_eq!(input1.value(), "");
        assert_eq!(input1.style().get_property_value("display").unwrap(), "none");

        choose(&document, "category-select-0", "other");
        assert!(input0.required());
        assert_eq!(input0.style().get_property_value("display").unwrap(), "block");
        assert!(!input1.required());

        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_select_all_drives_every_transaction_checkbox() {
        let host = fixture(
            r#"<input type="checkbox" id="select_all">
               <input type="checkbox" name="transaction_ids" value="1">
               <input type="checkbox" name="transaction_ids" value="2" checked>
               <input type="checkbox" name="other" value="3">"#,
        );
        let document = gloo::utils::document();
        assert!(bind_select_all(&document));

        let select_all = dom::element_by_id::<HtmlInputElement>(&document, SELECT_ALL_ID).unwrap();
        let states = || -> Vec<bool> {
            dom::query_all::<HtmlInputElement>(&document, TRANSACTION_CHECKBOX_SELECTOR)
                .iter()
                .map(HtmlInputElement::checked)
                .collect()
        };

        select_all.click();
        assert_eq!(states(), vec![true, true]);
        select_all.click();
        assert_eq!(states(), vec![false, false]);
        let other = document.query_selector("input[name=\"other\"]").unwrap().unwrap();
        assert!(!other.dyn_into::<HtmlInputElement>().unwrap().checked());

        host.remove();
    }
}
