//! Small typed lookups over the live document.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement};

pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Every element matching `selector` that casts to `T`.
pub fn query_all<T: JsCast>(document: &Document, selector: &str) -> Vec<T> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

/// Element children of `parent`, in document order.
pub fn children(parent: &Element) -> Vec<Element> {
    let collection = parent.children();
    (0..collection.length())
        .filter_map(|i| collection.item(i))
        .collect()
}

/// Current value of a `<select>` (or input) by id.
pub fn control_value(document: &Document, id: &str) -> Option<String> {
    let element = document.get_element_by_id(id)?;
    if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        Some(select.value())
    } else {
        element.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::value)
    }
}

pub fn set_displayed(element: &HtmlElement, displayed: bool) {
    let _ = element
        .style()
        .set_property("display", if displayed { "block" } else { "none" });
}
