//! Dashboard card switches, saved card order and drag reordering.

use crate::services::{dom, LocalStore};
use gloo::events::{EventListener, EventListenerOptions};
use log::{debug, error, info};
use shared::{apply_order, apply_visibility, CardSurface, DashboardCardPrefs, DashboardLayoutStore, ToggleState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Element, Event, HtmlElement, HtmlInputElement, Node};

pub const CONTAINER_ID: &str = "dashboardContainer";
pub const SAVE_BUTTON_ID: &str = "saveDashboardSettings";
pub const TOGGLE_SELECTOR: &str = ".dashboard-toggle[data-card]";
pub const DRAG_HANDLE_SELECTOR: &str = ".drag-handle";
const CARD_ATTRIBUTE: &str = "data-card";

type LayoutStore = DashboardLayoutStore<LocalStore>;

/// Cards looked up by element id in the live document.
pub struct DocumentCards {
    document: web_sys::Document,
}

impl DocumentCards {
    pub fn new(document: &web_sys::Document) -> Self {
        Self {
            document: document.clone(),
        }
    }
}

impl CardSurface for DocumentCards {
    fn set_card_visible(&mut self, card_id: &str, visible: bool) -> bool {
        match dom::element_by_id::<HtmlElement>(&self.document, card_id) {
            Some(card) => {
                dom::set_displayed(&card, visible);
                true
            }
            None => false,
        }
    }
}

fn toggles(document: &web_sys::Document) -> Vec<(String, HtmlInputElement)> {
    dom::query_all::<HtmlInputElement>(document, TOGGLE_SELECTOR)
        .into_iter()
        .filter_map(|input| input.get_attribute(CARD_ATTRIBUTE).map(|card| (card, input)))
        .collect()
}

fn read_toggles(document: &web_sys::Document) -> Vec<ToggleState> {
    toggles(document)
        .into_iter()
        .map(|(card, input)| ToggleState::new(card, input.checked()))
        .collect()
}

/// Check each switch according to the loaded visibility.
fn sync_toggles(document: &web_sys::Document, prefs: &DashboardCardPrefs) {
    for (card, input) in toggles(document) {
        input.set_checked(prefs.is_visible(&card));
    }
}

fn child_ids(container: &Element) -> Vec<String> {
    dom::children(container).iter().map(Element::id).collect()
}

/// Re-append the saved cards in saved order; cards the saved order does not
/// name keep their relative order ahead of them.
fn restore_order(container: &Element, saved: &[String]) {
    if saved.is_empty() {
        return;
    }
    let current = child_ids(container);
    if apply_order(saved, &current) == current {
        return;
    }
    let children = dom::children(container);
    for id in saved.iter().filter(|id| !id.is_empty()) {
        if let Some(child) = children.iter().find(|child| child.id() == *id) {
            let _ = container.append_child(child);
        }
    }
    debug!("Restored dashboard order: {:?}", child_ids(container));
}

/// Set up the dashboard layout on any page that carries its container, save
/// button or card switches.
pub fn mount(document: &web_sys::Document) {
    let container = document.get_element_by_id(CONTAINER_ID);
    let save_button = document.get_element_by_id(SAVE_BUTTON_ID);
    if container.is_none() && save_button.is_none() && toggles(document).is_empty() {
        return;
    }

    let layout = Rc::new(LayoutStore::new(LocalStore));
    let prefs = layout.load_prefs();

    let shown = apply_visibility(&prefs, &mut DocumentCards::new(document));
    sync_toggles(document, &prefs);
    info!("Dashboard layout applied to {} cards", shown);

    if let Some(button) = save_button {
        let layout = layout.clone();
        let document = document.clone();
        EventListener::new(&button, "click", move |_| {
            let mut cards = DocumentCards::new(&document);
            if let Err(err) = layout.save_from_toggles(read_toggles(&document), &mut cards) {
                error!("Dashboard settings not saved: {}", err);
            }
        })
        .forget();
    }

    if let Some(container) = container {
        restore_order(&container, &prefs.order);
        enable_drag_reorder(container, layout);
    }
}

/// The direct child of `container` that contains the event target.
fn card_for_event(container: &Element, event: &Event) -> Option<Element> {
    let mut element = event.target()?.dyn_into::<Element>().ok()?;
    loop {
        let parent = element.parent_element()?;
        if &parent == container {
            return Some(element);
        }
        element = parent;
    }
}

fn started_on_handle(event: &Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.closest(DRAG_HANDLE_SELECTOR).ok().flatten())
        .is_some()
}

/// Cards become draggable only while pressed on their handle; each finished
/// drag persists the container's child order.
fn enable_drag_reorder(container: Element, layout: Rc<LayoutStore>) {
    let dragging: Rc<RefCell<Option<Element>>> = Rc::default();

    {
        let container_ref = container.clone();
        EventListener::new(&container, "mousedown", move |event| {
            if let Some(card) = card_for_event(&container_ref, event) {
                let draggable = if started_on_handle(event) { "true" } else { "false" };
                let _ = card.set_attribute("draggable", draggable);
            }
        })
        .forget();
    }

    {
        let container_ref = container.clone();
        let dragging = dragging.clone();
        EventListener::new(&container, "dragstart", move |event| {
            let Some(card) = card_for_event(&container_ref, event) else {
                return;
            };
            if card.get_attribute("draggable").as_deref() != Some("true") {
                return;
            }
            if let Some(transfer) = event.dyn_ref::<DragEvent>().and_then(DragEvent::data_transfer) {
                transfer.set_effect_allowed("move");
                let _ = transfer.set_data("text/plain", &card.id());
            }
            let _ = card.class_list().add_1("dragging");
            *dragging.borrow_mut() = Some(card);
        })
        .forget();
    }

    {
        let container_ref = container.clone();
        let dragging = dragging.clone();
        let options = EventListenerOptions::enable_prevent_default();
        EventListener::new_with_options(&container, "dragover", options, move |event| {
            let current = dragging.borrow();
            let Some(dragged) = current.as_ref() else {
                return;
            };
            event.prevent_default();
            let Some(over) = card_for_event(&container_ref, event) else {
                return;
            };
            if &over == dragged {
                return;
            }
            let Some(pointer_y) = event.dyn_ref::<DragEvent>().map(|drag| f64::from(drag.client_y())) else {
                return;
            };
            let rect = over.get_bounding_client_rect();
            let over_node: &Node = &over;
            let result = if pointer_y < rect.top() + rect.height() / 2.0 {
                container_ref.insert_before(dragged, Some(over_node))
            } else {
                container_ref.insert_before(dragged, over.next_sibling().as_ref())
            };
            if let Err(err) = result {
                debug!("Card move skipped: {:?}", err);
            }
        })
        .forget();
    }

    {
        let options = EventListenerOptions::enable_prevent_default();
        EventListener::new_with_options(&container, "drop", options, |event| event.prevent_default()).forget();
    }

    {
        let container_ref = container.clone();
        EventListener::new(&container, "dragend", move |_| {
            let Some(card) = dragging.borrow_mut().take() else {
                return;
            };
            let _ = card.class_list().remove_1("dragging");
            let _ = card.set_attribute("draggable", "false");
            if let Err(err) = layout.save_order(&child_ids(&container_ref)) {
                error!("Dashboard order not saved: {}", err);
            }
        })
        .forget();
    }
}
