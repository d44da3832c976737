use crate::services::LocalStore;
use log::debug;
use shared::{Theme, ThemeSurface, ThemeToggle};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};
use yew::prelude::*;

pub const THEME_TOGGLE_HOST_ID: &str = "themeToggle";
pub const THEME_ATTRIBUTE: &str = "data-bs-theme";
pub const DARK_BACKGROUND_PROPERTY: &str = "--dark-bg";

/// The `<html>` element, where the theme attribute and background live.
pub struct DocumentTheme {
    root: HtmlElement,
}

impl DocumentTheme {
    pub fn new(document: &Document) -> Option<Self> {
        let root = document.document_element()?.dyn_into::<HtmlElement>().ok()?;
        Some(Self { root })
    }
}

impl ThemeSurface for DocumentTheme {
    fn set_theme_attribute(&mut self, theme: Theme) {
        let _ = self.root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
    }

    fn set_background_override(&mut self, color: Option<&str>) {
        let style = self.root.style();
        let _ = match color {
            Some(color) => style.set_property("background-color", color),
            None => style.remove_property("background-color").map(|_| ()),
        };
    }

    fn dark_background(&self) -> String {
        gloo::utils::window()
            .get_computed_style(&self.root)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(DARK_BACKGROUND_PROPERTY).ok())
            .unwrap_or_default()
    }
}

/// Re-apply the stored theme at page load.
pub fn apply_stored_theme(document: &Document) {
    let Some(mut surface) = DocumentTheme::new(document) else {
        return;
    };
    let toggle = ThemeToggle::new(LocalStore);
    toggle.apply(&mut surface);
    debug!("Applied {} theme", toggle.current());
}

#[function_component(ThemeToggleButton)]
pub fn theme_toggle_button() -> Html {
    let toggle = use_mut_ref(|| ThemeToggle::new(LocalStore));
    let theme = use_state(|| toggle.borrow().current());

    let onclick = {
        let toggle = toggle.clone();
        let theme = theme.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(mut surface) = DocumentTheme::new(&gloo::utils::document()) else {
                return;
            };
            let next = toggle.borrow_mut().toggle(&mut surface);
            theme.set(next);
        })
    };

    let (icon, title) = match *theme {
        Theme::Dark => ("\u{2600}", "Switch to light mode"),
        Theme::Light => ("\u{263E}", "Switch to dark mode"),
    };

    html! {
        <button type="button" class="btn btn-outline-secondary theme-toggle" {title} {onclick}>
            { icon }
        </button>
    }
}

/// Mount the toggle button when the page has a slot for it.
pub fn mount(document: &Document) {
    if let Some(host) = document.get_element_by_id(THEME_TOGGLE_HOST_ID) {
        yew::Renderer::<ThemeToggleButton>::with_root(host).render();
    }
}
