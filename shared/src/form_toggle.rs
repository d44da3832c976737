//! Show/hide rule for the free-text "new category" inputs next to category selects.

use crate::config::OTHER_OPTION_VALUE;

/// Prefix of the repeated category selects on the import and bulk-edit forms.
pub const INDEXED_SELECT_PREFIX: &str = "category-select-";

/// Prefix of the input paired with an indexed select.
pub const INDEXED_INPUT_PREFIX: &str = "new-category-";

/// What the dependent field should look like for a given select value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependentFieldState {
    pub visible: bool,
    pub required: bool,
    pub clear_value: bool,
}

/// `"other"` reveals the field and makes it required; anything else hides
/// it, drops the requirement and clears whatever was typed.
pub fn dependent_field_state(select_value: &str) -> DependentFieldState {
    if select_value == OTHER_OPTION_VALUE {
        DependentFieldState {
            visible: true,
            required: true,
            clear_value: false,
        }
    } else {
        DependentFieldState {
            visible: false,
            required: false,
            clear_value: true,
        }
    }
}

/// A field that can be shown, required and cleared.
pub trait DependentField {
    fn set_visible(&mut self, visible: bool);
    fn set_required(&mut self, required: bool);
    fn clear_value(&mut self);
}

pub fn apply_field_state<F: DependentField + ?Sized>(state: DependentFieldState, field: &mut F) {
    field.set_visible(state.visible);
    field.set_required(state.required);
    if state.clear_value {
        field.clear_value();
    }
}

/// Numeric suffix shared by a select and its input (`category-select-3` -> `3`).
pub fn indexed_suffix(select_id: &str) -> Option<&str> {
    let suffix = select_id.strip_prefix(INDEXED_SELECT_PREFIX)?;
    if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
        Some(suffix)
    } else {
        None
    }
}

/// Id of the input paired with an indexed select.
pub fn paired_input_id(select_id: &str) -> Option<String> {
    indexed_suffix(select_id).map(|suffix| format!("{}{}", INDEXED_INPUT_PREFIX, suffix))
}
