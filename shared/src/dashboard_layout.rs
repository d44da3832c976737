//! # Dashboard Layout
//!
//! Card visibility and manual ordering for the dashboard. Both records live in
//! client storage under separate keys and are overwritten wholesale on save.
//! The DOM side is reached through [`CardSurface`]; everything here is pure
//! bookkeeping so it can be exercised without a browser.

use crate::config::{DASHBOARD_ORDER_KEY, DASHBOARD_SETTINGS_KEY, DEFAULT_DASHBOARD_CARDS};
use crate::storage::{read_json, write_json, KeyValueStore, StorageError};
use log::{debug, error, warn};
use std::collections::BTreeMap;

/// Visibility per card plus the user's drag order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardCardPrefs {
    pub visibility: BTreeMap<String, bool>,
    pub order: Vec<String>,
}

impl DashboardCardPrefs {
    /// Every known card visible, no custom order.
    pub fn defaults() -> Self {
        Self {
            visibility: default_visibility(),
            order: Vec::new(),
        }
    }

    /// Persisted value for the card, falling back to the default set.
    /// Cards nobody has heard of stay visible.
    pub fn is_visible(&self, card_id: &str) -> bool {
        self.visibility
            .get(card_id)
            .copied()
            .or_else(|| default_visibility().get(card_id).copied())
            .unwrap_or(true)
    }

    /// Every card id the prefs have an opinion about, defaults included.
    pub fn card_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = DEFAULT_DASHBOARD_CARDS.iter().map(|id| id.to_string()).collect();
        for id in self.visibility.keys() {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

impl Default for DashboardCardPrefs {
    fn default() -> Self {
        Self::defaults()
    }
}

fn default_visibility() -> BTreeMap<String, bool> {
    DEFAULT_DASHBOARD_CARDS
        .iter()
        .map(|id| (id.to_string(), true))
        .collect()
}

/// The checked state of one `.dashboard-toggle` switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleState {
    pub card_id: String,
    pub checked: bool,
}

impl ToggleState {
    pub fn new(card_id: impl Into<String>, checked: bool) -> Self {
        Self {
            card_id: card_id.into(),
            checked,
        }
    }
}

/// Whatever renders the cards: the live DOM in the browser, a map in tests.
pub trait CardSurface {
    /// Show or hide a card. Returns `false` when no such card is rendered.
    fn set_card_visible(&mut self, card_id: &str, visible: bool) -> bool;
}

/// Set the display state of every card the prefs know about.
/// Returns how many rendered cards were touched; unknown ids are ignored.
pub fn apply_visibility<C: CardSurface + ?Sized>(prefs: &DashboardCardPrefs, surface: &mut C) -> usize {
    prefs
        .card_ids()
        .iter()
        .filter(|id| surface.set_card_visible(id, prefs.is_visible(id)))
        .count()
}

/// Compute the container's child order after re-attaching cards in `ordered_ids`.
///
/// Each mentioned id that is currently rendered moves to the end, in the
/// given order. Ids that are empty or not rendered are skipped, and cards
/// that are never mentioned keep their relative position ahead of the moved
/// ones.
pub fn apply_order(ordered_ids: &[String], current: &[String]) -> Vec<String> {
    let mut result = current.to_vec();
    for id in ordered_ids {
        if id.is_empty() {
            continue;
        }
        if let Some(pos) = result.iter().position(|existing| existing == id) {
            let card = result.remove(pos);
            result.push(card);
        }
    }
    result
}

/// Loads and saves the dashboard layout through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct DashboardLayoutStore<S> {
    store: S,
}

impl<S: KeyValueStore> DashboardLayoutStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persisted prefs, or the defaults when nothing (or garbage) is stored.
    pub fn load_prefs(&self) -> DashboardCardPrefs {
        let visibility = match read_json::<BTreeMap<String, bool>, _>(&self.store, DASHBOARD_SETTINGS_KEY) {
            Ok(Some(visibility)) => visibility,
            Ok(None) => default_visibility(),
            Err(e) => {
                warn!("Ignoring dashboard settings: {}", e);
                default_visibility()
            }
        };
        let order = match read_json::<Vec<String>, _>(&self.store, DASHBOARD_ORDER_KEY) {
            Ok(order) => order.unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring dashboard order: {}", e);
                Vec::new()
            }
        };
        DashboardCardPrefs { visibility, order }
    }

    /// Build fresh prefs from the toggle switches, persist them and apply the
    /// visibility to `surface` in one pass.
    ///
    /// Visibility is applied even when the write fails, so the page shows the
    /// new layout until the next reload while the error is returned.
    pub fn save_from_toggles<I, C>(&self, toggles: I, surface: &mut C) -> Result<DashboardCardPrefs, StorageError>
    where
        I: IntoIterator<Item = ToggleState>,
        C: CardSurface + ?Sized,
    {
        let visibility: BTreeMap<String, bool> = toggles
            .into_iter()
            .map(|toggle| (toggle.card_id, toggle.checked))
            .collect();
        let persisted = write_json(&self.store, DASHBOARD_SETTINGS_KEY, &visibility);

        let prefs = DashboardCardPrefs {
            visibility,
            order: self.load_prefs().order,
        };
        let applied = apply_visibility(&prefs, surface);

        match persisted {
            Ok(()) => {
                debug!("Saved dashboard settings for {} cards ({} rendered)", prefs.visibility.len(), applied);
                Ok(prefs)
            }
            Err(e) => {
                error!("Dashboard settings applied but not saved: {}", e);
                Err(e)
            }
        }
    }

    /// Persist the container's child id sequence after a completed drag.
    pub fn save_order(&self, ordered_ids: &[String]) -> Result<(), StorageError> {
        write_json(&self.store, DASHBOARD_ORDER_KEY, ordered_ids)?;
        debug!("Saved dashboard order: {:?}", ordered_ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    /// Rendered cards and their display state.
    #[derive(Default)]
    struct FakeCards {
        cards: BTreeMap<String, bool>,
    }

    impl FakeCards {
        fn with_defaults() -> Self {
            Self {
                cards: DEFAULT_DASHBOARD_CARDS
                    .iter()
                    .map(|id| (id.to_string(), true))
                    .collect(),
            }
        }

        fn visible(&self, id: &str) -> bool {
            self.cards[id]
        }
    }

    impl CardSurface for FakeCards {
        fn set_card_visible(&mut self, card_id: &str, visible: bool) -> bool {
            match self.cards.get_mut(card_id) {
                Some(state) => {
                    *state = visible;
                    true
                }
                None => false,
            }
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn toggles_with_hidden(hidden: &str) -> Vec<ToggleState> {
        DEFAULT_DASHBOARD_CARDS
            .iter()
            .map(|id| ToggleState::new(*id, *id != hidden))
            .collect()
    }

    #[test]
    fn test_load_prefs_without_storage_returns_defaults() {
        let layout = DashboardLayoutStore::new(MemoryStore::new());
        let prefs = layout.load_prefs();
        assert_eq!(prefs, DashboardCardPrefs::defaults());
        assert!(DEFAULT_DASHBOARD_CARDS.iter().all(|id| prefs.is_visible(id)));
        assert!(prefs.order.is_empty());
    }

    #[test]
    fn test_save_from_toggles_survives_reload() {
        let store = MemoryStore::new();
        let layout = DashboardLayoutStore::new(store.clone());
        let mut cards = FakeCards::with_defaults();

        layout
            .save_from_toggles(toggles_with_hidden("card-cashFlow"), &mut cards)
            .unwrap();
        assert!(!cards.visible("card-cashFlow"));

        let reloaded = DashboardLayoutStore::new(store).load_prefs();
        assert!(!reloaded.is_visible("card-cashFlow"));
        for id in DEFAULT_DASHBOARD_CARDS.iter().filter(|id| **id != "card-cashFlow") {
            assert!(reloaded.is_visible(id), "{} should stay visible", id);
        }
    }

    #[test]
    fn test_save_failure_still_applies_visibility() {
        let layout = DashboardLayoutStore::new(MemoryStore::read_only());
        let mut cards = FakeCards::with_defaults();

        let result = layout.save_from_toggles(toggles_with_hidden("card-monthlyNet"), &mut cards);

        assert!(matches!(result, Err(StorageError::WriteFailed { .. })));
        assert!(!cards.visible("card-monthlyNet"));
        // Nothing persisted, so a reload shows the defaults again
        assert!(layout.load_prefs().is_visible("card-monthlyNet"));
    }

    #[test]
    fn test_missing_ids_fall_back_to_defaults() {
        let store = MemoryStore::new();
        store.insert(DASHBOARD_SETTINGS_KEY, r#"{"card-budgetActual": false}"#);
        let prefs = DashboardLayoutStore::new(store).load_prefs();
        assert!(!prefs.is_visible("card-budgetActual"));
        assert!(prefs.is_visible("card-monthlyCombined"));
        assert!(prefs.is_visible("card-somethingNew"));
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let store = MemoryStore::new();
        store.insert(DASHBOARD_SETTINGS_KEY, "{broken");
        store.insert(DASHBOARD_ORDER_KEY, "42");
        let prefs = DashboardLayoutStore::new(store).load_prefs();
        assert_eq!(prefs, DashboardCardPrefs::defaults());
    }

    #[test]
    fn test_apply_visibility_ignores_unknown_cards() {
        let mut prefs = DashboardCardPrefs::defaults();
        prefs.visibility.insert("card-unrendered".to_string(), false);
        prefs.visibility.insert("card-monthlyNet".to_string(), false);
        let mut cards = FakeCards::with_defaults();

        let applied = apply_visibility(&prefs, &mut cards);

        assert_eq!(applied, DEFAULT_DASHBOARD_CARDS.len());
        assert!(!cards.visible("card-monthlyNet"));
        assert!(!cards.cards.contains_key("card-unrendered"));
    }

    #[test]
    fn test_save_order_then_apply_on_fresh_load() {
        let store = MemoryStore::new();
        let layout = DashboardLayoutStore::new(store.clone());
        let saved = ids(&["c", "a", "b"]);
        layout.save_order(&saved).unwrap();

        let prefs = DashboardLayoutStore::new(store).load_prefs();
        assert_eq!(prefs.order, saved);
        assert_eq!(apply_order(&prefs.order, &ids(&["a", "b", "c"])), saved);
    }

    #[test]
    fn test_apply_order_leaves_unmentioned_cards_in_place() {
        let current = ids(&["a", "b", "c", "d"]);
        let order = ids(&["d", "", "missing", "b"]);
        assert_eq!(apply_order(&order, &current), ids(&["a", "c", "d", "b"]));
    }

    #[test]
    fn test_apply_order_with_empty_order_is_identity() {
        let current = ids(&["a", "b"]);
        assert_eq!(apply_order(&[], &current), current);
    }
}
