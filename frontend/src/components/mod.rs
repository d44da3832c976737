pub mod charts;
pub mod dashboard;
pub mod form_toggles;
pub mod theme_toggle;
