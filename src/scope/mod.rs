// src/scope/mod.rs
// Time-domain oscilloscope: signal conditioning, display settings, panel.
pub mod conditioner;
pub mod config;
pub mod settings;
pub mod view;
pub use conditioner::DisplaySeries;
pub use config::{min_history_seconds, ScopeConfig, SMOOTH_DISPLAY_TIMER_PERIOD_MS};
pub use settings::ScopeSettingsForm;
pub use view::ScopeView;
