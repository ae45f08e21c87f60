// src/view.rs
use crate::drivers::{SampleSource, ScopeError};
use crate::settings::SettingsStore;

/// What a view did with one refresh tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered,
    /// Not enough audio buffered yet; try again next tick.
    Skipped,
    /// The view has nothing to draw.
    Idle,
}

/// Lifecycle shared by every analysis panel driven by the engine.
pub trait AnalysisView {
    fn name(&self) -> &str;
    fn handle_new_data(&mut self, source: &dyn SampleSource) -> Result<TickOutcome, ScopeError>;
    fn pause(&mut self);
    fn restart(&mut self);
    fn save_state(&self, store: &mut dyn SettingsStore);
    fn restore_state(&mut self, store: &dyn SettingsStore);
}
