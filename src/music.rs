// src/music.rs
use crate::drivers::{SampleSource, ScopeError};
use crate::settings::SettingsStore;
use crate::view::{AnalysisView, TickOutcome};

/// Music detector panel. Holds its place in the view list; detection is not implemented.
#[derive(Debug, Default)]
pub struct MusicView;

impl AnalysisView for MusicView {
    fn name(&self) -> &str {
        "music"
    }
    fn handle_new_data(&mut self, _source: &dyn SampleSource) -> Result<TickOutcome, ScopeError> {
        Ok(TickOutcome::Idle)
    }
    fn pause(&mut self) {}
    fn restart(&mut self) {}
    fn save_state(&self, _store: &mut dyn SettingsStore) {}
    fn restore_state(&mut self, _store: &dyn SettingsStore) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::AudioBuffer;
    use crate::settings::MemorySettings;

    #[test]
    fn music_view_is_inert() {
        let mut view = MusicView;
        let buffer = AudioBuffer::with_history_seconds(1, 8000.0, 0.1).unwrap();
        assert_eq!(view.handle_new_data(&buffer).unwrap(), TickOutcome::Idle);
        let mut store = MemorySettings::default();
        view.save_state(&mut store);
        view.restore_state(&store);
        assert!(store.is_empty());
    }
}
