use crate::settings::SettingsStore;
/// Display refresh cadence.
pub const SMOOTH_DISPLAY_TIMER_PERIOD_MS: u64 = 25;
pub const DEFAULT_TIME_RANGE_MS: f64 = 2.0 * SMOOTH_DISPLAY_TIMER_PERIOD_MS as f64;
/// Longest range the settings panel offers.
pub const MAX_TIME_RANGE_MS: f64 = 1000.0;
pub const DEFAULT_DB_MODE: bool = false;
pub const DEFAULT_Y_MIN: f64 = -1.0;
pub const DEFAULT_Y_MAX: f64 = 1.0;
/// Gap kept between the bounds when one setter overruns the other.
pub const Y_RANGE_MARGIN: f64 = 0.2;
pub const KEY_TIME_RANGE: &str = "timeRange";
pub const KEY_Y_MIN: &str = "yValueMin";
pub const KEY_Y_MAX: &str = "yValueMax";
/// Buffer history needed to serve every range up to `MAX_TIME_RANGE_MS`;
/// each refresh reads two widths.
pub fn min_history_seconds() -> f64 {
    2.0 * MAX_TIME_RANGE_MS / 1000.0
}
/// The other bound was moved to keep `y_min <= y_max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundAdjustment {
    YMin(f64),
    YMax(f64),
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScopeConfig {
    pub time_range_ms: f64,
    pub db_mode: bool,
    pub y_min: f64,
    pub y_max: f64,
}
impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            time_range_ms: DEFAULT_TIME_RANGE_MS,
            db_mode: DEFAULT_DB_MODE,
            y_min: DEFAULT_Y_MIN,
            y_max: DEFAULT_Y_MAX,
        }
    }
}
impl ScopeConfig {
    pub fn set_db_mode(&mut self, db_mode: bool) {
        self.db_mode = db_mode;
    }
    /// No bound check; `process` rejects non-positive ranges.
    pub fn set_time_range(&mut self, time_range_ms: f64) {
        self.time_range_ms = time_range_ms;
    }
    pub fn set_y_min(&mut self, y_min: f64) -> Option<BoundAdjustment> {
        let adjusted = if y_min > self.y_max {
            self.y_max = y_min + Y_RANGE_MARGIN;
            Some(BoundAdjustment::YMax(self.y_max))
        } else {
            None
        };
        self.y_min = y_min;
        adjusted
    }
    pub fn set_y_max(&mut self, y_max: f64) -> Option<BoundAdjustment> {
        let adjusted = if y_max < self.y_min {
            self.y_min = y_max - Y_RANGE_MARGIN;
            Some(BoundAdjustment::YMin(self.y_min))
        } else {
            None
        };
        self.y_max = y_max;
        adjusted
    }
    /// Persists time range and y bounds. `db_mode` is left out on purpose
    /// so stored profiles keep their historical shape.
    pub fn save(&self, store: &mut dyn SettingsStore) {
        store.set_f64(KEY_TIME_RANGE, self.time_range_ms);
        store.set_f64(KEY_Y_MIN, self.y_min);
        store.set_f64(KEY_Y_MAX, self.y_max);
    }
    /// Applies stored values through the live setters, in save order.
    pub fn restore(&mut self, store: &dyn SettingsStore) -> Vec<BoundAdjustment> {
        let stored = StoredScopeSettings::load(store);
        self.set_time_range(stored.time_range_ms);
        [self.set_y_min(stored.y_min), self.set_y_max(stored.y_max)]
            .into_iter()
            .flatten()
            .collect()
    }
}
/// Values read back from a settings store, defaults filled in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoredScopeSettings {
    pub time_range_ms: f64,
    pub y_min: f64,
    pub y_max: f64,
}
impl StoredScopeSettings {
    pub fn load(store: &dyn SettingsStore) -> Self {
        Self {
            time_range_ms: store.value_f64(KEY_TIME_RANGE, DEFAULT_TIME_RANGE_MS),
            y_min: store.value_f64(KEY_Y_MIN, DEFAULT_Y_MIN),
            y_max: store.value_f64(KEY_Y_MAX, DEFAULT_Y_MAX),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;
    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }
    #[test]
    fn defaults_match_display_cadence() {
        let config = ScopeConfig::default();
        assert_eq!(config.time_range_ms, 50.0);
        assert!(!config.db_mode);
        assert_eq!((config.y_min, config.y_max), (-1.0, 1.0));
    }
    #[test]
    fn y_min_above_y_max_pushes_upper_bound() {
        let mut config = ScopeConfig::default();
        config.set_y_max(0.3);
        let adjusted = config.set_y_min(0.5);
        assert_eq!(adjusted, Some(BoundAdjustment::YMax(0.7)));
        assert!(close(config.y_max, 0.7));
        assert_eq!(config.y_min, 0.5);
    }
    #[test]
    fn y_max_below_y_min_pushes_lower_bound() {
        let mut config = ScopeConfig::default();
        config.set_y_min(-0.2);
        let adjusted = config.set_y_max(-0.5);
        assert!(matches!(adjusted, Some(BoundAdjustment::YMin(v)) if close(v, -0.7)));
        assert!(close(config.y_min, -0.7));
        assert_eq!(config.y_max, -0.5);
    }
    #[test]
    fn in_order_updates_leave_other_bound_alone() {
        let mut config = ScopeConfig::default();
        assert_eq!(config.set_y_min(0.0), None);
        assert_eq!(config.set_y_max(0.0), None);
        assert_eq!((config.y_min, config.y_max), (0.0, 0.0));
        config.set_time_range(-3.0);
        assert_eq!(config.time_range_ms, -3.0);
    }
    #[test]
    fn save_restore_round_trip_skips_db_mode() {
        let mut config = ScopeConfig::default();
        config.set_time_range(120.5);
        config.set_y_min(-0.4);
        config.set_y_max(0.6);
        config.set_db_mode(true);
        let mut store = MemorySettings::default();
        config.save(&mut store);
        let mut restored = ScopeConfig::default();
        assert!(restored.restore(&store).is_empty());
        assert_eq!(restored.time_range_ms, 120.5);
        assert_eq!((restored.y_min, restored.y_max), (-0.4, 0.6));
        assert!(!restored.db_mode);
    }
    #[test]
    fn restore_applies_setters_in_order() {
        let mut store = MemorySettings::default();
        store.set_f64(KEY_Y_MIN, 0.8);
        store.set_f64(KEY_Y_MAX, 0.5);
        let mut config = ScopeConfig::default();
        let adjustments = config.restore(&store);
        // y_min=0.8 fits under the default y_max=1.0; y_max=0.5 then drags y_min to 0.3.
        assert_eq!(adjustments.len(), 1);
        assert!(close(config.y_min, 0.3));
        assert_eq!(config.y_max, 0.5);
        assert_eq!(config.time_range_ms, DEFAULT_TIME_RANGE_MS);
    }
}
