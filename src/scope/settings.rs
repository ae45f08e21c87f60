use crate::scope::config::{
    ScopeConfig, DEFAULT_DB_MODE, DEFAULT_TIME_RANGE_MS, DEFAULT_Y_MAX, DEFAULT_Y_MIN,
    MAX_TIME_RANGE_MS,
};
use crate::types::{ScopeCommand, ScopeEvent};
/// Bounded decimal input, clamped and rounded the way a spin box would.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinBox {
    pub min: f64,
    pub max: f64,
    pub decimals: u32,
    value: f64,
}
impl SpinBox {
    pub fn new(min: f64, max: f64, decimals: u32, value: f64) -> Self {
        let mut spin = Self {
            min,
            max,
            decimals,
            value: min,
        };
        spin.value = spin.normalize(value);
        spin
    }
    pub fn value(&self) -> f64 {
        self.value
    }
    /// Stores `value` and reports whether the displayed value changed.
    pub fn set_value(&mut self, value: f64) -> bool {
        let next = self.normalize(value);
        let changed = next != self.value;
        self.value = next;
        changed
    }
    fn normalize(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals as i32);
        ((value * scale).round() / scale).clamp(self.min, self.max)
    }
}
/// Presentational state of the scope settings panel.
///
/// User edits come back as commands for the owning view; bound adjustments
/// reported by the view are mirrored without echoing a command, unless the
/// control could not show the adjusted value as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct ScopeSettingsForm {
    db_checked: bool,
    time_range: SpinBox,
    y_min: SpinBox,
    y_max: SpinBox,
}
impl Default for ScopeSettingsForm {
    fn default() -> Self {
        Self {
            db_checked: DEFAULT_DB_MODE,
            time_range: SpinBox::new(0.1, MAX_TIME_RANGE_MS, 1, DEFAULT_TIME_RANGE_MS),
            y_min: SpinBox::new(-1.0, 0.8, 1, DEFAULT_Y_MIN),
            y_max: SpinBox::new(-0.8, 1.0, 1, DEFAULT_Y_MAX),
        }
    }
}
impl ScopeSettingsForm {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn db_checked(&self) -> bool {
        self.db_checked
    }
    pub fn time_range(&self) -> f64 {
        self.time_range.value()
    }
    pub fn y_min(&self) -> f64 {
        self.y_min.value()
    }
    pub fn y_max(&self) -> f64 {
        self.y_max.value()
    }
    pub fn toggle_db(&mut self, checked: bool) -> Option<ScopeCommand> {
        if checked == self.db_checked {
            return None;
        }
        self.db_checked = checked;
        Some(ScopeCommand::SetDbMode(checked))
    }
    pub fn edit_time_range(&mut self, ms: f64) -> Option<ScopeCommand> {
        self.time_range
            .set_value(ms)
            .then(|| ScopeCommand::SetTimeRange(self.time_range.value()))
    }
    pub fn edit_y_min(&mut self, v: f64) -> Option<ScopeCommand> {
        self.y_min
            .set_value(v)
            .then(|| ScopeCommand::SetYMin(self.y_min.value()))
    }
    pub fn edit_y_max(&mut self, v: f64) -> Option<ScopeCommand> {
        self.y_max
            .set_value(v)
            .then(|| ScopeCommand::SetYMax(self.y_max.value()))
    }
    /// Mirrors an adjustment made by the view. Returns a correction when the
    /// control had to clamp or round it, so model and control agree again.
    pub fn apply_event(&mut self, event: &ScopeEvent) -> Option<ScopeCommand> {
        match *event {
            ScopeEvent::YMinAdjusted(v) => {
                self.y_min.set_value(v);
                (self.y_min.value() != v).then(|| ScopeCommand::SetYMin(self.y_min.value()))
            }
            ScopeEvent::YMaxAdjusted(v) => {
                self.y_max.set_value(v);
                (self.y_max.value() != v).then(|| ScopeCommand::SetYMax(self.y_max.value()))
            }
        }
    }
    /// Loads the controls from the model without emitting anything.
    pub fn sync_from(&mut self, config: &ScopeConfig) {
        self.db_checked = config.db_mode;
        self.time_range.set_value(config.time_range_ms);
        self.y_min.set_value(config.y_min);
        self.y_max.set_value(config.y_max);
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::TimePlot;
    use crate::scope::ScopeView;
    #[test]
    fn spin_box_clamps_and_rounds() {
        let mut spin = SpinBox::new(-1.0, 0.8, 1, -1.0);
        assert!(!spin.set_value(-3.0));
        assert!(spin.set_value(0.44));
        assert_eq!(spin.value(), 0.4);
        assert!(spin.set_value(2.0));
        assert_eq!(spin.value(), 0.8);
    }
    #[test]
    fn edits_emit_commands_only_on_change() {
        let mut form = ScopeSettingsForm::new();
        assert_eq!(form.toggle_db(false), None);
        assert_eq!(form.toggle_db(true), Some(ScopeCommand::SetDbMode(true)));
        assert_eq!(form.edit_time_range(50.0), None);
        assert_eq!(
            form.edit_time_range(0.0),
            Some(ScopeCommand::SetTimeRange(0.1))
        );
        assert_eq!(form.edit_y_max(0.5), Some(ScopeCommand::SetYMax(0.5)));
    }
    #[test]
    fn adjustment_round_trip_through_view() {
        let mut view = ScopeView::new(TimePlot::new());
        let events = view.subscribe();
        let mut form = ScopeSettingsForm::new();
        for command in [form.edit_y_max(0.3), form.edit_y_min(0.8)].into_iter().flatten() {
            view.apply(command);
        }
        // y_min 0.8 overran y_max 0.3: the view pushed y_max to 1.0
        let event = events.try_recv().unwrap();
        assert_eq!(form.apply_event(&event), None);
        assert_eq!(form.y_max(), 1.0);
        assert!((view.config().y_max - 1.0).abs() < 1e-12);
    }
    #[test]
    fn clamped_adjustment_produces_correction() {
        let mut form = ScopeSettingsForm::new();
        let correction = form.apply_event(&ScopeEvent::YMinAdjusted(-1.2));
        assert_eq!(correction, Some(ScopeCommand::SetYMin(-1.0)));
        assert_eq!(form.y_min(), -1.0);
    }
    #[test]
    fn sync_from_model_is_silent() {
        let mut form = ScopeSettingsForm::new();
        let config = ScopeConfig {
            time_range_ms: 12.34,
            db_mode: true,
            y_min: -0.5,
            y_max: 0.5,
        };
        form.sync_from(&config);
        assert!(form.db_checked());
        assert_eq!(form.time_range(), 12.3);
        assert_eq!((form.y_min(), form.y_max()), (-0.5, 0.5));
    }
}
