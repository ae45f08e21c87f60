use std::sync::mpsc::{channel, Receiver, Sender};
use crate::drivers::{PlotSink, SampleSource, ScopeError};
use crate::scope::conditioner::{process, requested_samples};
use crate::scope::config::{BoundAdjustment, ScopeConfig};
use crate::settings::SettingsStore;
use crate::types::{ScopeCommand, ScopeEvent};
use crate::view::{AnalysisView, TickOutcome};
/// Oscilloscope panel: owns the display settings and feeds the plot sink.
pub struct ScopeView<P: PlotSink> {
    config: ScopeConfig,
    plot: P,
    subscribers: Vec<Sender<ScopeEvent>>,
}
impl<P: PlotSink> ScopeView<P> {
    pub fn new(mut plot: P) -> Self {
        let config = ScopeConfig::default();
        plot.set_vertical_range(config.y_min, config.y_max);
        Self {
            config,
            plot,
            subscribers: Vec::new(),
        }
    }
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }
    pub fn plot(&self) -> &P {
        &self.plot
    }
    /// Bound adjustments made by the setters are delivered here.
    pub fn subscribe(&mut self) -> Receiver<ScopeEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }
    pub fn apply(&mut self, command: ScopeCommand) {
        match command {
            ScopeCommand::SetDbMode(on) => self.set_db_mode(on),
            ScopeCommand::SetTimeRange(ms) => self.set_time_range(ms),
            ScopeCommand::SetYMin(v) => self.set_y_min(v),
            ScopeCommand::SetYMax(v) => self.set_y_max(v),
        }
    }
    pub fn set_db_mode(&mut self, db_mode: bool) {
        self.config.set_db_mode(db_mode);
        log::debug!("scope: dB mode {}", if db_mode { "on" } else { "off" });
        self.plot.restart();
    }
    pub fn set_time_range(&mut self, time_range_ms: f64) {
        self.config.set_time_range(time_range_ms);
        if !(time_range_ms > 0.0) {
            log::warn!("scope: time range {time_range_ms} ms cannot be displayed");
        }
        self.plot.restart();
    }
    pub fn set_y_min(&mut self, y_min: f64) {
        let adjusted = self.config.set_y_min(y_min);
        self.after_range_change(adjusted);
    }
    pub fn set_y_max(&mut self, y_max: f64) {
        let adjusted = self.config.set_y_max(y_max);
        self.after_range_change(adjusted);
    }
    fn after_range_change(&mut self, adjusted: Option<BoundAdjustment>) {
        if let Some(adjustment) = adjusted {
            self.announce(adjustment);
        }
        self.plot
            .set_vertical_range(self.config.y_min, self.config.y_max);
        self.plot.restart();
    }
    fn announce(&mut self, adjustment: BoundAdjustment) {
        self.notify(match adjustment {
            BoundAdjustment::YMin(v) => ScopeEvent::YMinAdjusted(v),
            BoundAdjustment::YMax(v) => ScopeEvent::YMaxAdjusted(v),
        });
    }
    fn notify(&mut self, event: ScopeEvent) {
        log::debug!("scope: {event:?}");
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}
impl<P: PlotSink> AnalysisView for ScopeView<P> {
    fn name(&self) -> &str {
        "scope"
    }
    fn handle_new_data(&mut self, source: &dyn SampleSource) -> Result<TickOutcome, ScopeError> {
        let rate = source.sampling_rate();
        let frame = requested_samples(&self.config, rate)
            .and_then(|n| source.data(n))
            .and_then(|frame| process(&frame, &self.config, rate));
        let series = match frame {
            Ok(series) => series,
            Err(e) if e.is_retryable() => {
                log::debug!("scope: skipping tick, {e}");
                return Ok(TickOutcome::Skipped);
            }
            Err(e) => return Err(e),
        };
        match &series.y2 {
            Some(y2) => self
                .plot
                .set_data_two_channels(&series.time_ms, &series.y, y2),
            None => self.plot.set_data(&series.time_ms, &series.y),
        }
        Ok(TickOutcome::Rendered)
    }
    fn pause(&mut self) {
        self.plot.pause();
    }
    fn restart(&mut self) {
        self.plot.restart();
    }
    fn save_state(&self, store: &mut dyn SettingsStore) {
        self.config.save(store);
    }
    fn restore_state(&mut self, store: &dyn SettingsStore) {
        let adjustments = self.config.restore(store);
        log::info!(
            "scope: restored {} ms, y in [{}, {}]",
            self.config.time_range_ms,
            self.config.y_min,
            self.config.y_max
        );
        if !(self.config.time_range_ms > 0.0) {
            log::warn!(
                "scope: stored time range {} ms cannot be displayed",
                self.config.time_range_ms
            );
        }
        for adjustment in adjustments {
            self.announce(adjustment);
        }
        self.plot
            .set_vertical_range(self.config.y_min, self.config.y_max);
        self.plot.restart();
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{AudioBuffer, SampleBatch, TimePlot};
    use crate::settings::MemorySettings;
    fn filled_buffer(channels: Vec<Vec<f64>>, rate: f64) -> AudioBuffer {
        let mut buffer = AudioBuffer::with_history_seconds(channels.len(), rate, 1.0).unwrap();
        buffer
            .push_batch(&SampleBatch::new(rate, channels))
            .unwrap();
        buffer
    }
    #[test]
    fn mono_tick_pushes_single_trace() {
        let mut view = ScopeView::new(TimePlot::new());
        let buffer = filled_buffer(vec![vec![0.5; 4410]], 44_100.0);
        assert_eq!(view.handle_new_data(&buffer).unwrap(), TickOutcome::Rendered);
        let series = view.plot().series().unwrap();
        assert_eq!(series.y.len(), 2205);
        assert!(series.y2.is_none());
        assert!((series.time_ms[0] + 25.0).abs() < 1e-9);
    }
    #[test]
    fn stereo_tick_in_db_mode() {
        let mut view = ScopeView::new(TimePlot::new());
        view.apply(ScopeCommand::SetTimeRange(1.0));
        view.apply(ScopeCommand::SetDbMode(true));
        let buffer = filled_buffer(vec![vec![1.0; 100], vec![-0.1; 100]], 10_000.0);
        view.handle_new_data(&buffer).unwrap();
        let series = view.plot().series().unwrap();
        assert_eq!(series.len(), 10);
        assert!(series.y.iter().all(|v| *v == 1.0));
        let y2 = series.y2.as_ref().unwrap();
        assert!(y2.iter().all(|v| (v + 0.6).abs() < 1e-12));
    }
    #[test]
    fn startup_ticks_are_skipped_not_failed() {
        let mut view = ScopeView::new(TimePlot::new());
        let buffer = filled_buffer(vec![vec![0.0; 100]], 44_100.0);
        assert_eq!(view.handle_new_data(&buffer).unwrap(), TickOutcome::Skipped);
        assert!(view.plot().series().is_none());
    }
    #[test]
    fn invalid_range_keeps_last_good_frame() {
        let mut view = ScopeView::new(TimePlot::new());
        let buffer = filled_buffer(vec![vec![0.25; 4410]], 44_100.0);
        view.handle_new_data(&buffer).unwrap();
        view.set_time_range(0.0);
        let err = view.handle_new_data(&buffer).unwrap_err();
        assert!(matches!(err, ScopeError::InvalidConfig(_)));
        assert_eq!(view.plot().series().unwrap().y.len(), 2205);
    }
    #[test]
    fn bound_push_is_broadcast_and_restarts_plot() {
        let mut view = ScopeView::new(TimePlot::new());
        let events = view.subscribe();
        view.set_y_max(0.2);
        view.set_y_min(0.6);
        assert_eq!(events.try_recv().unwrap(), ScopeEvent::YMaxAdjusted(0.8));
        assert!(events.try_recv().is_err());
        let (lo, hi) = view.plot().vertical_range();
        assert_eq!(lo, 0.6);
        assert!((hi - 0.8).abs() < 1e-12);
        assert_eq!(view.plot().restart_count(), 2);
        view.set_db_mode(true);
        view.set_time_range(20.0);
        assert_eq!(view.plot().restart_count(), 4);
    }
    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut view = ScopeView::new(TimePlot::new());
        drop(view.subscribe());
        let live = view.subscribe();
        view.set_y_min(-0.5);
        view.set_y_max(-0.9);
        assert!(matches!(live.try_recv(), Ok(ScopeEvent::YMinAdjusted(v)) if (v + 1.1).abs() < 1e-12));
        assert_eq!(view.subscribers.len(), 1);
    }
    #[test]
    fn save_then_restore_reproduces_settings() {
        let mut view = ScopeView::new(TimePlot::new());
        view.set_time_range(75.0);
        view.set_y_min(-0.3);
        view.set_y_max(0.4);
        view.set_db_mode(true);
        let mut store = MemorySettings::default();
        view.save_state(&mut store);
        let mut fresh = ScopeView::new(TimePlot::new());
        let events = fresh.subscribe();
        fresh.restore_state(&store);
        let config = fresh.config();
        assert_eq!(config.time_range_ms, 75.0);
        assert_eq!((config.y_min, config.y_max), (-0.3, 0.4));
        assert!(!config.db_mode);
        assert!(events.try_recv().is_err());
        assert_eq!(fresh.plot().vertical_range(), (-0.3, 0.4));
    }
    #[test]
    fn restore_broadcasts_bound_adjustments() {
        let mut store = MemorySettings::default();
        store.set_f64("yValueMin", 0.8);
        store.set_f64("yValueMax", 0.5);
        let mut view = ScopeView::new(TimePlot::new());
        let events = view.subscribe();
        view.restore_state(&store);
        assert!(matches!(events.try_recv(), Ok(ScopeEvent::YMinAdjusted(v)) if (v - 0.3).abs() < 1e-12));
        assert!(events.try_recv().is_err());
        let (lo, hi) = view.plot().vertical_range();
        assert!((lo - 0.3).abs() < 1e-12);
        assert_eq!(hi, 0.5);
        assert_eq!(view.plot().restart_count(), 1);
    }
    #[test]
    fn pause_and_restart_reach_the_plot() {
        let mut view = ScopeView::new(TimePlot::new());
        view.pause();
        assert!(view.plot().is_paused());
        view.restart();
        assert!(!view.plot().is_paused());
    }
}
