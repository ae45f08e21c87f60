// src/engine.rs
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::drivers::{AudioPipeline, BatchSource, ScopeError, TimePlot};
use crate::music::MusicView;
use crate::scope::{ScopeView, SMOOTH_DISPLAY_TIMER_PERIOD_MS};
use crate::settings::SettingsStore;
use crate::types::*;
use crate::view::{AnalysisView, TickOutcome};

// commands handled per loop iteration
const MAX_COMMANDS_PER_TICK: usize = 10;

/// Owns the audio pipeline and the views; everything here runs on one thread.
pub struct Engine<S: BatchSource> {
    pipeline: AudioPipeline<S>,
    scope: ScopeView<TimePlot>,
    scope_events: Receiver<ScopeEvent>,
    music: MusicView,
    store: Box<dyn SettingsStore + Send>,
    batches_per_tick: usize,
    paused: bool,
    stats: EngineStats,
}

enum Flow {
    Continue,
    Stop,
}

impl<S: BatchSource> Engine<S> {
    pub fn new(source: S, history_seconds: f64, store: Box<dyn SettingsStore + Send>) -> Self {
        let mut scope = ScopeView::new(TimePlot::new());
        let scope_events = scope.subscribe();
        let mut music = MusicView;
        scope.restore_state(store.as_ref());
        music.restore_state(store.as_ref());
        Self {
            pipeline: AudioPipeline::new(source, history_seconds),
            scope,
            scope_events,
            music,
            store,
            batches_per_tick: 1,
            paused: false,
            stats: EngineStats::default(),
        }
    }

    /// Batches pulled per tick. Sources that deliver one display period per
    /// batch want 1; bursty capture backends want more headroom.
    pub fn with_batches_per_tick(mut self, batches: usize) -> Self {
        self.batches_per_tick = batches.max(1);
        self
    }

    pub fn scope(&self) -> &ScopeView<TimePlot> {
        &self.scope
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// One display refresh: pull fresh audio, then let every view draw.
    pub fn tick(&mut self) -> Result<TickOutcome, ScopeError> {
        if self.paused {
            return Ok(TickOutcome::Idle);
        }
        self.stats.ticks += 1;
        self.pipeline.pump_all(self.batches_per_tick)?;
        let buffer = match self.pipeline.buffer() {
            Ok(buffer) => buffer,
            Err(e) if e.is_retryable() => {
                self.stats.skipped += 1;
                return Ok(TickOutcome::Skipped);
            }
            Err(e) => return Err(e),
        };
        self.music.handle_new_data(buffer)?;
        let outcome = self.scope.handle_new_data(buffer)?;
        match outcome {
            TickOutcome::Rendered => self.stats.rendered += 1,
            TickOutcome::Skipped => self.stats.skipped += 1,
            TickOutcome::Idle => {}
        }
        Ok(outcome)
    }

    fn views_mut(&mut self) -> [&mut dyn AnalysisView; 2] {
        [&mut self.scope, &mut self.music]
    }

    fn save_settings(&mut self) -> Result<(), ScopeError> {
        self.scope.save_state(self.store.as_mut());
        self.music.save_state(self.store.as_mut());
        self.store.flush()
    }

    fn handle(&mut self, cmd: EngineCommand, tx: &Sender<EngineMessage>) -> Flow {
        match cmd {
            EngineCommand::Scope(command) => self.scope.apply(command),
            EngineCommand::Pause => {
                self.paused = true;
                for view in self.views_mut() {
                    view.pause();
                }
                log::info!("engine: paused");
            }
            EngineCommand::Restart => {
                self.paused = false;
                for view in self.views_mut() {
                    view.restart();
                }
                log::info!("engine: restarted");
            }
            EngineCommand::SaveSettings => {
                let saved = match self.save_settings() {
                    Ok(()) => true,
                    Err(e) => {
                        log::error!("engine: saving settings failed: {e}");
                        false
                    }
                };
                tx.send(EngineMessage::SettingsSaved(saved)).ok();
            }
            EngineCommand::Snapshot => {
                tx.send(EngineMessage::Snapshot(Box::new(self.scope.plot().clone())))
                    .ok();
            }
            EngineCommand::Shutdown => return Flow::Stop,
        }
        Flow::Continue
    }

    fn forward_scope_events(&self, tx: &Sender<EngineMessage>) {
        while let Ok(event) = self.scope_events.try_recv() {
            tx.send(EngineMessage::Scope(event)).ok();
        }
    }

    /// Runs until `Shutdown` arrives or the command side hangs up.
    pub fn run(
        mut self,
        tx: Sender<EngineMessage>,
        rx_cmd: Receiver<EngineCommand>,
        period: Duration,
    ) -> EngineStats {
        tx.send(EngineMessage::Status(true)).ok();
        // adjustments made while restoring settings
        self.forward_scope_events(&tx);
        loop {
            let mut stop = false;
            for _ in 0..MAX_COMMANDS_PER_TICK {
                match rx_cmd.try_recv() {
                    Ok(cmd) => {
                        if let Flow::Stop = self.handle(cmd, &tx) {
                            stop = true;
                            break;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        log::warn!("engine: command channel closed");
                        stop = true;
                        break;
                    }
                }
            }
            self.forward_scope_events(&tx);
            if stop {
                break;
            }
            if let Err(e) = self.tick() {
                self.stats.errors += 1;
                log::error!("engine: tick failed: {e}");
            }
            thread::sleep(period);
        }
        let stats = self.stats;
        log::info!(
            "engine: stopped after {} tick(s), {} rendered, {} skipped, {} failed",
            stats.ticks,
            stats.rendered,
            stats.skipped,
            stats.errors
        );
        tx.send(EngineMessage::Status(false)).ok();
        tx.send(EngineMessage::Stopped(stats)).ok();
        stats
    }
}

/// Starts the engine on its own thread at the display cadence.
pub fn spawn_thread<S>(
    engine: Engine<S>,
    tx: Sender<EngineMessage>,
    rx_cmd: Receiver<EngineCommand>,
) -> JoinHandle<EngineStats>
where
    S: BatchSource + Send + 'static,
{
    let period = Duration::from_millis(SMOOTH_DISPLAY_TIMER_PERIOD_MS);
    thread::spawn(move || engine.run(tx, rx_cmd, period))
}
