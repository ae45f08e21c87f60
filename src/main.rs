// src/main.rs
mod app_config;
mod drivers;
mod engine;
mod iec;
mod music;
mod scope;
mod settings;
mod types;
mod view;

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::Context;

use app_config::AppConfig;
use drivers::{PlotStyle, TimePlot, ToneSource};
use engine::{spawn_thread, Engine};
use scope::ScopeSettingsForm;
use settings::JsonSettings;
use types::*;

// Drains engine messages, keeping the settings form in step with the scope.
fn pump_messages(
    rx: &Receiver<EngineMessage>,
    tx_cmd: &Sender<EngineCommand>,
    form: &mut ScopeSettingsForm,
) -> Option<Box<TimePlot>> {
    let mut snapshot = None;
    while let Ok(msg) = rx.try_recv() {
        match msg {
            EngineMessage::Status(running) => log::info!("engine running: {running}"),
            EngineMessage::Scope(event) => {
                if let Some(correction) = form.apply_event(&event) {
                    tx_cmd.send(EngineCommand::Scope(correction)).ok();
                }
            }
            EngineMessage::Snapshot(plot) => snapshot = Some(plot),
            EngineMessage::SettingsSaved(ok) => log::info!("settings saved: {ok}"),
            EngineMessage::Stopped(stats) => log::info!("engine stats: {stats:?}"),
        }
    }
    snapshot
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("audioscope.json"));
    let config = AppConfig::load(&config_path)?;
    config.validate()?;

    let store = JsonSettings::open(&config.settings_path)
        .with_context(|| format!("opening {}", config.settings_path.display()))?;
    let tone = ToneSource::new(
        config.sample_rate_hz,
        config.channels,
        config.tone_hz,
        config.amplitude,
        config.batch_len(),
    )?
    .with_noise(config.noise, config.seed);
    let engine = Engine::new(tone, config.history_seconds, Box::new(store));
    let mut form = ScopeSettingsForm::new();
    form.sync_from(engine.scope().config());

    let (tx, rx) = channel();
    let (tx_cmd, rx_cmd) = channel();
    let handle = spawn_thread(engine, tx, rx_cmd);

    if let Some(cmd) = form.toggle_db(config.db_mode) {
        tx_cmd.send(EngineCommand::Scope(cmd))?;
    }

    let deadline = Instant::now() + Duration::from_millis(config.run_ms);
    while Instant::now() < deadline {
        pump_messages(&rx, &tx_cmd, &mut form);
        std::thread::sleep(Duration::from_millis(50));
    }

    tx_cmd.send(EngineCommand::Snapshot)?;
    tx_cmd.send(EngineCommand::SaveSettings)?;
    tx_cmd.send(EngineCommand::Shutdown)?;
    let stats = handle
        .join()
        .map_err(|_| anyhow::anyhow!("engine thread panicked"))?;
    let snapshot = pump_messages(&rx, &tx_cmd, &mut form)
        .context("engine stopped before sending a snapshot")?;

    match snapshot.render_png(PlotStyle::default()) {
        Ok(png) => {
            fs::write(&config.snapshot_png, png)
                .with_context(|| format!("writing {}", config.snapshot_png.display()))?;
            log::info!(
                "scope snapshot written to {} after {} frame(s)",
                config.snapshot_png.display(),
                snapshot.frames_drawn()
            );
        }
        Err(e) => log::warn!("no scope snapshot: {e}"),
    }

    if let Some(path) = &config.iec_png {
        iec::write_scale_png(path, (-100.0, 10.0), 1000, PlotStyle::default())?;
    }

    println!(
        "{} ticks, {} frames rendered, {} skipped while buffering",
        stats.ticks, stats.rendered, stats.skipped
    );
    Ok(())
}
