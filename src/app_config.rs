// src/app_config.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::scope::{min_history_seconds, SMOOTH_DISPLAY_TIMER_PERIOD_MS};

/// Demo run parameters. Every field is optional in the JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sample_rate_hz: f64,
    pub channels: usize,
    pub tone_hz: f64,
    pub amplitude: f64,
    pub noise: f64,
    pub seed: u64,
    pub history_seconds: f64,
    pub run_ms: u64,
    pub db_mode: bool,
    pub settings_path: PathBuf,
    pub snapshot_png: PathBuf,
    pub iec_png: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44_100.0,
            channels: 2,
            tone_hz: 220.0,
            amplitude: 0.8,
            noise: 0.0,
            seed: 1,
            history_seconds: min_history_seconds(),
            run_ms: 1_000,
            db_mode: false,
            settings_path: PathBuf::from("audioscope-settings.json"),
            snapshot_png: PathBuf::from("scope.png"),
            iec_png: Some(PathBuf::from("iec_scale.png")),
        }
    }
}

impl AppConfig {
    /// Reads `path` if it exists, otherwise falls back to the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.sample_rate_hz > 0.0, "sample_rate_hz must be positive");
        anyhow::ensure!(
            (1..=2).contains(&self.channels),
            "channels must be 1 or 2, got {}",
            self.channels
        );
        anyhow::ensure!(
            self.history_seconds >= min_history_seconds(),
            "history_seconds must be at least {} to cover the longest time range, got {}",
            min_history_seconds(),
            self.history_seconds
        );
        Ok(())
    }

    /// Samples the synthetic source delivers per display tick.
    pub fn batch_len(&self) -> usize {
        (self.sample_rate_hz * SMOOTH_DISPLAY_TIMER_PERIOD_MS as f64 / 1000.0).round() as usize
    }
}
