// src/types.rs
use crate::drivers::TimePlot;

// Settings form -> scope view
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScopeCommand {
    SetDbMode(bool),
    SetTimeRange(f64),
    SetYMin(f64),
    SetYMax(f64),
}

// Scope view -> observers (settings form, logs)
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScopeEvent {
    YMinAdjusted(f64),
    YMaxAdjusted(f64),
}

// Front end -> engine thread
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCommand {
    Scope(ScopeCommand),
    Pause,
    Restart,
    SaveSettings,
    Snapshot,
    Shutdown,
}

// Engine thread -> front end
#[derive(Clone, Debug)]
pub enum EngineMessage {
    Status(bool),
    Scope(ScopeEvent),
    Snapshot(Box<TimePlot>),
    SettingsSaved(bool),
    Stopped(EngineStats),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub ticks: u64,
    pub rendered: u64,
    pub skipped: u64,
    pub errors: u64,
}
