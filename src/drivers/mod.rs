// src/drivers/mod.rs
// Audio plumbing around the scope: buffering, sources, plot sinks.
pub mod buffer;
pub mod error;
pub mod pipeline;
pub mod plot;
pub mod source;
pub use buffer::{AudioBuffer, AudioFrame};
pub use error::ScopeError;
pub use pipeline::AudioPipeline;
pub use plot::{render_curve_png, PlotSink, PlotStyle, TimePlot};
pub use source::{BatchSource, SampleBatch, SampleSource, ToneSource};
