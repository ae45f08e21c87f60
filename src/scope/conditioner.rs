use crate::drivers::{AudioFrame, ScopeError};
use crate::scope::ScopeConfig;
/// Floor of the dB display scale.
pub const DB_MIN: f64 = -50.0;
/// Guard added to |v| before the logarithm.
pub const DB_EPSILON: f64 = 1e-30;
/// Prepared traces for the plot sink: time axis in milliseconds plus one or two channels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplaySeries {
    pub time_ms: Vec<f64>,
    pub y: Vec<f64>,
    pub y2: Option<Vec<f64>>,
}
impl DisplaySeries {
    pub fn len(&self) -> usize {
        self.time_ms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time_ms.is_empty()
    }
    pub fn is_two_channels(&self) -> bool {
        self.y2.is_some()
    }
}
/// Number of samples spanned by the configured time range.
pub fn width(config: &ScopeConfig, sampling_rate: f64) -> Result<usize, ScopeError> {
    if !(config.time_range_ms > 0.0) || !config.time_range_ms.is_finite() {
        return Err(ScopeError::InvalidConfig(format!(
            "time range must be positive, got {} ms",
            config.time_range_ms
        )));
    }
    if !(sampling_rate > 0.0) || !sampling_rate.is_finite() {
        return Err(ScopeError::InvalidConfig(format!(
            "sampling rate must be positive, got {sampling_rate} Hz"
        )));
    }
    let time = config.time_range_ms * 1e-3;
    Ok((time * sampling_rate).floor() as usize)
}
/// Samples the scope asks the source for on each refresh.
pub fn requested_samples(config: &ScopeConfig, sampling_rate: f64) -> Result<usize, ScopeError> {
    Ok(2 * width(config, sampling_rate)?)
}
/// Signed, clipped log mapping of a linear sample into roughly [-1, 1].
///
/// Silence lands on 0, full scale on ±1, and everything quieter than
/// `DB_MIN` collapses to 0 as well. `sign(0)` is 0, so an exact zero stays 0.
pub fn db_scale(v: f64) -> f64 {
    let s = sign(v);
    let db = (20.0 * (v.abs() + DB_EPSILON).log10()).clamp(DB_MIN, 0.0);
    s * db / (-DB_MIN) + s
}
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        // 0.0, -0.0 and NaN pass through
        v
    }
}
/// Turns the latest raw frame into display traces.
///
/// The "trigger" is a plain leading slice of the frame: no edge search is
/// done, the first `width` samples are shown as they come.
pub fn process(
    frame: &AudioFrame,
    config: &ScopeConfig,
    sampling_rate: f64,
) -> Result<DisplaySeries, ScopeError> {
    let datarange = width(config, sampling_rate)?;
    let requested = 2 * datarange;
    if frame.len() < requested {
        return Err(ScopeError::InsufficientData {
            requested,
            available: frame.len(),
        });
    }
    let slice = |index: usize| {
        frame.channel(index).map(|channel| {
            let leading = channel.iter().take(datarange).copied();
            if config.db_mode {
                leading.map(db_scale).collect::<Vec<f64>>()
            } else {
                leading.collect::<Vec<f64>>()
            }
        })
    };
    let y = slice(0).unwrap_or_default();
    let y2 = if frame.num_channels() > 1 { slice(1) } else { None };
    let half = datarange as f64 / 2.0;
    let time_ms = (0..y.len())
        .map(|i| (i as f64 - half) / sampling_rate * 1e3)
        .collect();
    Ok(DisplaySeries { time_ms, y, y2 })
}
