// src/iec.rs
//! IEC 60268-18 level meter scale.
//!
//! Maps a dB level to a meter deflection in [0, 1]: nothing below -70 dB,
//! then piecewise-linear segments that get steeper towards 0 dB, where the
//! meter reads 0.5 at -20 dB and 1.0 at 0 dB.

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::drivers::{render_curve_png, PlotStyle};

/// Deflection for `db`. Levels above 0 dB keep rising on the top segment.
pub fn iec_scale(db: f64) -> f64 {
    if db < -70.0 {
        0.0
    } else if db < -60.0 {
        (db + 70.0) * 0.0025
    } else if db < -50.0 {
        (db + 60.0) * 0.005 + 0.025
    } else if db < -40.0 {
        (db + 50.0) * 0.0075 + 0.075
    } else if db < -30.0 {
        (db + 40.0) * 0.015 + 0.15
    } else if db < -20.0 {
        (db + 30.0) * 0.02 + 0.3
    } else {
        (db + 20.0) * 0.025 + 0.5
    }
}

/// Samples the scale on `n` evenly spaced points of `[lo, hi]`.
pub fn iec_curve(lo: f64, hi: f64, n: usize) -> (Vec<f64>, Vec<f64>) {
    let step = if n > 1 { (hi - lo) / (n - 1) as f64 } else { 0.0 };
    let xs: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
    let ys = xs.iter().copied().map(iec_scale).collect();
    (xs, ys)
}

/// Renders the scale over `[lo, hi]` into `path`. A plot that cannot be
/// drawn (no font for the labels, empty curve) is logged and skipped with
/// `Ok(false)`; only a failed write is an error.
pub fn write_scale_png(
    path: &Path,
    (lo, hi): (f64, f64),
    points: usize,
    style: PlotStyle,
) -> anyhow::Result<bool> {
    let (xs, ys) = iec_curve(lo, hi, points);
    match render_curve_png("IEC 60268-18 scale", &xs, &ys, style) {
        Ok(png) => {
            fs::write(path, png).with_context(|| format!("writing {}", path.display()))?;
            log::info!("IEC scale plot written to {}", path.display());
            Ok(true)
        }
        Err(e) => {
            log::warn!("no IEC scale plot: {e}");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_boundaries_are_continuous() {
        for edge in [-70.0, -60.0, -50.0, -40.0, -30.0, -20.0] {
            let below = iec_scale(edge - 1e-9);
            let at = iec_scale(edge);
            assert!((below - at).abs() < 1e-6, "jump at {edge} dB");
        }
        assert_eq!(iec_scale(-100.0), 0.0);
        assert!((iec_scale(-20.0) - 0.5).abs() < 1e-12);
        assert!((iec_scale(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scale_is_monotonic_over_plot_range() {
        let (xs, ys) = iec_curve(-100.0, 10.0, 1000);
        assert_eq!(xs.len(), 1000);
        assert_eq!(xs[0], -100.0);
        assert!((xs[999] - 10.0).abs() < 1e-9);
        assert!(ys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn curve_renders_to_png() {
        let (xs, ys) = iec_curve(-100.0, 10.0, 1000);
        let style = PlotStyle {
            width: 200,
            height: 120,
            annotate: false,
            ..PlotStyle::default()
        };
        let png = render_curve_png("IEC scale", &xs, &ys, style).unwrap();
        assert!(png.len() > 8);
    }

    #[test]
    fn unrenderable_plot_is_skipped_not_fatal() {
        let dir = std::env::temp_dir().join(format!("audioscope-iec-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let style = PlotStyle {
            width: 200,
            height: 120,
            annotate: false,
            ..PlotStyle::default()
        };
        let skipped = dir.join("empty.png");
        assert!(!write_scale_png(&skipped, (-100.0, 10.0), 0, style.clone()).unwrap());
        assert!(!skipped.exists());
        let written = dir.join("scale.png");
        assert!(write_scale_png(&written, (-100.0, 10.0), 100, style).unwrap());
        assert!(written.exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
