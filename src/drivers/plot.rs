use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::error::ScopeError;
use crate::scope::DisplaySeries;
/// Receiving end of the scope: whatever draws the prepared arrays.
pub trait PlotSink {
    fn set_data(&mut self, time_ms: &[f64], y: &[f64]);
    fn set_data_two_channels(&mut self, time_ms: &[f64], y1: &[f64], y2: &[f64]);
    fn set_vertical_range(&mut self, y_min: f64, y_max: f64);
    fn pause(&mut self);
    /// Drops transient view state (zoom, smoothing) and resumes drawing.
    fn restart(&mut self);
}
/// In-memory plot that keeps the latest traces and renders them on demand.
#[derive(Debug, Clone)]
pub struct TimePlot {
    series: Option<DisplaySeries>,
    vertical_range: (f64, f64),
    paused: bool,
    restarts: usize,
    frames: usize,
}
impl Default for TimePlot {
    fn default() -> Self {
        Self {
            series: None,
            vertical_range: (-1.0, 1.0),
            paused: false,
            restarts: 0,
            frames: 0,
        }
    }
}
impl TimePlot {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn series(&self) -> Option<&DisplaySeries> {
        self.series.as_ref()
    }
    pub fn vertical_range(&self) -> (f64, f64) {
        self.vertical_range
    }
    pub fn is_paused(&self) -> bool {
        self.paused
    }
    pub fn restart_count(&self) -> usize {
        self.restarts
    }
    /// Number of data updates accepted since creation.
    pub fn frames_drawn(&self) -> usize {
        self.frames
    }
    pub fn render_png(&self, style: PlotStyle) -> Result<Vec<u8>, ScopeError> {
        let series = self
            .series
            .as_ref()
            .ok_or_else(|| ScopeError::Plot("no data received yet".into()))?;
        render_series_png(series, self.vertical_range, style)
    }
    fn accept(&mut self, series: DisplaySeries) {
        if self.paused {
            return;
        }
        self.series = Some(series);
        self.frames += 1;
    }
}
impl PlotSink for TimePlot {
    fn set_data(&mut self, time_ms: &[f64], y: &[f64]) {
        self.accept(DisplaySeries {
            time_ms: time_ms.to_vec(),
            y: y.to_vec(),
            y2: None,
        });
    }
    fn set_data_two_channels(&mut self, time_ms: &[f64], y1: &[f64], y2: &[f64]) {
        self.accept(DisplaySeries {
            time_ms: time_ms.to_vec(),
            y: y1.to_vec(),
            y2: Some(y2.to_vec()),
        });
    }
    fn set_vertical_range(&mut self, y_min: f64, y_max: f64) {
        self.vertical_range = (y_min, y_max);
    }
    fn pause(&mut self) {
        self.paused = true;
    }
    fn restart(&mut self) {
        self.paused = false;
        self.restarts += 1;
    }
}
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
    /// Caption, axis labels and legend. Needs a system font.
    pub annotate: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 10),
            palette: vec![GREEN, YELLOW, CYAN, MAGENTA, WHITE],
            annotate: true,
        }
    }
}
pub fn render_series_png(
    series: &DisplaySeries,
    y_range: (f64, f64),
    style: PlotStyle,
) -> Result<Vec<u8>, ScopeError> {
    let mut traces = vec![("Ch 1".to_string(), series.y.as_slice())];
    if let Some(y2) = &series.y2 {
        traces.push(("Ch 2".to_string(), y2.as_slice()));
    }
    render_lines_png("Scope", &series.time_ms, &traces, Some(y_range), style)
}
pub fn render_curve_png(
    caption: &str,
    xs: &[f64],
    ys: &[f64],
    style: PlotStyle,
) -> Result<Vec<u8>, ScopeError> {
    render_lines_png(caption, xs, &[(caption.to_string(), ys)], None, style)
}
fn render_lines_png(
    caption: &str,
    xs: &[f64],
    traces: &[(String, &[f64])],
    y_range: Option<(f64, f64)>,
    style: PlotStyle,
) -> Result<Vec<u8>, ScopeError> {
    let (Some(&x_first), Some(&x_last)) = (xs.first(), xs.last()) else {
        return Err(ScopeError::Plot("series has no samples".into()));
    };
    if traces.iter().any(|(_, ys)| ys.len() != xs.len()) {
        return Err(ScopeError::Plot("trace length differs from x axis".into()));
    }
    let (y_min, y_max) = y_range.unwrap_or_else(|| {
        traces
            .iter()
            .flat_map(|(_, ys)| ys.iter().copied())
            .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)))
    });
    let y_bounds = if (y_max - y_min).abs() < f64::EPSILON {
        (y_min - 1.0, y_max + 1.0)
    } else {
        (y_min.min(y_max), y_min.max(y_max))
    };
    let x_bounds = if x_last > x_first {
        (x_first, x_last)
    } else {
        (x_first - 1.0, x_first + 1.0)
    };
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if style.annotate {
            builder
                .caption(caption, ("sans-serif", 20).into_font().color(&WHITE))
                .set_label_area_size(LabelAreaPosition::Left, 45)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
        }
        let mut chart =
            builder.build_cartesian_2d(x_bounds.0..x_bounds.1, y_bounds.0..y_bounds.1)?;
        if style.annotate {
            chart
                .configure_mesh()
                .light_line_style(&WHITE.mix(0.1))
                .draw()?;
        }
        for (idx, (label, ys)) in traces.iter().enumerate() {
            let color = style.palette[idx % style.palette.len()];
            let points = xs.iter().copied().zip(ys.iter().copied());
            let drawn = chart.draw_series(LineSeries::new(points, &color))?;
            if style.annotate {
                drawn
                    .label(label.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            }
        }
        if style.annotate {
            chart
                .configure_series_labels()
                .border_style(&WHITE.mix(0.2))
                .background_style(&style.background)
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScopeError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ScopeError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
