//! Chart Geometry
//!
//! Pure layout math for the dashboard's canvas charts: value axes with round
//! tick steps, bar and line positions inside a plot area, and pie slices.

use std::f64::consts::PI;

/// Line colors used when a series has none
pub const DEFAULT_LINE_COLORS: [&str; 3] = ["#f39c12", "#3498db", "#9b59b6"];

/// Slice colors used when a pie has none
pub const DEFAULT_PIE_COLORS: [&str; 3] = ["#60a5fa", "#1e3a8a", "#f39c12"];

/// One named data series
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
    /// Stroke / border color
    pub color: String,
    /// Fill color; falls back to `color`
    pub fill: Option<String>,
}

impl Series {
    pub fn new(label: impl Into<String>, data: Vec<f64>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data,
            color: color.into(),
            fill: None,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn fill_color(&self) -> &str {
        self.fill.as_deref().unwrap_or(&self.color)
    }
}

/// Category axis plus one or more series over it
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    pub fn new(labels: &[&str], series: Vec<Series>) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            series,
        }
    }

    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.data.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn value_axis(&self, target_ticks: usize) -> Axis {
        Axis::for_max(self.max_value(), target_ticks)
    }
}

/// Space reserved around the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 50.0,
            right: 20.0,
            top: 20.0,
            bottom: 30.0,
        }
    }
}

/// Drawable rectangle inside the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(canvas_width: f64, canvas_height: f64, margins: Margins) -> Self {
        Self {
            x: margins.left,
            y: margins.top,
            width: (canvas_width - margins.left - margins.right).max(0.0),
            height: (canvas_height - margins.top - margins.bottom).max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Canvas y of a value on the given axis (zero at the bottom)
    pub fn scale_y(&self, value: f64, axis: &Axis) -> f64 {
        let ratio = (value / axis.max).clamp(0.0, 1.0);
        self.bottom() - ratio * self.height
    }
}

/// Zero-based value axis with a round step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub max: f64,
    pub step: f64,
}

impl Axis {
    /// Smallest 1/2/5 x 10^n step giving at most `target_ticks` intervals
    pub fn for_max(max: f64, target_ticks: usize) -> Self {
        let target = target_ticks.max(1) as f64;
        if !(max > 0.0) || !max.is_finite() {
            return Self {
                max: target,
                step: 1.0,
            };
        }

        let raw = max / target;
        let magnitude = 10f64.powi(raw.log10().floor() as i32);
        let normalized = raw / magnitude;
        let nice = [1.0, 2.0, 5.0, 10.0]
            .into_iter()
            .find(|n| *n >= normalized - 1e-9)
            .unwrap_or(10.0);
        let step = nice * magnitude;

        Self {
            max: (max / step).ceil() * step,
            step,
        }
    }

    pub fn ticks(&self) -> Vec<f64> {
        let count = (self.max / self.step).round() as usize;
        (0..=count).map(|i| i as f64 * self.step).collect()
    }
}

/// Bar rectangle in canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub category: usize,
    pub series: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Share of a category slot taken by its bar group
const BAR_GROUP_FRACTION: f64 = 0.72;

pub fn bar_layout(data: &ChartData, area: &PlotArea, axis: &Axis) -> Vec<Bar> {
    let categories = data.labels.len();
    let series_count = data.series.len();
    if categories == 0 || series_count == 0 {
        return Vec::new();
    }

    let slot = area.width / categories as f64;
    let group = slot * BAR_GROUP_FRACTION;
    let bar_width = group / series_count as f64;

    let mut bars = Vec::with_capacity(categories * series_count);
    for (s, series) in data.series.iter().enumerate() {
        for (c, value) in series.data.iter().take(categories).enumerate() {
            let top = area.scale_y(*value, axis);
            bars.push(Bar {
                category: c,
                series: s,
                x: area.x + c as f64 * slot + (slot - group) / 2.0 + s as f64 * bar_width,
                y: top,
                width: bar_width,
                height: area.bottom() - top,
            });
        }
    }
    bars
}

/// Center x of each category label
pub fn category_centers(categories: usize, area: &PlotArea) -> Vec<f64> {
    if categories == 0 {
        return Vec::new();
    }
    let slot = area.width / categories as f64;
    (0..categories)
        .map(|i| area.x + slot * (i as f64 + 0.5))
        .collect()
}

/// Point x positions for a line chart: first and last category on the edges
pub fn line_x_positions(categories: usize, area: &PlotArea) -> Vec<f64> {
    match categories {
        0 => Vec::new(),
        1 => vec![area.x + area.width / 2.0],
        n => {
            let gap = area.width / (n - 1) as f64;
            (0..n).map(|i| area.x + gap * i as f64).collect()
        }
    }
}

pub fn line_points(series: &Series, categories: usize, area: &PlotArea, axis: &Axis) -> Vec<(f64, f64)> {
    line_x_positions(categories, area)
        .into_iter()
        .zip(series.data.iter())
        .map(|(x, v)| (x, area.scale_y(*v, axis)))
        .collect()
}

/// Labeled values for a pie or donut
#[derive(Debug, Clone, PartialEq)]
pub struct PieData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

impl PieData {
    pub fn new(labels: &[&str], values: Vec<f64>) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            values,
            colors: DEFAULT_PIE_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        if !colors.is_empty() {
            self.colors = colors.iter().map(|c| c.to_string()).collect();
        }
        self
    }

    /// Slices clockwise from 12 o'clock. Non-positive values get no slice.
    pub fn slices(&self) -> Vec<PieSlice> {
        let total: f64 = self
            .values
            .iter()
            .filter(|v| v.is_finite() && **v > 0.0)
            .sum();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut angle = -PI / 2.0;
        let mut slices = Vec::new();
        for (i, (label, value)) in self.labels.iter().zip(self.values.iter()).enumerate() {
            if !(value.is_finite() && *value > 0.0) {
                continue;
            }
            let fraction = value / total;
            let sweep = fraction * 2.0 * PI;
            let color = if self.colors.is_empty() {
                DEFAULT_PIE_COLORS[i % DEFAULT_PIE_COLORS.len()].to_string()
            } else {
                self.colors[i % self.colors.len()].clone()
            };
            slices.push(PieSlice {
                label: label.clone(),
                value: *value,
                fraction,
                color,
                start_angle: angle,
                end_angle: angle + sweep,
            });
            angle += sweep;
        }
        slices
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    pub color: String,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Whole-number percentage
    pub fn percent(&self) -> u32 {
        (self.fraction * 100.0).round() as u32
    }

    /// `"Clothes: 40%"`
    pub fn caption(&self) -> String {
        format!("{}: {}%", self.label, self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_steps() {
        let axis = Axis::for_max(1000.0, 5);
        assert_eq!(axis.step, 200.0);
        assert_eq!(axis.max, 1000.0);
        assert_eq!(axis.ticks(), vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0]);

        let axis = Axis::for_max(200.0, 5);
        assert_eq!(axis.step, 50.0);
        assert_eq!(axis.max, 200.0);

        let axis = Axis::for_max(37.0, 5);
        assert_eq!(axis.step, 10.0);
        assert_eq!(axis.max, 40.0);

        let empty = Axis::for_max(0.0, 4);
        assert_eq!(empty.ticks().len(), 5);
    }

    #[test]
    fn test_bar_layout() {
        let data = ChartData::new(&["A", "B"], vec![Series::new("s", vec![50.0, 100.0], "#000")]);
        let area = PlotArea::new(220.0, 150.0, Margins::default());
        let axis = data.value_axis(5);
        let bars = bar_layout(&data, &area, &axis);

        assert_eq!(bars.len(), 2);
        assert_eq!(area.width, 150.0);
        assert_eq!(area.height, 100.0);
        assert!((bars[0].height - 50.0).abs() < 1e-9);
        assert!((bars[1].height - 100.0).abs() < 1e-9);
        assert!((bars[1].y - area.y).abs() < 1e-9);
        assert!(bars[0].x > area.x);
        assert!(bars[1].x + bars[1].width < area.right());
    }

    #[test]
    fn test_line_points_span_area() {
        let series = Series::new("s", vec![0.0, 100.0, 50.0], "#000");
        let area = PlotArea::new(200.0, 100.0, Margins::default());
        let axis = Axis::for_max(100.0, 5);
        let points = line_points(&series, 3, &area, &axis);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0], (area.x, area.bottom()));
        assert_eq!(points[2].0, area.right());
        assert_eq!(points[1].1, area.y);
    }

    #[test]
    fn test_pie_slices() {
        let pie = PieData::new(&["Clothes", "Rice", "Meat"], vec![40.0, 30.0, 30.0]);
        let slices = pie.slices();

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].caption(), "Clothes: 40%");
        assert_eq!(slices[1].percent(), 30);
        assert_eq!(slices[2].color, "#f39c12");
        assert!((slices[2].end_angle - slices[0].start_angle - 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_pie_ignores_non_positive() {
        let pie = PieData::new(&["a", "b"], vec![0.0, -3.0]);
        assert!(pie.slices().is_empty());

        let pie = PieData::new(&["a", "b"], vec![1.0, 0.0]);
        let slices = pie.slices();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].percent(), 100);
    }
}
