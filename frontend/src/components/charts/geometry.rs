//! Pixel layout shared by chart drawing and click hit testing.
//!
//! The plotters chart builders are configured with the same margins as
//! [`PlotArea`], so a click position can be mapped back to the bar, point or
//! slice that was drawn under it.

use shared::ChartHit;
use std::f64::consts::TAU;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 350;
pub const MARGIN: i32 = 15;
pub const X_LABEL_AREA: i32 = 45;
pub const Y_LABEL_AREA: i32 = 70;

pub const POINT_RADIUS: i32 = 5;
pub const POINT_HIT_RADIUS: f64 = 7.0;

/// Share of each category band taken up by its bar group.
const GROUP_FILL: f64 = 0.8;

pub const LEGEND_WIDTH: f64 = 200.0;
pub const LEGEND_ROW_HEIGHT: f64 = 24.0;
const DOUGHNUT_CUTOUT: f64 = 0.5;

/// Map a mouse offset on a CSS-scaled canvas back to canvas pixels.
pub fn to_canvas_coords(
    offset: (f64, f64),
    client_size: (f64, f64),
    canvas_size: (u32, u32),
) -> (f64, f64) {
    let scale = |offset: f64, client: f64, canvas: u32| {
        if client > 0.0 {
            offset * f64::from(canvas) / client
        } else {
            offset
        }
    };
    (
        scale(offset.0, client_size.0, canvas_size.0),
        scale(offset.1, client_size.1, canvas_size.1),
    )
}

/// Draw every `stride`-th axis label so long series stay readable.
pub fn label_stride(count: usize, max_labels: usize) -> usize {
    if max_labels == 0 {
        return 1;
    }
    count.div_ceil(max_labels).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            left: f64::from(MARGIN + Y_LABEL_AREA),
            top: f64::from(MARGIN),
            right: f64::from(width) - f64::from(MARGIN),
            bottom: f64::from(height) - f64::from(MARGIN + X_LABEL_AREA),
        }
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Vertical value range with 10% padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn covering<I: IntoIterator<Item = f64>>(values: I, begin_at_zero: bool) -> Self {
        let (mut min, mut max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if min > max {
            min = 0.0;
            max = 0.0;
        }
        if begin_at_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        let padding = (max - min).max(1.0) * 0.1;
        Self {
            min: if begin_at_zero && min >= 0.0 { 0.0 } else { min - padding },
            max: max + padding,
        }
    }

    pub fn to_px(&self, area: &PlotArea, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return area.bottom;
        }
        area.bottom - (value - self.min) / span * area.height()
    }
}

/// Grouped bars, one group per label and one bar per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub area: PlotArea,
    pub range: ValueRange,
    datasets: Vec<Vec<f64>>,
    categories: usize,
}

impl BarLayout {
    pub fn new(area: PlotArea, datasets: Vec<Vec<f64>>) -> Self {
        let categories = datasets.iter().map(Vec::len).max().unwrap_or(0);
        let range = ValueRange::covering(datasets.iter().flatten().copied(), true);
        Self {
            area,
            range,
            datasets,
            categories,
        }
    }

    pub fn categories(&self) -> usize {
        self.categories
    }

    /// Horizontal extent of a bar in data units (band `i` spans `i..i+1`).
    pub fn bar_span(&self, dataset: usize, index: usize) -> (f64, f64) {
        let bar_width = GROUP_FILL / self.datasets.len().max(1) as f64;
        let start = index as f64 + (1.0 - GROUP_FILL) / 2.0 + dataset as f64 * bar_width;
        (start, start + bar_width)
    }

    /// Pixel x of the centre of band `index`.
    pub fn band_center_px(&self, index: usize) -> f64 {
        if self.categories == 0 {
            return self.area.left;
        }
        self.area.left + (index as f64 + 0.5) / self.categories as f64 * self.area.width()
    }

    /// The bar under `(x, y)`, if any.
    pub fn hit(&self, x: f64, y: f64) -> Option<ChartHit> {
        if self.categories == 0 || self.datasets.is_empty() || !self.area.contains(x, y) {
            return None;
        }
        let data_x = (x - self.area.left) / self.area.width() * self.categories as f64;
        let index = (data_x.floor() as usize).min(self.categories - 1);
        let offset = data_x - index as f64 - (1.0 - GROUP_FILL) / 2.0;
        if !(0.0..GROUP_FILL).contains(&offset) {
            return None;
        }
        let bar_width = GROUP_FILL / self.datasets.len() as f64;
        let dataset = ((offset / bar_width).floor() as usize).min(self.datasets.len() - 1);

        let value = *self.datasets.get(dataset)?.get(index)?;
        let top = self.range.to_px(&self.area, value.max(0.0));
        let bottom = self.range.to_px(&self.area, value.min(0.0));
        // one pixel of slack so zero-height bars stay clickable
        if y >= top - 1.0 && y <= bottom + 1.0 {
            Some(ChartHit::new(dataset, index))
        } else {
            None
        }
    }
}

/// A single line series with one point per label.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub area: PlotArea,
    pub range: ValueRange,
    values: Vec<f64>,
}

impl LineLayout {
    pub fn new(area: PlotArea, values: Vec<f64>) -> Self {
        let range = ValueRange::covering(values.iter().copied(), false);
        Self { area, range, values }
    }

    /// Data x range: points sit at integer positions with half a band of air.
    pub fn x_range(&self) -> std::ops::Range<f64> {
        -0.5..(self.values.len() as f64 - 0.5).max(0.5)
    }

    pub fn point_px(&self, index: usize) -> Option<(f64, f64)> {
        let value = *self.values.get(index)?;
        let x = self.area.left + (index as f64 + 0.5) / self.values.len() as f64 * self.area.width();
        Some((x, self.range.to_px(&self.area, value)))
    }

    /// Nearest point within [`POINT_HIT_RADIUS`] of `(x, y)`.
    pub fn hit(&self, x: f64, y: f64) -> Option<ChartHit> {
        (0..self.values.len())
            .filter_map(|i| self.point_px(i).map(|(px, py)| (i, (px - x).hypot(py - y))))
            .filter(|(_, distance)| *distance <= POINT_HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| ChartHit::new(0, index))
    }
}

/// Pie or doughnut to the right of a legend column.
#[derive(Debug, Clone, PartialEq)]
pub struct PieLayout {
    pub center: (f64, f64),
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Clockwise angles from twelve o'clock, `[start, end)` per slice.
    slices: Vec<(f64, f64)>,
}

impl PieLayout {
    pub fn new(width: u32, height: u32, values: &[f64], doughnut: bool) -> Self {
        let chart_width = (f64::from(width) - LEGEND_WIDTH).max(0.0);
        let center = (LEGEND_WIDTH + chart_width / 2.0, f64::from(height) / 2.0);
        let outer_radius = (chart_width.min(f64::from(height)) / 2.0 - f64::from(MARGIN)).max(0.0);
        let inner_radius = if doughnut { outer_radius * DOUGHNUT_CUTOUT } else { 0.0 };

        let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
        let mut start = 0.0;
        let slices = values
            .iter()
            .map(|value| {
                let sweep = if total > 0.0 && *value > 0.0 { value / total * TAU } else { 0.0 };
                let slice = (start, start + sweep);
                start += sweep;
                slice
            })
            .collect();

        Self {
            center,
            outer_radius,
            inner_radius,
            slices,
        }
    }

    pub fn slice_angles(&self, index: usize) -> Option<(f64, f64)> {
        self.slices.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Pixel position at `angle` (clockwise from twelve o'clock) and `radius`.
    pub fn point_at(&self, angle: f64, radius: f64) -> (f64, f64) {
        (
            self.center.0 + radius * angle.sin(),
            self.center.1 - radius * angle.cos(),
        )
    }

    /// Outline of a slice as pixel points, `steps_per_turn` segments per full circle.
    pub fn slice_outline(&self, index: usize, steps_per_turn: usize) -> Vec<(f64, f64)> {
        let Some((start, end)) = self.slice_angles(index) else {
            return Vec::new();
        };
        let steps = ((end - start) / TAU * steps_per_turn as f64).ceil().max(1.0) as usize;
        let arc = |radius: f64| {
            (0..=steps)
                .map(move |step| start + (end - start) * step as f64 / steps as f64)
                .map(move |angle| (angle, radius))
        };
        let mut points: Vec<(f64, f64)> = arc(self.outer_radius)
            .map(|(angle, radius)| self.point_at(angle, radius))
            .collect();
        if self.inner_radius > 0.0 {
            let inner: Vec<(f64, f64)> = arc(self.inner_radius)
                .map(|(angle, radius)| self.point_at(angle, radius))
                .collect();
            points.extend(inner.into_iter().rev());
        } else {
            points.push(self.center);
        }
        points
    }

    /// The slice under `(x, y)`, if any.
    pub fn hit(&self, x: f64, y: f64) -> Option<ChartHit> {
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        let distance = dx.hypot(dy);
        if distance > self.outer_radius || distance < self.inner_radius {
            return None;
        }
        let mut angle = dx.atan2(-dy);
        if angle < 0.0 {
            angle += TAU;
        }
        self.slices
            .iter()
            .position(|(start, end)| angle >= *start && angle < *end)
            .map(|index| ChartHit::new(0, index))
    }
}

/// Top-left corner of legend row `index`.
pub fn legend_row(index: usize) -> (f64, f64) {
    (f64::from(MARGIN), f64::from(MARGIN) + index as f64 * LEGEND_ROW_HEIGHT)
}
