//! Chart Plotter Module
//! Describes charts as plain data (what to draw) and computes their geometry:
//! palettes, colour maps, box-plot spreads and violin outlines.

use crate::stats::StatsCalculator;
use serde::Serialize;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// RGB triple.
pub type Rgb = (u8, u8, u8);

/// Bar colour of the language ranking (steelblue)
pub const BAR_COLOR: Rgb = (70, 130, 180);

pub const PALETTE: [Rgb; 10] = [
    (231, 76, 60),  // Red
    (46, 204, 113), // Green
    (155, 89, 182), // Purple
    (243, 156, 18), // Orange
    (26, 188, 156), // Teal
    (233, 30, 99),  // Pink
    (0, 188, 212),  // Cyan
    (255, 87, 34),  // Deep Orange
    (121, 85, 72),  // Brown
    (96, 125, 139), // Blue Grey
];

/// Fixed colours for the first stacked categories
pub const STACK_COLORS: [Rgb; 4] = [
    (214, 39, 40),  // #d62728
    (255, 127, 14), // #ff7f0e
    (44, 160, 44),  // #2ca02c
    (31, 119, 180), // #1f77b4
];

/// Sequential and diverging colour scales for heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorMap {
    /// Light yellow through green to dark blue
    YellowGreenBlue,
    /// Blue through white to red, centred on the middle of the range
    CoolWarm,
}

const YL_GN_BU: [Rgb; 9] = [
    (255, 255, 217),
    (237, 248, 177),
    (199, 233, 180),
    (127, 205, 187),
    (65, 182, 196),
    (29, 145, 192),
    (34, 94, 168),
    (37, 52, 148),
    (8, 29, 88),
];

const COOL_WARM: [Rgb; 5] = [
    (59, 76, 192),
    (141, 176, 254),
    (221, 221, 221),
    (244, 154, 123),
    (180, 4, 38),
];

impl ColorMap {
    fn stops(&self) -> &'static [Rgb] {
        match self {
            ColorMap::YellowGreenBlue => &YL_GN_BU,
            ColorMap::CoolWarm => &COOL_WARM,
        }
    }

    /// Colour at position `t` in [0, 1]; values outside are clamped.
    pub fn color_at(&self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 1);
        let upper = (lower + 1).min(stops.len() - 1);
        let frac = scaled - lower as f64;

        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        let (a, b) = (stops[lower], stops[upper]);
        (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }

    /// Colour for `value` inside `range`.
    pub fn color_for(&self, value: f64, range: (f64, f64)) -> Rgb {
        let span = range.1 - range.0;
        if span <= 0.0 {
            return self.color_at(0.5);
        }
        self.color_at((value - range.0) / span)
    }
}

/// Labelled sequence of values: one group of a distribution plot, or one
/// stacked category across all bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// What kind of chart to draw, with everything needed to draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartKind {
    /// One box per group, left to right.
    BoxPlot {
        groups: Vec<Series>,
        y_range: (f64, f64),
    },
    /// Bars from top to bottom in the given order, value annotated.
    HorizontalBar { bars: Vec<(String, f64)> },
    /// Kernel density outline per group, left to right.
    Violin {
        groups: Vec<Series>,
        y_range: (f64, f64),
    },
    /// Annotated grid; `None` cells are masked.
    Heatmap {
        rows: Vec<String>,
        columns: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
        value_range: (f64, f64),
        color_map: ColorMap,
        decimals: usize,
        legend: String,
    },
    /// One bar per category; each stack series holds its share per category.
    StackedBar {
        categories: Vec<String>,
        stacks: Vec<Series>,
        legend: String,
    },
}

/// Chart description for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    /// Figure size in inches
    pub figure_size: (f64, f64),
    pub kind: ChartKind,
}

/// Five-number summary drawn as a box with whiskers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpread {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxSpread {
    /// Quartiles with linear interpolation; whiskers reach the most extreme
    /// values within 1.5 IQR of the box.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = StatsCalculator::percentile(&sorted, 25.0);
        let median = StatsCalculator::percentile(&sorted, 50.0);
        let q3 = StatsCalculator::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }

    /// Values beyond the whiskers.
    pub fn outliers<'a>(&self, values: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
        let (low, high) = (self.lower_whisker, self.upper_whisker);
        values.iter().copied().filter(move |&v| v < low || v > high)
    }
}

/// Creates chart geometry shared by the renderer.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a group.
    pub fn group_color(group_index: usize) -> Rgb {
        PALETTE[group_index % PALETTE.len()]
    }

    /// Colour of the n-th stacked category.
    pub fn stack_color(index: usize) -> Rgb {
        STACK_COLORS
            .get(index)
            .copied()
            .unwrap_or_else(|| Self::group_color(index - STACK_COLORS.len()))
    }

    /// Gaussian kernel density of `values` sampled at `points` heights
    /// spanning the observed range, as `(value, density)` pairs.
    ///
    /// Uses Scott's rule for the bandwidth. Samples without spread have no
    /// density and yield an empty profile.
    pub fn kde_profile(values: &[f64], points: usize) -> Vec<(f64, f64)> {
        let n = values.len();
        if n < 2 || points < 2 {
            return Vec::new();
        }
        let std = values.std_dev();
        if !(std > 0.0) {
            return Vec::new();
        }
        let bandwidth = std * (n as f64).powf(-0.2);
        let kernel = match Normal::new(0.0, 1.0) {
            Ok(kernel) => kernel,
            Err(_) => return Vec::new(),
        };

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let step = (max - min) / (points - 1) as f64;

        (0..points)
            .map(|i| {
                let y = min + step * i as f64;
                let density = values
                    .iter()
                    .map(|v| kernel.pdf((y - v) / bandwidth))
                    .sum::<f64>()
                    / (n as f64 * bandwidth);
                (y, density)
            })
            .collect()
    }

    pub fn nice_step(range: f64, target_steps: usize) -> f64 {
        let raw_step = range / target_steps as f64;
        let magnitude = 10f64.powf(raw_step.log10().floor());
        let normalized = raw_step / magnitude;

        let nice = if normalized <= 1.0 {
            1.0
        } else if normalized <= 2.0 {
            2.0
        } else if normalized <= 5.0 {
            5.0
        } else {
            10.0
        };

        nice * magnitude
    }

    /// Axis end at least `headroom` above `max`, rounded up to a nice step.
    pub fn nice_ceiling(max: f64, headroom: f64) -> f64 {
        if !(max > 0.0) {
            return 1.0;
        }
        let target = max * (1.0 + headroom);
        let step = Self::nice_step(target, 8);
        (target / step).ceil() * step
    }
}
