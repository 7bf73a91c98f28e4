//! Charts module - Chart descriptions and static rendering

mod plotter;
mod renderer;

pub use plotter::{
    BoxSpread, ChartData, ChartKind, ChartPlotter, ColorMap, Rgb, Series, BAR_COLOR, PALETTE,
    STACK_COLORS,
};
pub use renderer::{RenderError, StaticChartRenderer};
