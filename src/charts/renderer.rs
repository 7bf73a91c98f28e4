//! Static Chart Renderer
//! Draws a `ChartData` into an RGB buffer with plotters and writes it as PNG.
//!
//! Layout follows the usual EDA figure: title on top, axis descriptions,
//! light grid. Heatmaps get a colour bar and stacked bars a legend, each in
//! its own panel on the right.

use crate::charts::plotter::{BoxSpread, ChartData, ChartKind, ChartPlotter, ColorMap, Rgb, Series, BAR_COLOR};
use crate::config::ChartStyle;
use crate::report::format_thousands;
use image::RgbImage;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

type DrawResult = Result<(), Box<dyn std::error::Error>>;
type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Pixel buffer does not match a {0}x{1} image")]
    BufferSize(u32, u32),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Samples along each violin outline
const VIOLIN_POINTS: usize = 100;
/// Half of a category slot taken by a box or violin
const HALF_WIDTH: f64 = 0.4;

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Black or white, whichever reads better on `background`.
fn text_on(background: Rgb) -> RGBColor {
    let luma = 0.299 * background.0 as f64 + 0.587 * background.1 as f64 + 0.114 * background.2 as f64;
    if luma > 140.0 {
        BLACK
    } else {
        WHITE
    }
}

/// Category axis: one slot per category, centred on integers.
fn slots(n: usize) -> RangedCoordf64 {
    let end = n.max(1) as f64 - 0.5;
    (-0.5..end).into()
}

/// Tick count that puts a tick on every slot centre.
fn slot_ticks(n: usize) -> usize {
    n.max(1) + 1
}

/// Legend panel offsets in pixels, relative to the panel.
const LEGEND_TOP: i32 = 80;
const LEGEND_LEFT: i32 = 12;
const LEGEND_LINE: i32 = 26;
const LEGEND_SWATCH: i32 = 16;

/// Top-left corner of legend entry `index`; the title takes the first line.
fn legend_entry(index: usize) -> (i32, i32) {
    (LEGEND_LEFT, LEGEND_TOP + LEGEND_LINE * (index as i32 + 1))
}

fn slot_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if index < 0.0 || (position - index).abs() > 1e-6 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart into an in-memory image.
    pub fn render(chart: &ChartData, style: &ChartStyle) -> Result<RgbImage, RenderError> {
        let (width, height) = style.pixel_size(chart.figure_size);
        let mut buffer = vec![255u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, chart, style).map_err(|e| RenderError::Drawing(e.to_string()))?;
            root.present()
                .map_err(|e| RenderError::Drawing(e.to_string()))?;
        }
        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::BufferSize(width, height))
    }

    /// Render and save as PNG at `path`.
    pub fn render_to_file(chart: &ChartData, style: &ChartStyle, path: &Path) -> Result<(), RenderError> {
        let image = Self::render(chart, style)?;
        image.save(path)?;
        Ok(())
    }

    fn draw(root: &Area<'_>, chart: &ChartData, style: &ChartStyle) -> DrawResult {
        root.fill(&WHITE)?;
        match &chart.kind {
            ChartKind::BoxPlot { groups, y_range } => Self::draw_box_plot(root, chart, style, groups, *y_range),
            ChartKind::HorizontalBar { bars } => Self::draw_horizontal_bars(root, chart, style, bars),
            ChartKind::Violin { groups, y_range } => Self::draw_violins(root, chart, style, groups, *y_range),
            ChartKind::Heatmap {
                rows,
                columns,
                cells,
                value_range,
                color_map,
                decimals,
                legend,
            } => Self::draw_heatmap(
                root,
                chart,
                style,
                HeatmapView {
                    rows,
                    columns,
                    cells,
                    value_range: *value_range,
                    color_map: *color_map,
                    decimals: *decimals,
                    legend,
                },
            ),
            ChartKind::StackedBar {
                categories,
                stacks,
                legend,
            } => Self::draw_stacked_bars(root, chart, style, categories, stacks, legend),
        }
    }

    fn font<'a>(style: &'a ChartStyle, size: u32) -> TextStyle<'a> {
        (style.font_family.as_str(), f64::from(size)).into_font().color(&BLACK)
    }

    fn centered<'a>(style: &'a ChartStyle, size: u32, color: RGBColor) -> TextStyle<'a> {
        (style.font_family.as_str(), f64::from(size))
            .into_font()
            .color(&color)
            .pos(Pos::new(HPos::Center, VPos::Center))
    }

    fn draw_box_plot(
        root: &Area<'_>,
        chart: &ChartData,
        style: &ChartStyle,
        groups: &[Series],
        y_range: (f64, f64),
    ) -> DrawResult {
        let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
        let clamp = |v: f64| v.clamp(y_range.0, y_range.1);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, Self::font(style, style.title_size))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(110)
            .build_cartesian_2d(slots(groups.len()), y_range.0..y_range.1)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .light_line_style(rgb(style.grid_color))
            .x_labels(slot_ticks(groups.len()))
            .x_desc(&chart.x_desc)
            .y_desc(&chart.y_desc)
            .axis_desc_style(Self::font(style, style.label_size))
            .label_style(Self::font(style, style.tick_size))
            .x_label_formatter(&|x| slot_label(&labels, *x))
            .y_label_formatter(&|y| format_thousands(*y))
            .draw()?;

        let edge = rgb(style.edge_color);
        for (i, group) in groups.iter().enumerate() {
            let Some(spread) = BoxSpread::from_values(&group.values) else {
                continue;
            };
            let x = i as f64;
            let fill = rgb(ChartPlotter::group_color(i));

            ctx.draw_series(std::iter::once(Rectangle::new(
                [(x - HALF_WIDTH, clamp(spread.q1)), (x + HALF_WIDTH, clamp(spread.q3))],
                fill.mix(0.6).filled(),
            )))?;
            ctx.draw_series(std::iter::once(Rectangle::new(
                [(x - HALF_WIDTH, clamp(spread.q1)), (x + HALF_WIDTH, clamp(spread.q3))],
                edge.stroke_width(1),
            )))?;
            ctx.draw_series(std::iter::once(PathElement::new(
                vec![(x - HALF_WIDTH, clamp(spread.median)), (x + HALF_WIDTH, clamp(spread.median))],
                edge.stroke_width(2),
            )))?;

            // whiskers and caps
            let cap = HALF_WIDTH / 2.0;
            for (from, to) in [(spread.q1, spread.lower_whisker), (spread.q3, spread.upper_whisker)] {
                ctx.draw_series(std::iter::once(PathElement::new(
                    vec![(x, clamp(from)), (x, clamp(to))],
                    edge.stroke_width(1),
                )))?;
                ctx.draw_series(std::iter::once(PathElement::new(
                    vec![(x - cap, clamp(to)), (x + cap, clamp(to))],
                    edge.stroke_width(1),
                )))?;
            }

            ctx.draw_series(
                spread
                    .outliers(&group.values)
                    .filter(|v| *v >= y_range.0 && *v <= y_range.1)
                    .map(|v| Circle::new((x, v), 3, edge.stroke_width(1))),
            )?;
        }

        Ok(())
    }

    fn draw_horizontal_bars(
        root: &Area<'_>,
        chart: &ChartData,
        style: &ChartStyle,
        bars: &[(String, f64)],
    ) -> DrawResult {
        let n = bars.len();
        // first bar at the top
        let labels: Vec<String> = bars.iter().rev().map(|(label, _)| label.clone()).collect();
        let max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let x_end = ChartPlotter::nice_ceiling(max, 0.12);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, Self::font(style, style.title_size))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(160)
            .build_cartesian_2d(0.0..x_end, slots(n))?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .light_line_style(rgb(style.grid_color))
            .y_labels(slot_ticks(n))
            .x_desc(&chart.x_desc)
            .y_desc(&chart.y_desc)
            .axis_desc_style(Self::font(style, style.label_size))
            .label_style(Self::font(style, style.tick_size))
            .x_label_formatter(&|x| format_thousands(*x))
            .y_label_formatter(&|y| slot_label(&labels, *y))
            .draw()?;

        let fill = rgb(BAR_COLOR);
        let edge = rgb(style.edge_color);
        let annotation = (style.font_family.as_str(), f64::from(style.annotation_size))
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));

        for (i, (_, value)) in bars.iter().enumerate() {
            let y = (n - 1 - i) as f64;
            let corners = [(0.0, y - HALF_WIDTH), (*value, y + HALF_WIDTH)];
            ctx.draw_series(std::iter::once(Rectangle::new(corners, fill.filled())))?;
            ctx.draw_series(std::iter::once(Rectangle::new(corners, edge.stroke_width(1))))?;
            ctx.draw_series(std::iter::once(Text::new(
                format!(" {}", format_thousands(*value)),
                (*value, y),
                annotation.clone(),
            )))?;
        }

        Ok(())
    }

    fn draw_violins(
        root: &Area<'_>,
        chart: &ChartData,
        style: &ChartStyle,
        groups: &[Series],
        y_range: (f64, f64),
    ) -> DrawResult {
        let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
        let clamp = |v: f64| v.clamp(y_range.0, y_range.1);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, Self::font(style, style.title_size))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(110)
            .build_cartesian_2d(slots(groups.len()), y_range.0..y_range.1)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .light_line_style(rgb(style.grid_color))
            .x_labels(slot_ticks(groups.len()))
            .x_desc(&chart.x_desc)
            .y_desc(&chart.y_desc)
            .axis_desc_style(Self::font(style, style.label_size))
            .label_style(Self::font(style, style.tick_size))
            .x_label_formatter(&|x| slot_label(&labels, *x))
            .y_label_formatter(&|y| format_thousands(*y))
            .draw()?;

        let edge = rgb(style.edge_color);
        for (i, group) in groups.iter().enumerate() {
            let x = i as f64;
            let color = rgb(ChartPlotter::group_color(i));
            let profile = ChartPlotter::kde_profile(&group.values, VIOLIN_POINTS);
            let peak = profile.iter().map(|(_, d)| *d).fold(0.0, f64::max);

            if peak > 0.0 {
                let scale = HALF_WIDTH / peak;
                let mut outline: Vec<(f64, f64)> = profile
                    .iter()
                    .map(|(y, d)| (x - d * scale, clamp(*y)))
                    .collect();
                outline.extend(profile.iter().rev().map(|(y, d)| (x + d * scale, clamp(*y))));
                ctx.draw_series(std::iter::once(Polygon::new(outline.clone(), color.mix(0.7).filled())))?;
                outline.push(outline[0]);
                ctx.draw_series(std::iter::once(PathElement::new(outline, edge.stroke_width(1))))?;
            }

            // inner box: quartile bar and median dot
            if let Some(spread) = BoxSpread::from_values(&group.values) {
                ctx.draw_series(std::iter::once(PathElement::new(
                    vec![(x, clamp(spread.lower_whisker)), (x, clamp(spread.upper_whisker))],
                    edge.stroke_width(1),
                )))?;
                ctx.draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.04, clamp(spread.q1)), (x + 0.04, clamp(spread.q3))],
                    edge.filled(),
                )))?;
                ctx.draw_series(std::iter::once(Circle::new(
                    (x, clamp(spread.median)),
                    4,
                    WHITE.filled(),
                )))?;
            }
        }

        Ok(())
    }

    fn draw_heatmap(root: &Area<'_>, chart: &ChartData, style: &ChartStyle, view: HeatmapView<'_>) -> DrawResult {
        let (width, _) = root.dim_in_pixel();
        let (plot_area, bar_area) = root.split_horizontally(width * 86 / 100);

        let n_rows = view.rows.len();
        // first row at the top
        let row_labels: Vec<String> = view.rows.iter().rev().cloned().collect();

        let mut ctx = ChartBuilder::on(&plot_area)
            .caption(&chart.title, Self::font(style, style.title_size))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(170)
            .build_cartesian_2d(slots(view.columns.len()), slots(n_rows))?;

        ctx.configure_mesh()
            .disable_mesh()
            .x_labels(slot_ticks(view.columns.len()))
            .y_labels(slot_ticks(n_rows))
            .x_desc(&chart.x_desc)
            .y_desc(&chart.y_desc)
            .axis_desc_style(Self::font(style, style.label_size))
            .label_style(Self::font(style, style.tick_size))
            .x_label_formatter(&|x| slot_label(view.columns, *x))
            .y_label_formatter(&|y| slot_label(&row_labels, *y))
            .draw()?;

        let edge = rgb(style.edge_color);
        for (r, row) in view.cells.iter().enumerate() {
            let y = (n_rows - 1 - r) as f64;
            for (c, cell) in row.iter().enumerate() {
                let Some(value) = cell else {
                    continue;
                };
                let x = c as f64;
                let color = view.color_map.color_for(*value, view.value_range);
                let corners = [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)];
                ctx.draw_series(std::iter::once(Rectangle::new(corners, rgb(color).filled())))?;
                ctx.draw_series(std::iter::once(Rectangle::new(corners, edge.mix(0.3).stroke_width(1))))?;
                ctx.draw_series(std::iter::once(Text::new(
                    format!("{value:.prec$}", prec = view.decimals),
                    (x, y),
                    Self::centered(style, style.annotation_size, text_on(color)),
                )))?;
            }
        }

        Self::draw_color_bar(&bar_area, style, view.color_map, view.value_range, view.legend)
    }

    fn draw_color_bar(area: &Area<'_>, style: &ChartStyle, color_map: ColorMap, range: (f64, f64), legend: &str) -> DrawResult {
        const STEPS: usize = 100;
        // a flat scale still needs a drawable axis
        let (low, high) = if range.1 > range.0 {
            range
        } else {
            (range.0 - 0.5, range.0 + 0.5)
        };
        let step = (high - low) / STEPS as f64;

        let mut ctx = ChartBuilder::on(area)
            .margin_top(80)
            .margin_bottom(90)
            .margin_right(10)
            .y_label_area_size(0)
            .right_y_label_area_size(60)
            .build_cartesian_2d(0.0..1.0, low..high)?;

        ctx.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_desc(legend)
            .axis_desc_style(Self::font(style, style.tick_size))
            .label_style(Self::font(style, style.tick_size))
            .draw()?;

        ctx.draw_series((0..STEPS).map(|i| {
            let from = low + step * i as f64;
            let color = color_map.color_for(from + step / 2.0, range);
            Rectangle::new([(0.0, from), (1.0, from + step)], rgb(color).filled())
        }))?;

        Ok(())
    }

    fn draw_stacked_bars(
        root: &Area<'_>,
        chart: &ChartData,
        style: &ChartStyle,
        categories: &[String],
        stacks: &[Series],
        legend: &str,
    ) -> DrawResult {
        let n = categories.len();
        let (width, _) = root.dim_in_pixel();
        let (plot_area, legend_area) = root.split_horizontally(width * 80 / 100);

        let mut ctx = ChartBuilder::on(&plot_area)
            .caption(&chart.title, Self::font(style, style.title_size))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d(slots(n), 0.0..100.0)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .light_line_style(rgb(style.grid_color))
            .x_labels(slot_ticks(n))
            .x_desc(&chart.x_desc)
            .y_desc(&chart.y_desc)
            .axis_desc_style(Self::font(style, style.label_size))
            .label_style(Self::font(style, style.tick_size))
            .x_label_formatter(&|x| slot_label(categories, *x))
            .draw()?;

        let edge = rgb(style.edge_color);
        let mut base = vec![0.0; n];
        for (s, stack) in stacks.iter().enumerate() {
            let color = rgb(ChartPlotter::stack_color(s));
            let bars: Vec<[(f64, f64); 2]> = stack
                .values
                .iter()
                .enumerate()
                .take(n)
                .map(|(c, share)| {
                    let x = c as f64;
                    let corners = [(x - HALF_WIDTH, base[c]), (x + HALF_WIDTH, base[c] + share)];
                    base[c] += share;
                    corners
                })
                .collect();

            ctx.draw_series(bars.iter().map(|corners| Rectangle::new(*corners, color.mix(0.8).filled())))?;
            ctx.draw_series(bars.iter().map(|corners| Rectangle::new(*corners, edge.stroke_width(1))))?;
        }

        Self::draw_legend(&legend_area, style, legend, stacks)
    }

    /// Title line followed by one swatch and label per stack.
    fn draw_legend(area: &Area<'_>, style: &ChartStyle, title: &str, stacks: &[Series]) -> DrawResult {
        let label_style = Self::font(style, style.tick_size).pos(Pos::new(HPos::Left, VPos::Center));
        area.draw(&Text::new(
            title.to_string(),
            (LEGEND_LEFT, LEGEND_TOP + LEGEND_SWATCH / 2),
            label_style.clone(),
        ))?;

        for (s, stack) in stacks.iter().enumerate() {
            let (x, y) = legend_entry(s);
            let color = rgb(ChartPlotter::stack_color(s));
            area.draw(&Rectangle::new(
                [(x, y), (x + LEGEND_SWATCH, y + LEGEND_SWATCH)],
                color.mix(0.8).filled(),
            ))?;
            area.draw(&Rectangle::new(
                [(x, y), (x + LEGEND_SWATCH, y + LEGEND_SWATCH)],
                rgb(style.edge_color).stroke_width(1),
            ))?;
            area.draw(&Text::new(
                stack.label.clone(),
                (x + LEGEND_SWATCH + 8, y + LEGEND_SWATCH / 2),
                label_style.clone(),
            ))?;
        }

        Ok(())
    }
}

/// Heatmap fields borrowed from `ChartKind::Heatmap`.
struct HeatmapView<'a> {
    rows: &'a [String],
    columns: &'a [String],
    cells: &'a [Vec<Option<f64>>],
    value_range: (f64, f64),
    color_map: ColorMap,
    decimals: usize,
    legend: &'a str,
}
