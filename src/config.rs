//! Run configuration and chart styling.
//!
//! Both structs are built once in `main` and handed down by reference;
//! nothing here is global or mutable after construction.

use std::path::PathBuf;

/// Default location of the survey results file.
pub const DEFAULT_INPUT_PATH: &str = "./data/survey_results_public.csv";
/// Default directory for chart artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "./plots";

/// Configuration for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// CSV file holding the survey responses
    pub input_path: PathBuf,
    /// Directory the chart images are written into
    pub output_dir: PathBuf,
    /// Compensation values at or above this are treated as outliers
    pub compensation_ceiling: f64,
    /// Upper bound of the compensation axis on charts (display only)
    pub display_ceiling: f64,
    /// Number of languages kept in the popularity ranking
    pub top_languages: usize,
    /// Render and write chart images after each report
    pub render_charts: bool,
    /// Styling shared by every chart
    pub style: ChartStyle,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            compensation_ceiling: 500_000.0,
            display_ceiling: 250_000.0,
            top_languages: 15,
            render_charts: true,
            style: ChartStyle::default(),
        }
    }
}

/// Immutable plot styling passed into every rendering call.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Pixels per inch of figure size
    pub dpi: u32,
    pub font_family: String,
    pub title_size: u32,
    pub label_size: u32,
    pub tick_size: u32,
    pub annotation_size: u32,
    /// Grid line colour (RGB)
    pub grid_color: (u8, u8, u8),
    /// Outline colour for bars, boxes and cells (RGB)
    pub edge_color: (u8, u8, u8),
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            dpi: 120,
            font_family: "sans-serif".to_string(),
            title_size: 26,
            label_size: 20,
            tick_size: 16,
            annotation_size: 14,
            grid_color: (225, 225, 225),
            edge_color: (40, 40, 40),
        }
    }
}

impl ChartStyle {
    /// Pixel dimensions for a figure size given in inches.
    pub fn pixel_size(&self, figure_size: (f64, f64)) -> (u32, u32) {
        let w = (figure_size.0 * self.dpi as f64).round().max(1.0) as u32;
        let h = (figure_size.1 * self.dpi as f64).round().max(1.0) as u32;
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = AnalysisConfig::default();
        assert_eq!(config.compensation_ceiling, 500_000.0);
        assert_eq!(config.display_ceiling, 250_000.0);
        assert_eq!(config.top_languages, 15);
        assert!(config.output_dir.ends_with("plots"));
    }

    #[test]
    fn test_pixel_size_scales_with_dpi() {
        let style = ChartStyle {
            dpi: 100,
            ..ChartStyle::default()
        };
        assert_eq!(style.pixel_size((10.0, 6.0)), (1000, 600));
    }
}
