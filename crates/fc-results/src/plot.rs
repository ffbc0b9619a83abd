//! Static plot export.
//!
//! Every series is drawn as one line against the time series when one is
//! present (see [`TIME_KEYS`]), otherwise against the sample index. A `.svg`
//! path selects the SVG backend; anything else is rendered as a bitmap whose
//! format follows the extension.
//!
//! ```rust,ignore
//! use fc_results::{PlotConfig, plot_series};
//!
//! let mut config = PlotConfig::default();
//! config.title = "Ion temperature".to_string();
//! plot_series(&series, Path::new("run.png"), Some(&config))?;
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::types::TimeSeries;
use crate::{ResultsError, ResultsResult};

/// Series names treated as the time axis, in lookup order.
pub const TIME_KEYS: [&str; 3] = ["time", "t", "timestamp"];

/// Appearance of an exported plot.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,
    /// Image height in pixels (default: 768)
    pub height: u32,
    pub title: String,
    /// Colors assigned to series in order; the default palette is used when
    /// empty or exhausted.
    pub colors: Vec<RGBColor>,
    pub background: RGBColor,
    /// Line width in pixels (default: 2)
    pub line_width: u32,
    pub show_grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "FusionCraft simulation".to_string(),
            colors: Vec::new(),
            background: WHITE,
            line_width: 2,
            show_grid: true,
        }
    }
}

impl PlotConfig {
    fn series_color(&self, index: usize) -> RGBColor {
        if let Some(color) = self.colors.get(index) {
            return *color;
        }
        const PALETTE: [RGBColor; 10] = [
            RED,
            BLUE,
            GREEN,
            MAGENTA,
            CYAN,
            BLACK,
            RGBColor(255, 165, 0),
            RGBColor(128, 0, 128),
            RGBColor(255, 192, 203),
            RGBColor(165, 42, 42),
        ];
        PALETTE[index % PALETTE.len()]
    }
}

/// First series name in `ts` that is one of [`TIME_KEYS`].
pub fn time_key(ts: &TimeSeries) -> Option<&'static str> {
    TIME_KEYS.into_iter().find(|key| ts.contains(key))
}

/// Plot path next to a data export: `out` with a `.png` extension.
pub fn default_plot_path(out: &Path) -> PathBuf {
    out.with_extension("png")
}

/// Render every series of `ts` to `path`.
///
/// Non-finite samples break a line instead of being drawn. Fails if `ts`
/// holds nothing to plot or the backend cannot write the file.
pub fn plot_series(
    ts: &TimeSeries,
    path: &Path,
    config: Option<&PlotConfig>,
) -> ResultsResult<()> {
    let default_config;
    let config = match config {
        Some(config) => config,
        None => {
            default_config = PlotConfig::default();
            &default_config
        }
    };

    let lines = collect_lines(ts);
    if lines.is_empty() {
        return Err(ResultsError::Plot("no series to plot".to_string()));
    }
    let xlabel = time_key(ts).unwrap_or("index");

    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    let drawn = if is_svg {
        let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
        draw_on_area(&root, &lines, xlabel, config)
    } else {
        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        draw_on_area(&root, &lines, xlabel, config)
    };
    drawn.map_err(|e| ResultsError::Plot(e.to_string()))
}

/// One named line as finite `(x, y)` runs.
struct Line<'a> {
    name: &'a str,
    segments: Vec<Vec<(f64, f64)>>,
}

fn collect_lines(ts: &TimeSeries) -> Vec<Line<'_>> {
    let time = time_key(ts);
    let x_values = time.and_then(|key| ts.get(key));

    ts.iter()
        .filter(|(name, _)| Some(*name) != time)
        .map(|(name, values)| {
            let points: Vec<(f64, f64)> = match x_values {
                Some(xs) => xs.iter().copied().zip(values.iter().copied()).collect(),
                None => values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i as f64, *v))
                    .collect(),
            };
            Line {
                name,
                segments: finite_segments(&points),
            }
        })
        .filter(|line| !line.segments.is_empty())
        .collect()
}

fn finite_segments(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    points
        .split(|(x, y)| !(x.is_finite() && y.is_finite()))
        .filter(|run| !run.is_empty())
        .map(<[(f64, f64)]>::to_vec)
        .collect()
}

/// Bounds of `values`, widened when empty or degenerate.
fn padded_range(values: impl Iterator<Item = f64>, margin: f64) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span == 0.0 {
        let pad = if lo == 0.0 { 1.0 } else { 0.5 * lo.abs() };
        return (lo - pad, hi + pad);
    }
    (lo - margin * span, hi + margin * span)
}

fn draw_on_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    lines: &[Line<'_>],
    xlabel: &str,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let points = || lines.iter().flat_map(|l| l.segments.iter().flatten());
    let (x_min, x_max) = padded_range(points().map(|(x, _)| *x), 0.0);
    let (y_min, y_max) = padded_range(points().map(|(_, y)| *y), 0.1);

    root.fill(&config.background)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, ("sans-serif", 40.0).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(xlabel).y_desc("value");
    if config.show_grid {
        mesh.draw()?;
    } else {
        mesh.disable_mesh().draw()?;
    }

    let width = config.line_width;
    for (i, line) in lines.iter().enumerate() {
        let color = config.series_color(i);
        for (k, segment) in line.segments.iter().enumerate() {
            let drawn = chart.draw_series(LineSeries::new(
                segment.iter().copied(),
                color.stroke_width(width),
            ))?;
            if k == 0 {
                drawn.label(line.name).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width))
                });
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fc_plot_{}_{}", std::process::id(), name))
    }

    fn sample() -> TimeSeries {
        let mut ts = TimeSeries::with_series(&["time", "temperature", "E_field"]).unwrap();
        for i in 0..20 {
            let t = i as f64 * 0.1;
            ts.push_row(&[t, 2.0 + t, t.sin()]).unwrap();
        }
        ts
    }

    #[test]
    fn time_key_lookup_order() {
        assert_eq!(time_key(&sample()), Some("time"));
        let mut ts = TimeSeries::new();
        ts.add_series("timestamp", vec![0.0]).unwrap();
        ts.add_series("t", vec![0.0]).unwrap();
        assert_eq!(time_key(&ts), Some("t"));
        let mut ts = TimeSeries::new();
        ts.add_series("x", vec![0.0]).unwrap();
        assert_eq!(time_key(&ts), None);
    }

    #[test]
    fn lines_exclude_the_time_axis() {
        let ts = sample();
        let lines = collect_lines(&ts);
        let names: Vec<_> = lines.iter().map(|l| l.name).collect();
        assert_eq!(names, ["temperature", "E_field"]);
        assert_eq!(lines[0].segments.len(), 1);
        assert_eq!(lines[0].segments[0].len(), 20);
        assert_eq!(lines[0].segments[0][0], (0.0, 2.0));
    }

    #[test]
    fn index_axis_without_time_series() {
        let mut ts = TimeSeries::new();
        ts.add_series("a", vec![5.0, 6.0, 7.0]).unwrap();
        let lines = collect_lines(&ts);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].segments[0], vec![(0.0, 5.0), (1.0, 6.0), (2.0, 7.0)]);
    }

    #[test]
    fn non_finite_samples_split_lines() {
        let points = [(0.0, 1.0), (1.0, f64::NAN), (2.0, 2.0), (3.0, 3.0), (4.0, f64::INFINITY)];
        assert_eq!(
            finite_segments(&points),
            vec![vec![(0.0, 1.0)], vec![(2.0, 2.0), (3.0, 3.0)]]
        );
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        assert_eq!(padded_range([2.0, 2.0].into_iter(), 0.1), (1.0, 3.0));
        assert_eq!(padded_range([0.0].into_iter(), 0.1), (-1.0, 1.0));
        assert_eq!(padded_range(std::iter::empty(), 0.1), (0.0, 1.0));
        assert_eq!(padded_range([0.0, 10.0].into_iter(), 0.0), (0.0, 10.0));
    }

    #[test]
    fn svg_export() {
        let path = temp_path("run.svg");
        plot_series(&sample(), &path, None).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<polyline"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn png_export() {
        let path = temp_path("run.png");
        let config = PlotConfig {
            width: 320,
            height: 240,
            show_grid: false,
            ..PlotConfig::default()
        };
        plot_series(&sample(), &path, Some(&config)).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn non_finite_series_still_plots() {
        let mut ts = sample();
        ts.add_series("blown_up", vec![f64::NAN; 20]).unwrap();
        let partial = (0..20)
            .map(|i| if i == 5 { f64::INFINITY } else { 1.0 })
            .collect();
        ts.add_series("partial", partial).unwrap();
        let path = temp_path("nonfinite.svg");
        plot_series(&ts, &path, None).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn nothing_to_plot_is_an_error() {
        let path = temp_path("empty.svg");
        let ts = TimeSeries::with_series(&["time"]).unwrap();
        assert!(matches!(
            plot_series(&ts, &path, None),
            Err(ResultsError::Plot(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let path = Path::new("/nonexistent/fusioncraft/run.svg");
        assert!(plot_series(&sample(), path, None).is_err());
    }

    #[test]
    fn plot_lands_next_to_data_export() {
        assert_eq!(
            default_plot_path(Path::new("out/run.csv")),
            PathBuf::from("out/run.png")
        );
        assert_eq!(default_plot_path(Path::new("run")), PathBuf::from("run.png"));
    }
}
