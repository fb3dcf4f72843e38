//! Chart rasterization.
//!
//! Renders the implementation-statistic pie chart and the language-support
//! stacked bar chart as PNG bytes, themed for Notion's light or dark
//! appearance. Slice and segment layout is computed by pure helpers so the
//! ordering rules stay unit-testable without a raster backend.

use crate::core::stats::{LanguageBreakdown, StatusCounts};
use crate::core::status::{self, ColorMode, Rgb, Status};
use crate::errors::{Error, Result};
use plotters::prelude::*;
use tracing::debug;

const CHART_WIDTH: u32 = 1024;
const CHART_HEIGHT: u32 = 768;

fn plot_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn chart_err<E: std::fmt::Display>(err: E) -> Error {
    Error::Chart(err.to_string())
}

/// Pie slices in canonical status order, zero-count statuses omitted.
fn pie_slices(counts: &StatusCounts) -> Vec<(Status, usize)> {
    counts.iter().filter(|(_, count)| *count > 0).collect()
}

/// Stacked segments for one language bar as `(status, base, top)`.
///
/// Segments stack bottom-up in reverse canonical order, so Released sits at
/// the base of every bar and Not Started on top.
fn stacked_segments(counts: &StatusCounts) -> Vec<(Status, usize, usize)> {
    let mut base = 0;
    Status::ordered_reversed()
        .into_iter()
        .map(|status| {
            let value = counts.get(status);
            let segment = (status, base, base + value);
            base += value;
            segment
        })
        .collect()
}

fn draw_placeholder(
    root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    foreground: RGBColor,
) -> Result<()> {
    let center = (CHART_WIDTH as i32 / 2 - 80, CHART_HEIGHT as i32 / 2 - 16);
    root.draw(&Text::new(
        "No records",
        center,
        ("sans-serif", 32).into_font().color(&foreground),
    ))
    .map_err(chart_err)
}

/// Renders the status-count pie chart to PNG bytes.
///
/// # Errors
/// Fails on drawing-backend or I/O errors; empty counts render a
/// placeholder instead of erroring.
pub fn render_pie_chart(counts: &StatusCounts, mode: ColorMode) -> Result<Vec<u8>> {
    debug!("rendering implementation statistic pie chart");
    let file = tempfile::Builder::new()
        .prefix("implementation_statistic")
        .suffix(".png")
        .tempfile()?;
    let path = file.path().to_path_buf();
    {
        let root = BitMapBackend::new(&path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        let background = plot_color(status::background_color(mode));
        let foreground = plot_color(status::foreground_color(mode));
        root.fill(&background).map_err(chart_err)?;

        let slices = pie_slices(counts);
        if slices.is_empty() {
            draw_placeholder(&root, foreground)?;
        } else {
            let sizes: Vec<f64> = slices.iter().map(|(_, count)| *count as f64).collect();
            let colors: Vec<RGBColor> = slices
                .iter()
                .map(|(slice_status, _)| plot_color(slice_status.color(mode)))
                .collect();
            let labels: Vec<String> = slices
                .iter()
                .map(|(slice_status, count)| format!("{slice_status} ({count})"))
                .collect();

            let center = (CHART_WIDTH as i32 / 2, CHART_HEIGHT as i32 / 2);
            let radius = 270.0;
            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(-90.0);
            pie.label_style(("sans-serif", 26).into_font().color(&foreground));
            pie.percentages(("sans-serif", 20).into_font().color(&foreground));
            root.draw(&pie).map_err(chart_err)?;
        }
        root.present().map_err(chart_err)?;
    }
    Ok(std::fs::read(&path)?)
}

/// Renders the language-support stacked bar chart to PNG bytes.
///
/// One bar per language in sorted order; segments stack per
/// [`stacked_segments`]; the legend lists statuses in forward canonical
/// order.
///
/// # Errors
/// Fails on drawing-backend or I/O errors; an empty breakdown renders a
/// placeholder instead of erroring.
pub fn render_stacked_bar_chart(
    breakdown: &LanguageBreakdown,
    mode: ColorMode,
) -> Result<Vec<u8>> {
    debug!("rendering language support bar chart");
    let file = tempfile::Builder::new()
        .prefix("language_support")
        .suffix(".png")
        .tempfile()?;
    let path = file.path().to_path_buf();
    {
        let root = BitMapBackend::new(&path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        let background = plot_color(status::background_color(mode));
        let foreground = plot_color(status::foreground_color(mode));
        root.fill(&background).map_err(chart_err)?;

        if breakdown.is_empty() {
            draw_placeholder(&root, foreground)?;
        } else {
            let languages: Vec<String> = breakdown.keys().cloned().collect();
            // Two rows of headroom so the tallest bar never touches the legend.
            let max_count = breakdown
                .values()
                .map(StatusCounts::total)
                .max()
                .unwrap_or(0)
                + 2;

            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .x_label_area_size(48)
                .y_label_area_size(48)
                .build_cartesian_2d(
                    -0.5f64..(languages.len() as f64 - 0.5),
                    0i32..max_count as i32,
                )
                .map_err(chart_err)?;

            let tick_font = ("sans-serif", 18).into_font().color(&foreground);
            chart
                .configure_mesh()
                .disable_x_mesh()
                .light_line_style(&foreground.mix(0.1))
                .bold_line_style(&foreground.mix(0.1))
                .axis_style(&foreground)
                .label_style(tick_font)
                .x_labels(languages.len())
                .x_label_formatter(&|x| {
                    let index = x.round();
                    if index >= 0.0 && (x - index).abs() < 0.3 {
                        languages
                            .get(index as usize)
                            .cloned()
                            .unwrap_or_default()
                    } else {
                        String::new()
                    }
                })
                .draw()
                .map_err(chart_err)?;

            for (i, counts) in breakdown.values().enumerate() {
                for (segment_status, bar_base, bar_top) in stacked_segments(counts) {
                    if bar_top == bar_base {
                        continue;
                    }
                    let color = plot_color(segment_status.color(mode));
                    chart
                        .draw_series(std::iter::once(Rectangle::new(
                            [
                                (i as f64 - 0.35, bar_base as i32),
                                (i as f64 + 0.35, bar_top as i32),
                            ],
                            color.filled(),
                        )))
                        .map_err(chart_err)?;
                }
            }

            for legend_status in Status::ordered() {
                let color = plot_color(legend_status.color(mode));
                chart
                    .draw_series(std::iter::empty::<Rectangle<(f64, i32)>>())
                    .map_err(chart_err)?
                    .label(legend_status.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 6), (x + 18, y + 6)], color.filled())
                    });
            }
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperMiddle)
                .background_style(background.filled())
                .border_style(&background)
                .label_font(("sans-serif", 18).into_font().color(&foreground))
                .draw()
                .map_err(chart_err)?;
        }
        root.present().map_err(chart_err)?;
    }
    Ok(std::fs::read(&path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_from(pairs: &[(Status, usize)]) -> StatusCounts {
        let mut counts = StatusCounts::zeroed();
        for &(count_status, n) in pairs {
            for _ in 0..n {
                counts.increment(count_status);
            }
        }
        counts
    }

    #[test]
    fn test_pie_slices_preserve_canonical_order_and_drop_zeros() {
        let counts = counts_from(&[
            (Status::Released, 4),
            (Status::NotStarted, 1),
            (Status::InReview, 2),
        ]);

        let slices = pie_slices(&counts);
        assert_eq!(
            slices,
            vec![
                (Status::NotStarted, 1),
                (Status::InReview, 2),
                (Status::Released, 4),
            ]
        );
    }

    #[test]
    fn test_stacked_segments_reverse_order_with_cumulative_bases() {
        let counts = counts_from(&[
            (Status::NotStarted, 1),
            (Status::InProgress, 2),
            (Status::Released, 3),
        ]);

        let segments = stacked_segments(&counts);
        // Released first (base of the bar), Not Started last (top).
        assert_eq!(segments[0], (Status::Released, 0, 3));
        assert_eq!(segments[1], (Status::ReadyForRelease, 3, 3));
        assert_eq!(segments[2], (Status::InReview, 3, 3));
        assert_eq!(segments[3], (Status::InProgress, 3, 5));
        assert_eq!(segments[4], (Status::NotStarted, 5, 6));

        let top = segments.last().unwrap().2;
        assert_eq!(top, counts.total());
    }

    #[test]
    fn test_stacked_segments_empty_counts() {
        let segments = stacked_segments(&StatusCounts::zeroed());
        assert!(segments.iter().all(|&(_, bar_base, bar_top)| bar_base == bar_top));
    }

    #[test]
    fn test_plot_color_passthrough() {
        let color = plot_color(Rgb(0x19, 0x91, 0x68));
        assert_eq!((color.0, color.1, color.2), (0x19, 0x91, 0x68));
    }
}
