use std::error::Error;
use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{PanelLayout, Quantity, Trace, TraceStyle};

const REFERENCE: RGBColor = RGBColor(204, 204, 204);
const COMPARED: RGBColor = RGBColor(0, 0, 128);
const DIFFERENCE: RGBColor = RGBColor(128, 0, 0);

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub(crate) fn draw_figure(
    path: &Path,
    size: (u32, u32),
    title: &str,
    layout: &PanelLayout,
    runs: &[Trace<'_>],
    diff: Option<&Trace<'_>>,
) -> Result<()> {
    render(path, size, title, layout, runs, diff)
        .map_err(|e| anyhow!("failed to draw '{}': {}", path.display(), e))
}

fn render(
    path: &Path,
    size: (u32, u32),
    title: &str,
    layout: &PanelLayout,
    runs: &[Trace<'_>],
    diff: Option<&Trace<'_>>,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 24))?;
    let panels = root.split_evenly((layout.rows, layout.cols));

    for (i, &quantity) in layout.quantities.iter().enumerate() {
        // legend goes on the second panel
        let legend = runs.len() > 1 && i == 1;
        draw_panel(&panels[i], quantity, runs, legend, None)?;

        if let (Some(diff), true) = (diff, layout.has_diff_row()) {
            draw_panel(
                &panels[layout.cols + i],
                quantity,
                std::slice::from_ref(diff),
                false,
                Some("diff"),
            )?;
        }
    }

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &Panel<'_>,
    quantity: Quantity,
    traces: &[Trace<'_>],
    legend: bool,
    caption: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let (x_min, x_max) = padded(bounds(traces.iter().flat_map(|t| t.table.time())), 0.0);
    let (y_min, y_max) = padded(
        bounds(traces.iter().flat_map(|t| {
            quantity
                .columns(t.table)
                .flat_map(move |c| t.table.column(c))
        })),
        0.05,
    );

    let mut builder = ChartBuilder::on(area);
    builder.margin(10).x_label_area_size(30).y_label_area_size(50);
    if let Some(caption) = caption {
        builder.caption(caption, ("sans-serif", 16));
    }
    let mut chart = builder.build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("time (s)")
        .y_desc(quantity.axis_label())
        .draw()?;

    for trace in traces {
        let time = trace.table.time();
        for (k, col) in quantity.columns(trace.table).enumerate() {
            let style = style_for(trace.style, k);
            let points: Vec<(f64, f64)> =
                time.iter().copied().zip(trace.table.column(col)).collect();
            let series = chart.draw_series(LineSeries::new(points, style))?;
            if legend && k == 0 {
                series
                    .label(trace.name.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
        }
    }

    if legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn style_for(style: TraceStyle, dim: usize) -> ShapeStyle {
    match style {
        TraceStyle::Single => Palette99::pick(dim).stroke_width(2),
        TraceStyle::Reference => REFERENCE.stroke_width(4),
        TraceStyle::Compared => COMPARED.stroke_width(2),
        TraceStyle::Difference => DIFFERENCE.stroke_width(2),
    }
}

/// Min and max of the finite values, if any.
fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Widen `range` by `frac` of its span; flat or empty ranges get a unit span.
fn padded(range: Option<(f64, f64)>, frac: f64) -> (f64, f64) {
    match range {
        None => (0.0, 1.0),
        Some((lo, hi)) if (hi - lo).abs() < 1e-12 => (lo - 0.5, hi + 0.5),
        Some((lo, hi)) => {
            let pad = (hi - lo) * frac;
            (lo - pad, hi + pad)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_ignore_non_finite_values() {
        let b = bounds([1.0, f64::NAN, -2.0, f64::INFINITY, 3.0].into_iter());
        assert_eq!(b, Some((-2.0, 3.0)));
        assert_eq!(bounds(std::iter::empty()), None);
    }

    #[test]
    fn padding_handles_flat_and_empty_ranges() {
        assert_eq!(padded(None, 0.05), (0.0, 1.0));
        assert_eq!(padded(Some((2.0, 2.0)), 0.05), (1.5, 2.5));
        let (lo, hi) = padded(Some((0.0, 10.0)), 0.1);
        assert!((lo + 1.0).abs() < 1e-12 && (hi - 11.0).abs() < 1e-12);
    }

    #[test]
    fn comparison_runs_are_visually_distinct() {
        let reference = style_for(TraceStyle::Reference, 0);
        let compared = style_for(TraceStyle::Compared, 0);
        assert!(reference.stroke_width > compared.stroke_width);
        assert_eq!(style_for(TraceStyle::Difference, 3).stroke_width, 2);
    }
}
