use std::error::Error;
use std::fs::create_dir_all;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use palette::Srgb;
use plotters::prelude::*;

use crate::analysis::{Relationship, RelationshipAnalysis};
use crate::color::{fit_line_color, group_color};
use crate::data::model::Provenance;
use crate::fit::FitError;

// ---------------------------------------------------------------------------
// PNG chart emitter
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum RenderOutcome {
    Written(PathBuf),
    Skipped {
        relationship: Relationship,
        reason: FitError,
    },
}

/// Axis range around `[lo, hi]` padded by 5%, never zero-width.
pub fn axis_range(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        lo.abs().max(1.0) * 0.05
    };
    (lo - pad)..(hi + pad)
}

fn rgb(c: Srgb<u8>) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}

/// Draw one relationship: a scatter per point group plus the fitted line.
pub fn render_png(analysis: &RelationshipAnalysis, path: &Path, size: (u32, u32)) -> Result<()> {
    draw(analysis, path, size).map_err(|e| anyhow!("drawing {}: {e}", path.display()))
}

fn draw(
    analysis: &RelationshipAnalysis,
    path: &Path,
    size: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let rel = &analysis.relationship;
    let (x_min, x_max, y_min, y_max) = analysis.bounds();

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(rel.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(axis_range(x_min, x_max), axis_range(y_min, y_max))?;

    chart
        .configure_mesh()
        .x_desc(rel.x_label)
        .y_desc(rel.y_label)
        .draw()?;

    for group in &analysis.groups {
        let style = rgb(group_color(group.provenance)).filled();
        let points = group.series.points();
        if group.provenance == Some(Provenance::Internal) {
            chart
                .draw_series(points.map(move |(x, y)| {
                    EmptyElement::at((x, y)) + Rectangle::new([(-3, -3), (3, 3)], style)
                }))?
                .label(group.label())
                .legend(move |(x, y)| Rectangle::new([(x - 4, y - 4), (x + 4, y + 4)], style));
        } else {
            chart
                .draw_series(points.map(move |(x, y)| Circle::new((x, y), 3, style)))?
                .label(group.label())
                .legend(move |(x, y)| Circle::new((x, y), 4, style));
        }
    }

    let line_color = rgb(fit_line_color());
    chart
        .draw_series(LineSeries::new(analysis.fit_line(), line_color.stroke_width(2)))?
        .label("Line Fit")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Write one PNG per successful analysis into `out_dir`; failed analyses
/// are reported as skipped.
pub fn render_all<'a, I>(results: I, out_dir: &Path, size: (u32, u32)) -> Result<Vec<RenderOutcome>>
where
    I: IntoIterator<Item = &'a (Relationship, Result<RelationshipAnalysis, FitError>)>,
{
    create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut outcomes = Vec::new();
    for (rel, result) in results {
        match result {
            Ok(analysis) => {
                let path = out_dir.join(rel.file_name);
                render_png(analysis, &path, size)?;
                log::info!("wrote {}", path.display());
                outcomes.push(RenderOutcome::Written(path));
            }
            Err(reason) => {
                log::warn!("skipping {}: {reason}", rel.file_name);
                outcomes.push(RenderOutcome::Skipped {
                    relationship: *rel,
                    reason: *reason,
                });
            }
        }
    }
    Ok(outcomes)
}
