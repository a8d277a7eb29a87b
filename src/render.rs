use crate::annotate::Annotation;
use crate::layout::LabelColor;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

fn color_of(color: LabelColor) -> &'static RGBColor {
    match color {
        LabelColor::Blue => &BLUE,
        LabelColor::Red => &RED,
    }
}

/**Draw the annotated spectrum as an SVG stem plot.
Every normalized peak becomes a black stem; each label placement
becomes a colored ion label centered above its peak at the planned
offset.
*/
pub fn render_annotation(
    annotation: &Annotation,
    title: &str,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let max_mz = annotation.peaks.iter().map(|p| p.mz).fold(0.0, f64::max);
    let max_offset = annotation
        .labels
        .iter()
        .map(|l| l.offset)
        .fold(0.0, f64::max);

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 25))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_mz + 15.0, 0.0..110.0 + max_offset)?;

    chart
        .configure_mesh()
        .x_desc("m/z")
        .y_desc("Relative Abundance (%)")
        .draw()?;

    for peak in &annotation.peaks {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(peak.mz, 0.0), (peak.mz, peak.relative_intensity)],
            &BLACK,
        )))?;
    }

    for label in &annotation.labels {
        let style = ("sans-serif", 12)
            .into_font()
            .color(color_of(label.color))
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(std::iter::once(Text::new(
            label.ion.to_string(),
            (label.mz, label.relative_intensity + label.offset),
            style,
        )))?;
    }

    root.present()?;
    Ok(())
}
