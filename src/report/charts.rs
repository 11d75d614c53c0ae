//! Self-contained SVG charts for the report: stacked bars per subject and a
//! pie of category totals.

use std::f64::consts::PI;
use std::fmt::Write;

use crate::analyzers::types::{CategoryLabel, StackedSeries};
use crate::error::Result;
use crate::report::html::escape;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;

/// Fill colour for each category, lowest to highest.
pub fn category_color(label: CategoryLabel) -> &'static str {
    match label {
        CategoryLabel::Fail => "#d9534f",
        CategoryLabel::Competent => "#f0ad4e",
        CategoryLabel::Advanced => "#5bc0de",
        CategoryLabel::Excellent => "#5cb85c",
    }
}

/// Stacked bar chart with subjects on the x-axis. `y_max` fixes the scale
/// (100 for percentages); otherwise the tallest stack sets it. A series
/// shorter than the subject list contributes nothing for the missing subjects.
pub fn stacked_bar_svg(
    data: &StackedSeries,
    title: &str,
    y_label: &str,
    y_max: Option<f64>,
) -> Result<String> {
    let mut out = String::new();
    let left = 56.0;
    let right = 120.0;
    let top = 36.0;
    let bottom = 80.0;
    let plot_w = WIDTH - left - right;
    let plot_h = HEIGHT - top - bottom;

    let stack_heights: Vec<f64> = (0..data.subjects.len())
        .map(|i| {
            data.series
                .iter()
                .map(|s| s.values.get(i).copied().unwrap_or(0.0))
                .sum::<f64>()
        })
        .collect();
    let max_y = y_max
        .unwrap_or_else(|| stack_heights.iter().copied().fold(0.0, f64::max).ceil())
        .max(1.0);

    svg_open(&mut out, title)?;
    writeln!(
        out,
        "<rect x=\"{left}\" y=\"{top}\" width=\"{plot_w}\" height=\"{plot_h}\" fill=\"#fff\" stroke=\"#ddd\"/>"
    )?;

    let ticks = 5;
    for t in 0..=ticks {
        let value = max_y * t as f64 / ticks as f64;
        let y = top + plot_h - value / max_y * plot_h;
        writeln!(
            out,
            "<line x1=\"{left}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#eee\"/>",
            left + plot_w
        )?;
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\">{}</text>",
            left - 6.0,
            y + 4.0,
            trim_number(value)
        )?;
    }
    writeln!(
        out,
        "<text x=\"14\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 14 {:.1})\">{}</text>",
        top + plot_h / 2.0,
        top + plot_h / 2.0,
        escape(y_label)
    )?;

    let slot = if data.subjects.is_empty() {
        plot_w
    } else {
        plot_w / data.subjects.len() as f64
    };
    let bar_w = (slot * 0.6).max(1.0);

    for (i, subject) in data.subjects.iter().enumerate() {
        let x = left + slot * i as f64 + (slot - bar_w) / 2.0;
        let mut base = top + plot_h;
        for series in &data.series {
            let h = series.values.get(i).copied().unwrap_or(0.0) / max_y * plot_h;
            if h <= 0.0 {
                continue;
            }
            base -= h;
            writeln!(
                out,
                "<rect x=\"{x:.1}\" y=\"{base:.1}\" width=\"{bar_w:.1}\" height=\"{h:.1}\" fill=\"{}\"/>",
                category_color(series.label)
            )?;
        }
        let lx = x + bar_w / 2.0;
        let ly = top + plot_h + 14.0;
        writeln!(
            out,
            "<text x=\"{lx:.1}\" y=\"{ly:.1}\" font-size=\"11\" text-anchor=\"end\" transform=\"rotate(-45 {lx:.1} {ly:.1})\">{}</text>",
            escape(subject)
        )?;
    }

    legend(&mut out, WIDTH - right + 12.0, top, data.series.iter().map(|s| s.label))?;
    out.push_str("</svg>\n");
    Ok(out)
}

/// Pie chart of category totals with percentage labels on each slice.
pub fn pie_svg(slices: &[(CategoryLabel, f64)], title: &str) -> Result<String> {
    let mut out = String::new();
    svg_open(&mut out, title)?;

    let cx = 240.0;
    let cy = 215.0;
    let r = 150.0;
    let total: f64 = slices.iter().map(|(_, v)| v).sum();

    if total <= 0.0 {
        writeln!(
            out,
            "<text x=\"{cx}\" y=\"{cy}\" font-size=\"14\" text-anchor=\"middle\">لا توجد بيانات</text>"
        )?;
        out.push_str("</svg>\n");
        return Ok(out);
    }

    // start at twelve o'clock, clockwise
    let mut angle = -PI / 2.0;
    for (label, value) in slices.iter().filter(|(_, v)| *v > 0.0) {
        let share = value / total;
        let sweep = share * 2.0 * PI;
        let color = category_color(*label);

        if share >= 1.0 {
            writeln!(out, "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"{color}\"/>")?;
        } else {
            let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
            let large = if sweep > PI { 1 } else { 0 };
            writeln!(
                out,
                "<path d=\"M{cx},{cy} L{x1:.2},{y1:.2} A{r},{r} 0 {large} 1 {x2:.2},{y2:.2} Z\" fill=\"{color}\" stroke=\"#fff\"/>"
            )?;
        }

        let mid = angle + sweep / 2.0;
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\">{:.1}%</text>",
            cx + r * 0.6 * mid.cos(),
            cy + r * 0.6 * mid.sin() + 4.0,
            share * 100.0
        )?;
        angle += sweep;
    }

    legend(&mut out, 440.0, 80.0, slices.iter().map(|(l, _)| *l))?;
    out.push_str("</svg>\n");
    Ok(out)
}

fn svg_open(out: &mut String, title: &str) -> Result<()> {
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"Noto Naskh Arabic, Amiri, sans-serif\">"
    )?;
    writeln!(out, "<rect width=\"100%\" height=\"100%\" fill=\"#fafafa\"/>")?;
    writeln!(
        out,
        "<text x=\"{:.1}\" y=\"22\" font-size=\"15\" font-weight=\"bold\" text-anchor=\"middle\">{}</text>",
        WIDTH / 2.0,
        escape(title)
    )?;
    Ok(())
}

fn legend(
    out: &mut String,
    x: f64,
    y: f64,
    labels: impl Iterator<Item = CategoryLabel>,
) -> Result<()> {
    for (i, label) in labels.enumerate() {
        let ly = y + i as f64 * 20.0;
        writeln!(
            out,
            "<rect x=\"{x:.1}\" y=\"{ly:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>",
            category_color(label)
        )?;
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\">{}</text>",
            x + 18.0,
            ly + 10.0,
            label
        )?;
    }
    Ok(())
}

fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}
