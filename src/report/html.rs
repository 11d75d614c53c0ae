//! HTML rendering of the assembled report.
//!
//! Produces a single right-to-left UTF-8 document. Charts are embedded as
//! base64 `data:` images so the file renders offline and converts to PDF
//! without fetching anything.

use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;

use crate::analyzers::tables::{Table, Tabular};
use crate::analyzers::types::Analysis;
use crate::config::ColumnNames;
use crate::error::Result;
use crate::report::ReportMetadata;
use crate::report::charts::{pie_svg, stacked_bar_svg};

/// Escape text for HTML.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_table(out: &mut String, table: &Table) -> Result<()> {
    out.push_str("<table class=\"data\">\n<thead><tr>");
    for column in &table.columns {
        write!(out, "<th>{}</th>", escape(column))?;
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            write!(out, "<td>{}</td>", escape(cell))?;
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    Ok(())
}

fn svg_image(out: &mut String, svg: &str, alt: &str) -> Result<()> {
    writeln!(
        out,
        "<img class=\"chart\" src=\"data:image/svg+xml;base64,{}\" alt=\"{}\">",
        STANDARD.encode(svg.as_bytes()),
        escape(alt)
    )?;
    Ok(())
}

/// Renders the report in its fixed section order: metadata, count table,
/// percentage table, failing students, statistics, then the three charts.
pub fn render(
    metadata: &ReportMetadata,
    analysis: &Analysis,
    columns: &ColumnNames,
) -> Result<String> {
    let mut out = String::with_capacity(64 * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"ar\" dir=\"rtl\">\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(out, "<title>تقرير نتائج الطلاب - {}</title>", escape(&metadata.school_name))?;
    out.push_str("<style>\n");
    out.push_str("body{font-family:'Noto Naskh Arabic',Amiri,sans-serif;direction:rtl;margin:24px;color:#222;}\n");
    out.push_str("h1{font-size:24px;margin:0 0 12px 0;}\nh2{font-size:18px;margin:24px 0 8px 0;}\n");
    out.push_str(".meta p{margin:2px 0;}\n");
    out.push_str(".data{border-collapse:collapse;margin:8px 0 16px 0;}\n");
    out.push_str(".data th,.data td{border:1px solid #ccc;padding:4px 10px;text-align:center;}\n");
    out.push_str(".data th{background:#f2f2f2;}\n.chart{display:block;margin:8px 0;max-width:100%;}\n");
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str("<h1>تقرير نتائج الطلاب</h1>\n<div class=\"meta\">\n");
    for (label, value) in metadata.fields() {
        writeln!(out, "<p><strong>{}:</strong> {}</p>", label, escape(value))?;
    }
    writeln!(
        out,
        "<p><strong>تاريخ الإنشاء:</strong> {}</p>",
        Local::now().format("%Y-%m-%d")
    )?;
    out.push_str("</div>\n");

    out.push_str("<h2>عدد الطلاب الحاصلين على تقدير معين لكل مادة</h2>\n");
    render_table(&mut out, &analysis.summary.to_table(columns))?;

    out.push_str("<h2>نسبة الطلاب الحاصلين على تقدير معين لكل مادة</h2>\n");
    render_table(&mut out, &analysis.percentages.to_table(columns))?;

    out.push_str("<h2>الطلاب الحاصلين على تقدير غير مجتاز</h2>\n");
    if analysis.failing.is_empty() {
        out.push_str("<p>لا يوجد طلاب بتقدير غير مجتاز.</p>\n");
    } else {
        render_table(&mut out, &analysis.failing.to_table(columns))?;
    }

    out.push_str("<h2>الإحصائيات العامة</h2>\n");
    render_table(&mut out, &analysis.statistics.to_table(columns))?;

    out.push_str("<h2>رسم بياني حسب عدد الطلاب لكل مادة</h2>\n");
    let counts = stacked_bar_svg(
        &analysis.summary.stacked_series(),
        "عدد الطلاب لكل تقدير حسب المادة",
        "عدد الطلاب",
        None,
    )?;
    svg_image(&mut out, &counts, "Bar Chart")?;

    out.push_str("<h2>رسم بياني حسب نسبة الطلاب لكل مادة</h2>\n");
    let shares = stacked_bar_svg(
        &analysis.percentages.stacked_series(),
        "نسبة الطلاب لكل تقدير حسب المادة",
        "نسبة الطلاب (%)",
        Some(100.0),
    )?;
    svg_image(&mut out, &shares, "Percentage Chart")?;

    out.push_str("<h2>رسم بياني دائري لتوزيع الدرجات</h2>\n");
    let pie = pie_svg(&analysis.summary.category_series(), "توزيع الطلاب حسب التقدير")?;
    svg_image(&mut out, &pie, "Pie Chart")?;

    out.push_str("</body>\n</html>\n");
    Ok(out)
}
