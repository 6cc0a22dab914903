//! SVG charts for the aggregate views.
//!
//! Output is a standalone, deterministic SVG document: a line chart for
//! average mpg by year and a bar chart for average mpg by make.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::path::Path;
use tracing::info;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PAD_LEFT: f64 = 60.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 40.0;
const PAD_BOTTOM: f64 = 80.0;
const Y_TICKS: usize = 5;

const STROKE: &str = "#d62728";
const FILL: &str = "#1f77b4";
const AXIS: &str = "#333333";

/// Maps data values onto the plot area.
struct Frame {
    y_max: f64,
}

impl Frame {
    fn for_values(values: impl Iterator<Item = f64>) -> Self {
        let max = values.fold(0.0_f64, f64::max);
        // headroom above the tallest point
        let y_max = if max > 0.0 { max * 1.1 } else { 1.0 };
        Self { y_max }
    }

    fn chart_width() -> f64 {
        WIDTH - PAD_LEFT - PAD_RIGHT
    }

    fn chart_height() -> f64 {
        HEIGHT - PAD_TOP - PAD_BOTTOM
    }

    fn y(&self, value: f64) -> f64 {
        PAD_TOP + Self::chart_height() - (value / self.y_max) * Self::chart_height()
    }

    /// Axes, horizontal y ticks and the title.
    fn axes(&self, svg: &mut impl fmt::Write, title: &str, x_label: &str) -> fmt::Result {
        let bottom = HEIGHT - PAD_BOTTOM;
        writeln!(
            svg,
            r#"<text x="{}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
            WIDTH / 2.0,
            escape(title)
        )?;
        writeln!(
            svg,
            r#"<line x1="{PAD_LEFT}" y1="{PAD_TOP}" x2="{PAD_LEFT}" y2="{bottom}" stroke="{AXIS}"/>"#
        )?;
        writeln!(
            svg,
            r#"<line x1="{PAD_LEFT}" y1="{bottom}" x2="{}" y2="{bottom}" stroke="{AXIS}"/>"#,
            WIDTH - PAD_RIGHT
        )?;

        for i in 0..=Y_TICKS {
            let value = self.y_max * i as f64 / Y_TICKS as f64;
            let y = self.y(value);
            writeln!(
                svg,
                r#"<text x="{}" y="{:.1}" text-anchor="end" font-size="10">{value:.1}</text>"#,
                PAD_LEFT - 6.0,
                y + 3.0
            )?;
        }

        writeln!(
            svg,
            r#"<text x="16" y="{}" text-anchor="middle" font-size="12" transform="rotate(-90 16 {})">average mpg</text>"#,
            HEIGHT / 2.0,
            HEIGHT / 2.0
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{}</text>"#,
            WIDTH / 2.0,
            HEIGHT - 8.0,
            escape(x_label)
        )?;
        Ok(())
    }
}

fn open_svg() -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n"
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders average mpg per year as a dashed line with point markers.
pub fn render_line_chart(averages: &BTreeMap<i32, f64>) -> Result<String> {
    let frame = Frame::for_values(averages.values().copied());
    let mut svg = open_svg();
    frame.axes(&mut svg, "Average MPG by year", "year")?;

    let n = averages.len();
    let x = |idx: usize| {
        if n <= 1 {
            PAD_LEFT + Frame::chart_width() / 2.0
        } else {
            PAD_LEFT + idx as f64 / (n - 1) as f64 * Frame::chart_width()
        }
    };

    let points: Vec<String> = averages
        .values()
        .enumerate()
        .map(|(idx, avg)| format!("{:.1},{:.1}", x(idx), frame.y(*avg)))
        .collect();
    writeln!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{STROKE}" stroke-width="2" stroke-dasharray="6 4"/>"#,
        points.join(" ")
    )?;

    for (idx, (year, avg)) in averages.iter().enumerate() {
        let (cx, cy) = (x(idx), frame.y(*avg));
        writeln!(
            svg,
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="3" fill="{STROKE}"><title>{year}: {avg:.2}</title></circle>"#
        )?;
        writeln!(
            svg,
            r#"<text x="{cx:.1}" y="{:.1}" text-anchor="middle" font-size="10">{year}</text>"#,
            HEIGHT - PAD_BOTTOM + 14.0
        )?;
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Renders average mpg per make as one bar per make, labels slanted.
pub fn render_bar_chart(averages: &BTreeMap<String, f64>) -> Result<String> {
    let frame = Frame::for_values(averages.values().copied());
    let mut svg = open_svg();
    frame.axes(&mut svg, "Average MPG by make", "make")?;

    let slot = Frame::chart_width() / averages.len().max(1) as f64;
    let bar_width = slot * 0.7;
    let bottom = HEIGHT - PAD_BOTTOM;

    for (idx, (make, avg)) in averages.iter().enumerate() {
        let x = PAD_LEFT + idx as f64 * slot + (slot - bar_width) / 2.0;
        let y = frame.y(*avg);
        let label_x = x + bar_width / 2.0;
        let label_y = bottom + 10.0;
        let make = escape(make);
        writeln!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{:.1}" fill="{FILL}"><title>{make}: {avg:.2}</title></rect>"#,
            bottom - y
        )?;
        writeln!(
            svg,
            r#"<text x="{label_x:.1}" y="{label_y:.1}" text-anchor="end" font-size="9" transform="rotate(-45 {label_x:.1} {label_y:.1})">{make}</text>"#
        )?;
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Writes a rendered chart to `path`, overwriting it.
pub fn write_chart(path: &Path, svg: &str) -> Result<()> {
    std::fs::write(path, svg)
        .with_context(|| format!("failed to write chart to {}", path.display()))?;
    info!(path = %path.display(), "Chart written");
    Ok(())
}
