//! SVG chart rendering of the indicator table.
//!
//! Four stacked panels sharing the date axis:
//! 1. close with SMA(20) and EMA(20)
//! 2. RSI(14) on a fixed 0-100 scale with 70/30 reference lines
//! 3. close with the Bollinger bands
//! 4. MACD and signal line around zero

use crate::domain::engine::IndicatorRow;
use crate::domain::error::PricelensError;
use crate::ports::chart_port::ChartPort;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 900.0;
const PANEL_HEIGHT: f64 = 200.0;
const PADDING: f64 = 40.0;
const TITLE_HEIGHT: f64 = 30.0;

struct Line<'a> {
    label: &'a str,
    color: &'a str,
    values: Vec<Option<f64>>,
}

struct Panel<'a> {
    title: &'a str,
    lines: Vec<Line<'a>>,
    fixed_range: Option<(f64, f64)>,
    guides: &'a [f64],
}

#[derive(Debug, Default)]
pub struct SvgChartAdapter;

impl ChartPort for SvgChartAdapter {
    fn render(
        &self,
        symbol: &str,
        rows: &[IndicatorRow],
        output_path: &Path,
    ) -> Result<(), PricelensError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, render_svg(symbol, rows))?;
        Ok(())
    }
}

pub fn render_svg(symbol: &str, rows: &[IndicatorRow]) -> String {
    let close: Vec<Option<f64>> = rows.iter().map(|r| Some(r.row.close)).collect();
    let column = |f: fn(&IndicatorRow) -> Option<f64>| rows.iter().map(f).collect::<Vec<_>>();

    let panels = [
        Panel {
            title: "Price, SMA(20), EMA(20)",
            lines: vec![
                Line {
                    label: "Close",
                    color: "black",
                    values: close.clone(),
                },
                Line {
                    label: "SMA20",
                    color: "blue",
                    values: column(|r| r.sma20),
                },
                Line {
                    label: "EMA20",
                    color: "orange",
                    values: column(|r| r.ema20),
                },
            ],
            fixed_range: None,
            guides: &[],
        },
        Panel {
            title: "RSI(14)",
            lines: vec![Line {
                label: "RSI",
                color: "purple",
                values: column(|r| r.rsi14),
            }],
            fixed_range: Some((0.0, 100.0)),
            guides: &[70.0, 30.0],
        },
        Panel {
            title: "Bollinger Bands(20, 2)",
            lines: vec![
                Line {
                    label: "Close",
                    color: "black",
                    values: close,
                },
                Line {
                    label: "Upper",
                    color: "red",
                    values: column(|r| r.bb_upper),
                },
                Line {
                    label: "Middle",
                    color: "blue",
                    values: column(|r| r.bb_middle),
                },
                Line {
                    label: "Lower",
                    color: "green",
                    values: column(|r| r.bb_lower),
                },
            ],
            fixed_range: None,
            guides: &[],
        },
        Panel {
            title: "MACD(12, 26, 9)",
            lines: vec![
                Line {
                    label: "MACD",
                    color: "blue",
                    values: column(|r| r.macd),
                },
                Line {
                    label: "Signal",
                    color: "red",
                    values: column(|r| r.signal_line),
                },
            ],
            fixed_range: None,
            guides: &[0.0],
        },
    ];

    let height = TITLE_HEIGHT + panels.len() as f64 * PANEL_HEIGHT;
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        WIDTH, height, WIDTH, height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="20" font-size="16" font-family="sans-serif">{} technical indicators{}</text>"#,
        PADDING,
        escape(symbol),
        date_span(rows)
    );

    for (i, panel) in panels.iter().enumerate() {
        let top = TITLE_HEIGHT + i as f64 * PANEL_HEIGHT;
        render_panel(&mut svg, panel, top, rows.len());
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_panel(svg: &mut String, panel: &Panel<'_>, top: f64, count: usize) {
    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = PANEL_HEIGHT - 2.0 * PADDING;
    let bottom = top + PANEL_HEIGHT - PADDING;

    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.1}" font-size="12" font-family="sans-serif">{}</text>"#,
        PADDING,
        top + PADDING - 8.0,
        escape(panel.title)
    );
    let _ = writeln!(
        svg,
        r#"<rect x="{:.0}" y="{:.1}" width="{:.0}" height="{:.0}" fill="none" stroke="gray"/>"#,
        PADDING,
        top + PADDING,
        plot_width,
        plot_height
    );

    let Some((min, max)) = panel.fixed_range.or_else(|| value_range(panel)) else {
        return;
    };
    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if count > 1 {
        plot_width / (count - 1) as f64
    } else {
        0.0
    };
    let y_of = |v: f64| bottom - (v - min) * scale_y;

    for &guide in panel.guides {
        if guide < min || guide > max {
            continue;
        }
        let y = y_of(guide);
        let _ = writeln!(
            svg,
            r#"<line x1="{:.0}" y1="{:.1}" x2="{:.0}" y2="{:.1}" stroke="gray" stroke-dasharray="4 3"/>"#,
            PADDING,
            y,
            WIDTH - PADDING,
            y
        );
    }

    for (j, line) in panel.lines.iter().enumerate() {
        let points: Vec<String> = line
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .map(|(i, v)| format!("{:.1},{:.1}", PADDING + i as f64 * scale_x, y_of(v)))
            .collect();

        if !points.is_empty() {
            let _ = writeln!(
                svg,
                r#"<polyline fill="none" stroke="{}" stroke-width="1" points="{}"/>"#,
                line.color,
                points.join(" ")
            );
        }
        let _ = writeln!(
            svg,
            r#"<text x="{:.0}" y="{:.1}" font-size="10" font-family="sans-serif" fill="{}">{}</text>"#,
            WIDTH - PADDING - 70.0,
            top + PADDING + 12.0 + j as f64 * 12.0,
            line.color,
            line.label
        );
    }
}

fn value_range(panel: &Panel<'_>) -> Option<(f64, f64)> {
    let mut values = panel
        .lines
        .iter()
        .flat_map(|l| l.values.iter().flatten().copied())
        .chain(panel.guides.iter().copied())
        .filter(|v| v.is_finite())
        .peekable();
    values.peek()?;

    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    Some((min, max))
}

fn date_span(rows: &[IndicatorRow]) -> String {
    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => format!(" ({} to {})", first.row.date, last.row.date),
        _ => String::new(),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
