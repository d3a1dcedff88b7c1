//! Overlaid line charts: one per metric on a date axis, plus the
//! year-overlay chart on a day-of-year axis.

use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Alignment, Rect},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame,
};

use compare_core::formatting::{
    format_date, format_day_of_year, format_measurement, format_metric_value,
};
use compare_core::models::Metric;
use compare_data::aligner::YearSeries;
use compare_data::merger::MetricSeries;

use crate::themes::Theme;

/// Relative headroom added above and below the data on the y-axis.
const Y_PADDING: f64 = 0.05;

/// Number of labels drawn along each axis.
const TICKS: usize = 3;

/// One plotted line in chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

// ── Conversion ────────────────────────────────────────────────────────────────

/// Map dates onto the x-axis as days since the common era.
pub fn metric_lines(series: &[MetricSeries]) -> Vec<ChartLine> {
    series
        .iter()
        .map(|s| ChartLine {
            name: s.label.clone(),
            points: s
                .points
                .iter()
                .map(|(date, v)| (f64::from(date.num_days_from_ce()), *v))
                .collect(),
        })
        .collect()
}

pub fn year_lines(series: &[YearSeries]) -> Vec<ChartLine> {
    series
        .iter()
        .map(|s| ChartLine {
            name: s.key.clone(),
            points: s
                .points
                .iter()
                .map(|(day, v)| (f64::from(*day), *v))
                .collect(),
        })
        .collect()
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// X-axis bounds covering every point; a single x value is widened by one
/// unit either side.
pub fn x_bounds(lines: &[ChartLine]) -> [f64; 2] {
    let (lo, hi) = extent(lines.iter().flat_map(|l| l.points.iter().map(|p| p.0)));
    if lo == hi {
        [lo - 1.0, hi + 1.0]
    } else {
        [lo, hi]
    }
}

/// Y-axis bounds covering every point plus [`Y_PADDING`] headroom.
pub fn y_bounds(lines: &[ChartLine]) -> [f64; 2] {
    let (lo, hi) = extent(lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)));
    let pad = if lo == hi {
        1.0
    } else {
        (hi - lo) * Y_PADDING
    };
    [lo - pad, hi + pad]
}

/// Smallest and largest plotted value, if anything is plotted.
pub fn value_range(lines: &[ChartLine]) -> Option<(f64, f64)> {
    lines
        .iter()
        .flat_map(|l| l.points.iter().map(|p| p.1))
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo.is_finite() {
        (lo, hi)
    } else {
        (0.0, 0.0)
    }
}

/// Evenly spaced tick labels from `bounds[0]` to `bounds[1]`.
fn tick_labels(bounds: [f64; 2], format: impl Fn(f64) -> String) -> Vec<String> {
    let step = (bounds[1] - bounds[0]) / (TICKS - 1) as f64;
    (0..TICKS)
        .map(|i| format(bounds[0] + step * i as f64))
        .collect()
}

fn date_tick(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(format_date)
        .unwrap_or_default()
}

fn day_tick(x: f64) -> String {
    format_day_of_year(x.round().max(1.0) as u32)
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render one metric as an overlaid line chart, one line per label.
pub fn render_metric_chart(
    frame: &mut Frame,
    area: Rect,
    metric: Metric,
    series: &[MetricSeries],
    theme: &Theme,
) {
    let lines = metric_lines(series);
    let title = match value_range(&lines) {
        Some((lo, hi)) => format!(
            "{}  [{} .. {}]",
            metric.title(),
            format_metric_value(metric, lo),
            format_metric_value(metric, hi)
        ),
        None => metric.title().to_string(),
    };
    render_lines(
        frame,
        area,
        &title,
        "Date",
        metric.axis_label(),
        &lines,
        date_tick,
        theme,
    );
}

/// Render average temperature for every series key on a shared annual axis.
pub fn render_year_chart(frame: &mut Frame, area: Rect, series: &[YearSeries], theme: &Theme) {
    let lines = year_lines(series);
    render_lines(
        frame,
        area,
        "Temp Avg by Day of Year",
        "Day of Year",
        Metric::TempAvg.axis_label(),
        &lines,
        day_tick,
        theme,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_lines(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    x_title: &str,
    y_title: &str,
    lines: &[ChartLine],
    x_format: fn(f64) -> String,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(format!(" {} ", title), theme.header));

    let plotted: Vec<&ChartLine> = lines.iter().filter(|l| !l.points.is_empty()).collect();
    if plotted.is_empty() {
        let text = Paragraph::new(Line::from(Span::styled(
            format!("No values to plot for {}", title),
            theme.dim,
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(text, area);
        return;
    }

    let owned: Vec<ChartLine> = plotted.into_iter().cloned().collect();
    let xb = x_bounds(&owned);
    let yb = y_bounds(&owned);

    let datasets: Vec<Dataset> = owned
        .iter()
        .enumerate()
        .map(|(i, line)| {
            Dataset::default()
                .name(line.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.series_style(i))
                .data(&line.points)
        })
        .collect();

    let x_axis = Axis::default()
        .title(Span::styled(x_title.to_string(), theme.axis_title))
        .style(theme.axis)
        .bounds(xb)
        .labels(tick_labels(xb, x_format));
    let y_axis = Axis::default()
        .title(Span::styled(y_title.to_string(), theme.axis_title))
        .style(theme.axis)
        .bounds(yb)
        .labels(tick_labels(yb, |v| format_measurement(v, 1)));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((
            ratatui::layout::Constraint::Percentage(40),
            ratatui::layout::Constraint::Percentage(60),
        ));

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
