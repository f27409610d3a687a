use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::theme::Theme;

/// Shown in place of a chart with no points.
pub const NO_DATA: &str = "데이터가 없습니다.";

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Chart coordinates for a dated series.
///
/// When every date parses, x is the day offset from the first point so gaps
/// between snapshots stay visible; otherwise x is the position in the series.
pub fn series_points(dates: &[&str], values: &[f64]) -> Vec<(f64, f64)> {
    let parsed: Option<Vec<NaiveDate>> = dates.iter().map(|raw| parse_date(raw)).collect();
    match parsed {
        Some(days) if !days.is_empty() => {
            let origin = days[0];
            days.iter()
                .zip(values)
                .map(|(day, value)| ((*day - origin).num_days() as f64, *value))
                .collect()
        }
        _ => values
            .iter()
            .enumerate()
            .map(|(idx, value)| (idx as f64, *value))
            .collect(),
    }
}

/// Axis bounds covering `values` with a small margin.
pub fn value_bounds(values: &[f64]) -> [f64; 2] {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let margin = ((max - min) * 0.05).max(max.abs() * 0.01).max(1.0);
    [min - margin, max + margin]
}

fn x_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let first = points.first().map(|point| point.0).unwrap_or(0.0);
    let last = points.last().map(|point| point.0).unwrap_or(1.0);
    if last > first {
        [first, last]
    } else {
        [first, first + 1.0]
    }
}

/// Draw a single line series. `dates` label the x axis ends.
pub fn render_series(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    name: &str,
    dates: &[&str],
    values: &[f64],
    theme: &Theme,
) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    if values.is_empty() {
        let empty = Paragraph::new(NO_DATA)
            .style(Style::default().fg(theme.muted))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let points = series_points(dates, values);
    let [low, high] = value_bounds(values);
    let first_label = dates.first().copied().unwrap_or_default().to_string();
    let last_label = dates.last().copied().unwrap_or_default().to_string();

    let datasets = vec![Dataset::default()
        .name(name.to_string())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.accent))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.muted))
                .bounds(x_bounds(&points))
                .labels(vec![Span::raw(first_label), Span::raw(last_label)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.muted))
                .bounds([low, high])
                .labels(vec![
                    Span::raw(format!("{low:.0}")),
                    Span::raw(format!("{high:.0}")),
                ]),
        );
    frame.render_widget(chart, area);
}
