use ratatui::style::Color;

use crate::views::{SalesSeries, SeriesPoint};

/// Inner hole proportion of the donut chart, as a fraction of the radius.
pub const DONUT_HOLE: f64 = 0.3;

/// Slice colors, assigned to regions in series order and reused cyclically.
pub const SLICE_COLORS: &[Color] = &[
    Color::Rgb(80, 160, 245),
    Color::Rgb(80, 220, 100),
    Color::Rgb(245, 180, 60),
    Color::Rgb(235, 90, 90),
    Color::Rgb(170, 110, 240),
    Color::Rgb(70, 200, 200),
    Color::Rgb(230, 120, 190),
    Color::Rgb(160, 160, 160),
];

/// Pick round y-axis tick values (top and mid) given a max data value.
pub fn y_axis_ticks(max_val: f64) -> (f64, f64) {
    // Round steps: 100, 250, 500, 1k, 2.5k, 5k, 10k, ...
    let steps = [
        100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 25000.0, 50000.0, 100000.0,
        250000.0, 500000.0, 1000000.0, 2500000.0, 5000000.0, 10000000.0,
    ];
    let top = steps
        .iter()
        .copied()
        .find(|&s| s >= max_val)
        .unwrap_or(max_val);
    (top, top / 2.0)
}

/// Format a dollar amount as compact "$Xk" / "$X.Xk" / "$XM" for axis labels.
pub fn format_k(val: f64) -> String {
    if val >= 1_000_000.0 {
        let m = val / 1_000_000.0;
        if m == m.floor() {
            format!("${}M", m as u64)
        } else {
            format!("${m:.1}M")
        }
    } else if val >= 1000.0 {
        let k = val / 1000.0;
        if k == k.floor() {
            format!("${}k", k as u64)
        } else {
            format!("${k:.1}k")
        }
    } else {
        format!("${}", val as u64)
    }
}

// ---------------------------------------------------------------------------
// Donut geometry
// ---------------------------------------------------------------------------

pub struct DonutSlice<'a> {
    pub point: &'a SeriesPoint,
    pub share: f64,
    /// Angular extent in degrees, clockwise from 12 o'clock.
    pub start_deg: f64,
    pub end_deg: f64,
    pub color: Color,
}

/// Split a series into donut slices proportional to each value's share of
/// the total. Non-positive totals produce no slices.
pub fn donut_slices(series: &SalesSeries) -> Vec<DonutSlice<'_>> {
    if series.total <= 0.0 {
        return Vec::new();
    }
    let mut slices = Vec::with_capacity(series.points.len());
    let mut start = 0.0f64;
    for (i, point) in series.points.iter().enumerate() {
        let share = (point.value / series.total).max(0.0);
        let end = start + share * 360.0;
        slices.push(DonutSlice {
            point,
            share,
            start_deg: start,
            end_deg: end,
            color: SLICE_COLORS[i % SLICE_COLORS.len()],
        });
        start = end;
    }
    slices
}

/// X-axis labels for the line chart: first, middle, and last month keys.
pub fn time_axis_labels(points: &[SeriesPoint]) -> Vec<String> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![points[0].key.clone()],
        2 => vec![points[0].key.clone(), points[1].key.clone()],
        n => vec![
            points[0].key.clone(),
            points[n / 2].key.clone(),
            points[n - 1].key.clone(),
        ],
    }
}
