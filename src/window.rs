use chrono::{Datelike, Months, NaiveDate};

use crate::model::{OhlcvPoint, TimeWindow};

/// Select the slice of `points` that falls inside `window`.
///
/// The input is stable-sorted ascending by date first (ties keep their input
/// order), so callers may hand over history in any order. Calendar windows are
/// anchored at the latest date in the data and are inclusive on both ends, with
/// the window start normalized to the first day of its month. Invalid requests
/// (empty history, zero point count) return an empty slice and are logged,
/// never surfaced.
pub fn filter(points: &[OhlcvPoint], window: TimeWindow) -> Vec<OhlcvPoint> {
    if points.is_empty() {
        tracing::debug!(%window, "no history to filter");
        return Vec::new();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let months = match window {
        TimeWindow::OneMonth => 1,
        TimeWindow::ThreeMonths => 3,
        TimeWindow::SixMonths => 6,
        TimeWindow::OneYear => 12,
        TimeWindow::LastPoints(count) => return take_last(sorted, count),
    };

    // Sorted and non-empty, so the anchor is the last element.
    let end = sorted[sorted.len() - 1].date;
    let Some(start) = window_start(end, months) else {
        tracing::warn!(%window, %end, "calendar window start out of range");
        return Vec::new();
    };

    sorted
        .into_iter()
        .filter(|p| p.date >= start && p.date <= end)
        .collect()
}

fn take_last(sorted: Vec<OhlcvPoint>, count: usize) -> Vec<OhlcvPoint> {
    if count == 0 {
        tracing::warn!("point-count window must be positive, returning empty slice");
        return Vec::new();
    }
    let skip = sorted.len().saturating_sub(count);
    sorted.into_iter().skip(skip).collect()
}

fn window_start(end: NaiveDate, months: u32) -> Option<NaiveDate> {
    end.checked_sub_months(Months::new(months))?.with_day(1)
}
