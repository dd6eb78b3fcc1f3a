use chrono::DateTime;

/// Index of the first bar whose UTC calendar day, rendered as `YYYY-MM-DD`,
/// equals `gap_date`.
///
/// Matching is on the day string, never on raw timestamps, so any intraday
/// offset in a bar's time is irrelevant.
#[must_use]
pub fn locate_gap(times: &[i64], gap_date: &str) -> Option<usize> {
    let wanted = gap_date.trim();
    times.iter().position(|&t| {
        DateTime::from_timestamp(t, 0)
            .is_some_and(|dt| dt.date_naive().format("%Y-%m-%d").to_string() == wanted)
    })
}

/// Inclusive `[index - radius, index + radius]` clamped to `0..len`.
///
/// `len` must be non-zero and `index < len`.
#[must_use]
pub fn focus_window(index: usize, len: usize, radius: usize) -> (usize, usize) {
    let last = len.saturating_sub(1);
    let start = index.saturating_sub(radius);
    let end = index.saturating_add(radius).min(last);
    (start, end)
}
