use gapscope_core::{GapRow, SearchParams};

// (ticker, date, gap %, return %, closed red)
const ROWS: &[(Option<&str>, Option<&str>, Option<f64>, Option<f64>, bool)] = &[
    (Some("ABCD"), Some("2024-03-05"), Some(42.5), Some(-18.3), true),
    (Some("WXYZ"), Some("2024-03-05"), Some(118.0), Some(12.1), false),
    (Some("ABCD"), Some("2024-01-16"), Some(65.2), Some(-30.4), true),
    (Some("QRST"), Some("2024-02-20"), Some(33.3), None, false),
    (Some("FAIL"), Some("2024-02-01"), Some(25.0), Some(-5.0), true),
    (Some("NODT"), None, Some(20.0), Some(1.0), false),
];

/// Rows matching the set filters, in fixture order.
pub fn search(params: &SearchParams) -> Vec<GapRow> {
    let ticker = params
        .ticker
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let date = params.date.as_deref().map(str::trim).filter(|d| !d.is_empty());

    ROWS.iter()
        .filter(|(t, ..)| ticker.is_none_or(|want| t.is_some_and(|t| t.eq_ignore_ascii_case(want))))
        .filter(|(_, d, ..)| date.is_none_or(|want| *d == Some(want)))
        .map(|&(t, d, gap, ret, red)| GapRow {
            ticker: t.map(str::to_string),
            date: d.map(str::to_string),
            gap_percent: gap,
            return_percent: ret,
            did_close_red: Some(red),
            start_chart_date: d.map(str::to_string),
            end_chart_date: d.map(str::to_string),
            ..GapRow::default()
        })
        .collect()
}

/// Gap size on a fixture gap day, if `date` is one for `ticker`.
pub fn gap_on(ticker: &str, date: &str) -> Option<(f64, f64)> {
    ROWS.iter().find_map(|&(t, d, gap, ret, _)| {
        (t == Some(ticker) && d == Some(date)).then(|| (gap.unwrap_or(0.0), ret.unwrap_or(0.0)))
    })
}
