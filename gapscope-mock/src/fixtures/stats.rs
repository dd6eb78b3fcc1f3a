use gapscope_core::TickerStats;

pub fn by_ticker(ticker: &str) -> Option<TickerStats> {
    let (total_gaps, chance_to_close_red) = match ticker {
        "ABCD" => (12, 0.75),
        "WXYZ" => (4, 0.25),
        "QRST" => (7, 4.0 / 7.0),
        _ => return None,
    };
    Some(TickerStats {
        total_gaps,
        chance_to_close_red,
    })
}
