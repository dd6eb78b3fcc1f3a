use crate::DailyBar;

/// Typical price of a bar: `(high + low + close) / 3`.
#[must_use]
pub fn typical_price(bar: &DailyBar) -> f64 {
    (bar.high + bar.low + bar.close) / 3.0
}

/// Running Volume-Weighted Average Price.
///
/// `vwap[i] = Σ(tp[0..=i] * vol[0..=i]) / Σ(vol[0..=i])`. The output is aligned
/// with `bars`; an entry is `None` while the cumulative volume is still zero.
#[must_use]
pub fn running_vwap(bars: &[DailyBar]) -> Vec<Option<f64>> {
    bars.iter()
        .scan((0.0_f64, 0.0_f64), |(cum_pv, cum_vol), bar| {
            *cum_pv += typical_price(bar) * bar.volume;
            *cum_vol += bar.volume;
            let out = if *cum_vol > 0.0 {
                Some(*cum_pv / *cum_vol)
            } else {
                None
            };
            Some(out)
        })
        .collect()
}

/// Exponential Moving Average seeded with the first value.
///
/// `k = 2 / (period + 1)`, `ema[0] = values[0]`,
/// `ema[i] = (values[i] - ema[i-1]) * k + ema[i-1]`. Every index carries a
/// value; there is no warm-up window. A `period` of zero yields an empty vector.
#[must_use]
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };
    if period == 0 {
        return Vec::new();
    }
    let k = 2.0 / (period as f64 + 1.0);

    values
        .iter()
        .enumerate()
        .scan(seed, move |prev, (i, &v)| {
            if i > 0 {
                *prev = (v - *prev) * k + *prev;
            }
            Some(*prev)
        })
        .collect()
}
