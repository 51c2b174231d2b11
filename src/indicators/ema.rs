/// Calculate an Exponential Moving Average series
///
/// Seeded with the first price, then `ema[i] = ema[i-1] + factor * (price[i]
/// - ema[i-1])` with `factor = 2 / (period + 1)`. Defined from the first
/// element onward; values before `period` observations are numerically
/// unstable and callers must not treat them as signal-grade.
pub fn ema_series(prices: &[f64], period: usize) -> Vec<f64> {
    if prices.is_empty() {
        return Vec::new();
    }

    let factor = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(prices.len());

    let mut ema = prices[0];
    out.push(ema);

    for &price in &prices[1..] {
        ema += factor * (price - ema);
        out.push(ema);
    }

    out
}
