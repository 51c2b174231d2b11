/// Calculate a Relative Strength Index series
///
/// Per-step deltas are split into gains (`max(delta, 0)`) and losses
/// (`max(-delta, 0)`), each smoothed exponentially with `alpha = 1 / period`
/// (the `com = period - 1` convention), seeded with the first gain/loss.
/// `rsi = 100 - 100 / (1 + avg_gain / avg_loss)`.
///
/// The value at index 0 is undefined (no delta yet) and returned as `None`.
/// A window with no losses yields 100.0 rather than a division error.
pub fn rsi_series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }

    out.push(None);

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, window) in prices.windows(2).enumerate() {
        let delta = window[1] - window[0];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain += alpha * (gain - avg_gain);
            avg_loss += alpha * (loss - avg_loss);
        }

        let rsi = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
        out.push(Some(rsi));
    }

    out
}
