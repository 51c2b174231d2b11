// Technical indicators module
pub mod ema;
pub mod rsi;

pub use ema::ema_series;
pub use rsi::rsi_series;

use crate::error::BotError;
use crate::models::Candle;
use crate::strategy::StrategyConfig;

/// Indicator values derived for one candle position
///
/// The EMAs are defined from the first candle onward; the oscillator needs
/// at least one price delta and is `None` at position 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub oscillator: Option<f64>,
}

/// Compute one snapshot per candle, aligned by position
///
/// Recomputed fresh each cycle from the full series; deterministic for a
/// given input and config.
///
/// # Errors
/// `InsufficientData` when the candle series is empty. Degenerate values at
/// the start of the series are representable, not errors.
pub fn compute_snapshots(
    candles: &[Candle],
    config: &StrategyConfig,
) -> crate::Result<Vec<IndicatorSnapshot>> {
    if candles.is_empty() {
        return Err(BotError::InsufficientData(
            "empty candle series".to_string(),
        ));
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let fast = ema_series(&closes, config.fast_period);
    let slow = ema_series(&closes, config.slow_period);
    let oscillator = rsi_series(&closes, config.oscillator_period);

    let snapshots = fast
        .into_iter()
        .zip(slow)
        .zip(oscillator)
        .map(|((ema_fast, ema_slow), oscillator)| IndicatorSnapshot {
            ema_fast,
            ema_slow,
            oscillator,
        })
        .collect();

    Ok(snapshots)
}
