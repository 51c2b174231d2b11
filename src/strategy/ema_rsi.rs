use super::{signals::evaluate_signal, Strategy, StrategyConfig};
use crate::error::BotError;
use crate::indicators::{compute_snapshots, IndicatorSnapshot};
use crate::models::{Candle, Signal};
use crate::Result;

/// EMA crossover strategy with an RSI filter
///
/// Enters long when the fast EMA is above the slow EMA and the oscillator is
/// not overbought; exits on a trend flip or an overextended oscillator.
/// Stateless across cycles: indicators are recomputed from the full candle
/// series on every evaluation.
#[derive(Debug, Clone)]
pub struct EmaRsiStrategy {
    config: StrategyConfig,
}

impl EmaRsiStrategy {
    pub fn new(config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Annotate the candle series with one indicator snapshot per position
    pub fn annotate(&self, candles: &[Candle]) -> Result<Vec<IndicatorSnapshot>> {
        compute_snapshots(candles, &self.config)
    }
}

impl Default for EmaRsiStrategy {
    fn default() -> Self {
        Self {
            config: StrategyConfig::default(),
        }
    }
}

impl Strategy for EmaRsiStrategy {
    fn generate_signal(&self, candles: &[Candle]) -> Result<Signal> {
        let snapshots = self.annotate(candles)?;
        let last = snapshots
            .last()
            .ok_or_else(|| BotError::InsufficientData("empty candle series".to_string()))?;
        evaluate_signal(last, &self.config)
    }

    fn name(&self) -> &str {
        "EmaRsiStrategy"
    }

    fn min_candles_required(&self) -> usize {
        self.config.slow_period
    }
}
