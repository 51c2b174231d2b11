// Trading strategy module
pub mod ema_rsi;
pub mod signals;

pub use ema_rsi::EmaRsiStrategy;
pub use signals::{evaluate_signal, StrategyConfig};

use crate::models::{Candle, Signal};
use crate::Result;

/// Base trait for all trading strategies
pub trait Strategy: Send + Sync {
    /// Generate a trading signal based on market data
    fn generate_signal(&self, candles: &[Candle]) -> Result<Signal>;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Candles needed before indicator values are signal-grade
    fn min_candles_required(&self) -> usize;
}
