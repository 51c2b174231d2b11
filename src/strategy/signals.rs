use crate::error::BotError;
use crate::indicators::IndicatorSnapshot;
use crate::models::Signal;

/// Per-run strategy configuration
///
/// Immutable once validated; every component receives it explicitly instead
/// of reading shared mutable state.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub oscillator_period: usize,
    /// Entries are blocked once the oscillator reads at or above this
    pub overbought_threshold: f64,
    /// Exits trigger once the oscillator reads above this
    pub oversold_exit_threshold: f64,
    /// Stop distance as a fraction of entry price, in (0, 1)
    pub stop_loss_fraction: f64,
    /// Fraction of quote balance risked per trade, in (0, 1]
    pub risk_fraction: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            oscillator_period: 14,
            overbought_threshold: 70.0,
            oversold_exit_threshold: 80.0,
            stop_loss_fraction: 0.10,
            risk_fraction: 0.01,
        }
    }
}

impl StrategyConfig {
    /// Check the configuration invariants
    ///
    /// # Errors
    /// `InvalidInput` naming the violated constraint.
    pub fn validate(&self) -> crate::Result<()> {
        if self.fast_period < 1 || self.slow_period < 1 || self.oscillator_period < 1 {
            return Err(BotError::InvalidInput(
                "indicator periods must be >= 1".to_string(),
            ));
        }
        if self.fast_period >= self.slow_period {
            return Err(BotError::InvalidInput(format!(
                "fast period ({}) must be smaller than slow period ({})",
                self.fast_period, self.slow_period
            )));
        }
        if !(self.risk_fraction > 0.0 && self.risk_fraction <= 1.0) {
            return Err(BotError::InvalidInput(format!(
                "risk fraction must be in (0, 1], got {}",
                self.risk_fraction
            )));
        }
        if !(self.stop_loss_fraction > 0.0 && self.stop_loss_fraction < 1.0) {
            return Err(BotError::InvalidInput(format!(
                "stop-loss fraction must be in (0, 1), got {}",
                self.stop_loss_fraction
            )));
        }
        Ok(())
    }
}

/// Convert the latest indicator snapshot into a trade signal
///
/// Enter long on a fast-over-slow trend that is not yet overbought; exit
/// long on a trend flip or an overextended oscillator. When a threshold
/// configuration makes both clauses true, the exit wins: the bot prefers
/// closing risk over opening it.
///
/// # Errors
/// `IndeterminateSignal` if any snapshot field is undefined, which means the
/// caller evaluated warm-up-only data.
pub fn evaluate_signal(
    snapshot: &IndicatorSnapshot,
    config: &StrategyConfig,
) -> crate::Result<Signal> {
    let oscillator = snapshot.oscillator.ok_or_else(|| {
        BotError::IndeterminateSignal("oscillator undefined on warm-up data".to_string())
    })?;

    if !snapshot.ema_fast.is_finite() || !snapshot.ema_slow.is_finite() || !oscillator.is_finite()
    {
        return Err(BotError::IndeterminateSignal(
            "indicator values are not finite".to_string(),
        ));
    }

    let exit_long = snapshot.ema_fast < snapshot.ema_slow
        || oscillator > config.oversold_exit_threshold;
    let enter_long =
        snapshot.ema_fast > snapshot.ema_slow && oscillator < config.overbought_threshold;

    let signal = if exit_long {
        Signal::ExitLong
    } else if enter_long {
        Signal::EnterLong
    } else {
        Signal::Hold
    };

    tracing::debug!(
        "Indicators: EMA fast={:.4}, EMA slow={:.4}, Osc={:.1} → {:?}",
        snapshot.ema_fast,
        snapshot.ema_slow,
        oscillator,
        signal
    );

    Ok(signal)
}
