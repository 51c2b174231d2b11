use crate::api::Exchange;
use crate::error::BotError;
use crate::models::{CycleOutcome, OrderIntent, OrderSide, Signal, TradingPair};
use crate::risk::position_size;
use crate::strategy::{evaluate_signal, EmaRsiStrategy};
use crate::Result;

/// How order intents are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeMode {
    /// Log the intent without contacting the exchange
    DryRun,
    /// Submit the intent as a market order
    Live,
}

/// Per-run execution parameters, fixed for all cycles of a run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub pair: TradingPair,
    pub timeframe: String,
    pub candle_limit: u32,
    pub mode: TradeMode,
}

/// Runs one fetch → compute → evaluate → size → dispatch pass
///
/// Cycles are independent: the runner keeps no memory between invocations
/// and re-derives the signal from freshly fetched data every time. A failed
/// step aborts the current cycle with no order sent; retry policy belongs to
/// the caller.
pub struct CycleRunner<'a, E: Exchange> {
    exchange: &'a E,
    strategy: EmaRsiStrategy,
    run: RunConfig,
}

impl<'a, E: Exchange> CycleRunner<'a, E> {
    pub fn new(exchange: &'a E, strategy: EmaRsiStrategy, run: RunConfig) -> Self {
        Self {
            exchange,
            strategy,
            run,
        }
    }

    /// Execute one evaluation cycle, producing exactly one decision
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let symbol = self.run.pair.exchange_symbol();

        let candles = self
            .exchange
            .fetch_candles(&symbol, &self.run.timeframe, self.run.candle_limit)
            .await?;

        let snapshots = self.strategy.annotate(&candles)?;
        let last_snapshot = snapshots
            .last()
            .ok_or_else(|| BotError::InsufficientData("empty candle series".to_string()))?;
        let price = candles
            .last()
            .map(|c| c.close)
            .ok_or_else(|| BotError::InsufficientData("empty candle series".to_string()))?;

        let signal = evaluate_signal(last_snapshot, self.strategy.config())?;
        tracing::info!("{} @ {:.4} → {:?}", self.run.pair, price, signal);

        match signal {
            Signal::EnterLong => {
                let balance = self.exchange.fetch_quote_balance().await?;
                let config = self.strategy.config();
                let stop_distance = price * config.stop_loss_fraction;
                let quantity =
                    position_size(balance, config.risk_fraction, price, stop_distance)?;

                let intent = OrderIntent::new(symbol, OrderSide::Buy, quantity, price);
                self.dispatch(intent).await
            }
            Signal::ExitLong => {
                // Liquidate the entire held base balance
                let quantity = self.exchange.fetch_base_balance().await?;
                let intent = OrderIntent::new(symbol, OrderSide::Sell, quantity, price);
                self.dispatch(intent).await
            }
            Signal::Hold => {
                tracing::info!("No trade signal");
                Ok(CycleOutcome::NoAction)
            }
        }
    }

    /// Send the intent to the exchange, or just report it in dry-run
    ///
    /// Missing credentials force dry-run regardless of the requested mode; a
    /// safety fallback, not an error.
    async fn dispatch(&self, intent: OrderIntent) -> Result<CycleOutcome> {
        let mode = if self.exchange.has_credentials() {
            self.run.mode
        } else {
            if self.run.mode == TradeMode::Live {
                tracing::warn!("No API credentials, falling back to dry-run");
            }
            TradeMode::DryRun
        };

        match (mode, intent.side) {
            (TradeMode::DryRun, OrderSide::Buy) => {
                tracing::info!(
                    "[dry-run] Would buy {:.6} {} @ {:.4}",
                    intent.quantity,
                    intent.symbol,
                    intent.reference_price
                );
                Ok(CycleOutcome::Bought {
                    quantity: intent.quantity,
                    price: intent.reference_price,
                })
            }
            (TradeMode::DryRun, OrderSide::Sell) => {
                tracing::info!(
                    "[dry-run] Would sell {:.6} {} @ {:.4}",
                    intent.quantity,
                    intent.symbol,
                    intent.reference_price
                );
                Ok(CycleOutcome::Sold {
                    quantity: intent.quantity,
                })
            }
            (TradeMode::Live, OrderSide::Buy) => {
                let confirmation = self
                    .exchange
                    .submit_market_buy(&intent.symbol, intent.quantity)
                    .await?;
                tracing::info!(
                    "✓ Placed buy order {} for {:.6} {}",
                    confirmation.order_id,
                    confirmation.executed_quantity,
                    confirmation.symbol
                );
                Ok(CycleOutcome::Bought {
                    quantity: confirmation.executed_quantity,
                    price: intent.reference_price,
                })
            }
            (TradeMode::Live, OrderSide::Sell) => {
                let confirmation = self
                    .exchange
                    .submit_market_sell(&intent.symbol, intent.quantity)
                    .await?;
                tracing::info!(
                    "✓ Placed sell order {} for {:.6} {}",
                    confirmation.order_id,
                    confirmation.executed_quantity,
                    confirmation.symbol
                );
                Ok(CycleOutcome::Sold {
                    quantity: confirmation.executed_quantity,
                })
            }
        }
    }
}
