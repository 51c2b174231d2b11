use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Mutex;

use trendbot::api::{Exchange, OrderConfirmation};
use trendbot::execution::{CycleRunner, RunConfig, TradeMode};
use trendbot::models::{Candle, CycleOutcome, OrderSide, TradingPair};
use trendbot::strategy::EmaRsiStrategy;
use trendbot::{BotError, Result};

/// In-memory exchange double: serves a fixed candle series and balances,
/// and records every order submission.
struct MockExchange {
    candles: Vec<Candle>,
    quote_balance: f64,
    base_balance: f64,
    credentialed: bool,
    submissions: Mutex<Vec<(OrderSide, String, f64)>>,
}

impl MockExchange {
    fn with_closes(closes: &[f64]) -> Self {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: Utc::now() - Duration::minutes((closes.len() - i) as i64 * 5),
                open: close,
                high: close * 1.001,
                low: close * 0.999,
                close,
                volume: 1000.0,
            })
            .collect();

        Self {
            candles,
            quote_balance: 10_000.0,
            base_balance: 2.0,
            credentialed: true,
            submissions: Mutex::new(Vec::new()),
        }
    }

    fn submissions(&self) -> Vec<(OrderSide, String, f64)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Exchange for MockExchange {
    async fn fetch_candles(
        &self,
        _symbol: &str,
        _timeframe: &str,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        let take = (limit as usize).min(self.candles.len());
        Ok(self.candles[self.candles.len() - take..].to_vec())
    }

    async fn fetch_quote_balance(&self) -> Result<f64> {
        Ok(self.quote_balance)
    }

    async fn fetch_base_balance(&self) -> Result<f64> {
        Ok(self.base_balance)
    }

    fn has_credentials(&self) -> bool {
        self.credentialed
    }

    async fn submit_market_buy(&self, symbol: &str, quantity: f64) -> Result<OrderConfirmation> {
        self.submissions
            .lock()
            .unwrap()
            .push((OrderSide::Buy, symbol.to_string(), quantity));
        Ok(OrderConfirmation {
            order_id: 1001,
            symbol: symbol.to_string(),
            executed_quantity: quantity,
            status: "FILLED".to_string(),
        })
    }

    async fn submit_market_sell(&self, symbol: &str, quantity: f64) -> Result<OrderConfirmation> {
        self.submissions
            .lock()
            .unwrap()
            .push((OrderSide::Sell, symbol.to_string(), quantity));
        Ok(OrderConfirmation {
            order_id: 1002,
            symbol: symbol.to_string(),
            executed_quantity: quantity,
            status: "FILLED".to_string(),
        })
    }
}

fn run_config(mode: TradeMode) -> RunConfig {
    RunConfig {
        pair: TradingPair::parse("BTC/USDT").unwrap(),
        timeframe: "5m".to_string(),
        candle_limit: 100,
        mode,
    }
}

/// Closes rising from 100 to 120 over 30 bars, cooling into two-sided chop
/// at the top so the oscillator stays below the overbought threshold.
fn rising_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..16).map(|i| 100.0 + i as f64 * 20.0 / 15.0).collect();
    let mut price = 120.0;
    for i in 0..14 {
        price += if i % 2 == 0 { -2.0 } else { 2.0 };
        closes.push(price);
    }
    closes
}

/// Closes falling from 120 to 100 over 30 bars.
fn falling_closes() -> Vec<f64> {
    (0..30).map(|i| 120.0 - i as f64 * 20.0 / 29.0).collect()
}

#[tokio::test]
async fn test_uptrend_enters_long_with_risk_sized_quantity() {
    let _ = tracing_subscriber::fmt::try_init();

    let exchange = MockExchange::with_closes(&rising_closes());
    let runner = CycleRunner::new(
        &exchange,
        EmaRsiStrategy::default(),
        run_config(TradeMode::Live),
    );

    let outcome = runner.run_cycle().await.unwrap();

    // price = last close = 120, stop distance = 120 * 0.10 = 12
    // quantity = (10000 * 0.01) / (12 * 120)
    let expected_quantity = 100.0 / (12.0 * 120.0);
    match outcome {
        CycleOutcome::Bought { quantity, price } => {
            assert_eq!(price, 120.0);
            assert!((quantity - expected_quantity).abs() < 1e-12);
        }
        other => panic!("expected a buy, got {other:?}"),
    }

    let submissions = exchange.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0, OrderSide::Buy);
    assert_eq!(submissions[0].1, "BTCUSDT");
}

#[tokio::test]
async fn test_downtrend_exits_long_selling_entire_base_balance() {
    let exchange = MockExchange::with_closes(&falling_closes());
    let runner = CycleRunner::new(
        &exchange,
        EmaRsiStrategy::default(),
        run_config(TradeMode::Live),
    );

    let outcome = runner.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Sold { quantity: 2.0 });

    let submissions = exchange.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0], (OrderSide::Sell, "BTCUSDT".to_string(), 2.0));
}

#[tokio::test]
async fn test_dry_run_reports_decision_without_submitting() {
    let exchange = MockExchange::with_closes(&rising_closes());
    let runner = CycleRunner::new(
        &exchange,
        EmaRsiStrategy::default(),
        run_config(TradeMode::DryRun),
    );

    let outcome = runner.run_cycle().await.unwrap();
    assert!(matches!(outcome, CycleOutcome::Bought { .. }));
    assert!(exchange.submissions().is_empty());
}

#[tokio::test]
async fn test_live_without_credentials_behaves_as_dry_run() {
    let mut exchange = MockExchange::with_closes(&rising_closes());
    exchange.credentialed = false;

    let runner = CycleRunner::new(
        &exchange,
        EmaRsiStrategy::default(),
        run_config(TradeMode::Live),
    );

    let outcome = runner.run_cycle().await.unwrap();
    assert!(matches!(outcome, CycleOutcome::Bought { .. }));
    // The safety fallback: no submit call was made
    assert!(exchange.submissions().is_empty());
}

#[tokio::test]
async fn test_empty_candle_series_is_an_error_not_no_action() {
    let exchange = MockExchange::with_closes(&[]);
    let runner = CycleRunner::new(
        &exchange,
        EmaRsiStrategy::default(),
        run_config(TradeMode::DryRun),
    );

    let result = runner.run_cycle().await;
    assert!(matches!(result, Err(BotError::InsufficientData(_))));
    assert!(exchange.submissions().is_empty());
}

#[tokio::test]
async fn test_cycles_are_independent_and_sequential() {
    let exchange = MockExchange::with_closes(&falling_closes());
    let runner = CycleRunner::new(
        &exchange,
        EmaRsiStrategy::default(),
        run_config(TradeMode::Live),
    );

    // Same data, same decision, one submission per cycle: the runner holds
    // no cross-cycle memory
    for expected_submissions in 1..=3 {
        let outcome = runner.run_cycle().await.unwrap();
        assert_eq!(outcome, CycleOutcome::Sold { quantity: 2.0 });
        assert_eq!(exchange.submissions().len(), expected_submissions);
    }
}

#[tokio::test]
async fn test_zero_quote_balance_buys_zero_quantity() {
    let mut exchange = MockExchange::with_closes(&rising_closes());
    exchange.quote_balance = 0.0;

    let runner = CycleRunner::new(
        &exchange,
        EmaRsiStrategy::default(),
        run_config(TradeMode::DryRun),
    );

    // No capital to risk is a valid outcome, not an error
    let outcome = runner.run_cycle().await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Bought {
            quantity: 0.0,
            price: 120.0
        }
    );
}
