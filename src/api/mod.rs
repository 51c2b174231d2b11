// Exchange connectivity module
pub mod binance;

pub use binance::{BinanceClient, Credentials};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::Candle;
use crate::Result;

/// Confirmation returned by the exchange for a filled market order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: i64,
    pub symbol: String,
    pub executed_quantity: f64,
    pub status: String,
}

/// The market-data / order-routing collaborator
///
/// One implementation talks to a real venue; tests drive the cycle
/// controller with an in-memory double. Any locking around a shared
/// connection is the implementor's concern; callers run one cycle at a time.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Fetch up to `limit` most recent candles, oldest first
    async fn fetch_candles(&self, symbol: &str, timeframe: &str, limit: u32)
        -> Result<Vec<Candle>>;

    /// Free balance of the quote asset (the capital available to risk)
    async fn fetch_quote_balance(&self) -> Result<f64>;

    /// Free balance of the base asset (the position that a sell liquidates)
    async fn fetch_base_balance(&self) -> Result<f64>;

    /// Whether authenticated endpoints can be used; when false, dispatch
    /// falls back to dry-run regardless of the requested mode
    fn has_credentials(&self) -> bool;

    async fn submit_market_buy(&self, symbol: &str, quantity: f64) -> Result<OrderConfirmation>;

    async fn submit_market_sell(&self, symbol: &str, quantity: f64) -> Result<OrderConfirmation>;
}
