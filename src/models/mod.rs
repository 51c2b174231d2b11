use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BotError;

/// OHLCV candlestick data for one bar
///
/// Candles arrive as an ordered, append-only series with strictly
/// increasing timestamps; the core never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A trading pair like BTC/USDT
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl TradingPair {
    /// Parse a `BASE/QUOTE` pair string (e.g. "BTC/USDT")
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s.split_once('/') {
            Some((base, quote)) if !base.is_empty() && !quote.is_empty() => Ok(Self {
                base: base.to_uppercase(),
                quote: quote.to_uppercase(),
            }),
            _ => Err(BotError::InvalidInput(format!(
                "symbol must be BASE/QUOTE, got '{s}'"
            ))),
        }
    }

    /// Symbol in the exchange's concatenated form (e.g. "BTCUSDT")
    pub fn exchange_symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl std::fmt::Display for TradingPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Trading signal for one evaluation cycle
///
/// Exactly one value per cycle; the evaluator never emits entry and exit
/// at the same time (exit takes precedence).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Signal {
    EnterLong,
    ExitLong,
    Hold,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

/// An order the bot intends to place
///
/// Constructed only for EnterLong/ExitLong signals, immutable once built,
/// and consumed exactly once by dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIntent {
    pub client_order_id: Uuid,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    pub reference_price: f64,
}

impl OrderIntent {
    pub fn new(symbol: String, side: OrderSide, quantity: f64, reference_price: f64) -> Self {
        Self {
            client_order_id: Uuid::new_v4(),
            symbol,
            side,
            quantity,
            reference_price,
        }
    }
}

/// Terminal outcome of one evaluation cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Bought { quantity: f64, price: f64 },
    Sold { quantity: f64 },
    NoAction,
}
