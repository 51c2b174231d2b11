use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;

use super::{Exchange, OrderConfirmation};
use crate::error::ExchangeError;
use crate::models::{Candle, TradingPair};
use crate::Result;

// Binance spot REST API
// Docs: https://github.com/binance/binance-spot-api-docs
const BINANCE_API_BASE: &str = "https://api.binance.com";

/// API key pair for signed endpoints
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

/// Client for the Binance spot REST API
///
/// Public market data works without credentials. Balance reads on an
/// unauthenticated client report 0.0 (nothing to risk) so dry runs without
/// keys still complete; order submission without keys is rejected locally.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    pair: TradingPair,
    credentials: Option<Credentials>,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    balances: Vec<BalanceEntry>,
}

#[derive(Debug, Deserialize)]
struct BalanceEntry {
    asset: String,
    free: String,
    #[allow(dead_code)]
    locked: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResponse {
    symbol: String,
    order_id: i64,
    executed_qty: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

impl BinanceClient {
    pub fn new(pair: TradingPair, credentials: Option<Credentials>) -> Self {
        Self {
            client: Client::new(),
            base_url: BINANCE_API_BASE.to_string(),
            pair,
            credentials,
        }
    }

    /// Build a client with credentials from `API_KEY` / `API_SECRET` env vars
    /// (unauthenticated when either is missing)
    pub fn from_env(pair: TradingPair) -> Self {
        let credentials = match (std::env::var("API_KEY"), std::env::var("API_SECRET")) {
            (Ok(api_key), Ok(api_secret)) => Some(Credentials {
                api_key,
                api_secret,
            }),
            _ => None,
        };
        Self::new(pair, credentials)
    }

    /// Point the client at a different host (testnet, mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// HMAC-SHA256 signature over the query string, hex encoded
    fn sign(&self, query: &str) -> std::result::Result<String, ExchangeError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ExchangeError::MissingCredentials("signed request"))?;

        let mut mac = Hmac::<Sha256>::new_from_slice(credentials.api_secret.as_bytes())
            .map_err(|e| ExchangeError::Malformed(format!("unusable API secret: {e}")))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn api_key(&self) -> std::result::Result<&str, ExchangeError> {
        self.credentials
            .as_ref()
            .map(|c| c.api_key.as_str())
            .ok_or(ExchangeError::MissingCredentials("signed request"))
    }

    /// Decode a response, mapping non-2xx answers to `ExchangeError::Api`
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> std::result::Result<T, ExchangeError> {
        if response.status().is_success() {
            return Ok(response.json().await?);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => Err(ExchangeError::Api {
                code: err.code,
                message: err.msg,
            }),
            Err(_) => Err(ExchangeError::Api {
                code: status.as_u16() as i64,
                message: body,
            }),
        }
    }

    async fn fetch_free_balance(&self, asset: &str) -> Result<f64> {
        if self.credentials.is_none() {
            tracing::debug!("No credentials, reporting zero {} balance", asset);
            return Ok(0.0);
        }

        let query = format!("timestamp={}", Utc::now().timestamp_millis());
        let signature = self.sign(&query)?;
        let url = format!(
            "{}/api/v3/account?{}&signature={}",
            self.base_url, query, signature
        );

        let response = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", self.api_key()?)
            .send()
            .await
            .map_err(ExchangeError::from)?;
        let account: AccountResponse = Self::decode(response).await?;

        let free = account
            .balances
            .iter()
            .find(|b| b.asset == asset)
            .map(|b| b.free.parse::<f64>())
            .transpose()
            .map_err(|e| ExchangeError::Malformed(format!("unparseable balance: {e}")))?
            .unwrap_or(0.0);

        Ok(free)
    }

    async fn submit_market_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: f64,
    ) -> Result<OrderConfirmation> {
        let query = format!(
            "symbol={}&side={}&type=MARKET&quantity={}&timestamp={}",
            symbol,
            side,
            quantity,
            Utc::now().timestamp_millis()
        );
        let signature = self.sign(&query)?;
        let url = format!(
            "{}/api/v3/order?{}&signature={}",
            self.base_url, query, signature
        );

        let response = self
            .client
            .post(&url)
            .header("X-MBX-APIKEY", self.api_key()?)
            .send()
            .await
            .map_err(ExchangeError::from)?;
        let order: OrderResponse = Self::decode(response).await?;

        let executed_quantity = order
            .executed_qty
            .parse::<f64>()
            .map_err(|e| ExchangeError::Malformed(format!("unparseable executedQty: {e}")))?;

        Ok(OrderConfirmation {
            order_id: order.order_id,
            symbol: order.symbol,
            executed_quantity,
            status: order.status,
        })
    }
}

/// Pull one numeric field out of a kline row, where Binance encodes prices
/// as JSON strings
fn kline_f64(row: &[serde_json::Value], index: usize) -> std::result::Result<f64, ExchangeError> {
    let value = row
        .get(index)
        .ok_or_else(|| ExchangeError::Malformed(format!("kline row missing field {index}")))?;
    match value {
        serde_json::Value::String(s) => s
            .parse()
            .map_err(|e| ExchangeError::Malformed(format!("kline field {index}: {e}"))),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ExchangeError::Malformed(format!("kline field {index} not an f64"))),
        other => Err(ExchangeError::Malformed(format!(
            "kline field {index} has unexpected type: {other}"
        ))),
    }
}

#[async_trait]
impl Exchange for BinanceClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url, symbol, timeframe, limit
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ExchangeError::from)?;
        let rows: Vec<Vec<serde_json::Value>> = Self::decode(response).await?;

        let mut candles = Vec::with_capacity(rows.len());
        for row in &rows {
            let open_time = row
                .first()
                .and_then(|v| v.as_i64())
                .ok_or_else(|| ExchangeError::Malformed("kline missing open time".to_string()))?;
            let timestamp = Utc
                .timestamp_millis_opt(open_time)
                .single()
                .ok_or_else(|| {
                    ExchangeError::Malformed(format!("kline open time out of range: {open_time}"))
                })?;

            candles.push(Candle {
                timestamp,
                open: kline_f64(row, 1)?,
                high: kline_f64(row, 2)?,
                low: kline_f64(row, 3)?,
                close: kline_f64(row, 4)?,
                volume: kline_f64(row, 5)?,
            });
        }

        Ok(candles)
    }

    async fn fetch_quote_balance(&self) -> Result<f64> {
        self.fetch_free_balance(&self.pair.quote).await
    }

    async fn fetch_base_balance(&self) -> Result<f64> {
        self.fetch_free_balance(&self.pair.base).await
    }

    fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    async fn submit_market_buy(&self, symbol: &str, quantity: f64) -> Result<OrderConfirmation> {
        self.submit_market_order(symbol, "BUY", quantity).await
    }

    async fn submit_market_sell(&self, symbol: &str, quantity: f64) -> Result<OrderConfirmation> {
        self.submit_market_order(symbol, "SELL", quantity).await
    }
}
