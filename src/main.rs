use anyhow::Context;
use clap::Parser;

use trendbot::api::BinanceClient;
use trendbot::execution::{CycleRunner, RunConfig, TradeMode};
use trendbot::models::TradingPair;
use trendbot::strategy::{EmaRsiStrategy, StrategyConfig};
use trendbot::CycleOutcome;

/// EMA/RSI trading bot for a single symbol
///
/// Runs one or more evaluation cycles against Binance spot. Without API
/// keys (or with --dry-run) it only prints the orders it would place.
#[derive(Debug, Parser)]
#[command(name = "trendbot", version)]
struct Cli {
    /// Trading pair to operate on
    #[arg(long, default_value = "BTC/USDT")]
    symbol: String,

    /// Candlestick timeframe
    #[arg(long, default_value = "5m")]
    timeframe: String,

    /// Risk fraction per trade, in (0, 1]
    #[arg(long, default_value_t = 0.01)]
    risk: f64,

    /// Number of candles to fetch
    #[arg(long, default_value_t = 100)]
    limit: u32,

    /// Print orders instead of executing them
    #[arg(long)]
    dry_run: bool,

    /// Number of cycles to run
    #[arg(long, default_value_t = 1)]
    cycles: u32,
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trendbot=info".into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();

    let pair = TradingPair::parse(&cli.symbol).context("invalid --symbol")?;
    let strategy_config = StrategyConfig {
        risk_fraction: cli.risk,
        ..Default::default()
    };
    let strategy = EmaRsiStrategy::new(strategy_config).context("invalid strategy config")?;

    let exchange = BinanceClient::from_env(pair.clone());

    let mode = if cli.dry_run {
        TradeMode::DryRun
    } else {
        TradeMode::Live
    };

    tracing::info!(
        "🚀 trendbot starting: {} {} ({} candles, risk {:.2}%, {:?}, {} cycle(s))",
        pair,
        cli.timeframe,
        cli.limit,
        cli.risk * 100.0,
        mode,
        cli.cycles
    );

    let run = RunConfig {
        pair,
        timeframe: cli.timeframe.clone(),
        candle_limit: cli.limit,
        mode,
    };
    let runner = CycleRunner::new(&exchange, strategy, run);

    // Strictly sequential: order submission must settle before the next
    // cycle reads balances
    for cycle in 1..=cli.cycles {
        match runner.run_cycle().await {
            Ok(CycleOutcome::Bought { quantity, price }) => {
                tracing::info!("[{}/{}] Bought {:.6} @ {:.4}", cycle, cli.cycles, quantity, price);
            }
            Ok(CycleOutcome::Sold { quantity }) => {
                tracing::info!("[{}/{}] Sold {:.6}", cycle, cli.cycles, quantity);
            }
            Ok(CycleOutcome::NoAction) => {
                tracing::info!("[{}/{}] No action", cycle, cli.cycles);
            }
            Err(e) => {
                // A failed cycle does not abort the remaining ones
                tracing::error!("[{}/{}] Cycle failed: {}", cycle, cli.cycles, e);
            }
        }
    }

    Ok(())
}
