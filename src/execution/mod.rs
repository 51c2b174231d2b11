// Trade execution module
pub mod cycle;

pub use cycle::{CycleRunner, RunConfig, TradeMode};
