pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::ema;
pub use macd::{macd, MacdOutput};
pub use rsi::{rsi, RsiOutput, Wilder};
pub use sma::sma;

/// Errors from indicator computation. All are argument problems detected
/// before any computation is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("window {window} is invalid for input of length {len}")]
    InvalidWindow { window: usize, len: usize },
    #[error("fast period {fast} must be less than slow period {slow}")]
    PeriodOrder { fast: usize, slow: usize },
    #[error("need at least {needed} data points, got {got}")]
    InsufficientData { needed: usize, got: usize },
}
