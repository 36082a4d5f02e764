use crate::ema::ema;
use crate::IndicatorError;
use serde::Serialize;

pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_FAST: usize = 12;

/// Fast/slow EMA pair and their difference. Every series has the same
/// length as the input prices (via the EMA flat-fill behavior).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdOutput {
    pub ema_slow: Vec<f64>,
    pub ema_fast: Vec<f64>,
    /// `macd[i] = ema_fast[i] - ema_slow[i]`.
    pub macd: Vec<f64>,
}

/// MACD from a fast and a slow exponential moving average.
///
/// The fast period must be strictly less than the slow period for the
/// difference to carry a meaningful signal.
pub fn macd(prices: &[f64], slow: usize, fast: usize) -> Result<MacdOutput, IndicatorError> {
    if fast >= slow {
        return Err(IndicatorError::PeriodOrder { fast, slow });
    }
    let ema_slow = ema(prices, slow)?;
    let ema_fast = ema(prices, fast)?;
    let macd = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    Ok(MacdOutput {
        ema_slow,
        ema_fast,
        macd,
    })
}
