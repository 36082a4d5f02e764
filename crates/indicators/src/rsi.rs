use crate::IndicatorError;
use serde::Serialize;

pub const DEFAULT_PERIOD: usize = 14;

/// Wilder smoothing state: exponential averages of gains and losses with
/// decay factor `(n - 1) / n`.
///
/// The computation has two phases. SEEDING derives the initial averages
/// from one window of deltas ([`seed`](Self::seed)); SMOOTHING folds the
/// remaining deltas through [`step`](Self::step) one at a time. Steps are
/// path-dependent, so they must be applied in strict index order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wilder {
    up: f64,
    down: f64,
    n: usize,
}

impl Wilder {
    /// Seed the averages with the simple means of the gains and losses in
    /// the first `n` deltas. Callers guarantee `deltas.len() >= n`.
    pub fn seed(deltas: &[f64], n: usize) -> Self {
        let mut up = 0.0;
        let mut down = 0.0;
        for &d in &deltas[..n] {
            if d > 0.0 {
                up += d;
            } else {
                down -= d;
            }
        }
        Self {
            up: up / n as f64,
            down: down / n as f64,
            n,
        }
    }

    /// Fold in the next delta and return the RSI value at that point.
    pub fn step(&mut self, delta: f64) -> f64 {
        let (upval, downval) = if delta > 0.0 {
            (delta, 0.0)
        } else {
            (0.0, -delta)
        };
        let n = self.n as f64;
        self.up = (self.up * (n - 1.0) + upval) / n;
        self.down = (self.down * (n - 1.0) + downval) / n;
        self.value()
    }

    /// RSI implied by the current averages.
    ///
    /// A zero loss average means maximal relative strength: RSI is pinned
    /// to exactly 100 instead of dividing by zero. This covers the flat
    /// market (both averages zero) as well.
    pub fn value(&self) -> f64 {
        if self.down == 0.0 {
            100.0
        } else {
            let rs = self.up / self.down;
            100.0 - 100.0 / (1.0 + rs)
        }
    }

    /// Current smoothed gain average.
    pub fn up(&self) -> f64 {
        self.up
    }

    /// Current smoothed loss average.
    pub fn down(&self) -> f64 {
        self.down
    }
}

/// Full RSI output for one price series. All four vectors have the same
/// length as the input prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiOutput {
    /// RSI per price; the first `n` entries all carry the seed-derived
    /// value (one coarse estimate, not a per-day backfill).
    pub rsi: Vec<f64>,
    /// First difference of the prices with a leading 0.0.
    pub price_deltas: Vec<f64>,
    /// Zeros except the last entry, which holds the terminal smoothed
    /// gain average (continuation snapshot).
    pub final_up: Vec<f64>,
    /// Zeros except the last entry, which holds the terminal smoothed
    /// loss average.
    pub final_down: Vec<f64>,
}

/// Wilder's smoothed relative-strength index over `prices` with period `n`.
///
/// Needs at least `n + 1` prices (`n` deltas to seed).
pub fn rsi(prices: &[f64], n: usize) -> Result<RsiOutput, IndicatorError> {
    if n == 0 {
        return Err(IndicatorError::InvalidWindow {
            window: n,
            len: prices.len(),
        });
    }
    if prices.len() < n + 1 {
        return Err(IndicatorError::InsufficientData {
            needed: n + 1,
            got: prices.len(),
        });
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    let mut state = Wilder::seed(&deltas, n);
    let mut rsi = vec![state.value(); prices.len()];
    for i in n..prices.len() {
        rsi[i] = state.step(deltas[i - 1]);
    }

    let mut price_deltas = vec![0.0; prices.len()];
    for i in 1..prices.len() {
        price_deltas[i] = prices[i] - prices[i - 1];
    }

    let mut final_up = vec![0.0; prices.len()];
    let mut final_down = vec![0.0; prices.len()];
    final_up[prices.len() - 1] = state.up();
    final_down[prices.len() - 1] = state.down();

    Ok(RsiOutput {
        rsi,
        price_deltas,
        final_up,
        final_down,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_rsi_all_gains_is_pinned_to_100() {
        // All deltas are +1, so the loss average never leaves zero and the
        // division policy applies at every index.
        let prices: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        let out = rsi(&prices, 8).unwrap();
        assert_eq!(out.rsi.len(), 15);
        for (i, v) in out.rsi.iter().enumerate() {
            assert_eq!(*v, 100.0, "index {i}");
        }
        // The gain average stays at its seed value of 1.0.
        assert!((out.final_up[14] - 1.0).abs() < TOL);
        assert_eq!(out.final_down[14], 0.0);
    }

    #[test]
    fn test_rsi_all_losses_is_zero() {
        let prices: Vec<f64> = (1..=20).rev().map(|x| x as f64).collect();
        let out = rsi(&prices, 6).unwrap();
        for (i, v) in out.rsi.iter().enumerate() {
            assert!(v.abs() < TOL, "index {i}: {v}");
        }
    }

    #[test]
    fn test_rsi_flat_market_policy() {
        // No movement at all: both averages are zero, and the zero-loss
        // policy pins RSI to 100 rather than producing NaN.
        let prices = vec![50.0; 12];
        let out = rsi(&prices, 4).unwrap();
        for v in &out.rsi {
            assert_eq!(*v, 100.0);
        }
    }

    #[test]
    fn test_rsi_mixed_fixture_by_hand() {
        // deltas: [1, -2, 3, -4, 5, -6, 7, -8, 9]
        // seed over first 4: up0 = (1 + 3) / 4 = 1.0, down0 = (2 + 4) / 4 = 1.5
        // rs0 = 2/3 -> rsi = 100 - 100 / (5/3) = 40
        let prices = [10.0, 11.0, 9.0, 12.0, 8.0, 13.0, 7.0, 14.0, 6.0, 15.0];
        let out = rsi(&prices, 4).unwrap();

        for i in 0..4 {
            assert!((out.rsi[i] - 40.0).abs() < TOL, "seed entry {i}");
        }

        // First smoothing step, delta = -4:
        //   up = (1.0 * 3 + 0) / 4 = 0.75, down = (1.5 * 3 + 4) / 4 = 2.125
        //   rs = 6/17 -> rsi = 100 - 1700/23
        let expected_4 = 100.0 - 1700.0 / 23.0;
        assert!((out.rsi[4] - expected_4).abs() < TOL, "{}", out.rsi[4]);

        // Second step, delta = 5:
        //   up = (0.75 * 3 + 5) / 4 = 1.8125, down = 2.125 * 3 / 4 = 1.59375
        //   rs = 58/51 -> rsi = 100 - 5100/109
        let expected_5 = 100.0 - 5100.0 / 109.0;
        assert!((out.rsi[5] - expected_5).abs() < TOL, "{}", out.rsi[5]);
    }

    #[test]
    fn test_rsi_stays_in_range() {
        let prices: Vec<f64> = (0..100)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 10.0 + (i as f64 * 0.13).cos() * 3.0)
            .collect();
        let out = rsi(&prices, DEFAULT_PERIOD).unwrap();
        for (i, v) in out.rsi.iter().enumerate() {
            assert!((0.0..=100.0).contains(v), "index {i}: {v}");
        }
    }

    #[test]
    fn test_rsi_is_deterministic() {
        let prices: Vec<f64> = (0..50).map(|i| 30.0 + (i as f64 * 1.3).sin() * 4.0).collect();
        let a = rsi(&prices, DEFAULT_PERIOD).unwrap();
        let b = rsi(&prices, DEFAULT_PERIOD).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rsi_price_deltas_full_length_with_leading_zero() {
        let prices = [10.0, 11.0, 9.0, 12.0, 8.0, 13.0];
        let out = rsi(&prices, 3).unwrap();
        assert_eq!(out.price_deltas.len(), prices.len());
        assert_eq!(out.price_deltas[0], 0.0);
        for i in 1..prices.len() {
            assert_eq!(out.price_deltas[i], prices[i] - prices[i - 1]);
        }
    }

    #[test]
    fn test_rsi_final_state_snapshot_shape() {
        let prices = [10.0, 11.0, 9.0, 12.0, 8.0, 13.0, 7.0];
        let out = rsi(&prices, 3).unwrap();
        let last = prices.len() - 1;
        for i in 0..last {
            assert_eq!(out.final_up[i], 0.0);
            assert_eq!(out.final_down[i], 0.0);
        }
        assert!(out.final_up[last] > 0.0);
        assert!(out.final_down[last] > 0.0);
    }

    #[test]
    fn test_rsi_minimum_history_boundary() {
        // n + 1 prices is exactly enough: the seed window consumes every
        // delta and the smoothing loop runs no steps... except index n
        // itself, which reuses the last seed delta.
        let prices = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(rsi(&prices, 4).is_ok());
        assert_eq!(
            rsi(&prices, 5),
            Err(IndicatorError::InsufficientData { needed: 6, got: 5 })
        );
    }

    #[test]
    fn test_rsi_rejects_zero_period() {
        assert_eq!(
            rsi(&[1.0, 2.0], 0),
            Err(IndicatorError::InvalidWindow { window: 0, len: 2 })
        );
    }
}
