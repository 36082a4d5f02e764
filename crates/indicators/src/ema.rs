use crate::IndicatorError;

/// Exponential moving average with exp-spaced weights.
///
/// Weights are `exp` evaluated over `window` points evenly spaced on
/// `[-1, 0]`, normalized to sum to 1, and applied as a full-mode
/// convolution truncated to the input length. The first `window` entries
/// only partially overlap the weight kernel and are unstable, so they are
/// overwritten with the entry at index `window` (flat-fill backfill).
///
/// The output always has the same length as the input. The backfill reads
/// index `window`, so the window must leave at least one fully-formed
/// entry: `window < values.len()`.
pub fn ema(values: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    if window == 0 || window >= values.len() {
        return Err(IndicatorError::InvalidWindow {
            window,
            len: values.len(),
        });
    }

    let weights = exp_weights(window);
    let mut out = vec![0.0; values.len()];
    for (k, slot) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (i, w) in weights.iter().enumerate() {
            if i > k {
                break;
            }
            acc += w * values[k - i];
        }
        *slot = acc;
    }

    let fill = out[window];
    for slot in &mut out[..window] {
        *slot = fill;
    }
    Ok(out)
}

/// `exp` over `window` points evenly spaced on `[-1, 0]`, normalized to
/// sum to 1. A single point sits at -1 (and normalizes to 1.0).
fn exp_weights(window: usize) -> Vec<f64> {
    let mut weights: Vec<f64> = (0..window)
        .map(|i| {
            let x = if window == 1 {
                -1.0
            } else {
                -1.0 + i as f64 / (window as f64 - 1.0)
            };
            x.exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}
