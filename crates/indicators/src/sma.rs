use crate::IndicatorError;

/// Simple moving average in "valid" mode.
///
/// The output has length `values.len() - window + 1`; `out[i]` is the
/// arithmetic mean of `values[i..i + window]`. Uses a rolling sum, so a
/// single pass over the input.
pub fn sma(values: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    if window == 0 || window > values.len() {
        return Err(IndicatorError::InvalidWindow {
            window,
            len: values.len(),
        });
    }

    let mut out = Vec::with_capacity(values.len() - window + 1);
    let mut sum: f64 = values[..window].iter().sum();
    out.push(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out.push(sum / window as f64);
    }
    Ok(out)
}
