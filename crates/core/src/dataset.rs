use crate::models::PriceSeries;
use crate::traits::DataError;
use serde::Serialize;

/// A price series joined with named, position-aligned indicator columns.
///
/// Invariant: every column has exactly one value per price point. Columns
/// that violate this are refused at assembly time, never truncated or
/// padded silently.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    series: PriceSeries,
    columns: Vec<(String, Vec<f64>)>,
}

impl Dataset {
    pub fn new(series: PriceSeries) -> Self {
        Self {
            series,
            columns: Vec::new(),
        }
    }

    /// Attach a named column aligned with the price series.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), DataError> {
        let name = name.into();
        if values.len() != self.series.len() {
            return Err(DataError::LengthMismatch {
                column: name,
                expected: self.series.len(),
                got: values.len(),
            });
        }
        if self.columns.iter().any(|(n, _)| *n == name) {
            return Err(DataError::DuplicateColumn(name));
        }
        self.columns.push((name, values));
        Ok(())
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> &[(String, Vec<f64>)] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Number of rows (equal to the price series length).
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Left-pad a valid-convolution output with zeros so it can sit next to
/// full-length columns. Inputs already at least `target_len` long are
/// returned unchanged.
pub fn pad_front(values: &[f64], target_len: usize) -> Vec<f64> {
    if values.len() >= target_len {
        return values.to_vec();
    }
    let mut out = vec![0.0; target_len - values.len()];
    out.extend_from_slice(values);
    out
}
