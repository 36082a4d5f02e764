use std::path::{Path, PathBuf};
use tickwatch_core::{DataError, Dataset, PricePoint, PriceSeries};

/// Flat tabular persistence for assembled datasets.
///
/// One file per symbol (`<prefix><SYMBOL>.csv`), one row per timestamp,
/// one column per series. Floats are written with shortest round-trip
/// formatting, so reading a file back reproduces the exact values.
pub struct CsvStore {
    directory: PathBuf,
    prefix: String,
}

impl CsvStore {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.directory.join(format!("{}{}.csv", self.prefix, symbol))
    }

    /// Write a dataset, creating the directory if needed. Returns the
    /// path written.
    pub fn write(&self, dataset: &Dataset) -> Result<PathBuf, DataError> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(&dataset.series().symbol);
        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| DataError::ParseError(format!("failed to open CSV for write: {e}")))?;

        let mut header = vec!["date".to_string(), "close".to_string()];
        header.extend(dataset.columns().iter().map(|(name, _)| name.clone()));
        writer
            .write_record(&header)
            .map_err(|e| DataError::ParseError(format!("CSV write error: {e}")))?;

        for (i, point) in dataset.series().points.iter().enumerate() {
            let mut record = vec![point.label(), format_float(point.close)];
            for (_, values) in dataset.columns() {
                record.push(format_float(values[i]));
            }
            writer
                .write_record(&record)
                .map_err(|e| DataError::ParseError(format!("CSV write error: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| DataError::ParseError(format!("CSV write error: {e}")))?;
        Ok(path)
    }

    /// Read a dataset back. The first two columns must be `date` and
    /// `close`; every remaining column becomes a named indicator column.
    pub fn read(&self, symbol: &str) -> Result<Dataset, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::NotFound(path.display().to_string()));
        }
        read_dataset(&path, symbol)
    }
}

fn read_dataset(path: &Path, symbol: &str) -> Result<Dataset, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(format!("failed to open CSV: {e}")))?;

    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(format!("failed to read headers: {e}")))?
        .clone();

    if headers.len() < 2 || &headers[0] != "date" || &headers[1] != "close" {
        return Err(DataError::ParseError(format!(
            "expected leading 'date,close' columns, got '{}'",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }
    let names: Vec<String> = headers.iter().skip(2).map(String::from).collect();

    let mut points: Vec<PricePoint> = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for result in reader.records() {
        let record = result.map_err(|e| DataError::ParseError(format!("CSV record error: {e}")))?;
        let close = parse_float(&record[1], "close")?;
        let point = PricePoint::from_label(&record[0], close).map_err(|e| {
            DataError::ParseError(format!("bad timestamp '{}': {e}", &record[0]))
        })?;
        // Rows must already be time-ascending: the indicator columns are
        // read positionally, so reordering here would detach them from
        // their timestamps.
        if let Some(prev) = points.last() {
            if (point.date, point.minute) <= (prev.date, prev.minute) {
                return Err(DataError::ParseError(format!(
                    "row '{}' is out of order (follows '{}')",
                    point.label(),
                    prev.label()
                )));
            }
        }
        points.push(point);
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(parse_float(&record[i + 2], &names[i])?);
        }
    }

    let mut dataset = Dataset::new(PriceSeries::new(symbol, points));
    for (name, values) in names.into_iter().zip(columns) {
        dataset.push_column(name, values)?;
    }
    Ok(dataset)
}

/// Shortest representation that parses back to the identical f64.
fn format_float(value: f64) -> String {
    format!("{value}")
}

fn parse_float(s: &str, field: &str) -> Result<f64, DataError> {
    s.trim()
        .parse::<f64>()
        .map_err(|e| DataError::ParseError(format!("failed to parse {field} '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn temp_store(tag: &str) -> CsvStore {
        let dir = std::env::temp_dir().join(format!(
            "tickwatch-csv-{}-{}",
            tag,
            std::process::id()
        ));
        CsvStore::new(dir, "data-")
    }

    fn sample_dataset() -> Dataset {
        let base = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
        let closes = [291.5, 293.06, 290.333333333333331, 295.0];
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::daily(base + chrono::Duration::days(i as i64), c))
            .collect();
        let mut dataset = Dataset::new(PriceSeries::new("SPY", points));
        dataset
            .push_column("rsi", vec![40.0, 100.0 - 1700.0 / 23.0, 55.5, 100.0])
            .unwrap();
        dataset
            .push_column("deltas", vec![0.0, 1.56, -2.726666666666669, 4.666666666666669])
            .unwrap();
        dataset
    }

    #[test]
    fn test_write_read_round_trip_is_exact() {
        let store = temp_store("roundtrip");
        let dataset = sample_dataset();
        let path = store.write(&dataset).unwrap();
        assert!(path.ends_with("data-SPY.csv"));

        let back = store.read("SPY").unwrap();
        assert_eq!(back.series(), dataset.series());
        assert_eq!(back.columns(), dataset.columns());
    }

    #[test]
    fn test_read_rejects_out_of_order_rows() {
        // Columns are read positionally; accepting these rows would hand
        // the 2019-01-01 row the rsi value of 2019-01-02.
        let store = temp_store("out-of-order");
        std::fs::create_dir_all(store.path_for("SPY").parent().unwrap()).unwrap();
        std::fs::write(
            store.path_for("SPY"),
            "date,close,rsi\n2019-01-02,2.0,20.0\n2019-01-01,1.0,10.0\n",
        )
        .unwrap();
        let err = store.read("SPY").unwrap_err();
        assert!(matches!(err, DataError::ParseError(_)), "{err}");
    }

    #[test]
    fn test_read_rejects_duplicate_timestamps() {
        let store = temp_store("duplicate");
        std::fs::create_dir_all(store.path_for("SPY").parent().unwrap()).unwrap();
        std::fs::write(
            store.path_for("SPY"),
            "date,close,rsi\n2019-01-01,1.0,10.0\n2019-01-01,2.0,20.0\n",
        )
        .unwrap();
        let err = store.read("SPY").unwrap_err();
        assert!(matches!(err, DataError::ParseError(_)), "{err}");
    }

    #[test]
    fn test_read_missing_file() {
        let store = temp_store("missing");
        assert!(matches!(store.read("NOPE"), Err(DataError::NotFound(_))));
    }

    #[test]
    fn test_path_uses_prefix() {
        let store = CsvStore::new("/tmp", "data-");
        assert_eq!(store.path_for("AMD"), PathBuf::from("/tmp/data-AMD.csv"));
    }
}
