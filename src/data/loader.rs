//! CSV loading and cleaning

use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use super::config::DataConfig;
use super::dataset::Dataset;
use crate::error::{CytologyError, Result};

/// Loads a blood-count CSV and turns it into a [`Dataset`]
pub struct DataLoader {
    config: DataConfig,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(DataConfig::default())
    }
}

impl DataLoader {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// Read the file with every column kept as raw text
    pub fn load_frame<P: AsRef<Path>>(&self, path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| CytologyError::DataError(format!("{}: {e}", path.display())))?;

        let parse_opts = CsvParseOptions::default()
            .with_separator(self.config.separator as u8);

        // A zero-length inference window reads every column as String; the
        // comma decimals and sentinels are handled by `from_frame`.
        let reader = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file);

        reader.finish()
            .map_err(|e| CytologyError::DataError(e.to_string()))
    }

    /// Load and clean a CSV file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let start = Instant::now();
        let df = self.load_frame(path.as_ref())?;
        let dataset = self.from_frame(&df)?;

        info!(
            path = %path.as_ref().display(),
            rows = dataset.n_samples(),
            features = dataset.n_features(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Clean a raw text frame: drop excluded statuses, map labels, replace
    /// sentinels and parse the numeric columns.
    pub fn from_frame(&self, df: &DataFrame) -> Result<Dataset> {
        self.config.validate()?;

        let column_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let target = &self.config.target_column;
        if !column_names.contains(target) {
            return Err(CytologyError::FeatureNotFound(target.clone()));
        }
        for dropped in &self.config.drop_columns {
            if !column_names.contains(dropped) {
                return Err(CytologyError::FeatureNotFound(dropped.clone()));
            }
        }

        let status = text_column(df, target)?;

        let mut kept_rows = Vec::with_capacity(status.len());
        let mut labels = Vec::with_capacity(status.len());
        for (row, cell) in status.iter().enumerate() {
            let value = cell
                .as_deref()
                .map(str::trim)
                .ok_or_else(|| CytologyError::DataError(format!(
                    "missing '{target}' value in row {}", row + 1
                )))?;

            if self.config.is_excluded(value) {
                continue;
            }

            let label = *self.config.labels.get(value).ok_or_else(|| {
                CytologyError::DataError(format!("unknown {target} '{value}' in row {}", row + 1))
            })?;
            if label != 0 && label != 1 {
                return Err(CytologyError::DataError(format!(
                    "{target} '{value}' maps to label {label}; only 0 and 1 can be classified"
                )));
            }

            kept_rows.push(row);
            labels.push(label);
        }

        debug!(
            excluded = status.len() - kept_rows.len(),
            kept = kept_rows.len(),
            "Filtered excluded statuses"
        );

        let feature_names: Vec<String> = column_names
            .into_iter()
            .filter(|name| name != target && !self.config.drop_columns.contains(name))
            .collect();

        let columns: Vec<Vec<Option<String>>> = feature_names
            .iter()
            .map(|name| text_column(df, name))
            .collect::<Result<_>>()?;

        // Excluded rows are parsed as well: a malformed cell anywhere in the
        // file aborts the load.
        let mut values = Vec::with_capacity(kept_rows.len() * feature_names.len());
        let mut kept = kept_rows.iter().copied().peekable();
        for row in 0..status.len() {
            let keep = kept.next_if_eq(&row).is_some();
            for (name, column) in feature_names.iter().zip(&columns) {
                let value = self.parse_cell(column[row].as_deref(), name, row)?;
                if keep {
                    values.push(value);
                }
            }
        }

        let features = Array2::from_shape_vec((kept_rows.len(), feature_names.len()), values)?;
        Dataset::new(feature_names, features, Array1::from_vec(labels))
    }

    fn parse_cell(&self, cell: Option<&str>, column: &str, row: usize) -> Result<f64> {
        let raw = cell
            .map(str::trim)
            .ok_or_else(|| CytologyError::DataError(format!(
                "missing value in column '{column}', row {}", row + 1
            )))?;

        if self.config.is_missing(raw) {
            return Ok(0.0);
        }

        let normalized = if self.config.decimal_comma {
            raw.replace(',', ".")
        } else {
            raw.to_string()
        };

        normalized.parse::<f64>().map_err(|_| {
            CytologyError::DataError(format!(
                "cannot parse '{raw}' in column '{column}', row {} as a number",
                row + 1
            ))
        })
    }
}

fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.as_materialized_series().cast(&DataType::String)?;
    let ca = series.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn raw_frame() -> DataFrame {
        df!(
            "status" => &["basitler", "ein", "highrisk", "lowrisk"],
            "WBC" => &["5,2", "1,0", "-", "7"],
            "NRBC" => &["0", "0", "0", "0"],
            "PDW" => &["----", "2,0", "11,25", "10"]
        )
        .unwrap()
    }

    #[test]
    fn test_from_frame_cleans_cells() {
        let loader = DataLoader::default();
        let ds = loader.from_frame(&raw_frame()).unwrap();

        assert_eq!(ds.feature_names(), &["WBC".to_string(), "PDW".to_string()]);
        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.labels().to_vec(), vec![0, 1, 1]);
        assert_eq!(ds.features().row(0).to_vec(), vec![5.2, 0.0]);
        assert_eq!(ds.features().row(1).to_vec(), vec![0.0, 11.25]);
        assert_eq!(ds.features().row(2).to_vec(), vec![7.0, 10.0]);
    }

    #[test]
    fn test_exclusion_is_configurable() {
        let loader = DataLoader::new(DataConfig::default().with_exclude_labels(vec![]));
        let err = loader.from_frame(&raw_frame()).unwrap_err();
        // "ein" maps to 2, which is not a binary label
        assert!(matches!(err, CytologyError::DataError(_)));
    }

    #[test]
    fn test_malformed_number_is_fatal() {
        let df = df!(
            "status" => &["basitler", "highrisk"],
            "NRBC" => &["0", "0"],
            "WBC" => &["5,2", "abc"]
        )
        .unwrap();

        let err = DataLoader::default().from_frame(&df).unwrap_err();
        match err {
            CytologyError::DataError(msg) => {
                assert!(msg.contains("WBC"));
                assert!(msg.contains("abc"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_cell_in_excluded_row_is_fatal() {
        let df = df!(
            "status" => &["basitler", "ein", "lowrisk"],
            "NRBC" => &["0", "0", "0"],
            "WBC" => &["5,2", "x,1", "6"]
        )
        .unwrap();

        let err = DataLoader::default().from_frame(&df).unwrap_err();
        match err {
            CytologyError::DataError(msg) => assert!(msg.contains("row 2"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_status() {
        let df = df!(
            "status" => &["basitler", "unknown"],
            "NRBC" => &["0", "0"],
            "WBC" => &["1", "2"]
        )
        .unwrap();

        assert!(DataLoader::default().from_frame(&df).is_err());
    }

    #[test]
    fn test_missing_target_column() {
        let df = df!("NRBC" => &["0"], "WBC" => &["1"]).unwrap();
        let err = DataLoader::default().from_frame(&df).unwrap_err();
        assert!(matches!(err, CytologyError::FeatureNotFound(c) if c == "status"));
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "status,WBC,NRBC,HGB").unwrap();
        writeln!(file, "basitler,\"4,5\",0,\"12,1\"").unwrap();
        writeln!(file, "highrisk,-,0,\"13,0\"").unwrap();
        writeln!(file, "ein,\"6,0\",0,----").unwrap();

        let ds = DataLoader::default().load(file.path()).unwrap();
        assert_eq!(ds.n_samples(), 2);
        assert_eq!(ds.feature_names(), &["WBC".to_string(), "HGB".to_string()]);
        assert_eq!(ds.features().row(0).to_vec(), vec![4.5, 12.1]);
        assert_eq!(ds.features().row(1).to_vec(), vec![0.0, 13.0]);
    }

    #[test]
    fn test_load_semicolon_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "status;NRBC;MCV").unwrap();
        writeln!(file, "lowrisk;0;88,5").unwrap();

        let loader = DataLoader::new(DataConfig::default().with_separator(';'));
        let ds = loader.load(file.path()).unwrap();
        assert_eq!(ds.features()[[0, 0]], 88.5);
        assert_eq!(ds.labels()[0], 1);
    }

    #[test]
    fn test_missing_file() {
        let result = DataLoader::default().load("/nonexistent/cytology.csv");
        assert!(matches!(result, Err(CytologyError::DataError(_))));
    }
}
