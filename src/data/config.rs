//! Cleaning rules applied while loading the blood-count CSV

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CytologyError, Result};

/// How raw CSV cells become features and labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Categorical column holding the diagnosis
    pub target_column: String,

    /// Columns removed from the feature set
    pub drop_columns: Vec<String>,

    /// Cell values standing for "missing"; mapped to 0.0
    pub missing_sentinels: Vec<String>,

    /// Numbers use `,` as decimal separator
    pub decimal_comma: bool,

    /// Field separator of the file
    pub separator: char,

    /// Raw status value -> class label
    pub labels: BTreeMap<String, i64>,

    /// Raw status values whose rows are removed before splitting
    pub exclude_labels: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        let labels = [("basitler", 0), ("ein", 2), ("highrisk", 1), ("lowrisk", 1)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        Self {
            target_column: "status".to_string(),
            drop_columns: vec!["NRBC".to_string()],
            missing_sentinels: vec!["-".to_string(), "----".to_string()],
            decimal_comma: true,
            separator: ',',
            labels,
            exclude_labels: vec!["ein".to_string()],
        }
    }
}

impl DataConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the target column
    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }

    /// Builder method to set the dropped columns
    pub fn with_drop_columns(mut self, columns: Vec<String>) -> Self {
        self.drop_columns = columns;
        self
    }

    /// Builder method to set the excluded status values
    pub fn with_exclude_labels(mut self, labels: Vec<String>) -> Self {
        self.exclude_labels = labels;
        self
    }

    /// Builder method to set the field separator
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Builder method to set the status -> label mapping
    pub fn with_labels(mut self, labels: BTreeMap<String, i64>) -> Self {
        self.labels = labels;
        self
    }

    pub fn is_missing(&self, cell: &str) -> bool {
        self.missing_sentinels.iter().any(|s| s == cell)
    }

    pub fn is_excluded(&self, status: &str) -> bool {
        self.exclude_labels.iter().any(|s| s == status)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_column.is_empty() {
            return Err(CytologyError::ConfigError(
                "target_column must not be empty".to_string(),
            ));
        }
        if !self.separator.is_ascii() {
            return Err(CytologyError::ConfigError(format!(
                "separator '{}' must be a single ASCII character",
                self.separator
            )));
        }
        if self.labels.is_empty() {
            return Err(CytologyError::ConfigError(
                "labels mapping must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DataConfig::default();
        assert_eq!(config.target_column, "status");
        assert_eq!(config.labels.get("highrisk"), Some(&1));
        assert_eq!(config.labels.get("basitler"), Some(&0));
        assert!(config.is_missing("----"));
        assert!(!config.is_missing("0,5"));
        assert!(config.is_excluded("ein"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DataConfig = serde_json::from_str(r#"{"separator": ";"}"#).unwrap();
        assert_eq!(config.separator, ';');
        assert_eq!(config.drop_columns, vec!["NRBC".to_string()]);
    }

    #[test]
    fn test_validate_rejects_empty_mapping() {
        let config = DataConfig::default().with_labels(BTreeMap::new());
        assert!(matches!(config.validate(), Err(CytologyError::ConfigError(_))));
    }
}
