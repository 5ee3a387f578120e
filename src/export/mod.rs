//! Writing experiment results to disk
//!
//! ROC points go to CSV so any plotting tool can draw the curve; the whole
//! run summary goes to JSON.

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{CytologyError, Result};
use crate::experiment::ExperimentSummary;
use crate::metrics::RocCurve;

/// ROC points as a frame with `fpr`, `tpr` and `threshold` columns
pub fn roc_frame(curve: &RocCurve) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Column::new("fpr".into(), curve.fpr.as_slice()),
        Column::new("tpr".into(), curve.tpr.as_slice()),
        Column::new("threshold".into(), curve.thresholds.as_slice()),
    ])?;
    Ok(df)
}

/// Save a ROC curve as CSV
pub fn write_roc_csv<P: AsRef<Path>>(curve: &RocCurve, path: P) -> Result<()> {
    let mut df = roc_frame(curve)?;
    let mut file = File::create(path.as_ref())?;

    CsvWriter::new(&mut file)
        .finish(&mut df)
        .map_err(|e| CytologyError::DataError(e.to_string()))
}

/// Save the run summary as pretty-printed JSON
pub fn write_summary_json<P: AsRef<Path>>(summary: &ExperimentSummary, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

/// Write `summary.json` and one `roc_<n>.csv` per repetition with a curve
/// into `dir`, creating it if needed. Returns the written paths.
pub fn write_all<P: AsRef<Path>>(summary: &ExperimentSummary, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for rep in &summary.repetitions {
        if let Some(roc) = &rep.roc {
            let path = dir.join(format!("roc_{}.csv", rep.index + 1));
            write_roc_csv(roc, &path)?;
            written.push(path);
        }
    }

    let summary_path = dir.join("summary.json");
    write_summary_json(summary, &summary_path)?;
    written.push(summary_path);

    info!(dir = %dir.display(), files = written.len(), "Results exported");
    Ok(written)
}
