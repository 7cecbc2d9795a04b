// Run reporting: analysis CSV, per-submission stats JSON and a comparison table.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{EvalError, Result};
use crate::scoring::{AnalysisRecord, EvaluationResult};

/// Outcome of evaluating one submission file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunStats {
    /// Submission file path
    pub path: String,
    /// Post-processor applied to predictions, if any
    pub postprocessor: Option<String>,
    pub samples: usize,
    /// Scores; absent when the submission failed validation
    pub result: Option<EvaluationResult>,
    pub processing_time_ms: u64,
    /// success or failed
    pub status: String,
    pub error: Option<String>,
}

impl RunStats {
    pub fn success(
        path: &Path,
        postprocessor: Option<&str>,
        samples: usize,
        result: EvaluationResult,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            path: path.display().to_string(),
            postprocessor: postprocessor.map(str::to_string),
            samples,
            result: Some(result),
            processing_time_ms,
            status: "success".to_string(),
            error: None,
        }
    }

    pub fn failed(path: &Path, postprocessor: Option<&str>, error: &EvalError, processing_time_ms: u64) -> Self {
        Self {
            path: path.display().to_string(),
            postprocessor: postprocessor.map(str::to_string),
            samples: 0,
            result: None,
            processing_time_ms,
            status: "failed".to_string(),
            error: Some(error.to_string()),
        }
    }
}

/// Serialize analysis rows as CSV (header included).
pub fn analysis_csv(records: &[AnalysisRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| EvalError::csv("serializing analysis row", e))?;
    }
    writer
        .into_inner()
        .map_err(|e| EvalError::io("flushing analysis CSV", e.into_error()))
}

pub async fn write_analysis_csv(path: &Path, records: &[AnalysisRecord]) -> Result<()> {
    let data = analysis_csv(records)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| EvalError::io(format!("creating {}", parent.display()), e))?;
    }
    fs::write(path, data)
        .await
        .map_err(|e| EvalError::io(format!("writing {}", path.display()), e))
}

/// Write all run stats as a pretty JSON array.
pub async fn write_run_stats(path: &Path, stats: &[RunStats]) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(stats)?;
    let mut file = fs::File::create(path).await?;
    file.write_all(content.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;
    Ok(())
}

/// Markdown table comparing every evaluated submission.
pub fn comparison_markdown(stats: &[RunStats]) -> String {
    let mut out = String::new();
    out.push_str("| Submission | Samples | TP | FP | FM | FR | Recall | Precision |\n");
    out.push_str("|---|---:|---:|---:|---:|---:|---:|---:|\n");
    for run in stats {
        let name = match &run.postprocessor {
            Some(pp) => format!("{} (+{pp})", run.path),
            None => run.path.clone(),
        };
        match &run.result {
            Some(r) => {
                let _ = writeln!(
                    out,
                    "| {name} | {} | {} | {} | {} | {} | {:.2}% | {:.2}% |",
                    run.samples,
                    r.true_positives,
                    r.false_positives,
                    r.false_missings,
                    r.false_redundants,
                    r.recall,
                    r.precision
                );
            }
            None => {
                let error = run.error.as_deref().unwrap_or("failed");
                let _ = writeln!(out, "| {name} | - | - | - | - | - | {error} | - |");
            }
        }
    }
    out
}
