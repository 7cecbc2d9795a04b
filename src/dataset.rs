// CSV ingestion for truth and submission tables.
// WHY: row alignment is validated here so the scorer never sees misaligned pairs.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{EvalError, Result};
use crate::scoring::Sample;

const ERR_SENTENCE: &str = "err_sentence";
const COR_SENTENCE: &str = "cor_sentence";

/// Row of the ground-truth table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TruthRow {
    pub err_sentence: String,
    pub cor_sentence: String,
    #[serde(default)]
    pub original_target_part: Option<String>,
    #[serde(default)]
    pub golden_target_part: Option<String>,
}

/// Row of a submission table. `err_sentence` is optional and, when present,
/// is checked against the truth row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PredictionRow {
    #[serde(default)]
    pub err_sentence: Option<String>,
    pub cor_sentence: String,
}

/// Parsed submission plus whether it carried its own originals column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predictions {
    pub rows: Vec<PredictionRow>,
    pub has_originals: bool,
}

fn headers_of(reader: &mut csv::Reader<&[u8]>, source: &str) -> Result<Vec<String>> {
    let headers = reader
        .headers()
        .map_err(|e| EvalError::csv(format!("reading header of {source}"), e))?;
    Ok(headers.iter().map(str::to_string).collect())
}

fn require(table: &'static str, headers: &[String], column: &'static str) -> Result<()> {
    if headers.iter().any(|h| h == column) {
        Ok(())
    } else {
        Err(EvalError::MissingColumn {
            table,
            column,
            found: headers.to_vec(),
        })
    }
}

fn deserialize_rows<T: DeserializeOwned>(
    mut reader: csv::Reader<&[u8]>,
    source: &str,
) -> Result<Vec<T>> {
    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.map_err(|e| EvalError::csv(format!("parsing row {i} of {source}"), e)))
        .collect()
}

/// Parse a truth table (`err_sentence`, `cor_sentence`, optional target parts).
pub fn parse_truth(data: &[u8], source: &str) -> Result<Vec<TruthRow>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = headers_of(&mut reader, source)?;
    require("Truth", &headers, ERR_SENTENCE)?;
    require("Truth", &headers, COR_SENTENCE)?;

    let rows: Vec<TruthRow> = deserialize_rows(reader, source)?;
    debug!(source, rows = rows.len(), "Parsed truth table");
    Ok(rows)
}

/// Parse a submission table (`cor_sentence`, optional `err_sentence`).
pub fn parse_predictions(data: &[u8], source: &str) -> Result<Predictions> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = headers_of(&mut reader, source)?;
    require("Prediction", &headers, COR_SENTENCE)?;
    let has_originals = headers.iter().any(|h| h == ERR_SENTENCE);

    let rows: Vec<PredictionRow> = deserialize_rows(reader, source)?;
    debug!(source, rows = rows.len(), has_originals, "Parsed prediction table");
    Ok(Predictions { rows, has_originals })
}

async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .await
        .map_err(|e| EvalError::io(format!("reading {}", path.display()), e))
}

pub async fn read_truth(path: &Path) -> Result<Vec<TruthRow>> {
    let data = read_bytes(path).await?;
    let rows = parse_truth(&data, &path.display().to_string())?;
    info!("Loaded truth data: {} ({} rows)", path.display(), rows.len());
    Ok(rows)
}

pub async fn read_predictions(path: &Path) -> Result<Predictions> {
    let data = read_bytes(path).await?;
    let predictions = parse_predictions(&data, &path.display().to_string())?;
    info!("Loaded prediction data: {} ({} rows)", path.display(), predictions.rows.len());
    Ok(predictions)
}

/// Pair truth and submission rows one-to-one.
///
/// Rejects a row-count mismatch, and when the submission carries
/// `err_sentence`, any row whose original differs from the truth row.
pub fn align(truth: &[TruthRow], predictions: &Predictions) -> Result<Vec<Sample>> {
    if truth.len() != predictions.rows.len() {
        return Err(EvalError::LengthMismatch {
            truth: truth.len(),
            predicted: predictions.rows.len(),
        });
    }

    truth
        .iter()
        .zip(&predictions.rows)
        .enumerate()
        .map(|(row, (t, p))| {
            if predictions.has_originals && p.err_sentence.as_deref().unwrap_or("") != t.err_sentence {
                return Err(EvalError::RowMismatch { row });
            }
            Ok(Sample {
                original: t.err_sentence.clone(),
                gold: t.cor_sentence.clone(),
                predicted: p.cor_sentence.clone(),
                original_target_part: t.original_target_part.clone(),
                golden_target_part: t.golden_target_part.clone(),
            })
        })
        .collect()
}
