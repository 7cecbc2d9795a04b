use thiserror::Error;

/// Errors raised by ingestion, configuration and rule compilation.
///
/// Scoring itself never fails on data; every variant here is raised before
/// the first sample is evaluated.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error while {context}: {source}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },
    #[error("config error in {context}: {source}")]
    Config {
        context: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid pattern for rule '{rule}': {source}")]
    Pattern {
        rule: String,
        #[source]
        source: Box<regex_automata::meta::BuildError>,
    },
    #[error("{table} table must have column '{column}' (found: {found:?})")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
        found: Vec<String>,
    },
    #[error("Length mismatch: truth={truth} vs pred={predicted}. Ensure one-to-one rows.")]
    LengthMismatch { truth: usize, predicted: usize },
    #[error("column lengths differ: original={original}, gold={gold}, predicted={predicted}")]
    ColumnLengths {
        original: usize,
        gold: usize,
        predicted: usize,
    },
    #[error("Row order/content mismatch in 'err_sentence' at row {row}")]
    RowMismatch { row: usize },
    #[error("unknown postprocessor '{name}' (configured: {available:?})")]
    UnknownPostprocessor {
        name: String,
        available: Vec<String>,
    },
}

impl EvalError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn config(context: impl Into<String>, source: toml::de::Error) -> Self {
        Self::Config {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn pattern(rule: impl Into<String>, source: regex_automata::meta::BuildError) -> Self {
        Self::Pattern {
            rule: rule.into(),
            source: Box::new(source),
        }
    }

    /// True for the batch precondition failures (row count or row content).
    pub fn is_misalignment(&self) -> bool {
        matches!(self, Self::LengthMismatch { .. } | Self::ColumnLengths { .. } | Self::RowMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
