pub mod alignment;
pub mod config;
pub mod dataset;
pub mod error;
pub mod postprocess;
pub mod report;
pub mod scoring;

// Re-export main types for convenient access
pub use alignment::{
    find_differences, longest_common_subsequence, tokenize, tokenize_opt, Aligner,
    DifferenceSpan
};

pub use scoring::{
    classify_edits, evaluate_batch, evaluate_batch_parallel, evaluate_sample,
    AnalysisRecord, BatchEvaluation, EditClass, EditTally, EvaluationResult, Sample, Scorer
};

pub use config::EvalConfig;
pub use error::EvalError;
pub use postprocess::{ProcessingError, RuleSet};
