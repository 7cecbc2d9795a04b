// Print the difference spans between two sentences as JSON.
// WHY: quick inspection of how the scorer sees a single edit without building a CSV.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use gecscore::{tokenize, Aligner, DifferenceSpan};

#[derive(Parser, Debug)]
#[command(name = "gecscore-diff")]
#[command(about = "Show token-level difference spans between an original and a corrected sentence")]
struct Args {
    /// Original (uncorrected) sentence
    original: String,

    /// Corrected sentence
    corrected: String,

    /// Near-adjacent merge window
    #[arg(long, default_value_t = gecscore::alignment::DEFAULT_MERGE_WINDOW)]
    merge_window: usize,

    /// Also print the unmerged spans
    #[arg(long)]
    raw: bool,
}

#[derive(Serialize)]
struct DiffOutput<'a> {
    original_tokens: Vec<&'a str>,
    corrected_tokens: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<Vec<DifferenceSpan>>,
    spans: Vec<DifferenceSpan>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    let aligner = Aligner::new(args.merge_window);

    let spans = aligner.find_differences(&args.original, &args.corrected);
    info!(spans = spans.len(), merge_window = args.merge_window, "Computed differences");

    let output = DiffOutput {
        original_tokens: tokenize(&args.original),
        corrected_tokens: tokenize(&args.corrected),
        raw: args
            .raw
            .then(|| aligner.raw_differences(&args.original, &args.corrected)),
        spans,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
