use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use gecscore::dataset::{self, TruthRow};
use gecscore::report::{self, RunStats};
use gecscore::{BatchEvaluation, EvalConfig, EvalError, RuleSet, Scorer};

#[derive(Parser, Debug)]
#[command(name = "gecscore")]
#[command(about = "Score grammar-correction submissions against a gold truth table")]
#[command(version)]
struct Args {
    /// Truth CSV with err_sentence and cor_sentence columns
    #[arg(long, default_value = "data/train_dataset.csv")]
    truth: PathBuf,

    /// Submission CSV with a cor_sentence column, or a glob pattern matching several
    #[arg(long, default_value = "submission.csv")]
    pred: String,

    /// TOML config (merge window, post-processor registry)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Post-processor from the config registry to apply to predictions before scoring
    #[arg(long)]
    postprocess: Option<String>,

    /// Directory for per-submission analysis CSVs
    #[arg(long)]
    analysis_dir: Option<PathBuf>,

    /// Stats output file path
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,

    /// Score samples on all cores
    #[arg(long)]
    parallel: bool,

    /// Abort on first submission error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,
}

/// Expand `--pred` into concrete submission paths.
fn resolve_submissions(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        paths.push(entry?);
    }
    paths.sort();
    if paths.is_empty() {
        anyhow::bail!("No submission files match: {pattern}");
    }
    Ok(paths)
}

async fn evaluate_submission(
    path: &Path,
    truth: &[TruthRow],
    scorer: &Scorer,
    postprocessor: Option<&RuleSet>,
    parallel: bool,
) -> std::result::Result<BatchEvaluation, EvalError> {
    let predictions = dataset::read_predictions(path).await?;
    let mut samples = dataset::align(truth, &predictions)?;

    if let Some(rules) = postprocessor {
        rules.apply_to_predictions(&mut samples);
    }

    Ok(if parallel {
        scorer.evaluate_batch_parallel(&samples)
    } else {
        scorer.evaluate_batch(&samples)
    })
}

/// Deepest directory containing every submission.
fn common_root(paths: &[PathBuf]) -> PathBuf {
    let mut root = paths
        .first()
        .and_then(|p| p.parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    for path in paths {
        while !path.starts_with(&root) {
            if !root.pop() {
                break;
            }
        }
    }
    root
}

/// Analysis file for `submission`, named after its path below `root` so
/// same-named files in different directories stay distinct.
fn analysis_path(dir: &Path, root: &Path, submission: &Path) -> PathBuf {
    let relative = submission.strip_prefix(root).unwrap_or(submission);
    let name = relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("__");
    let name = if name.is_empty() { "submission" } else { name.as_str() };
    dir.join(format!("{name}_analysis.csv"))
}

/// Map every submission to its analysis file, rejecting collisions.
fn analysis_paths(dir: &Path, submissions: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let root = common_root(submissions);
    let mut seen = HashSet::new();
    let mut paths = Vec::with_capacity(submissions.len());
    for submission in submissions {
        let out = analysis_path(dir, &root, submission);
        if !seen.insert(out.clone()) {
            anyhow::bail!(
                "Submissions map to the same analysis file {}: rename one of them",
                out.display()
            );
        }
        paths.push(out);
    }
    Ok(paths)
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting gecscore");
    info!(?args, "Parsed CLI arguments");

    if !args.truth.is_file() {
        anyhow::bail!("Truth file does not exist: {}", args.truth.display());
    }

    let config = EvalConfig::load_or_default(args.config.as_deref()).await?;
    let scorer = config.scorer();
    let postprocessor = args
        .postprocess
        .as_deref()
        .map(|name| config.postprocessor(name))
        .transpose()?;

    let submissions = resolve_submissions(&args.pred)?;
    let outputs: Vec<Option<PathBuf>> = match &args.analysis_dir {
        Some(dir) => analysis_paths(dir, &submissions)?.into_iter().map(Some).collect(),
        None => vec![None; submissions.len()],
    };
    let truth = dataset::read_truth(&args.truth).await?;

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(submissions.len() as u64);
        bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);
        bar
    };

    let mut run_stats = Vec::with_capacity(submissions.len());
    for (path, analysis_out) in submissions.iter().zip(&outputs) {
        progress.set_message(path.display().to_string());
        let start_time = Instant::now();

        let outcome =
            evaluate_submission(path, &truth, &scorer, postprocessor.as_ref(), args.parallel).await;
        let elapsed_ms = duration_ms(start_time.elapsed());

        match outcome {
            Ok(batch) => {
                if let Some(out) = analysis_out {
                    report::write_analysis_csv(out, &batch.analysis).await?;
                    info!("Analysis results saved to {}", out.display());
                }
                run_stats.push(RunStats::success(
                    path,
                    args.postprocess.as_deref(),
                    batch.analysis.len(),
                    batch.result,
                    elapsed_ms,
                ));
            }
            Err(e) => {
                warn!("Error during evaluation of {}: {}", path.display(), e);
                if args.fail_fast {
                    progress.abandon();
                    return Err(e.into());
                }
                run_stats.push(RunStats::failed(path, args.postprocess.as_deref(), &e, elapsed_ms));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    report::write_run_stats(&args.stats_out, &run_stats).await?;
    info!("Run stats written to {}", args.stats_out.display());

    println!("{}", report::comparison_markdown(&run_stats));

    let failed = run_stats.iter().filter(|s| s.result.is_none()).count();
    if failed > 0 {
        println!("{failed} submission(s) failed validation");
    }

    Ok(())
}
