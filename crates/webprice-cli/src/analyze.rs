//! `analyze` command: run the pipeline over export files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use webprice_core::AnalysisSettings;
use webprice_engine::{analyze_bytes, AnalysisReport, TracingObserver};

use crate::format::render_report;

#[derive(Debug, Serialize)]
struct FileOutcome {
    file: String,
    #[serde(flatten)]
    result: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outcome {
    Report(Box<AnalysisReport>),
    Failed { error: String, code: &'static str },
}

/// Every `*.csv` file directly inside `dir`, sorted by path.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub(crate) fn discover_csv_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn analyze_file(path: &Path, settings: &AnalysisSettings) -> Outcome {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return Outcome::Failed {
                error: format!("failed to read file: {e}"),
                code: "io_error",
            }
        }
    };
    match analyze_bytes(&bytes, settings, &TracingObserver) {
        Ok(report) => Outcome::Report(Box::new(report)),
        Err(e) => Outcome::Failed {
            error: e.to_string(),
            code: e.code(),
        },
    }
}

fn analyze_files(paths: &[PathBuf], settings: &AnalysisSettings) -> Vec<FileOutcome> {
    paths
        .iter()
        .map(|path| {
            tracing::info!(file = %path.display(), strategy = %settings.strategy, "analyzing file");
            let result = analyze_file(path, settings);
            if let Outcome::Failed { error, code } = &result {
                tracing::warn!(file = %path.display(), code, error = %error, "file skipped");
            }
            FileOutcome {
                file: path.display().to_string(),
                result,
            }
        })
        .collect()
}

/// Analyzes `paths` (or every `.csv` in the current directory) and prints
/// the reports. A failing file is reported and the rest still run.
///
/// # Errors
///
/// Returns an error if no file was found, the JSON output cannot be
/// serialized, or at least one file failed.
pub(crate) fn run_analyze(
    paths: &[PathBuf],
    settings: &AnalysisSettings,
    json: bool,
) -> anyhow::Result<()> {
    let paths = if paths.is_empty() {
        discover_csv_files(Path::new("."))?
    } else {
        paths.to_vec()
    };
    anyhow::ensure!(
        !paths.is_empty(),
        "no .csv files found in the current directory; pass export paths explicitly"
    );

    let outcomes = analyze_files(&paths, settings);
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o.result, Outcome::Failed { .. }))
        .count();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Outcome::Report(report) => println!("{}", render_report(&outcome.file, report)),
                Outcome::Failed { error, code } => {
                    eprintln!("{}: {error} ({code})", outcome.file);
                }
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", outcomes.len());
    }
    Ok(())
}
