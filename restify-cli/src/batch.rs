//! Batch orchestration over a PEP checkout
//!
//! Thin I/O glue around the conversion core: enumerate plain-text documents,
//! convert each one independently, aggregate successes and failures, and
//! optionally back up and overwrite the shortest originals with their
//! conversions. The core never retries and never partially writes; every
//! failure here is attributed to exactly one document.

use restify_config::BatchConfig;
use restify_convert::{
    convert_file, needs_conversion, output, ConversionSummary, ConvertError, ConvertOptions,
};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One successfully converted document. The summary's `name` is the input
/// path, which `--copy` relies on to pair outputs with their origins.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub output: String,
    #[serde(flatten)]
    pub summary: ConversionSummary,
}

/// One document the core refused or failed to convert.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub input: String,
    pub error: String,
}

/// Aggregated result of one batch run. Converted entries are sorted by
/// output length, shortest first; `--copy` consumes them in that order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub found: usize,
    pub converted: Vec<BatchEntry>,
    pub skipped: Vec<String>,
    pub failed: Vec<BatchFailure>,
    pub copied: Vec<String>,
}

/// Enumerate documents in `dir` that still look like plain text: name shaped
/// `<prefix>*.<extension>`, and either declaring a plain-text content type
/// or carrying no content-type header at all. Unreadable candidates are kept
/// so the conversion pass reports them as failures.
pub fn plain_text_documents(dir: &Path, config: &BatchConfig) -> io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !matches_source_name(&path, config) {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(source) if !needs_conversion(&source) => {}
            _ => documents.push(path),
        }
    }
    documents.sort();
    Ok(documents)
}

fn matches_source_name(path: &Path, config: &BatchConfig) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let extension = path.extension().and_then(|e| e.to_str());
    name.starts_with(&config.source_prefix) && extension == Some(config.source_extension.as_str())
}

/// Remove converted documents left over from a previous run.
pub fn clear_output_dir(config: &BatchConfig) -> io::Result<()> {
    let output_dir = Path::new(&config.output_dir);
    if !output_dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(output_dir)? {
        let path = entry?.path();
        if matches_source_name(&path, config) {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}

/// Convert every plain-text document under `pep_dir`, writing outputs into
/// the configured output directory. With `copy`, back up and overwrite up to
/// that many of the shortest originals with their conversions.
pub fn run(
    pep_dir: &Path,
    config: &BatchConfig,
    options: &ConvertOptions,
    copy: Option<usize>,
) -> io::Result<BatchReport> {
    clear_output_dir(config)?;
    let output_dir = Path::new(&config.output_dir);
    fs::create_dir_all(output_dir)?;

    let documents = plain_text_documents(pep_dir, config)?;
    let mut report = BatchReport {
        found: documents.len(),
        converted: Vec::new(),
        skipped: Vec::new(),
        failed: Vec::new(),
        copied: Vec::new(),
    };

    for path in &documents {
        match convert_file(path, options) {
            Ok(doc) => {
                let destination = output_dir.join(path.file_name().expect("scanned file name"));
                output::write_document(&destination, &doc.text)?;
                report.converted.push(BatchEntry {
                    output: destination.display().to_string(),
                    summary: doc.summary(),
                });
            }
            Err(ConvertError::ConversionNotRequired(name)) => report.skipped.push(name),
            Err(err) => report.failed.push(BatchFailure {
                input: path.display().to_string(),
                error: err.to_string(),
            }),
        }
    }

    report.converted.sort_by_key(|entry| entry.summary.lines);

    if let Some(limit) = copy {
        let backup_dir = Path::new(&config.backup_dir);
        fs::create_dir_all(backup_dir)?;
        for entry in report.converted.iter().take(limit) {
            let origin = Path::new(&entry.summary.name);
            let backup = backup_dir.join(origin.file_name().expect("scanned file name"));
            fs::copy(origin, &backup)?;
            fs::copy(&entry.output, origin)?;
            report.copied.push(entry.output.clone());
        }
    }

    Ok(report)
}

/// Copy every backed-up original back over its origin. Returns the restored
/// file names.
pub fn revert(pep_dir: &Path, config: &BatchConfig) -> io::Result<Vec<String>> {
    let backup_dir = Path::new(&config.backup_dir);
    let mut restored = Vec::new();
    for entry in fs::read_dir(backup_dir)? {
        let backup = entry?.path();
        let Some(name) = backup.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let origin = pep_dir.join(name);
        fs::copy(&backup, &origin)?;
        restored.push(origin.display().to_string());
    }
    restored.sort();
    Ok(restored)
}

/// Build the rendered-page URL for each backed-up document: the file stem
/// appended to the configured base URL.
pub fn page_urls(config: &BatchConfig, base_url: &str) -> io::Result<Vec<String>> {
    let backup_dir = Path::new(&config.backup_dir);
    let mut urls = Vec::new();
    for entry in fs::read_dir(backup_dir)? {
        let path = entry?.path();
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            urls.push(format!("{base_url}{stem}"));
        }
    }
    urls.sort();
    Ok(urls)
}
