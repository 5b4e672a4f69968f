//! Batch processing of a directory of documents on a bounded worker pool.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::error::{Error, Result};
use crate::model::OutlineDocument;
use crate::parser::{BatchOptions, LopdfBackend, OutlineOptions};
use crate::render::{write_json, JsonFormat};

/// Result of processing one input file.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Source document
    pub input: PathBuf,
    /// JSON file written (or that would have been written on failure)
    pub output: PathBuf,
    /// Extracted document, or why extraction failed
    pub result: Result<OutlineDocument>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// List the PDF files directly inside `dir`, sorted by path.
///
/// The `.pdf` extension is matched case-insensitively; subdirectories are
/// not descended into.
pub fn find_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Output path for an input: `<output_dir>/<stem>.json`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// Extract the outline of every input and write `<stem>.json` files.
///
/// At most `batch.jobs` documents are processed at once. A failing document
/// is reported in its outcome and never stops the others. Outcomes are
/// returned in input order.
pub fn process_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    batch: &BatchOptions,
    options: &OutlineOptions,
) -> Result<Vec<BatchOutcome>> {
    process_batch_with_progress(inputs, output_dir, batch, options, |_| {})
}

/// Like [`process_batch`], calling `on_done` as each document finishes.
///
/// `on_done` runs on worker threads in completion order.
pub fn process_batch_with_progress<F>(
    inputs: &[PathBuf],
    output_dir: &Path,
    batch: &BatchOptions,
    options: &OutlineOptions,
    on_done: F,
) -> Result<Vec<BatchOutcome>>
where
    F: Fn(&BatchOutcome) + Sync,
{
    options.validate()?;
    fs::create_dir_all(output_dir)?;

    let pool = ThreadPoolBuilder::new()
        .num_threads(batch.jobs.max(1))
        .build()
        .map_err(|e| Error::Other(format!("Failed to start worker pool: {}", e)))?;

    log::debug!(
        "Processing {} documents with {} workers",
        inputs.len(),
        batch.jobs.max(1)
    );

    let outcomes = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let outcome = process_one(input, output_dir, options);
                on_done(&outcome);
                outcome
            })
            .collect()
    });
    Ok(outcomes)
}

fn process_one(input: &Path, output_dir: &Path, options: &OutlineOptions) -> BatchOutcome {
    let output = output_path_for(input, output_dir);
    let result = extract_and_write(input, &output, options);
    if let Err(e) = &result {
        log::warn!("Failed to process {}: {}", input.display(), e);
    }
    BatchOutcome {
        input: input.to_path_buf(),
        output,
        result,
    }
}

fn extract_and_write(input: &Path, output: &Path, options: &OutlineOptions) -> Result<OutlineDocument> {
    let backend = LopdfBackend::open(input)?;
    let doc = crate::outline::extract_outline(&backend, options)?;
    write_json(output, &doc, JsonFormat::Pretty)?;
    Ok(doc)
}
