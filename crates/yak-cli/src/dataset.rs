//! Dataset subcommands: validate/estimate, convert, and split.

use anyhow::{Context, Result};
use std::path::Path;
use yak_dataset::{convert_json_to_jsonl, estimate_training, load_jsonl, split_text, validate};

/// Validate a JSONL fine-tuning dataset and report its token budget.
pub fn check(path: &Path) -> Result<()> {
    let dataset = load_jsonl(path).with_context(|| format!("Failed to load {}", path.display()))?;

    println!("Num examples: {}", dataset.len());

    let report = validate(&dataset);
    println!("{report}");

    let estimate = estimate_training(&dataset);
    println!(
        "Dataset has ~{} tokens that will be charged for during training",
        estimate.billing_tokens
    );
    println!(
        "By default, you'll train for {} epochs on this dataset",
        estimate.n_epochs
    );
    println!(
        "By default, you'll be charged for ~{} tokens (~${:.4})",
        estimate.total_training_tokens, estimate.estimated_cost_usd
    );

    if !report.is_clean() {
        anyhow::bail!("dataset has format errors");
    }
    Ok(())
}

/// Convert a JSON array file to JSONL.
pub fn convert(input: &Path, output: &Path) -> Result<()> {
    let written = convert_json_to_jsonl(input, output)
        .with_context(|| format!("Failed to convert {}", input.display()))?;
    println!("Wrote {} entries to {}", written, output.display());
    Ok(())
}

/// Split a text file into chunks and print them.
pub fn split(path: &Path, chunk_size: usize, chunk_overlap: usize) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let chunks = split_text(&text, chunk_size, chunk_overlap);
    for (i, chunk) in chunks.iter().enumerate() {
        println!("Split {}:\n{}\n", i + 1, chunk);
    }
    println!("{} chunks", chunks.len());
    Ok(())
}
