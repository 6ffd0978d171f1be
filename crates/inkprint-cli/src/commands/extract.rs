//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::{write_csv, Formatter};
use inkprint_domain::{ContentTable, ImageBatch, LlmProvider};
use inkprint_extractor::{
    load_images, BatchProcessor, ExtractorConfig, ImageOutcome, KeywordAnalyzer, KeywordReport,
};
use inkprint_llm::AzureOpenAiProvider;
use std::fmt::Display;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Extraction results for one author.
#[derive(Debug)]
pub struct ExtractionOutput {
    /// Cleaned author/content rows
    pub table: ContentTable,
    /// Keywords (and sites), when requested and there was text to analyze
    pub keywords: Option<KeywordReport>,
    /// `(source, index, error)` for images whose verification failed
    pub failures: Vec<(String, usize, String)>,
}

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let provider = AzureOpenAiProvider::new(config.azure_config()?)?;
    let batch = load_images(&args.paths)?;
    println!(
        "{}",
        formatter.info(&format!(
            "Processing {} image(s) from {} file(s)...",
            batch.total_images(),
            batch.source_count()
        ))
    );

    let output = run_extraction(
        &provider,
        &config.extractor,
        &args.author,
        &batch,
        args.keywords.map(usize::from),
        args.ideate,
    )?;

    print_extraction(&output, args.output.as_deref(), formatter)
}

/// Run the pipeline, then keyword analysis on the extracted text.
///
/// Keyword analysis is skipped when nothing was extracted.
pub fn run_extraction<P>(
    provider: P,
    config: &ExtractorConfig,
    author: &str,
    batch: &ImageBatch,
    keyword_count: Option<usize>,
    ideate: bool,
) -> Result<ExtractionOutput>
where
    P: LlmProvider + Copy,
    P::Error: Display,
{
    let processor = BatchProcessor::new(provider, config.clone());

    let mut failures = Vec::new();
    let table = processor.process_with(author, batch, |progress| {
        if let ImageOutcome::Failed { error } = &progress.outcome {
            failures.push((progress.source.clone(), progress.index, error.clone()));
        }
    })?;

    let keywords = match keyword_count {
        Some(count) if !table.is_empty() => {
            let analyzer = KeywordAnalyzer::new(provider, config.clone());
            Some(analyzer.analyze(&table.joined_content(), count, ideate)?)
        }
        _ => None,
    };

    Ok(ExtractionOutput {
        table,
        keywords,
        failures,
    })
}

/// Print the table, failures and keywords; write the CSV if asked.
pub fn print_extraction(
    output: &ExtractionOutput,
    csv_path: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    for (source, index, error) in &output.failures {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} (image {}): {}", source, index + 1, error))
        );
    }

    println!("{}", formatter.format_content(&output.table)?);

    if let Some(path) = csv_path {
        write_csv(&output.table, BufWriter::new(File::create(path)?))?;
        println!(
            "{}",
            formatter.success(&format!(
                "Wrote {} row(s) to {}",
                output.table.len(),
                path.display()
            ))
        );
    }

    if let Some(report) = &output.keywords {
        println!("{}", formatter.format_keywords(report)?);
    }

    Ok(())
}
