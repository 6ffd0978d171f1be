//! Capture command implementation.

use crate::cli::CaptureArgs;
use crate::commands::extract::{print_extraction, run_extraction};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use inkprint_capture::{CaptureOutcome, CaptureSession, ScreenshotMachineClient};
use inkprint_extractor::load_images;
use inkprint_llm::AzureOpenAiProvider;
use std::fs;
use std::path::PathBuf;

/// Execute the capture command.
pub fn execute_capture(args: CaptureArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let urls = collect_urls(&args)?;

    let mut pool = config.credential_pool();
    if pool.is_empty() {
        return Err(CliError::Config(
            "No screenshot API keys (SCREENSHOTMACHINE_API_KEYS or [screenshots].api_keys)".into(),
        ));
    }

    // Model config is checked before any screenshot request
    let provider = match &args.author {
        Some(_) => Some(AzureOpenAiProvider::new(config.azure_config()?)?),
        None => None,
    };

    println!(
        "{}",
        formatter.info(&format!("Processing {} URL(s)...", urls.len()))
    );

    let client = ScreenshotMachineClient::new(config.screenshots.api.clone())?;
    let mut session = CaptureSession::new(client, &config.screenshots.api, config.cache_dir()?);
    let outcome = session.capture(&urls, &mut pool)?;
    println!("{}", formatter.format_capture(&outcome)?);

    let (Some(author), Some(provider), CaptureOutcome::Captured(report)) =
        (args.author.as_deref(), provider.as_ref(), &outcome)
    else {
        return Ok(());
    };

    let paths: Vec<PathBuf> = report.images.iter().map(|image| image.path.clone()).collect();
    let batch = load_images(&paths)?;
    let output = run_extraction(
        provider,
        &config.extractor,
        author,
        &batch,
        args.keywords.map(usize::from),
        false,
    )?;

    print_extraction(&output, None, formatter)
}

/// URLs from `--urls-file` (one per line) followed by positional URLs.
///
/// Blank lines are ignored.
fn collect_urls(args: &CaptureArgs) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    if let Some(path) = &args.urls_file {
        let contents = fs::read_to_string(path)?;
        urls.extend(contents.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from));
    }
    urls.extend(
        args.urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(String::from),
    );

    if urls.is_empty() {
        return Err(CliError::InvalidInput(
            "No URLs given (pass URLs or --urls-file)".to_string(),
        ));
    }
    Ok(urls)
}
