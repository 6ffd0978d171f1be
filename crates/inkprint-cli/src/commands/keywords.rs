//! Keywords command implementation.

use crate::cli::KeywordsArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use inkprint_extractor::KeywordAnalyzer;
use inkprint_llm::AzureOpenAiProvider;
use std::io::Read;

/// Execute the keywords command.
pub fn execute_keywords(args: KeywordsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_text(&args)?;
    let count = args
        .count
        .map(usize::from)
        .unwrap_or(config.extractor.default_keyword_count);

    let provider = AzureOpenAiProvider::new(config.azure_config()?)?;
    let analyzer = KeywordAnalyzer::new(provider, config.extractor.clone());
    let report = analyzer.analyze(&text, count, args.ideate)?;

    println!("{}", formatter.format_keywords(&report)?);
    Ok(())
}

/// Text from `--file`, the positional argument, or stdin.
fn read_text(args: &KeywordsArgs) -> Result<String> {
    let text = match (&args.file, &args.text) {
        (Some(path), _) => std::fs::read_to_string(path)?,
        (None, Some(text)) => text.clone(),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    if text.trim().is_empty() {
        return Err(CliError::InvalidInput("No text to analyze".to_string()));
    }
    Ok(text)
}
