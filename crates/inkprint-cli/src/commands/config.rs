//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, path),
        ConfigAction::Init { force } => init_config(path, force, formatter),
    }
}

/// Print the effective configuration with secrets masked.
fn show_config(config: &Config, path: &Path) -> Result<()> {
    println!("# {}", path.display());
    println!("{}", render_masked(config)?);
    Ok(())
}

fn render_masked(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    shown.azure.api_key = mask(&shown.azure.api_key);
    shown.screenshots.api_keys = shown.screenshots.api_keys.iter().map(|k| mask(k)).collect();

    toml::to_string_pretty(&shown)
        .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
}

/// Write a default configuration file.
fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save_to(path)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote default configuration to {}", path.display()))
    );
    Ok(())
}

/// Keep the last four characters of a secret.
fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("abc"), "****");
        assert_eq!(mask("sk-1234567890"), "****7890");
    }

    #[test]
    fn test_show_hides_secrets() {
        let mut config = Config::default();
        config.azure.api_key = "azure-secret-key".to_string();
        config.screenshots.api_keys = vec!["shot-secret-1".to_string()];

        let rendered = render_masked(&config).unwrap();
        assert!(!rendered.contains("azure-secret-key"));
        assert!(!rendered.contains("shot-secret-1"));
        assert!(rendered.contains("****-key"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);

        init_config(&path, false, &formatter).unwrap();
        assert!(path.exists());
        assert!(matches!(
            init_config(&path, false, &formatter),
            Err(CliError::InvalidInput(_))
        ));
        assert!(init_config(&path, true, &formatter).is_ok());
    }
}
