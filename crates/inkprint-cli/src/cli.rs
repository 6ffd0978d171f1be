//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Inkprint - find what an author wrote in screenshots, and where to look
/// for more.
#[derive(Debug, Parser)]
#[command(name = "inkprint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.inkprint/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Azure OpenAI endpoint
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT", global = true)]
    pub azure_endpoint: Option<String>,

    /// Azure OpenAI API key
    #[arg(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub azure_api_key: Option<String>,

    /// Comma-separated screenshot API keys
    #[arg(long, env = "SCREENSHOTMACHINE_API_KEYS", hide_env_values = true, global = true)]
    pub screenshot_keys: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// CSV with UTF-8 byte order mark
    Csv,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract an author's content from screenshots
    Extract(ExtractArgs),

    /// Capture screenshots of URLs
    Capture(CaptureArgs),

    /// Suggest keywords (and search sites) for a text
    Keywords(KeywordsArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Author name or handle, matched exactly
    #[arg(short, long)]
    pub author: String,

    /// Also suggest this many keywords from the extracted text
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=20))]
    pub keywords: Option<u8>,

    /// Also suggest websites to search (requires --keywords)
    #[arg(long, requires = "keywords")]
    pub ideate: bool,

    /// Write the table as CSV to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Image files (png, jpg, jpeg, webp) or zip archives of them
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Arguments for the capture command.
#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// File with one URL per line
    #[arg(short, long)]
    pub urls_file: Option<PathBuf>,

    /// Run extraction for this author on the captured screenshots
    #[arg(short, long)]
    pub author: Option<String>,

    /// With --author, also suggest this many keywords
    #[arg(short, long, requires = "author", value_parser = clap::value_parser!(u8).range(1..=20))]
    pub keywords: Option<u8>,

    /// URLs to capture
    pub urls: Vec<String>,
}

/// Arguments for the keywords command.
#[derive(Debug, Args)]
pub struct KeywordsArgs {
    /// Number of keywords
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u8).range(1..=20))]
    pub count: Option<u8>,

    /// Also suggest websites to search
    #[arg(long)]
    pub ideate: bool,

    /// Read the text from a file
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// The text to analyze
    pub text: Option<String>,
}

/// Arguments for the config command.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Action to perform
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (secrets masked)
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Csv => crate::config::OutputFormat::Csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "inkprint",
            "extract",
            "--author",
            "kopi_uncle88",
            "-k",
            "5",
            "--ideate",
            "a.png",
            "b.zip",
        ]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.author, "kopi_uncle88");
                assert_eq!(args.keywords, Some(5));
                assert!(args.ideate);
                assert_eq!(args.paths.len(), 2);
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_extract_requires_paths() {
        assert!(Cli::try_parse_from(["inkprint", "extract", "--author", "a"]).is_err());
    }

    #[test]
    fn test_keyword_count_range() {
        assert!(Cli::try_parse_from(["inkprint", "keywords", "-n", "0", "text"]).is_err());
        assert!(Cli::try_parse_from(["inkprint", "keywords", "-n", "21", "text"]).is_err());
        assert!(Cli::try_parse_from(["inkprint", "keywords", "-n", "20", "text"]).is_ok());
    }

    #[test]
    fn test_ideate_requires_keywords() {
        assert!(Cli::try_parse_from(["inkprint", "extract", "-a", "x", "--ideate", "a.png"]).is_err());
    }

    #[test]
    fn test_capture_command() {
        let cli = Cli::parse_from(["inkprint", "--format", "json", "capture", "https://a.example"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        match cli.command {
            Command::Capture(args) => assert_eq!(args.urls, vec!["https://a.example"]),
            _ => panic!("Expected Capture command"),
        }
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["inkprint", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { force: true }
            })
        ));
    }
}
