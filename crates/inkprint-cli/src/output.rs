//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use colored::*;
use inkprint_capture::{CaptureOutcome, SavedImage};
use inkprint_domain::ContentTable;
use inkprint_extractor::KeywordReport;
use serde::Serialize;
use std::io::Write;
use tabled::{
    builder::Builder,
    settings::{
        object::{Columns, Rows},
        Alignment, Modify, Style, Width,
    },
};

/// UTF-8 byte order mark written before CSV output
pub const UTF8_BOM: &str = "\u{feff}";

const CONTENT_WIDTH: usize = 80;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an author/content table.
    pub fn format_content(&self, table: &ContentTable) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(table)?),
            OutputFormat::Csv => {
                let mut buf = Vec::new();
                write_csv(table, &mut buf)?;
                String::from_utf8(buf).map_err(|e| CliError::InvalidInput(e.to_string()))
            }
            OutputFormat::Table => Ok(self.format_content_table(table)),
        }
    }

    fn format_content_table(&self, table: &ContentTable) -> String {
        if table.is_empty() {
            return self.colorize("No content found for this author.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Author", "Content"]);
        for row in table {
            builder.push_record([row.author.as_str(), row.content.as_str()]);
        }

        let mut rendered = builder.build();
        rendered
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Columns::single(1)).with(Width::wrap(CONTENT_WIDTH)));
        rendered.to_string()
    }

    /// Format keywords and optional sites.
    pub fn format_keywords(&self, report: &KeywordReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record(["kind", "value"])?;
                for keyword in &report.keywords {
                    writer.write_record(["keyword", keyword.as_str()])?;
                }
                for site in report.sites.iter().flatten() {
                    writer.write_record(["site", site.as_str()])?;
                }
                let bytes = writer
                    .into_inner()
                    .map_err(|e| CliError::Io(e.into_error()))?;
                let body = String::from_utf8(bytes).map_err(|e| CliError::InvalidInput(e.to_string()))?;
                Ok(format!("{}{}", UTF8_BOM, body))
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Keyword"]);
                for keyword in &report.keywords {
                    builder.push_record([keyword.as_str()]);
                }
                let mut keywords = builder.build();
                keywords.with(Style::rounded());
                let mut out = keywords.to_string();

                if let Some(sites) = &report.sites {
                    let mut builder = Builder::default();
                    builder.push_record(["Search sites"]);
                    for site in sites {
                        builder.push_record([site.as_str()]);
                    }
                    let mut sites = builder.build();
                    sites.with(Style::rounded());
                    out.push('\n');
                    out.push_str(&sites.to_string());
                }
                Ok(out)
            }
        }
    }

    /// Format the result of a capture run.
    pub fn format_capture(&self, outcome: &CaptureOutcome) -> Result<String> {
        let view = CaptureView::from(outcome);
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&view)?),
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record(["url", "path"])?;
                for image in view.images {
                    let path = image.path.display().to_string();
                    writer.write_record([image.url.as_str(), path.as_str()])?;
                }
                let bytes = writer
                    .into_inner()
                    .map_err(|e| CliError::Io(e.into_error()))?;
                let body = String::from_utf8(bytes).map_err(|e| CliError::InvalidInput(e.to_string()))?;
                Ok(format!("{}{}", UTF8_BOM, body))
            }
            OutputFormat::Table => {
                if view.images.is_empty() {
                    let mut msg = self.error("No screenshots captured.");
                    if view.exhausted {
                        msg.push('\n');
                        msg.push_str(&self.warning("All screenshot API keys are exhausted."));
                    }
                    return Ok(msg);
                }

                let mut builder = Builder::default();
                builder.push_record(["URL", "File"]);
                for image in view.images {
                    builder.push_record([image.url.clone(), image.file_name()]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                let mut out = table.to_string();
                out.push('\n');
                out.push_str(&self.success(&format!(
                    "{} screenshot(s) captured.",
                    view.images.len()
                )));
                if let Some(archive) = view.archive_path {
                    out.push('\n');
                    out.push_str(&self.info(&format!("Archive: {}", archive.display())));
                }
                if view.exhausted {
                    out.push('\n');
                    out.push_str(&self.warning("Stopped early: all screenshot API keys are exhausted."));
                }
                Ok(out)
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Write `table` as CSV with a UTF-8 byte order mark and an
/// `author,content` header.
pub fn write_csv<W: Write>(table: &ContentTable, mut out: W) -> Result<()> {
    out.write_all(UTF8_BOM.as_bytes())?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["author", "content"])?;
    for row in table {
        writer.write_record([row.author.as_str(), row.content.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Serializable summary of a capture run
#[derive(Debug, Serialize)]
struct CaptureView<'a> {
    captured: bool,
    exhausted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<String>,
    run_dir: &'a std::path::Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    archive_path: Option<&'a std::path::Path>,
    images: &'a [SavedImage],
}

impl<'a> From<&'a CaptureOutcome> for CaptureView<'a> {
    fn from(outcome: &'a CaptureOutcome) -> Self {
        match outcome {
            CaptureOutcome::NothingCaptured { run_dir, exhausted } => Self {
                captured: false,
                exhausted: *exhausted,
                run_id: None,
                run_dir,
                archive_path: None,
                images: &[],
            },
            CaptureOutcome::Captured(report) => Self {
                captured: true,
                exhausted: report.exhausted,
                run_id: Some(report.run_id.to_string()),
                run_dir: &report.run_dir,
                archive_path: Some(&report.archive_path),
                images: &report.images,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkprint_capture::{CaptureReport, RunId};
    use inkprint_domain::ContentRow;
    use std::path::PathBuf;

    fn table() -> ContentTable {
        vec![
            ContentRow::new("alice", "first, with comma"),
            ContentRow::new("alice", "second"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_csv_has_bom_and_header() {
        let mut buf = Vec::new();
        write_csv(&table(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("\u{feff}author,content\n"));
        assert!(text.contains("alice,\"first, with comma\"\n"));
        assert!(text.ends_with("alice,second\n"));
    }

    #[test]
    fn test_json_content_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_content(&table()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[1]["content"], "second");
    }

    #[test]
    fn test_table_content_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_content(&table()).unwrap();
        assert!(output.contains("Author"));
        assert!(output.contains("second"));
    }

    #[test]
    fn test_empty_content() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_content(&ContentTable::new()).unwrap();
        assert!(output.contains("No content found"));
    }

    #[test]
    fn test_keywords_json_omits_missing_sites() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let report = KeywordReport {
            keywords: vec!["lah".to_string()],
            sites: None,
        };
        let output = formatter.format_keywords(&report).unwrap();
        assert!(output.contains("lah"));
        assert!(!output.contains("sites"));
    }

    #[test]
    fn test_keywords_csv() {
        let formatter = Formatter::new(OutputFormat::Csv, false);
        let report = KeywordReport {
            keywords: vec!["lah".to_string()],
            sites: Some(vec!["site:reddit.com".to_string()]),
        };
        let output = formatter.format_keywords(&report).unwrap();
        assert_eq!(output, "\u{feff}kind,value\nkeyword,lah\nsite,site:reddit.com\n");
    }

    #[test]
    fn test_nothing_captured_message() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let outcome = CaptureOutcome::NothingCaptured {
            run_dir: PathBuf::from("/tmp/run"),
            exhausted: true,
        };
        let output = formatter.format_capture(&outcome).unwrap();
        assert!(output.contains("No screenshots captured."));
        assert!(output.contains("exhausted"));
    }

    #[test]
    fn test_capture_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let report = CaptureReport {
            run_id: RunId::nil(),
            run_dir: PathBuf::from("/tmp/run"),
            images: vec![SavedImage {
                url: "https://a.example".to_string(),
                path: PathBuf::from("/tmp/run/a_example__.png"),
            }],
            archive_path: PathBuf::from("/tmp/run/screenshots.zip"),
            exhausted: false,
        };
        let output = formatter
            .format_capture(&CaptureOutcome::Captured(report))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["captured"], true);
        assert_eq!(value["images"][0]["url"], "https://a.example");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
