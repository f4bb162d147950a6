//! Command-line interface module

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::conversion::config::DelimiterType;
use crate::conversion::{ConversionConfig, ConversionResult};
use crate::error::{ConversionError, ConversionErrorKind, ErrorKind};
use crate::format::{InputFormat, OutputFormat};

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "dataconv")]
#[command(about = "Convert JSON, XML, YAML or CSV into JSON, XML, YAML, CSV, PDF, XLSX or PNG")]
#[command(version)]
#[command(long_about = None)]
pub struct Args {
    /// Input file or directory
    #[arg()]
    pub input: Option<PathBuf>,

    /// Output format: json, csv, xml, yaml, pdf, xlsx or png
    #[arg(short, long, value_parser = parse_output_format)]
    pub to: OutputFormat,

    /// Input format: json, csv, xml, yaml or yml (default: from extension or content)
    #[arg(short, long, value_parser = parse_input_format)]
    pub from: Option<InputFormat>,

    /// Convert this text instead of reading a file
    #[arg(long, conflicts_with_all = ["input", "stdin"])]
    pub data: Option<String>,

    /// Read input from standard input
    #[arg(long, conflicts_with = "input")]
    pub stdin: bool,

    /// Output file path, or output directory for directory input (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Recursively process directories
    #[arg(long)]
    pub recursive: bool,

    /// Continue converting other files when one file fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// CSV delimiter: comma, tab, or pipe (default: comma)
    #[arg(long)]
    pub delimiter: Option<Delimiter>,

    /// Keep every CSV cell as text instead of typing numbers, booleans and empty cells
    #[arg(long)]
    pub no_infer_types: bool,

    /// Spaces per XML indentation level (0-8, default: 4)
    #[arg(long)]
    pub xml_indent: Option<u8>,

    /// Largest accepted input (e.g., 100MB, default: 100MB)
    #[arg(long)]
    pub max_input_size: Option<String>,

    /// Output conversion statistics
    #[arg(long)]
    pub stats: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_output_format(label: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_label(label).map_err(|e| e.user_message())
}

fn parse_input_format(label: &str) -> Result<InputFormat, String> {
    InputFormat::from_label(label).map_err(|e| e.user_message())
}

/// Delimiter types for CLI
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Delimiter {
    #[value(name = "comma", alias = ",")]
    Comma,
    #[value(name = "tab", alias = "\t")]
    Tab,
    #[value(name = "pipe", alias = "|")]
    Pipe,
}

impl From<Delimiter> for DelimiterType {
    fn from(delimiter: Delimiter) -> Self {
        match delimiter {
            Delimiter::Comma => DelimiterType::Comma,
            Delimiter::Tab => DelimiterType::Tab,
            Delimiter::Pipe => DelimiterType::Pipe,
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub args: Args,
    pub conversion_config: ConversionConfig,
}

impl CliConfig {
    /// Create CLI configuration from arguments
    pub fn from_args(args: Args) -> ConversionResult<Self> {
        let conversion_config = Self::create_conversion_config(&args)?;

        Ok(Self {
            args,
            conversion_config,
        })
    }

    /// Create conversion configuration from CLI arguments
    fn create_conversion_config(args: &Args) -> ConversionResult<ConversionConfig> {
        let delimiter = args.delimiter.map(DelimiterType::from).unwrap_or(DelimiterType::Comma);
        let max_input_bytes = parse_size_limit(args.max_input_size.as_deref())?;

        let config = ConversionConfig {
            max_input_bytes,
            csv_delimiter: delimiter,
            infer_csv_types: !args.no_infer_types,
            xml_indent: args.xml_indent.unwrap_or(4),
            ..ConversionConfig::default()
        };

        // Validate configuration
        config
            .validate()
            .map_err(|e| ConversionError::conversion(ConversionErrorKind::configuration(e)))?;

        Ok(config)
    }

    /// Check if we should continue on error
    pub fn continue_on_error(&self) -> bool {
        self.args.continue_on_error
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.args.quiet
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.args.verbose
    }

    /// Check if stats output is requested
    pub fn want_stats(&self) -> bool {
        self.args.stats && !self.args.quiet
    }

    /// Get input source description
    pub fn input_description(&self) -> String {
        if self.args.stdin {
            "standard input".to_string()
        } else if self.args.data.is_some() {
            "inline data".to_string()
        } else if let Some(input) = &self.args.input {
            format!("'{}'", input.display())
        } else {
            "no input specified".to_string()
        }
    }

    /// Get output destination description
    pub fn output_description(&self) -> String {
        if let Some(output) = &self.args.output {
            format!("'{}'", output.display())
        } else {
            "standard output".to_string()
        }
    }
}

/// Parse a size limit string (e.g., "100MB", "1GB", "500KB", "2048")
pub fn parse_size_limit(limit: Option<&str>) -> ConversionResult<usize> {
    let Some(limit) = limit else {
        return Ok(100 * 1024 * 1024); // 100MB default
    };

    let limit_str = limit.trim().to_uppercase();
    let invalid = || {
        ConversionError::conversion(ConversionErrorKind::Configuration {
            message: format!("Invalid size limit: {}", limit_str),
        })
    };

    let (number, multiplier) = if let Some(size) = limit_str.strip_suffix("GB") {
        (size, 1024.0 * 1024.0 * 1024.0)
    } else if let Some(size) = limit_str.strip_suffix("MB") {
        (size, 1024.0 * 1024.0)
    } else if let Some(size) = limit_str.strip_suffix("KB") {
        (size, 1024.0)
    } else if let Some(size) = limit_str.strip_suffix('B') {
        (size, 1.0)
    } else {
        // Assume bytes
        (limit_str.as_str(), 1.0)
    };

    let value = number.trim().parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }
    Ok((value * multiplier) as usize)
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a file size in human-readable format
    pub fn format_file_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Create a progress bar for file processing
    pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new(total);
        let style = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("✓ {}", message);
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Show a warning message (if not in quiet mode)
    pub fn show_warning(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("⚠ {}", message);
        }
    }
}

/// Suggestion printed under an error, if one applies
pub fn error_tip(error: &ConversionError) -> Option<&'static str> {
    match error.kind() {
        ErrorKind::UnsupportedFormat => {
            Some("Use --from to declare the input format when it cannot be detected")
        }
        ErrorKind::Parse => Some("Check the input syntax, or pass --from if the format was guessed wrong"),
        ErrorKind::Shape => Some("CSV and XLSX output need a list of objects, e.g. [{\"a\": 1}]"),
        ErrorKind::InputTooLarge => Some("Use --max-input-size to raise the input limit"),
        ErrorKind::Encode | ErrorKind::Io | ErrorKind::Configuration => None,
    }
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &ConversionError) {
    CliUtils::show_error(&error.user_message());

    // Provide helpful suggestions
    if let Some(tip) = error_tip(error) {
        eprintln!("\nTip: {}", tip);
    }

    // Show usage hint
    eprintln!("\nTry 'dataconv --help' for usage information.");
}
