//! Formatting utilities for the Ephany CLI.
//!
//! This module provides functionality for formatting output in various formats
//! including JSON, CSV and fixed-width tables.

use csv::Writer;
use std::str::FromStr;
use strum::EnumIter;

pub const JSON: &str = "json";
pub const CSV: &str = "csv";
pub const TABLE: &str = "table";

/// Error types that can occur during formatting operations
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    /// Error when an unsupported output format is requested
    #[error("invalid output format {0}")]
    UnsupportedOutputFormat(String),
    /// Error specific to CSV operations
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Error when converting bytes to UTF-8 string
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    /// Error specific to CSV writer operations
    #[error("CSV writer error: {0}")]
    CsvWriterError(String),

    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, PartialOrd)]
pub struct OutputFormatOptions {
    pub with_headers: bool,
    pub pretty: bool,
    /// Prefix table rows with a 1-based row number
    pub numbered: bool,
}

/// Enum representing the supported output formats
#[derive(Debug, Clone, PartialEq, PartialOrd, EnumIter)]
pub enum OutputFormat {
    /// CSV (Comma-Separated Values) format
    Csv(OutputFormatOptions),
    /// JSON (JavaScript Object Notation) format
    Json(OutputFormatOptions),
    /// Human readable fixed-width table
    Table(OutputFormatOptions),
}

impl OutputFormat {
    /// Returns a vector of all supported format names as strings
    pub fn names() -> Vec<&'static str> {
        vec![TABLE, JSON, CSV]
    }

    pub fn from_string_with_options(
        format_str: &str,
        options: OutputFormatOptions,
    ) -> Result<OutputFormat, FormattingError> {
        let normalized_format = format_str.trim().to_lowercase();
        match normalized_format.as_str() {
            JSON => Ok(OutputFormat::Json(options)),
            CSV => Ok(OutputFormat::Csv(options)),
            TABLE => Ok(OutputFormat::Table(options)),
            _ => Err(FormattingError::UnsupportedOutputFormat(normalized_format)),
        }
    }

    pub fn options(&self) -> &OutputFormatOptions {
        match self {
            OutputFormat::Csv(options) | OutputFormat::Json(options) | OutputFormat::Table(options) => {
                options
            }
        }
    }

    /// Same format with row numbering switched on (only affects tables).
    pub fn numbered(self) -> OutputFormat {
        match self {
            OutputFormat::Table(options) => OutputFormat::Table(OutputFormatOptions {
                numbered: true,
                ..options
            }),
            other => other,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, OutputFormat::Table(_))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table(OutputFormatOptions::default())
    }
}

impl std::fmt::Display for OutputFormat {
    /// Formats the OutputFormat enum as a string for display purposes
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OutputFormat::Csv(_) => write!(f, "{}", CSV),
            OutputFormat::Json(_) => write!(f, "{}", JSON),
            OutputFormat::Table(_) => write!(f, "{}", TABLE),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormattingError;

    fn from_str(format_str: &str) -> Result<OutputFormat, FormattingError> {
        Self::from_string_with_options(format_str, OutputFormatOptions::default())
    }
}

/// Trait for formatting data in different output formats
pub trait OutputFormatter {
    /// The type of item being formatted
    type Item;

    /// Format the data according to the specified output format
    fn format(&self, format: OutputFormat) -> Result<String, FormattingError>;
}

/// Trait for producing CSV records from data
pub trait CsvRecordProducer {
    /// Returns the header row for the CSV output
    fn csv_header() -> Vec<String>;

    /// Converts the data into CSV records
    fn as_csv_records(&self) -> Vec<Vec<String>>;

    /// Produces CSV output with or without a header row based on the parameter
    fn to_csv(&self, with_header: bool) -> Result<String, FormattingError> {
        let mut wtr = Writer::from_writer(vec![]);
        if with_header {
            wtr.write_record(Self::csv_header())?;
        }
        for record in self.as_csv_records() {
            wtr.write_record(&record)?;
        }
        let data = wtr
            .into_inner()
            .map_err(|e| FormattingError::CsvWriterError(format!("Failed to finalize CSV: {}", e)))?;
        Ok(String::from_utf8(data)?)
    }
}

/// A fixed-width table column
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub title: &'static str,
    pub width: usize,
}

impl TableColumn {
    pub fn new(title: &'static str, width: usize) -> TableColumn {
        TableColumn { title, width }
    }
}

const ROW_NUMBER_WIDTH: usize = 4;
const COLUMN_SEPARATOR: &str = " | ";

/// Trait for producing fixed-width table output
pub trait TableRecordProducer {
    fn table_columns() -> Vec<TableColumn>;

    fn as_table_rows(&self) -> Vec<Vec<String>>;

    fn empty_table_message() -> &'static str {
        "No records found."
    }

    fn to_table(&self, numbered: bool) -> String {
        let rows = self.as_table_rows();
        if rows.is_empty() {
            return format!("{}\n", Self::empty_table_message());
        }

        let columns = Self::table_columns();

        let mut header = String::new();
        if numbered {
            header.push_str(&pad("#", ROW_NUMBER_WIDTH));
            header.push_str(COLUMN_SEPARATOR);
        }
        header.push_str(
            &columns
                .iter()
                .map(|c| pad(c.title, c.width))
                .collect::<Vec<_>>()
                .join(COLUMN_SEPARATOR),
        );

        let rule = "-".repeat(header.chars().count());
        let mut out = format!("{}\n{}\n{}\n", rule, header, rule);

        for (index, row) in rows.iter().enumerate() {
            let mut line = String::new();
            if numbered {
                line.push_str(&pad(&(index + 1).to_string(), ROW_NUMBER_WIDTH));
                line.push_str(COLUMN_SEPARATOR);
            }
            line.push_str(
                &columns
                    .iter()
                    .zip(row.iter())
                    .map(|(c, value)| pad(&truncate(value, c.width), c.width))
                    .collect::<Vec<_>>()
                    .join(COLUMN_SEPARATOR),
            );
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');

        out
    }
}

fn pad(value: &str, width: usize) -> String {
    format!("{:<width$}", value, width = width)
}

/// Shortens `value` to at most `max_length` characters, marking the cut with "...".
pub fn truncate(value: &str, max_length: usize) -> String {
    if value.chars().count() <= max_length {
        return value.to_string();
    }
    let keep = max_length.saturating_sub(3);
    let mut shortened: String = value.chars().take(keep).collect();
    shortened.push_str("...");
    shortened
}
