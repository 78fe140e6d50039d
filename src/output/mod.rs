// mod.rs - Output formatters module

use crate::core::{AnalysisConfig, AnalysisSummary, Classification, ColumnResult};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Delimited table format for result files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tsv,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unsupported output format: {}. Use: tsv, csv", s)),
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            OutputFormat::Tsv => b'\t',
            OutputFormat::Csv => b',',
        }
    }

    /// Guess the format of an existing table from its extension
    pub fn from_path(path: &str) -> Self {
        if path.to_lowercase().ends_with(".csv") {
            OutputFormat::Csv
        } else {
            OutputFormat::Tsv
        }
    }
}

/// Files written for one output prefix
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub conserved: String,
    pub mutated: String,
    pub columns: String,
}

impl OutputPaths {
    pub fn new(prefix: &str, format: OutputFormat) -> Self {
        let ext = format.extension();
        Self {
            conserved: format!("{}.conserved.{}", prefix, ext),
            mutated: format!("{}.mutated.{}", prefix, ext),
            columns: format!("{}.columns.{}", prefix, ext),
        }
    }
}

/// Where the aligned input is saved when an aligner ran
pub fn aligned_fasta_path(prefix: &str) -> String {
    format!("{}.aligned.fasta", prefix)
}

/// One row of the per-column table, as read back by downstream tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRow {
    #[serde(rename = "Position")]
    pub position: usize,
    #[serde(rename = "Residue")]
    pub residue: char,
    #[serde(rename = "Match_Count")]
    pub match_count: usize,
    #[serde(rename = "Depth")]
    pub depth: usize,
    #[serde(rename = "Conservation_Rate")]
    pub conservation_rate: f64,
    #[serde(rename = "Classification")]
    pub classification: Classification,
    #[serde(rename = "P_Value")]
    pub p_value: f64,
    #[serde(rename = "Adjusted_P_Value")]
    pub adjusted_p_value: f64,
}

const CATEGORY_HEADER: [&str; 7] = [
    "Position",
    "Residue",
    "Conservation_Rate",
    "Match_Count",
    "Depth",
    "P_Value",
    "Adjusted_P_Value",
];

const COLUMN_HEADER: [&str; 8] = [
    "Position",
    "Residue",
    "Match_Count",
    "Depth",
    "Conservation_Rate",
    "Classification",
    "P_Value",
    "Adjusted_P_Value",
];

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        create_dir_all(parent).map_err(|e| {
            format!("Failed to create parent directory '{}': {}", parent.display(), e)
        })?;
    }
    Ok(())
}

/// Create the file, write the command header and hand back a delimited writer
fn open_table(
    file_path: &str,
    format: OutputFormat,
    command_line: &str,
) -> Result<csv::Writer<BufWriter<File>>, String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    // Write command header
    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# consanalyzer v{}", env!("CARGO_PKG_VERSION"))
        .map_err(|e| format!("Write error: {}", e))?;

    Ok(csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(writer))
}

fn format_rate(rate: f64) -> String {
    format!("{:.4}", rate)
}

fn format_p_value(p: f64) -> String {
    format!("{:.4e}", p)
}

/// Write the conserved or mutated column table
pub fn write_category_table(
    file_path: &str,
    columns: &[ColumnResult],
    format: OutputFormat,
    command_line: &str,
) -> Result<(), String> {
    let mut writer = open_table(file_path, format, command_line)?;
    writer
        .write_record(CATEGORY_HEADER)
        .map_err(|e| format!("Write error: {}", e))?;

    for column in columns {
        writer
            .write_record([
                column.position.to_string(),
                column.residue.to_string(),
                format_rate(column.conservation_rate),
                column.match_count.to_string(),
                column.depth.to_string(),
                format_p_value(column.p_value),
                format_p_value(column.adjusted_p_value),
            ])
            .map_err(|e| format!("Write error: {}", e))?;
    }

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

/// Write the full per-column series in alignment order
pub fn write_column_table(
    file_path: &str,
    summary: &AnalysisSummary,
    format: OutputFormat,
    command_line: &str,
) -> Result<(), String> {
    let mut writer = open_table(file_path, format, command_line)?;
    writer
        .write_record(COLUMN_HEADER)
        .map_err(|e| format!("Write error: {}", e))?;

    for column in &summary.columns {
        writer
            .write_record([
                column.position.to_string(),
                column.residue.to_string(),
                column.match_count.to_string(),
                column.depth.to_string(),
                format_rate(column.conservation_rate),
                column.classification.to_string(),
                format_p_value(column.p_value),
                format_p_value(column.adjusted_p_value),
            ])
            .map_err(|e| format!("Write error: {}", e))?;
    }

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

/// Read a per-column table written by `write_column_table`
pub fn read_column_table(file_path: &str) -> Result<Vec<ColumnRow>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(OutputFormat::from_path(file_path).delimiter())
        .comment(Some(b'#'))
        .from_path(file_path)
        .map_err(|e| format!("Failed to open table '{}': {}", file_path, e))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| format!("Invalid row {} in '{}': {}", i + 1, file_path, e))
        })
        .collect()
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    tool: &'static str,
    version: &'static str,
    generated: String,
    command: &'a str,
    config: &'a AnalysisConfig,
    summary: &'a AnalysisSummary,
}

/// Write the analysis summary and its configuration as pretty JSON
pub fn write_summary_json(
    file_path: &str,
    summary: &AnalysisSummary,
    config: &AnalysisConfig,
    command_line: &str,
) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    let report = SummaryReport {
        tool: "consanalyzer",
        version: env!("CARGO_PKG_VERSION"),
        generated: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        command: command_line,
        config,
        summary,
    };
    serde_json::to_writer_pretty(&mut writer, &report)
        .map_err(|e| format!("Failed to serialize summary: {}", e))?;
    writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;

    println!("✅ Summary JSON written to: {}", file_path);
    Ok(())
}

/// Write the conserved, mutated and per-column tables for an output prefix
pub fn write_results(
    prefix: &str,
    format: OutputFormat,
    summary: &AnalysisSummary,
    command_line: &str,
) -> Result<OutputPaths, String> {
    let paths = OutputPaths::new(prefix, format);

    write_category_table(&paths.conserved, &summary.conserved, format, command_line)?;
    println!(
        "✅ Conserved columns ({}) written to: {}",
        summary.conserved.len(),
        paths.conserved
    );

    write_category_table(&paths.mutated, &summary.mutated, format, command_line)?;
    println!(
        "✅ Mutated columns ({}) written to: {}",
        summary.mutated.len(),
        paths.mutated
    );

    write_column_table(&paths.columns, summary, format, command_line)?;
    println!("✅ Column series written to: {}", paths.columns);

    Ok(paths)
}
