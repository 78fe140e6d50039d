// sequence.rs - Sequence records and FASTA handling

use bio::io::fasta;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A single named sequence, aligned or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub id: String,
    pub symbols: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, symbols: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            symbols: symbols.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Parse FASTA records from any reader, keeping file order
pub fn parse_fasta<R: Read>(reader: R, source: &str) -> Result<Vec<SequenceRecord>, String> {
    let reader = fasta::Reader::new(reader);
    let mut records = Vec::new();

    for record_result in reader.records() {
        let record = record_result
            .map_err(|e| format!("Invalid FASTA record in {}: {}", source, e))?;
        records.push(SequenceRecord::new(record.id(), record.seq().to_vec()));
    }

    Ok(records)
}

/// Load all records of a FASTA file
pub fn read_fasta(path: &Path) -> Result<Vec<SequenceRecord>, String> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open FASTA file {}: {}", path.display(), e))?;

    let records = parse_fasta(BufReader::new(file), &path.display().to_string())?;
    if records.is_empty() {
        return Err(format!("No FASTA records found in {}", path.display()));
    }

    println!("🧬 Loaded {} sequences from: {}", records.len(), path.display());
    Ok(records)
}

/// Write records as FASTA to any writer
pub fn write_fasta_to<W: Write>(writer: W, records: &[SequenceRecord]) -> Result<(), String> {
    let mut writer = fasta::Writer::new(writer);
    for record in records {
        writer
            .write(&record.id, None, &record.symbols)
            .map_err(|e| format!("Failed to write FASTA record '{}': {}", record.id, e))?;
    }
    writer.flush().map_err(|e| format!("Flush error: {}", e))
}

/// Write records to a FASTA file
pub fn write_fasta(path: &Path, records: &[SequenceRecord]) -> Result<(), String> {
    let file = File::create(path)
        .map_err(|e| format!("Failed to create FASTA file {}: {}", path.display(), e))?;
    write_fasta_to(BufWriter::new(file), records)
}

/// True when every record has the same length (an empty set counts as aligned)
pub fn is_aligned(records: &[SequenceRecord]) -> bool {
    match records.first() {
        Some(first) => records.iter().all(|r| r.len() == first.len()),
        None => true,
    }
}

/// Keep only records whose identifiers pass the include/exclude patterns
pub fn filter_records(
    records: Vec<SequenceRecord>,
    include: Option<&Regex>,
    exclude: Option<&Regex>,
) -> Result<Vec<SequenceRecord>, String> {
    if include.is_none() && exclude.is_none() {
        return Ok(records);
    }

    let initial = records.len();
    let kept: Vec<_> = records
        .into_iter()
        .filter(|record| {
            if let Some(regex) = include {
                if !regex.is_match(&record.id) {
                    return false;
                }
            }
            if let Some(regex) = exclude {
                if regex.is_match(&record.id) {
                    return false;
                }
            }
            true
        })
        .collect();

    if kept.len() != initial {
        println!(
            "🔍 Sequence filters: kept {} sequences (removed {})",
            kept.len(),
            initial - kept.len()
        );
    }

    if kept.is_empty() {
        return Err("No sequences remain after filtering".to_string());
    }

    Ok(kept)
}

/// Find the first identifier that occurs more than once
pub fn find_duplicate_id(records: &[SequenceRecord]) -> Option<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .find(|r| !seen.insert(r.id.as_str()))
        .map(|r| r.id.as_str())
}
