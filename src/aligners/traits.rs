// traits.rs - Aligner capability interface

use crate::data::sequence::{parse_fasta, write_fasta_to, SequenceRecord};
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Failures of an external alignment run
#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("{program} not found; install it or choose another aligner")]
    NotFound { program: String },

    #[error("alignment with {program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error while aligning: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed aligner output: {0}")]
    MalformedOutput(String),
}

/// Turns unaligned records into aligned records of the same row count.
///
/// Implementations run blocking external programs; timeouts and
/// cancellation belong to the caller.
pub trait AlignerService: Send + Sync + Debug {
    /// Short registry name
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Executable that will be invoked
    fn program(&self) -> &str;

    /// Command-line arguments for aligning `input`, output on stdout
    fn arguments(&self, input: &Path) -> Vec<String>;

    /// Align records, returning them in input order
    fn align(&self, records: &[SequenceRecord]) -> Result<Vec<SequenceRecord>, AlignerError> {
        let input = TempFasta::write(records, self.name())?;
        let output = run_program(self.program(), &self.arguments(input.path()))?;
        let aligned = parse_fasta(&output[..], self.program())
            .map_err(AlignerError::MalformedOutput)?;
        restore_input_order(records, aligned)
    }
}

/// Input FASTA in the system temp directory, removed on drop
pub(crate) struct TempFasta {
    path: PathBuf,
}

impl TempFasta {
    pub(crate) fn write(records: &[SequenceRecord], tag: &str) -> Result<Self, AlignerError> {
        let stamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let path = std::env::temp_dir().join(format!(
            "consanalyzer-{}-{}-{}.fasta",
            tag,
            std::process::id(),
            stamp
        ));
        let file = File::create(&path)?;
        let temp = Self { path };
        write_fasta_to(BufWriter::new(file), records)
            .map_err(|e| AlignerError::Io(std::io::Error::other(e)))?;
        Ok(temp)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFasta {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Run a program and capture stdout, mapping spawn and exit failures
pub(crate) fn run_program(program: &str, args: &[String]) -> Result<Vec<u8>, AlignerError> {
    log::debug!("Running {} {}", program, args.join(" "));
    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            AlignerError::NotFound {
                program: program.to_string(),
            }
        } else {
            AlignerError::Io(e)
        }
    })?;

    if !output.status.success() {
        return Err(AlignerError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}

/// Reorder aligned records to match the input and check the id sets agree
pub(crate) fn restore_input_order(
    input: &[SequenceRecord],
    aligned: Vec<SequenceRecord>,
) -> Result<Vec<SequenceRecord>, AlignerError> {
    if aligned.len() != input.len() {
        return Err(AlignerError::MalformedOutput(format!(
            "expected {} sequences, aligner returned {}",
            input.len(),
            aligned.len()
        )));
    }

    let mut by_id: HashMap<String, SequenceRecord> = aligned
        .into_iter()
        .map(|record| (record.id.clone(), record))
        .collect();

    input
        .iter()
        .map(|record| {
            by_id.remove(&record.id).ok_or_else(|| {
                AlignerError::MalformedOutput(format!(
                    "sequence '{}' missing from aligner output",
                    record.id
                ))
            })
        })
        .collect()
}
