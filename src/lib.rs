// lib.rs - consanalyzer library root

//! # consanalyzer - Conservation and mutation detection for multiple sequence alignments
//!
//! This library scores every column of a multiple sequence alignment against
//! a comparison basis (the column majority symbol or a chosen reference
//! sequence), classifies columns as conserved, mutated or neutral, and
//! attaches a binomial null-model p-value to each of them.
//!
//! ## Features
//!
//! - **Column profiling**: Symbol tallies, majority symbol and conservation rate per column
//! - **Classification**: Threshold bands for conserved and mutated columns
//! - **Significance**: Log-space binomial tail p-values with Benjamini-Hochberg adjustment
//! - **Aligner services**: MAFFT and Clustal Omega for unaligned input
//! - **Multiple formats**: TSV, CSV and JSON output
//! - **Parallel**: Columns are profiled in parallel with deterministic results
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use consanalyzer::prelude::*;
//!
//! let records = read_fasta(std::path::Path::new("alignment.fasta"))?;
//! let config = AnalysisConfig {
//!     conservation_threshold: 0.9,
//!     mutation_threshold: 0.3,
//!     ..AnalysisConfig::default()
//! };
//!
//! let summary = analyze(records, &config).map_err(|e| e.to_string())?;
//! println!("{} conserved columns", summary.conserved.len());
//! # Ok::<(), String>(())
//! ```

// Re-export all main modules
pub mod aligners;
pub mod cli;
pub mod core;
pub mod data;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::aligners::{AlignerError, AlignerRegistry, AlignerService, ClustalOmega, Mafft};
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{analyze, analyze_matrix, AnalysisConfig, AnalysisSummary};
    pub use crate::core::{Alphabet, Classification, ColumnResult, EngineError, GapHandling};
    pub use crate::data::{is_aligned, read_fasta, write_fasta, AlignmentMatrix, SequenceRecord};
    pub use crate::output::{write_results, OutputFormat};
}

// Re-export main types at the root level for convenience
pub use aligners::{AlignerRegistry, AlignerService};
pub use cli::{Args, ValidationResult};
pub use core::{analyze, AnalysisConfig, AnalysisSummary, EngineError};
pub use data::{AlignmentMatrix, SequenceRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "consanalyzer v{} - Conservation and mutation detection for sequence alignments",
        VERSION
    )
}
