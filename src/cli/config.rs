// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub input: Option<String>,
    pub output: Option<String>,
    pub format: Option<String>,
    pub summary_json: Option<String>,

    // Classification
    pub conservation_threshold: Option<f64>,
    pub mutation_threshold: Option<f64>,
    pub reference: Option<String>,

    // Null model
    pub alphabet: Option<String>,
    pub gap_mode: Option<String>,
    pub gap_char: Option<String>,

    // Alignment
    pub pre_aligned: Option<bool>,
    pub force_align: Option<bool>,
    pub aligner: Option<String>,
    pub aligner_path: Option<String>,

    // Sequence filtering
    pub include_sequences: Option<String>,
    pub exclude_sequences: Option<String>,

    // Performance and flags
    pub threads: Option<usize>,
    pub dry_run: Option<bool>,
    pub verbose: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# consanalyzer.toml - Configuration file for consanalyzer
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Input FASTA file (aligned, or raw sequences to be aligned)
input = "/path/to/alignment.fasta"

# Output prefix: writes <output>.conserved.tsv, <output>.mutated.tsv, <output>.columns.tsv
output = "results"

# Output table format: tsv, csv
format = "tsv"

# Full analysis summary as JSON
# summary_json = "results.summary.json"

# =============================================================================
# CLASSIFICATION
# =============================================================================

# Columns with conservation rate >= this value are conserved
conservation_threshold = 0.8

# Columns with conservation rate <= this value are mutated
mutation_threshold = 0.2

# Compare each column against this sequence instead of the majority symbol
# reference = "sequence_id"

# =============================================================================
# NULL MODEL
# =============================================================================

# Alphabet size for p-values: observed, dna, rna, protein, or a symbol count
alphabet = "observed"

# Gap handling: count (gap is a symbol), exclude (gaps reduce column depth)
gap_mode = "count"

# Gap character
gap_char = "-"

# =============================================================================
# ALIGNMENT
# =============================================================================

# Input is already aligned; never run the aligner
# pre_aligned = true

# Always run the aligner, even on equal-length input
# force_align = false

# Aligner for unaligned input: mafft, clustalo
aligner = "mafft"

# Aligner executable (omit to look it up in PATH)
# aligner_path = "/usr/local/bin/mafft"

# =============================================================================
# SEQUENCE FILTERING
# =============================================================================

# Include only sequences whose identifier matches regex pattern
# include_sequences = "^HUMAN_.*"

# Exclude sequences whose identifier matches regex pattern
# exclude_sequences = "partial"

# =============================================================================
# PERFORMANCE AND FLAGS
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 8

# Validate inputs without computation (dry run)
dry_run = false

# Show debug diagnostics
verbose = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::generate_sample()).unwrap();
        assert_eq!(config.input.as_deref(), Some("/path/to/alignment.fasta"));
        assert_eq!(config.conservation_threshold, Some(0.8));
        assert_eq!(config.mutation_threshold, Some(0.2));
        assert_eq!(config.aligner.as_deref(), Some("mafft"));
        assert_eq!(config.reference, None);
        assert_eq!(config.dry_run, Some(false));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "consanalyzer-config-test-{}.toml",
            std::process::id()
        ));
        let config = Config {
            input: Some("aln.fasta".to_string()),
            conservation_threshold: Some(0.75),
            gap_mode: Some("exclude".to_string()),
            threads: Some(2),
            ..Config::new()
        };

        config.to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/consanalyzer.toml").unwrap_err();
        assert!(err.contains("Failed to read config file"));
    }
}
