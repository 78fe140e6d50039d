// validation.rs - Input validation utilities

use crate::aligners::AlignerRegistry;
use crate::cli::args::Args;
use crate::core::{AnalysisConfig, Alphabet, GapHandling, Thresholds};
use crate::data::SequenceRecord;
use crate::output::OutputFormat;
use regex::Regex;
use std::str::FromStr;

/// When the aligner runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentPolicy {
    /// Align only when rows differ in length
    Auto,
    /// Never align
    Skip,
    /// Always align
    Force,
}

impl AlignmentPolicy {
    pub fn needs_alignment(&self, records: &[SequenceRecord]) -> bool {
        match self {
            AlignmentPolicy::Auto => !crate::data::is_aligned(records),
            AlignmentPolicy::Skip => false,
            AlignmentPolicy::Force => true,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            AlignmentPolicy::Auto => "align when sequence lengths differ",
            AlignmentPolicy::Skip => "input is pre-aligned",
            AlignmentPolicy::Force => "always align",
        }
    }
}

pub struct ValidationResult {
    pub analysis_config: AnalysisConfig,
    pub alignment_policy: AlignmentPolicy,
    pub format: OutputFormat,
    pub include_regex: Option<Regex>,
    pub exclude_regex: Option<Regex>,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    // Validate thresholds
    Thresholds::new(args.conservation_threshold, args.mutation_threshold)
        .map_err(|e| e.to_string())?;

    // Validate aligner choice
    let registry = AlignerRegistry::new();
    if !registry.has_aligner(&args.aligner) {
        return Err(format!(
            "Invalid aligner '{}'. Available: {}",
            args.aligner,
            registry.get_aligner_names().join(", ")
        ));
    }

    let alignment_policy = match (args.pre_aligned, args.force_align) {
        (true, true) => {
            return Err("--pre-aligned and --force-align cannot be used together".to_string())
        }
        (true, false) => AlignmentPolicy::Skip,
        (false, true) => AlignmentPolicy::Force,
        (false, false) => AlignmentPolicy::Auto,
    };

    let alphabet = Alphabet::from_str(&args.alphabet)?;
    if let Alphabet::Custom(size) = alphabet {
        if size < 2 {
            return Err(format!("Alphabet size must be at least 2, got {}", size));
        }
    }

    let gap_handling = GapHandling::from_str(&args.gap_mode)?;
    let gap_symbol = parse_gap_char(&args.gap_char)?;
    let format = OutputFormat::from_str(&args.format)?;

    if let Some(threads) = args.threads {
        if threads == 0 {
            return Err("--threads must be at least 1".to_string());
        }
    }

    // Compile regex patterns
    let include_regex = if let Some(pattern) = &args.include_sequences {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid include_sequences regex: {}", e))?)
    } else {
        None
    };

    let exclude_regex = if let Some(pattern) = &args.exclude_sequences {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid exclude_sequences regex: {}", e))?)
    } else {
        None
    };

    Ok(ValidationResult {
        analysis_config: AnalysisConfig {
            conservation_threshold: args.conservation_threshold,
            mutation_threshold: args.mutation_threshold,
            reference_id: args.reference.clone(),
            pre_aligned: alignment_policy != AlignmentPolicy::Force,
            alphabet,
            gap_handling,
            gap_symbol,
        },
        alignment_policy,
        format,
        include_regex,
        exclude_regex,
    })
}

/// Gap character must be a single ASCII symbol
fn parse_gap_char(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        [symbol] if symbol.is_ascii_graphic() => Ok(*symbol),
        _ => Err(format!(
            "Gap character must be a single printable ASCII character, got '{}'",
            value
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::parse_args;

    #[test]
    fn test_default_validation() {
        let args = parse_args(&["--input", "aln.fasta"]).unwrap();
        let result = validate_args(&args).unwrap();

        assert_eq!(result.analysis_config, AnalysisConfig::default());
        assert_eq!(result.alignment_policy, AlignmentPolicy::Auto);
        assert_eq!(result.format, OutputFormat::Tsv);
        assert!(result.include_regex.is_none());
    }

    #[test]
    fn test_custom_settings() {
        let args = parse_args(&[
            "--reference",
            "ref",
            "--alphabet",
            "dna",
            "--gap-mode",
            "exclude",
            "--gap-char",
            ".",
            "--format",
            "csv",
            "--include-sequences",
            "^seq",
        ])
        .unwrap();
        let result = validate_args(&args).unwrap();
        let config = result.analysis_config;

        assert_eq!(config.reference_id.as_deref(), Some("ref"));
        assert_eq!(config.alphabet, Alphabet::Dna);
        assert_eq!(config.gap_handling, GapHandling::Exclude);
        assert_eq!(config.gap_symbol, b'.');
        assert_eq!(result.format, OutputFormat::Csv);
        assert!(result.include_regex.unwrap().is_match("seq1"));
    }

    #[test]
    fn test_validation_failures() {
        let cases: &[&[&str]] = &[
            &["--conservation-threshold", "0.2", "--mutation-threshold", "0.8"],
            &["--conservation-threshold", "1.5"],
            &["--aligner", "muscle"],
            &["--pre-aligned", "--force-align"],
            &["--alphabet", "klingon"],
            &["--alphabet", "1"],
            &["--gap-mode", "sometimes"],
            &["--gap-char", "ab"],
            &["--format", "xlsx"],
            &["--threads", "0"],
            &["--exclude-sequences", "(unclosed"],
        ];
        for case in cases {
            let args = parse_args(case).unwrap();
            assert!(validate_args(&args).is_err(), "expected failure for {:?}", case);
        }
    }

    #[test]
    fn test_alignment_policy() {
        let aligned = vec![SequenceRecord::new("a", "AC"), SequenceRecord::new("b", "AG")];
        let ragged = vec![SequenceRecord::new("a", "AC"), SequenceRecord::new("b", "A")];

        assert!(!AlignmentPolicy::Auto.needs_alignment(&aligned));
        assert!(AlignmentPolicy::Auto.needs_alignment(&ragged));
        assert!(!AlignmentPolicy::Skip.needs_alignment(&ragged));
        assert!(AlignmentPolicy::Force.needs_alignment(&aligned));
    }
}
