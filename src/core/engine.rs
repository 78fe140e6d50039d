// engine.rs - Conservation analysis entry point

use crate::core::aggregate::{aggregate, AnalysisSummary, RunInfo};
use crate::core::classify::{classify, Classification, Thresholds};
use crate::core::error::{EngineError, Result};
use crate::core::profile::{profile, GapHandling};
use crate::core::significance::{benjamini_hochberg, Alphabet, BinomialNull};
use crate::data::{AlignmentMatrix, SequenceRecord};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// All options of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub conservation_threshold: f64,
    pub mutation_threshold: f64,
    pub reference_id: Option<String>,
    /// Whether the records came in already aligned (otherwise an aligner produced them)
    pub pre_aligned: bool,
    pub alphabet: Alphabet,
    pub gap_handling: GapHandling,
    pub gap_symbol: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            conservation_threshold: 0.8,
            mutation_threshold: 0.2,
            reference_id: None,
            pre_aligned: true,
            alphabet: Alphabet::Observed,
            gap_handling: GapHandling::Count,
            gap_symbol: b'-',
        }
    }
}

impl AnalysisConfig {
    /// Thresholds validated for this configuration
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.conservation_threshold, self.mutation_threshold)
    }

    /// Alphabet size for the null model, inferring it from the alignment if needed
    pub fn resolve_alphabet_size(&self, matrix: &AlignmentMatrix) -> Result<usize> {
        let size = match self.alphabet.fixed_size() {
            Some(size) => size,
            None => {
                let include_gap = self.gap_handling == GapHandling::Count;
                matrix.observed_alphabet(self.gap_symbol, include_gap).len()
            }
        };
        if size < 2 {
            return Err(EngineError::InvalidAlphabet(format!(
                "{} alphabet has {} symbol(s); at least 2 are required",
                self.alphabet, size
            )));
        }
        Ok(size)
    }
}

/// Analyze aligned records: validate, profile, classify, test and aggregate
pub fn analyze(records: Vec<SequenceRecord>, config: &AnalysisConfig) -> Result<AnalysisSummary> {
    config.thresholds()?;
    let matrix = AlignmentMatrix::new(records)?;
    analyze_matrix(&matrix, config)
}

/// Analyze an already validated matrix
pub fn analyze_matrix(matrix: &AlignmentMatrix, config: &AnalysisConfig) -> Result<AnalysisSummary> {
    let thresholds = config.thresholds()?;
    let reference = config
        .reference_id
        .as_deref()
        .map(|id| matrix.reference_index(id))
        .transpose()?;
    let alphabet_size = config.resolve_alphabet_size(matrix)?;
    let null = BinomialNull::new(matrix.number_of_sequences(), alphabet_size)?;

    info!(
        "Analyzing {} sequences x {} columns (alphabet size {}, {}, {})",
        matrix.number_of_sequences(),
        matrix.alignment_length(),
        alphabet_size,
        config.gap_handling.description(),
        if config.pre_aligned { "pre-aligned input" } else { "aligner output" }
    );
    if let Some(id) = &config.reference_id {
        debug!("Comparison basis: reference sequence '{}'", id);
    } else {
        debug!("Comparison basis: column majority symbol");
    }

    let profiles = profile(matrix, reference, config.gap_handling, config.gap_symbol);

    let (classifications, p_values): (Vec<Classification>, Vec<f64>) = profiles
        .par_iter()
        .map(|p| (classify(p, &thresholds), null.p_value(p)))
        .unzip();
    let adjusted = benjamini_hochberg(&p_values);

    let summary = aggregate(
        &profiles,
        &classifications,
        &p_values,
        &adjusted,
        RunInfo {
            number_of_sequences: matrix.number_of_sequences(),
            alphabet_size,
        },
    );

    debug!(
        "Classified {} conserved, {} mutated, {} neutral columns",
        summary.conserved.len(),
        summary.mutated.len(),
        summary.neutral_count
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(rows: &[(&str, &str)]) -> Vec<SequenceRecord> {
        rows.iter().map(|(id, s)| SequenceRecord::new(*id, *s)).collect()
    }

    fn config(conservation: f64, mutation: f64) -> AnalysisConfig {
        AnalysisConfig {
            conservation_threshold: conservation,
            mutation_threshold: mutation,
            alphabet: Alphabet::Dna,
            ..AnalysisConfig::default()
        }
    }

    fn sample_alignment() -> Vec<SequenceRecord> {
        records(&[
            ("s1", "ACGTAC-GTTAGC"),
            ("s2", "ACGTTC-GTAAGC"),
            ("s3", "ACCTTCAGTAAGG"),
            ("s4", "ACGATCAGCTTGC"),
            ("s5", "TCGATCAGCTAGA"),
            ("s6", "ACGTGCAGCAAGC"),
        ])
    }

    #[test]
    fn test_four_sequence_scenario() {
        let summary = analyze(
            records(&[("a", "A"), ("b", "A"), ("c", "A"), ("d", "T")]),
            &config(0.7, 0.3),
        )
        .unwrap();

        let column = &summary.columns[0];
        assert_eq!(column.residue, 'A');
        assert_eq!(column.match_count, 3);
        assert!((column.conservation_rate - 0.75).abs() < 1e-12);
        assert_eq!(column.classification, Classification::Conserved);
        assert!((column.p_value - 13.0 / 256.0).abs() < 1e-10);
        assert_eq!(summary.conserved.len(), 1);
        assert!((summary.overall_conservation_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reference_scenario() {
        let mut cfg = config(0.7, 0.3);
        cfg.reference_id = Some("d".to_string());
        let summary = analyze(
            records(&[("a", "A"), ("b", "A"), ("c", "A"), ("d", "T")]),
            &cfg,
        )
        .unwrap();

        let column = &summary.columns[0];
        assert_eq!(column.residue, 'T');
        assert_eq!(column.match_count, 1);
        assert!((column.conservation_rate - 0.25).abs() < 1e-12);
        assert_eq!(column.classification, Classification::Mutated);
        assert_eq!(summary.mutated.len(), 1);
    }

    #[test]
    fn test_single_sequence_boundary() {
        let summary = analyze(records(&[("only", "W")]), &{
            let mut c = config(0.8, 0.2);
            c.alphabet = Alphabet::Protein;
            c
        })
        .unwrap();

        let column = &summary.columns[0];
        assert_eq!(column.conservation_rate, 1.0);
        assert!((column.p_value - 1.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_partition_and_bounds() {
        let summary = analyze(sample_alignment(), &config(0.8, 0.4)).unwrap();

        assert_eq!(
            summary.conserved.len() + summary.mutated.len() + summary.neutral_count,
            summary.alignment_length
        );
        assert_eq!(summary.alignment_length, 13);
        for column in &summary.columns {
            assert!((0.0..=1.0).contains(&column.conservation_rate));
            assert!((0.0..=1.0).contains(&column.p_value));
            assert!((0.0..=1.0).contains(&column.adjusted_p_value));
            assert!(column.adjusted_p_value >= column.p_value - 1e-15);
        }
    }

    #[test]
    fn test_classification_monotonic() {
        let mut previous_conserved = usize::MAX;
        for step in 5..=10 {
            let threshold = step as f64 / 10.0;
            let summary = analyze(sample_alignment(), &config(threshold, 0.1)).unwrap();
            assert!(summary.conserved.len() <= previous_conserved);
            previous_conserved = summary.conserved.len();
        }

        let mut previous_mutated = usize::MAX;
        for step in (0..=5).rev() {
            let threshold = step as f64 / 10.0;
            let summary = analyze(sample_alignment(), &config(0.9, threshold)).unwrap();
            assert!(summary.mutated.len() <= previous_mutated);
            previous_mutated = summary.mutated.len();
        }
    }

    #[test]
    fn test_deterministic_across_thread_counts() {
        let cfg = config(0.8, 0.4);
        let first = analyze(sample_alignment(), &cfg).unwrap();
        let second = analyze(sample_alignment(), &cfg).unwrap();
        assert_eq!(first, second);

        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let sequential = pool.install(|| analyze(sample_alignment(), &cfg).unwrap());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&sequential).unwrap()
        );
    }

    #[test]
    fn test_reference_equivalence_with_majority() {
        let mut rows = sample_alignment();
        // Consensus row: majority symbol of every column of the sample alignment
        rows.push(SequenceRecord::new("consensus", "ACGTTCAGCAAGC"));

        let majority = analyze(rows.clone(), &config(0.6, 0.3)).unwrap();
        let mut cfg = config(0.6, 0.3);
        cfg.reference_id = Some("consensus".to_string());
        let referenced = analyze(rows, &cfg).unwrap();

        assert_eq!(majority.conservation_series(), referenced.conservation_series());
        let majority_classes: Vec<_> = majority.columns.iter().map(|c| c.classification).collect();
        let referenced_classes: Vec<_> =
            referenced.columns.iter().map(|c| c.classification).collect();
        assert_eq!(majority_classes, referenced_classes);
    }

    #[test]
    fn test_length_mismatch_before_profiling() {
        let err = analyze(records(&[("a", "ACGT"), ("b", "AC")]), &config(0.8, 0.2)).unwrap_err();
        assert!(matches!(err, EngineError::AlignmentLengthMismatch { .. }));
    }

    #[test]
    fn test_input_errors() {
        assert_eq!(
            analyze(Vec::new(), &config(0.8, 0.2)).unwrap_err(),
            EngineError::EmptyAlignment
        );

        let err = analyze(records(&[("a", "A")]), &config(0.2, 0.8)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidThreshold(_)));

        let mut cfg = config(0.8, 0.2);
        cfg.reference_id = Some("ghost".to_string());
        let err = analyze(records(&[("a", "A"), ("b", "C")]), &cfg).unwrap_err();
        assert_eq!(err, EngineError::ReferenceNotFound("ghost".to_string()));

        let mut cfg = config(0.8, 0.2);
        cfg.alphabet = Alphabet::Observed;
        let err = analyze(records(&[("a", "AA"), ("b", "AA")]), &cfg).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAlphabet(_)));
    }

    #[test]
    fn test_observed_alphabet_counts_gap_when_counted() {
        let rows = records(&[("a", "A-"), ("b", "AC"), ("c", "GC")]);
        let matrix = AlignmentMatrix::new(rows).unwrap();

        let mut cfg = AnalysisConfig::default();
        assert_eq!(cfg.resolve_alphabet_size(&matrix).unwrap(), 4);
        cfg.gap_handling = GapHandling::Exclude;
        assert_eq!(cfg.resolve_alphabet_size(&matrix).unwrap(), 3);
    }

    #[test]
    fn test_gap_excluded_depth() {
        let mut cfg = config(0.8, 0.2);
        cfg.gap_handling = GapHandling::Exclude;
        let summary = analyze(records(&[("a", "A"), ("b", "-"), ("c", "A")]), &cfg).unwrap();

        let column = &summary.columns[0];
        assert_eq!(column.depth, 2);
        assert_eq!(column.conservation_rate, 1.0);
        assert!((column.p_value - 1.0 / 16.0).abs() < 1e-12);
    }
}
