// aggregate.rs - Collect per-column results into an analysis summary

use crate::core::classify::Classification;
use crate::core::profile::ColumnProfile;
use crate::core::significance::{category_significance, CategorySignificance};
use serde::{Deserialize, Serialize};

/// Final result for one alignment column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnResult {
    /// 0-based column index
    pub index: usize,
    /// 1-based alignment position
    pub position: usize,
    /// Symbol the column was compared against (reference or majority)
    pub residue: char,
    pub match_count: usize,
    pub depth: usize,
    pub conservation_rate: f64,
    pub classification: Classification,
    pub p_value: f64,
    pub adjusted_p_value: f64,
}

/// Everything one analysis run hands back to its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Conserved columns / alignment length
    pub overall_conservation_rate: f64,
    /// Mean of per-column conservation rates
    pub mean_conservation_rate: f64,
    pub alignment_length: usize,
    pub number_of_sequences: usize,
    pub alphabet_size: usize,
    pub conserved: Vec<ColumnResult>,
    pub mutated: Vec<ColumnResult>,
    pub neutral_count: usize,
    pub category_significance: CategorySignificance,
    /// Full per-column series in alignment order
    pub columns: Vec<ColumnResult>,
}

impl AnalysisSummary {
    /// Per-column conservation rates in alignment order
    pub fn conservation_series(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.conservation_rate).collect()
    }

    /// Per-column p-values in alignment order
    pub fn p_value_series(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.p_value).collect()
    }
}

/// Dataset-level facts the aggregator reports but does not compute
#[derive(Debug, Clone, Copy)]
pub struct RunInfo {
    pub number_of_sequences: usize,
    pub alphabet_size: usize,
}

/// Group classified columns; the slices are parallel and in column order
pub fn aggregate(
    profiles: &[ColumnProfile],
    classifications: &[Classification],
    p_values: &[f64],
    adjusted_p_values: &[f64],
    info: RunInfo,
) -> AnalysisSummary {
    debug_assert_eq!(profiles.len(), classifications.len());
    debug_assert_eq!(profiles.len(), p_values.len());
    debug_assert_eq!(profiles.len(), adjusted_p_values.len());

    let columns: Vec<ColumnResult> = profiles
        .iter()
        .zip(classifications)
        .zip(p_values.iter().zip(adjusted_p_values))
        .map(|((profile, &classification), (&p_value, &adjusted_p_value))| ColumnResult {
            index: profile.index,
            position: profile.index + 1,
            residue: profile.basis_symbol() as char,
            match_count: profile.match_count,
            depth: profile.depth,
            conservation_rate: profile.conservation_rate(),
            classification,
            p_value,
            adjusted_p_value,
        })
        .collect();

    let conserved: Vec<ColumnResult> = columns
        .iter()
        .filter(|c| c.classification == Classification::Conserved)
        .cloned()
        .collect();
    let mutated: Vec<ColumnResult> = columns
        .iter()
        .filter(|c| c.classification == Classification::Mutated)
        .cloned()
        .collect();
    let neutral_count = columns.len() - conserved.len() - mutated.len();

    let total = columns.len();
    let (overall_conservation_rate, mean_conservation_rate) = if total == 0 {
        (0.0, 0.0)
    } else {
        let rate_sum: f64 = columns.iter().map(|c| c.conservation_rate).sum();
        (
            conserved.len() as f64 / total as f64,
            rate_sum / total as f64,
        )
    };

    AnalysisSummary {
        overall_conservation_rate,
        mean_conservation_rate,
        alignment_length: total,
        number_of_sequences: info.number_of_sequences,
        alphabet_size: info.alphabet_size,
        category_significance: category_significance(total, conserved.len(), mutated.len()),
        conserved,
        mutated,
        neutral_count,
        columns,
    }
}
