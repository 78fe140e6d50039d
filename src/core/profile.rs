// profile.rs - Per-column symbol profiling

use crate::data::AlignmentMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How gap symbols enter the column denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GapHandling {
    /// Gaps are an ordinary symbol; every column has depth = number of sequences
    #[default]
    Count,
    /// Gap rows are left out of the tally and of the column depth
    Exclude,
}

impl FromStr for GapHandling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" | "include" => Ok(GapHandling::Count),
            "exclude" | "ignore" => Ok(GapHandling::Exclude),
            _ => Err(format!("Invalid gap mode: {}. Use: count, exclude", s)),
        }
    }
}

impl GapHandling {
    pub fn description(&self) -> &str {
        match self {
            GapHandling::Count => "gaps counted as a symbol",
            GapHandling::Exclude => "gaps excluded from the denominator",
        }
    }
}

/// Symbol statistics for a single alignment column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub index: usize,
    /// (symbol, count) in order of first appearance down the column
    pub symbol_counts: Vec<(u8, usize)>,
    pub majority_symbol: u8,
    pub majority_count: usize,
    pub reference_symbol: Option<u8>,
    pub match_count: usize,
    pub gap_count: usize,
    pub depth: usize,
}

impl ColumnProfile {
    /// The symbol rows are compared against: reference if set, majority otherwise
    pub fn basis_symbol(&self) -> u8 {
        self.reference_symbol.unwrap_or(self.majority_symbol)
    }

    /// Fraction of counted rows matching the basis symbol
    pub fn conservation_rate(&self) -> f64 {
        if self.depth == 0 {
            return 0.0;
        }
        self.match_count as f64 / self.depth as f64
    }

    /// Count for one symbol (zero if absent)
    pub fn count_of(&self, symbol: u8) -> usize {
        self.symbol_counts
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }
}

/// Profile a single column
pub fn profile_column(
    matrix: &AlignmentMatrix,
    index: usize,
    reference: Option<usize>,
    gap_handling: GapHandling,
    gap_symbol: u8,
) -> ColumnProfile {
    let mut counts = [0usize; 256];
    let mut order: Vec<u8> = Vec::new();
    let mut gap_count = 0;

    for symbol in matrix.column(index) {
        if symbol == gap_symbol {
            gap_count += 1;
            if gap_handling == GapHandling::Exclude {
                continue;
            }
        }
        if counts[symbol as usize] == 0 {
            order.push(symbol);
        }
        counts[symbol as usize] += 1;
    }

    let symbol_counts: Vec<(u8, usize)> = order
        .iter()
        .map(|&s| (s, counts[s as usize]))
        .collect();
    let depth = symbol_counts.iter().map(|(_, c)| c).sum();

    // Strictly greater keeps the earliest symbol on ties
    let (majority_symbol, majority_count) = symbol_counts
        .iter()
        .fold((gap_symbol, 0usize), |best, &(symbol, count)| {
            if count > best.1 {
                (symbol, count)
            } else {
                best
            }
        });

    let reference_symbol = reference.map(|row| matrix.symbol(row, index));
    let match_count = match reference_symbol {
        Some(symbol) => counts[symbol as usize],
        None => majority_count,
    };

    ColumnProfile {
        index,
        symbol_counts,
        majority_symbol,
        majority_count,
        reference_symbol,
        match_count,
        gap_count,
        depth,
    }
}

/// Profile every column, returned in column order
pub fn profile(
    matrix: &AlignmentMatrix,
    reference: Option<usize>,
    gap_handling: GapHandling,
    gap_symbol: u8,
) -> Vec<ColumnProfile> {
    (0..matrix.alignment_length())
        .into_par_iter()
        .map(|index| profile_column(matrix, index, reference, gap_handling, gap_symbol))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SequenceRecord;

    fn matrix(rows: &[&str]) -> AlignmentMatrix {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, s)| SequenceRecord::new(format!("s{}", i), *s))
            .collect();
        AlignmentMatrix::new(records).unwrap()
    }

    #[test]
    fn test_majority_profile() {
        let m = matrix(&["A", "A", "A", "T"]);
        let p = profile_column(&m, 0, None, GapHandling::Count, b'-');

        assert_eq!(p.majority_symbol, b'A');
        assert_eq!(p.majority_count, 3);
        assert_eq!(p.match_count, 3);
        assert_eq!(p.depth, 4);
        assert_eq!(p.symbol_counts, vec![(b'A', 3), (b'T', 1)]);
        assert!((p.conservation_rate() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_reference_profile() {
        let m = matrix(&["A", "A", "A", "T"]);
        let p = profile_column(&m, 0, Some(3), GapHandling::Count, b'-');

        assert_eq!(p.reference_symbol, Some(b'T'));
        assert_eq!(p.basis_symbol(), b'T');
        assert_eq!(p.match_count, 1);
        assert!((p.conservation_rate() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_tie_broken_by_first_occurrence() {
        let m = matrix(&["G", "C", "C", "G"]);
        let p = profile_column(&m, 0, None, GapHandling::Count, b'-');
        assert_eq!(p.majority_symbol, b'G');

        let m = matrix(&["C", "G", "G", "C"]);
        let p = profile_column(&m, 0, None, GapHandling::Count, b'-');
        assert_eq!(p.majority_symbol, b'C');
    }

    #[test]
    fn test_gap_counted() {
        let m = matrix(&["-", "-", "-", "A"]);
        let p = profile_column(&m, 0, None, GapHandling::Count, b'-');

        assert_eq!(p.majority_symbol, b'-');
        assert_eq!(p.gap_count, 3);
        assert_eq!(p.depth, 4);
        let total: usize = p.symbol_counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, m.number_of_sequences());
    }

    #[test]
    fn test_gap_excluded() {
        let m = matrix(&["-", "-", "A", "A", "T"]);
        let p = profile_column(&m, 0, None, GapHandling::Exclude, b'-');

        assert_eq!(p.majority_symbol, b'A');
        assert_eq!(p.gap_count, 2);
        assert_eq!(p.depth, 3);
        assert_eq!(p.count_of(b'-'), 0);
        assert_eq!(p.depth + p.gap_count, m.number_of_sequences());
        assert!((p.conservation_rate() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_gap_column_excluded() {
        let m = matrix(&["-", "-"]);
        let p = profile_column(&m, 0, Some(0), GapHandling::Exclude, b'-');

        assert_eq!(p.depth, 0);
        assert_eq!(p.match_count, 0);
        assert_eq!(p.conservation_rate(), 0.0);
    }

    #[test]
    fn test_profile_keeps_column_order() {
        let m = matrix(&["ACGT", "ACGA", "TCGA"]);
        let profiles = profile(&m, None, GapHandling::Count, b'-');

        let indices: Vec<_> = profiles.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        let majorities: Vec<_> = profiles.iter().map(|p| p.majority_symbol).collect();
        assert_eq!(majorities, b"ACGA".to_vec());
    }

    #[test]
    fn test_gap_handling_from_str() {
        assert_eq!("count".parse::<GapHandling>().unwrap(), GapHandling::Count);
        assert_eq!("EXCLUDE".parse::<GapHandling>().unwrap(), GapHandling::Exclude);
        assert!("drop".parse::<GapHandling>().is_err());
    }
}
