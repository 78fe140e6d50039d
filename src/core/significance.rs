// significance.rs - Null-model p-values for column conservation
//
// Null model: every sequence picks one of `alphabet_size` symbols uniformly
// and independently, so the number of rows matching a fixed basis symbol is
// Binomial(depth, 1/alphabet_size). The column p-value is the upper tail
// P(X >= match_count). All sums are taken in log space.

use crate::core::error::{EngineError, Result};
use crate::core::profile::ColumnProfile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alphabet size used by the null model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alphabet {
    /// Distinct symbols observed across the whole alignment
    #[default]
    Observed,
    Dna,
    Rna,
    Protein,
    Custom(usize),
}

impl FromStr for Alphabet {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "observed" | "auto" => Ok(Alphabet::Observed),
            "dna" | "nucleotide" => Ok(Alphabet::Dna),
            "rna" => Ok(Alphabet::Rna),
            "protein" | "aa" | "amino-acid" => Ok(Alphabet::Protein),
            other => other.parse::<usize>().map(Alphabet::Custom).map_err(|_| {
                format!(
                    "Invalid alphabet: {}. Use: observed, dna, rna, protein or a symbol count",
                    s
                )
            }),
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alphabet::Observed => write!(f, "observed"),
            Alphabet::Dna => write!(f, "dna"),
            Alphabet::Rna => write!(f, "rna"),
            Alphabet::Protein => write!(f, "protein"),
            Alphabet::Custom(n) => write!(f, "{}", n),
        }
    }
}

impl Alphabet {
    /// Fixed size, or `None` when it has to be inferred from the alignment
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Alphabet::Observed => None,
            Alphabet::Dna | Alphabet::Rna => Some(4),
            Alphabet::Protein => Some(20),
            Alphabet::Custom(n) => Some(*n),
        }
    }
}

/// ln(i!) for i in 0..=n
fn ln_factorials(n: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(n + 1);
    table.push(0.0);
    let mut acc = 0.0_f64;
    for i in 1..=n {
        acc += (i as f64).ln();
        table.push(acc);
    }
    table
}

fn ln_choose(table: &[f64], n: usize, k: usize) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    table[n] - table[k] - table[n - k]
}

/// Sum of exp(terms), computed as max + ln(sum(exp(t - max)))
fn log_sum_exp(terms: impl Iterator<Item = f64> + Clone) -> f64 {
    let max = terms.clone().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let sum: f64 = terms.map(|t| (t - max).exp()).sum();
    max + sum.ln()
}

/// Binomial null model shared read-only across columns
#[derive(Debug, Clone)]
pub struct BinomialNull {
    alphabet_size: usize,
    ln_p: f64,
    ln_q: f64,
    ln_fact: Vec<f64>,
}

impl BinomialNull {
    /// Prepare the model for up to `max_trials` rows per column
    pub fn new(max_trials: usize, alphabet_size: usize) -> Result<Self> {
        if alphabet_size < 2 {
            return Err(EngineError::InvalidAlphabet(format!(
                "alphabet size must be at least 2, got {}",
                alphabet_size
            )));
        }
        if max_trials < 1 {
            return Err(EngineError::InvalidAlphabet(
                "number of sequences must be at least 1".to_string(),
            ));
        }

        let p = 1.0 / alphabet_size as f64;
        Ok(Self {
            alphabet_size,
            ln_p: p.ln(),
            ln_q: (1.0 - p).ln(),
            ln_fact: ln_factorials(max_trials),
        })
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn max_trials(&self) -> usize {
        self.ln_fact.len() - 1
    }

    /// P(X >= k) for X ~ Binomial(n, 1/alphabet_size)
    pub fn upper_tail(&self, n: usize, k: usize) -> f64 {
        if k == 0 {
            return 1.0;
        }
        if k > n {
            return 0.0;
        }
        debug_assert!(n <= self.max_trials());

        let terms = (k..=n).map(|i| {
            ln_choose(&self.ln_fact, n, i) + i as f64 * self.ln_p + (n - i) as f64 * self.ln_q
        });
        log_sum_exp(terms).exp().clamp(0.0, 1.0)
    }

    /// Column p-value against the column's own depth
    pub fn p_value(&self, profile: &ColumnProfile) -> f64 {
        self.upper_tail(profile.depth, profile.match_count)
    }
}

/// One-sided p-value for a single profiled column
pub fn significance(
    profile: &ColumnProfile,
    number_of_sequences: usize,
    alphabet_size: usize,
) -> Result<f64> {
    let null = BinomialNull::new(number_of_sequences, alphabet_size)?;
    if profile.depth > number_of_sequences {
        return Err(EngineError::InvalidAlphabet(format!(
            "column depth {} exceeds number of sequences {}",
            profile.depth, number_of_sequences
        )));
    }
    Ok(null.p_value(profile))
}

/// Hypergeometric upper tail P(X >= k), X ~ Hypergeometric(N, K, n)
///
/// - `big_n`: population size
/// - `big_k`: success states in the population
/// - `n`: draws
pub fn hypergeometric_upper_tail(k: usize, n: usize, big_k: usize, big_n: usize) -> f64 {
    if k == 0 {
        return 1.0;
    }
    let max_i = n.min(big_k);
    if k > max_i || n > big_n || big_k > big_n {
        return 0.0;
    }

    let table = ln_factorials(big_n);
    let log_denom = ln_choose(&table, big_n, n);
    let terms = (k..=max_i)
        .filter(|&i| n - i <= big_n - big_k)
        .map(|i| ln_choose(&table, big_k, i) + ln_choose(&table, big_n - big_k, n - i) - log_denom);
    log_sum_exp(terms).exp().clamp(0.0, 1.0)
}

/// Significance of the conserved and mutated category sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySignificance {
    pub conserved_p_value: f64,
    pub mutated_p_value: f64,
}

/// Hypergeometric test on the category counts of one analysis.
///
/// For the conserved category: P(X >= conserved) with
/// X ~ Hypergeometric(total_columns, conserved, mutated); the mutated
/// category swaps the roles.
pub fn category_significance(
    total_columns: usize,
    conserved: usize,
    mutated: usize,
) -> CategorySignificance {
    CategorySignificance {
        conserved_p_value: hypergeometric_upper_tail(conserved, mutated, conserved, total_columns),
        mutated_p_value: hypergeometric_upper_tail(mutated, conserved, mutated, total_columns),
    }
}

/// Benjamini-Hochberg adjusted p-values, returned in input order
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let n_f = n as f64;
    let mut adjusted = vec![0.0; n];
    let mut prev = f64::INFINITY;
    for i in (0..n).rev() {
        let rank = (i + 1) as f64;
        let adj = (p_values[indices[i]] * n_f / rank).min(1.0).min(prev);
        adjusted[indices[i]] = adj;
        prev = adj;
    }

    adjusted
}
