// alignment.rs - Validated alignment matrix

use crate::core::error::{EngineError, Result};
use crate::data::sequence::{find_duplicate_id, SequenceRecord};

/// Rectangular matrix of aligned symbols, one row per sequence
#[derive(Debug, Clone)]
pub struct AlignmentMatrix {
    rows: Vec<SequenceRecord>,
    length: usize,
}

impl AlignmentMatrix {
    /// Validate and take ownership of aligned records
    pub fn new(records: Vec<SequenceRecord>) -> Result<Self> {
        let first = records.first().ok_or(EngineError::EmptyAlignment)?;
        let length = first.len();
        if length == 0 {
            return Err(EngineError::EmptyAlignment);
        }

        if let Some(row) = records.iter().find(|r| r.len() != length) {
            return Err(EngineError::AlignmentLengthMismatch {
                id: row.id.clone(),
                expected: length,
                found: row.len(),
            });
        }

        if let Some(id) = find_duplicate_id(&records) {
            return Err(EngineError::DuplicateIdentifier(id.to_string()));
        }

        Ok(Self {
            rows: records,
            length,
        })
    }

    /// Number of columns
    pub fn alignment_length(&self) -> usize {
        self.length
    }

    /// Number of rows
    pub fn number_of_sequences(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[SequenceRecord] {
        &self.rows
    }

    pub fn symbol(&self, row: usize, column: usize) -> u8 {
        self.rows[row].symbols[column]
    }

    /// Iterate the symbols of one column in row order
    pub fn column(&self, column: usize) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().map(move |r| r.symbols[column])
    }

    /// Row index of the sequence with the given identifier
    pub fn reference_index(&self, id: &str) -> Result<usize> {
        self.rows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EngineError::ReferenceNotFound(id.to_string()))
    }

    /// Distinct symbols of the whole alignment in first-occurrence order
    pub fn observed_alphabet(&self, gap_symbol: u8, include_gap: bool) -> Vec<u8> {
        let mut seen = [false; 256];
        let mut alphabet = Vec::new();
        for row in &self.rows {
            for &symbol in &row.symbols {
                if symbol == gap_symbol && !include_gap {
                    continue;
                }
                if !seen[symbol as usize] {
                    seen[symbol as usize] = true;
                    alphabet.push(symbol);
                }
            }
        }
        alphabet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(rows: &[(&str, &str)]) -> Vec<SequenceRecord> {
        rows.iter().map(|(id, s)| SequenceRecord::new(*id, *s)).collect()
    }

    #[test]
    fn test_valid_matrix() {
        let matrix = AlignmentMatrix::new(records(&[("a", "AC-T"), ("b", "ACGT")])).unwrap();
        assert_eq!(matrix.alignment_length(), 4);
        assert_eq!(matrix.number_of_sequences(), 2);
        assert_eq!(matrix.column(2).collect::<Vec<_>>(), vec![b'-', b'G']);
        assert_eq!(matrix.symbol(1, 3), b'T');
    }

    #[test]
    fn test_length_mismatch() {
        let err = AlignmentMatrix::new(records(&[("a", "ACGT"), ("b", "ACG")])).unwrap_err();
        assert_eq!(
            err,
            EngineError::AlignmentLengthMismatch {
                id: "b".to_string(),
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_empty_alignment() {
        assert_eq!(
            AlignmentMatrix::new(Vec::new()).unwrap_err(),
            EngineError::EmptyAlignment
        );
        assert_eq!(
            AlignmentMatrix::new(records(&[("a", ""), ("b", "")])).unwrap_err(),
            EngineError::EmptyAlignment
        );
    }

    #[test]
    fn test_duplicate_identifier() {
        let err = AlignmentMatrix::new(records(&[("a", "AC"), ("a", "AG")])).unwrap_err();
        assert_eq!(err, EngineError::DuplicateIdentifier("a".to_string()));
    }

    #[test]
    fn test_reference_index() {
        let matrix = AlignmentMatrix::new(records(&[("a", "A"), ("ref", "T")])).unwrap();
        assert_eq!(matrix.reference_index("ref").unwrap(), 1);
        assert_eq!(
            matrix.reference_index("missing").unwrap_err(),
            EngineError::ReferenceNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_observed_alphabet() {
        let matrix = AlignmentMatrix::new(records(&[("a", "TA-"), ("b", "AAC")])).unwrap();
        assert_eq!(matrix.observed_alphabet(b'-', false), b"TAC".to_vec());
        assert_eq!(matrix.observed_alphabet(b'-', true), b"TA-C".to_vec());
    }
}
