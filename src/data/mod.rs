// mod.rs - Data structures module

pub mod alignment;
pub mod sequence;

// Re-export main types for convenience
pub use alignment::AlignmentMatrix;
pub use sequence::{is_aligned, read_fasta, write_fasta, SequenceRecord};
