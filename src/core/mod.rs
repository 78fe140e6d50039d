// mod.rs - Core logic module

pub mod aggregate;
pub mod classify;
pub mod engine;
pub mod error;
pub mod profile;
pub mod significance;

// Re-export main types for convenience
pub use aggregate::{aggregate, AnalysisSummary, ColumnResult};
pub use classify::{classify, Classification, Thresholds};
pub use engine::{analyze, analyze_matrix, AnalysisConfig};
pub use error::EngineError;
pub use profile::{profile, ColumnProfile, GapHandling};
pub use significance::{significance, Alphabet, BinomialNull, CategorySignificance};
