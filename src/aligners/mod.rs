// mod.rs - External aligner services

pub mod clustalo;
pub mod mafft;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use clustalo::ClustalOmega;
pub use mafft::Mafft;
pub use registry::AlignerRegistry;
pub use traits::{AlignerError, AlignerService};
