// clustalo.rs - Clustal Omega aligner

use super::traits::AlignerService;
use std::path::Path;

/// Clustal Omega writing FASTA to stdout
#[derive(Debug, Clone)]
pub struct ClustalOmega {
    program: String,
}

impl ClustalOmega {
    pub fn new() -> Self {
        Self::with_program("clustalo")
    }

    /// Use a specific executable instead of `clustalo` from PATH
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ClustalOmega {
    fn default() -> Self {
        Self::new()
    }
}

impl AlignerService for ClustalOmega {
    fn name(&self) -> &'static str {
        "clustalo"
    }

    fn description(&self) -> &'static str {
        "Clustal Omega multiple sequence alignment (FASTA output)"
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn arguments(&self, input: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            input.display().to_string(),
            "--outfmt=fasta".to_string(),
            "--force".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clustalo_arguments() {
        let aligner = ClustalOmega::new();
        assert_eq!(aligner.program(), "clustalo");
        assert_eq!(
            aligner.arguments(Path::new("in.fa")),
            vec!["-i", "in.fa", "--outfmt=fasta", "--force"]
        );
    }
}
