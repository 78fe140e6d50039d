// mafft.rs - MAFFT aligner

use super::traits::AlignerService;
use std::path::Path;

/// MAFFT with automatic strategy selection, FASTA on stdout
#[derive(Debug, Clone)]
pub struct Mafft {
    program: String,
}

impl Mafft {
    pub fn new() -> Self {
        Self::with_program("mafft")
    }

    /// Use a specific executable instead of `mafft` from PATH
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Mafft {
    fn default() -> Self {
        Self::new()
    }
}

impl AlignerService for Mafft {
    fn name(&self) -> &'static str {
        "mafft"
    }

    fn description(&self) -> &'static str {
        "MAFFT multiple sequence alignment (--quiet, auto strategy)"
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn arguments(&self, input: &Path) -> Vec<String> {
        vec!["--quiet".to_string(), input.display().to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mafft_arguments() {
        let aligner = Mafft::new();
        assert_eq!(aligner.program(), "mafft");
        assert_eq!(
            aligner.arguments(Path::new("/tmp/in.fasta")),
            vec!["--quiet", "/tmp/in.fasta"]
        );
    }

    #[test]
    fn test_mafft_custom_program() {
        let aligner = Mafft::with_program("/opt/mafft/bin/mafft");
        assert_eq!(aligner.program(), "/opt/mafft/bin/mafft");
        assert_eq!(aligner.name(), "mafft");
    }
}
