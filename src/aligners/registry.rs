// registry.rs - Aligner registry for managing available aligners

use super::traits::AlignerService;
use super::{ClustalOmega, Mafft};
use std::collections::BTreeMap;

/// Registry for available aligners, keyed by short name
pub struct AlignerRegistry {
    aligners: BTreeMap<String, Box<dyn AlignerService>>,
}

impl AlignerRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            aligners: BTreeMap::new(),
        };

        // Register built-in aligners
        registry.register_aligner(Box::new(Mafft::new()));
        registry.register_aligner(Box::new(ClustalOmega::new()));

        registry
    }

    /// Register an aligner under its own name, replacing any previous one
    pub fn register_aligner(&mut self, aligner: Box<dyn AlignerService>) {
        self.aligners.insert(aligner.name().to_string(), aligner);
    }

    /// Point a built-in aligner at a specific executable
    pub fn set_program(&mut self, name: &str, program: &str) -> Result<(), String> {
        let aligner: Box<dyn AlignerService> = match name {
            "mafft" => Box::new(Mafft::with_program(program)),
            "clustalo" => Box::new(ClustalOmega::with_program(program)),
            _ => return Err(format!("Cannot set program for unknown aligner '{}'", name)),
        };
        self.register_aligner(aligner);
        Ok(())
    }

    /// Get an aligner by name
    pub fn get_aligner(&self, name: &str) -> Option<&dyn AlignerService> {
        self.aligners.get(name).map(|a| a.as_ref())
    }

    /// Check if an aligner exists
    pub fn has_aligner(&self, name: &str) -> bool {
        self.aligners.contains_key(name)
    }

    /// List all available aligners as (name, description)
    pub fn list_aligners(&self) -> Vec<(&str, &str)> {
        self.aligners
            .values()
            .map(|a| (a.name(), a.description()))
            .collect()
    }

    /// Get all aligner names
    pub fn get_aligner_names(&self) -> Vec<&str> {
        self.aligners.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for AlignerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
