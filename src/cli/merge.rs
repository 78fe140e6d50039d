// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.input.is_none() {
            self.input = config.input;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.summary_json.is_none() {
            self.summary_json = config.summary_json;
        }

        // Settings with defaults (only override defaults, not explicit CLI values)
        if let Some(format) = config.format.filter(|_| self.format == "tsv") {
            self.format = format;
        }
        if let Some(value) = config
            .conservation_threshold
            .filter(|_| self.conservation_threshold == 0.8)
        {
            self.conservation_threshold = value;
        }
        if let Some(value) = config
            .mutation_threshold
            .filter(|_| self.mutation_threshold == 0.2)
        {
            self.mutation_threshold = value;
        }
        if let Some(alphabet) = config.alphabet.filter(|_| self.alphabet == "observed") {
            self.alphabet = alphabet;
        }
        if let Some(gap_mode) = config.gap_mode.filter(|_| self.gap_mode == "count") {
            self.gap_mode = gap_mode;
        }
        if let Some(gap_char) = config.gap_char.filter(|_| self.gap_char == "-") {
            self.gap_char = gap_char;
        }
        if let Some(aligner) = config.aligner.filter(|_| self.aligner == "mafft") {
            self.aligner = aligner;
        }

        // Optional settings
        if self.reference.is_none() {
            self.reference = config.reference;
        }
        if self.aligner_path.is_none() {
            self.aligner_path = config.aligner_path;
        }
        if self.include_sequences.is_none() {
            self.include_sequences = config.include_sequences;
        }
        if self.exclude_sequences.is_none() {
            self.exclude_sequences = config.exclude_sequences;
        }
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.pre_aligned && config.pre_aligned.unwrap_or(false) {
            self.pre_aligned = true;
        }
        if !self.force_align && config.force_align.unwrap_or(false) {
            self.force_align = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }
        if !self.verbose && config.verbose.unwrap_or(false) {
            self.verbose = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
