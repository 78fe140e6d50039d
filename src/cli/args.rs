// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// consanalyzer - Conservation and mutation detection for multiple sequence alignments
pub struct Args {
    /// input FASTA file (aligned, or raw sequences to be aligned)
    #[argh(option)]
    pub input: Option<String>,

    /// output prefix for result tables
    #[argh(option)]
    pub output: Option<String>,

    /// minimum conservation rate for a conserved column (default: 0.8)
    #[argh(option, default = "0.8")]
    pub conservation_threshold: f64,

    /// maximum conservation rate for a mutated column (default: 0.2)
    #[argh(option, default = "0.2")]
    pub mutation_threshold: f64,

    /// compare columns against this sequence instead of the majority symbol
    #[argh(option)]
    pub reference: Option<String>,

    /// treat the input as aligned and never run the aligner
    #[argh(switch)]
    pub pre_aligned: bool,

    /// always run the aligner, even on equal-length input
    #[argh(switch)]
    pub force_align: bool,

    /// aligner used for unaligned input: mafft, clustalo (default: mafft)
    #[argh(option, default = "String::from(\"mafft\")")]
    pub aligner: String,

    /// path to the aligner executable (default: looked up in PATH)
    #[argh(option)]
    pub aligner_path: Option<String>,

    /// alphabet for the null model: observed, dna, rna, protein or a symbol count (default: observed)
    #[argh(option, default = "String::from(\"observed\")")]
    pub alphabet: String,

    /// gap handling: count, exclude (default: count)
    #[argh(option, default = "String::from(\"count\")")]
    pub gap_mode: String,

    /// gap character (default: -)
    #[argh(option, default = "String::from(\"-\")")]
    pub gap_char: String,

    /// output table format: tsv, csv (default: tsv)
    #[argh(option, default = "String::from(\"tsv\")")]
    pub format: String,

    /// also write the full analysis summary as JSON
    #[argh(option)]
    pub summary_json: Option<String>,

    /// include only sequences whose identifier matches regex pattern
    #[argh(option)]
    pub include_sequences: Option<String>,

    /// exclude sequences whose identifier matches regex pattern
    #[argh(option)]
    pub exclude_sequences: Option<String>,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// validate inputs without computation (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// show debug diagnostics
    #[argh(switch)]
    pub verbose: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}

#[cfg(test)]
pub(crate) fn parse_args(args: &[&str]) -> Result<Args, String> {
    Args::from_args(&["consanalyzer"], args).map_err(|e| e.output)
}
