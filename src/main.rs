// main.rs - CLI entry point

use consanalyzer::cli::Config;
use consanalyzer::data::sequence::filter_records;
use consanalyzer::output::{aligned_fasta_path, write_results, write_summary_json};
use consanalyzer::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::path::Path;
use std::time::{Duration, Instant};

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .map_err(|e| format!("Failed to initialize logger: {}", e))?;

    let input = args.input.clone().ok_or("--input is required")?;
    if args.output.is_none() && !args.dry_run {
        return Err("--output is required".to_string());
    }

    println!("🚀 consanalyzer v{}", env!("CARGO_PKG_VERSION"));

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Threads: {}", n);
    } else {
        let num_threads = rayon::current_num_threads();
        println!("🧵 Threads: {} (auto-detected)", num_threads);
    }

    // Validate all arguments
    let validation = validate_args(&args)?;
    let mut analysis_config = validation.analysis_config;

    let total_start = Instant::now();

    // Load and filter sequences
    let records = read_fasta(Path::new(&input))?;
    let records = filter_records(
        records,
        validation.include_regex.as_ref(),
        validation.exclude_regex.as_ref(),
    )?;

    let needs_alignment = validation.alignment_policy.needs_alignment(&records);
    println!(
        "🧭 Alignment: {} ({})",
        if needs_alignment {
            format!("running {}", args.aligner)
        } else {
            "using input as aligned".to_string()
        },
        validation.alignment_policy.description()
    );

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        println!(
            "📊 Input: {} sequences{}",
            records.len(),
            if is_aligned(&records) {
                format!(" × {} columns", records[0].len())
            } else {
                " of unequal length".to_string()
            }
        );
        if let Some(prefix) = &args.output {
            println!("📁 Outputs would be written with prefix: {}", prefix);
        }
        return Ok(());
    }
    let output = args.output.clone().ok_or("--output is required")?;

    let records = if needs_alignment {
        let aligned = run_aligner(&args, &records)?;
        let aligned_path = aligned_fasta_path(&output);
        write_fasta(Path::new(&aligned_path), &aligned)?;
        println!("💾 Aligned sequences saved to: {}", aligned_path);
        analysis_config.pre_aligned = false;
        aligned
    } else {
        analysis_config.pre_aligned = true;
        records
    };

    println!(
        "🎯 Thresholds: conserved ≥ {}, mutated ≤ {}",
        analysis_config.conservation_threshold, analysis_config.mutation_threshold
    );
    match &analysis_config.reference_id {
        Some(id) => println!("📌 Comparison basis: reference sequence '{}'", id),
        None => println!("📌 Comparison basis: column majority symbol"),
    }
    println!(
        "🔤 Alphabet: {} | Gaps: {}",
        analysis_config.alphabet,
        analysis_config.gap_handling.description()
    );

    // Run analysis
    println!("\n🔄 Analyzing alignment columns...");
    let analysis_start = Instant::now();
    let summary = analyze(records, &analysis_config).map_err(|e| e.to_string())?;
    println!(
        "✅ Analysis completed in {:.2}s",
        analysis_start.elapsed().as_secs_f64()
    );

    // Write outputs
    write_results(&output, validation.format, &summary, &command_line)?;
    if let Some(json_path) = &args.summary_json {
        write_summary_json(json_path, &summary, &analysis_config, &command_line)?;
    }

    print_summary(&summary);

    println!(
        "\n⏱️  Total execution time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Align records with the selected aligner behind a spinner
fn run_aligner(args: &Args, records: &[SequenceRecord]) -> Result<Vec<SequenceRecord>, String> {
    let mut registry = AlignerRegistry::new();
    if let Some(path) = &args.aligner_path {
        registry.set_program(&args.aligner, path)?;
    }
    let aligner = registry.get_aligner(&args.aligner).ok_or_else(|| {
        format!(
            "Invalid aligner '{}'. Available: {}",
            args.aligner,
            registry.get_aligner_names().join(", ")
        )
    })?;

    println!("🔨 Aligner: {} ({})", aligner.name(), aligner.description());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .map_err(|e| format!("Invalid progress template: {}", e))?,
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!(
        "Aligning {} sequences with {}...",
        records.len(),
        aligner.program()
    ));

    let result = aligner.align(records);
    match &result {
        Ok(aligned) => pb.finish_with_message(format!(
            "✅ Aligned {} sequences ({} columns)",
            aligned.len(),
            aligned.first().map(|r| r.len()).unwrap_or(0)
        )),
        Err(_) => pb.abandon_with_message("❌ Alignment failed"),
    }

    result.map_err(|e| e.to_string())
}

fn print_summary(summary: &AnalysisSummary) {
    println!("\n📈 === CONSERVATION SUMMARY ===");
    println!(
        "🧬 Alignment: {} sequences × {} columns (alphabet size {})",
        summary.number_of_sequences, summary.alignment_length, summary.alphabet_size
    );
    println!(
        "  • Overall conservation rate: {:.4} ({} of {} columns conserved)",
        summary.overall_conservation_rate,
        summary.conserved.len(),
        summary.alignment_length
    );
    println!(
        "  • Mean column conservation rate: {:.4}",
        summary.mean_conservation_rate
    );
    println!(
        "  • Conserved: {} | Mutated: {} | Neutral: {}",
        summary.conserved.len(),
        summary.mutated.len(),
        summary.neutral_count
    );

    let significant = summary
        .columns
        .iter()
        .filter(|c| c.adjusted_p_value < 0.05)
        .count();
    println!("  • Columns with adjusted p < 0.05: {}", significant);
    println!(
        "  • Conserved category p-value: {:.4e}",
        summary.category_significance.conserved_p_value
    );
    println!(
        "  • Mutated category p-value: {:.4e}",
        summary.category_significance.mutated_p_value
    );
}
