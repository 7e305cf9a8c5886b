use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use greffier::{
    build_paragraphs, load_dictionary, load_metadata, load_roster, map_speakers, read_transcript,
    run_optimizer, run_pipeline, split_interventions, structure_dialogue, JsonDictionaryStore,
    NameListClassifier, OptimizerConfig,
};

#[derive(Parser)]
#[command(name = "greffier")]
#[command(author, version, about = "Hearing transcript correction and scoring pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct a transcript, score it, and segment it into paragraphs
    Process {
        /// Raw transcript file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Case metadata file (JSON)
        #[arg(short, long)]
        metadata: PathBuf,

        /// Rule dictionary file (JSON)
        #[arg(short, long)]
        dictionary: PathBuf,

        /// Optional commissioner roster cache (JSON)
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Output file for the corrected transcript (text)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the quality report (JSON)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Output file for the segmented paragraphs (JSON)
        #[arg(long)]
        paragraphs: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Iteratively enrich the dictionary until the target score is reached
    Optimize {
        /// Raw transcript file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Case metadata file (JSON)
        #[arg(short, long)]
        metadata: PathBuf,

        /// Rule dictionary file (JSON); enriched in place, with backups
        #[arg(short, long)]
        dictionary: PathBuf,

        /// Optional commissioner roster cache (JSON)
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Output directory for the corrected text and trajectory report
        #[arg(long)]
        output_dir: PathBuf,

        /// Quality score to aim for
        #[arg(long, default_value = "85")]
        target_score: u8,

        /// Maximum optimization iterations
        #[arg(long, default_value = "3")]
        max_iterations: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            metadata,
            dictionary,
            roster,
            output,
            report,
            paragraphs,
            verbose,
        } => {
            setup_logging(verbose);
            process(
                input, metadata, dictionary, roster, output, report, paragraphs,
            )
        }
        Commands::Optimize {
            input,
            metadata,
            dictionary,
            roster,
            output_dir,
            target_score,
            max_iterations,
            verbose,
        } => {
            setup_logging(verbose);
            optimize(
                input,
                metadata,
                dictionary,
                roster,
                output_dir,
                target_score,
                max_iterations,
            )
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn process(
    input: PathBuf,
    metadata: PathBuf,
    dictionary: PathBuf,
    roster: Option<PathBuf>,
    output: Option<PathBuf>,
    report: Option<PathBuf>,
    paragraphs: Option<PathBuf>,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let raw_text = read_transcript(&input).context("Failed to read input transcript")?;
    let case_metadata = load_metadata(&metadata).context("Failed to load case metadata")?;
    let rules = load_dictionary(&dictionary).context("Failed to load rule dictionary")?;
    let roster = roster
        .map(|path| load_roster(&path).context("Failed to load commissioner roster"))
        .transpose()?;

    let classifier = NameListClassifier::default();
    let result = run_pipeline(
        &raw_text,
        &case_metadata,
        &rules,
        roster.as_ref(),
        &classifier,
    );

    info!(
        "Score {}/100 ({:?}), {} corrections, {} warnings",
        result.report.quality.score,
        result.report.quality.level,
        result.report.statistics.total_corrections,
        result.report.warnings.len()
    );

    if let Some(path) = output {
        greffier::io::write_corrected_text(&path, &result.corrected_text)?;
    }
    if let Some(path) = report {
        greffier::io::write_report(&path, &result.report)?;
    }
    if let Some(path) = paragraphs {
        let hearing_type = case_metadata.work_order.hearing_type;
        let interventions = split_interventions(&result.corrected_text);
        let segmented = if interventions.is_empty() {
            build_paragraphs(&result.corrected_text)
        } else {
            let mapping = map_speakers(&interventions, hearing_type);
            let dialogue = structure_dialogue(&result.corrected_text, &mapping);
            build_paragraphs(&dialogue)
        };
        greffier::io::write_paragraphs(&path, &segmented)?;
    }

    Ok(())
}

fn optimize(
    input: PathBuf,
    metadata: PathBuf,
    dictionary_path: PathBuf,
    roster: Option<PathBuf>,
    output_dir: PathBuf,
    target_score: u8,
    max_iterations: usize,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let raw_text = read_transcript(&input).context("Failed to read input transcript")?;
    let case_metadata = load_metadata(&metadata).context("Failed to load case metadata")?;
    let mut rules = load_dictionary(&dictionary_path).context("Failed to load rule dictionary")?;
    let roster = roster
        .map(|path| load_roster(&path).context("Failed to load commissioner roster"))
        .transpose()?;

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {output_dir:?}"))?;

    let classifier = NameListClassifier::default();
    let mut store = JsonDictionaryStore::new(&dictionary_path);
    let config = OptimizerConfig {
        target_score,
        max_iterations,
    };

    let result = run_optimizer(
        &raw_text,
        &case_metadata,
        &mut rules,
        roster.as_ref(),
        &classifier,
        &mut store,
        &config,
    )
    .context("Dictionary persistence failed during optimization")?;

    for record in &result.report.trajectory {
        info!(
            "Iteration {}: {}/100 ({:?}) - {} corrections",
            record.iteration, record.score, record.level, record.corrections
        );
    }
    info!(
        "Final score {}/100 after {} iterations ({:+} points), outcome {:?}",
        result.report.final_score,
        result.report.iterations,
        result.report.improvement,
        result.report.outcome
    );

    greffier::io::write_corrected_text(
        &output_dir.join("transcription_corrigee.txt"),
        &result.final_text,
    )?;
    greffier::io::write_report(&output_dir.join("rapport_qualite.json"), &result.final_quality)?;
    greffier::io::write_optimization_report(
        &output_dir.join("rapport_optimisation.json"),
        &result.report,
    )?;

    Ok(())
}
