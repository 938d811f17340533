//! Top-level stage runner: directory preparation, batch discovery, and
//! sequential sample iteration.

use colored::Colorize;
use log::{error, info};
use rand::seq::SliceRandom;
use std::fs;
use std::io;

use crate::pipeline::layout::discover_batch;
use crate::pipeline::processor::{SampleProcessor, SampleStatus, StageConfig, Toolchain};

/// Per-batch accounting returned by the stage runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Run the stage with the default external tools.
pub fn run_stage(cfg: StageConfig) -> io::Result<StageSummary> {
    let tools = Toolchain::from_config(&cfg);
    run_stage_with(cfg, tools)
}

/// Run the stage with an explicit toolchain (tests substitute mock programs).
///
/// Ensures both output directories exist, discovers the batch, shuffles it,
/// and processes every sample sequentially. A failed sample is logged and the
/// batch continues; it leaves no completion marker, so the next run retries
/// it. The shuffle spreads concurrent independent runs over different samples
/// when they share inputs; it is not a correctness requirement.
pub fn run_stage_with(cfg: StageConfig, tools: Toolchain) -> io::Result<StageSummary> {
    print_banner();
    info!(" >>> Perform taxonomic classification using Kraken2...");
    info!("Reads directory: {}", cfg.reads_dir.display());
    info!("Classifier output: {}", cfg.classifier_dir.display());
    info!("Abundance output: {}", cfg.abundance_dir.display());
    info!("Database: {}", cfg.db.display());
    info!(
        "Threads: {}, force: {}, end type: {:?}",
        cfg.threads, cfg.force, cfg.end_type
    );

    fs::create_dir_all(&cfg.classifier_dir)?;
    fs::create_dir_all(&cfg.abundance_dir)?;

    let mut sample_ids = discover_batch(&cfg.reads_dir, cfg.end_type)?;
    info!(
        "Discovered {} sample(s) in {}",
        sample_ids.len(),
        cfg.reads_dir.display()
    );
    sample_ids.shuffle(&mut rand::rng());

    let processor = SampleProcessor::with_toolchain(cfg, tools);
    let mut summary = StageSummary::default();
    for sample_id in &sample_ids {
        match processor.process_sample(sample_id) {
            Ok(SampleStatus::Processed) => summary.processed += 1,
            Ok(SampleStatus::Skipped) => summary.skipped += 1,
            Err(e) => {
                error!("Sample {sample_id} failed: {e}");
                summary.failed += 1;
            }
        }
    }

    info!(
        "Stage finished: {} processed, {} skipped, {} failed",
        summary.processed, summary.skipped, summary.failed
    );
    Ok(summary)
}

fn print_banner() {
    println!();
    println!(
        "{}",
        "#########################################################".blue()
    );
    println!(
        "{}",
        " ITMfinder: Identifing Intratumoral Microbiome pipeline ".cyan()
    );
    println!(
        "{}",
        " If you encounter any issues, please report them at ".cyan()
    );
    println!(
        "{}",
        " https://github.com/LiaoWJLab/ITMfinder/issues ".cyan()
    );
    println!(
        "{}",
        "#########################################################".blue()
    );
    println!(" Author: Dongqiang Zeng, Qianqian Mao ");
    println!(" Email: interlaken@smu.edu.cn ");
    println!(
        "{}",
        "#########################################################".blue()
    );
    println!();
}
