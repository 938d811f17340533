//! Per-sample idempotent execution of the profiling step sequence.

use log::{info, warn};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::layout::{EndType, SampleLayout};
use crate::tools::bracken::{AbundanceRank, Bracken};
use crate::tools::helpers::{DiversityCalculator, MpaConverter, ReportProjector};
use crate::tools::kraken::Kraken2;
use crate::tools::ToolError;

/// Sentinel content of the completion marker file. Fixed: downstream stages
/// and older runs look for exactly this file.
pub const COMPLETION_SENTINEL: &str = ">>>== Processing completed.";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("external tool failed: {0}")]
    Tool(#[from] ToolError),
}

/// Outcome of one sample's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    /// The full step sequence ran and the completion marker was written.
    Processed,
    /// Marker and report already present and reprocessing was not forced.
    Skipped,
}

/// Resolved configuration of one stage invocation.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Directory of decontaminated read files.
    pub reads_dir: PathBuf,
    /// Output directory for Kraken2 reports and the completion markers.
    pub classifier_dir: PathBuf,
    /// Output directory for Bracken abundance and diversity files.
    pub abundance_dir: PathBuf,
    /// Kraken2 database path (read-only, shared across samples).
    pub db: PathBuf,
    /// Pipeline installation root containing the helper scripts.
    pub helper_root: PathBuf,
    /// Thread count passed through to Kraken2.
    pub threads: usize,
    /// Reprocess samples even when already marked complete.
    pub force: bool,
    pub end_type: EndType,
}

/// The external tools the processor drives. Split out from the config so
/// tests can substitute mock programs.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub kraken2: Kraken2,
    pub bracken: Bracken,
    pub projector: ReportProjector,
    pub mpa: MpaConverter,
    pub diversity: DiversityCalculator,
}

impl Toolchain {
    /// Tools at their default program names, configured from the stage paths.
    pub fn from_config(cfg: &StageConfig) -> Self {
        Toolchain {
            kraken2: Kraken2::new(&cfg.db, cfg.threads),
            bracken: Bracken::new(&cfg.db),
            projector: ReportProjector::new(),
            mpa: MpaConverter::new(&cfg.helper_root),
            diversity: DiversityCalculator::new(&cfg.helper_root),
        }
    }
}

/// Runs the fixed step sequence for single samples: classify, project the
/// report columns, convert to MPA format, re-estimate abundances at four
/// ranks, compute diversity metrics at two ranks, then mark completion.
///
/// Any failing step aborts the remaining steps for that sample; the
/// completion marker is written only after every step succeeded, so a failed
/// sample is picked up again by the next run.
pub struct SampleProcessor {
    cfg: StageConfig,
    tools: Toolchain,
}

impl SampleProcessor {
    pub fn new(cfg: StageConfig) -> Self {
        let tools = Toolchain::from_config(&cfg);
        SampleProcessor { cfg, tools }
    }

    pub fn with_toolchain(cfg: StageConfig, tools: Toolchain) -> Self {
        SampleProcessor { cfg, tools }
    }

    /// Path layout for one sample under this stage's output directories.
    pub fn layout(&self, sample_id: &str) -> SampleLayout {
        SampleLayout::new(sample_id, &self.cfg.classifier_dir, &self.cfg.abundance_dir)
    }

    pub fn process_sample(&self, sample_id: &str) -> Result<SampleStatus, PipelineError> {
        let layout = self.layout(sample_id);

        // A marker alone is not enough: the report must still be present,
        // otherwise the sample is reprocessed.
        if !self.cfg.force && layout.task_complete.exists() && layout.kraken_report.exists() {
            info!(">>== Sample {sample_id} processing already completed. Skipping...");
            return Ok(SampleStatus::Skipped);
        }

        info!(">>>== Processing sample: {sample_id}");
        let inputs = self
            .cfg
            .end_type
            .read_inputs(&self.cfg.reads_dir, sample_id);
        for path in inputs.paths() {
            if !path.exists() {
                warn!("Input read file missing: {}", path.display());
            }
        }

        self.tools
            .kraken2
            .classify(&inputs, &layout.kraken_report, &layout.kraken_output)?;

        self.tools
            .projector
            .project(&layout.kraken_report, &layout.report_std)?;
        self.tools.mpa.convert(&layout.report_std, &layout.mpa_std)?;

        for rank in AbundanceRank::estimated() {
            self.tools.bracken.estimate(
                &layout.kraken_report,
                rank,
                &layout.bracken_output(rank),
            )?;
        }

        for rank in AbundanceRank::diversity_ranks() {
            self.tools
                .diversity
                .append_all(&layout.bracken_output(rank), &layout.diversity_output(rank))?;
        }

        fs::write(&layout.task_complete, COMPLETION_SENTINEL)?;
        info!(">>>== Sample {sample_id} completed.");
        Ok(SampleStatus::Processed)
    }
}
