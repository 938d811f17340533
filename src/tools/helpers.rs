//! Wrappers for the report post-processing helpers: column projection,
//! MPA-format conversion, and alpha-diversity computation.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::tools::{run_checked, ToolError};

/// Column list projected out of the Kraken2 report: {1,2,3,6,7,8}. Columns
/// 4-5 hold the minimizer data the downstream helpers do not understand.
const REPORT_COLUMNS: &str = "1-3,6-8";

/// Projects the standard columns out of a minimizer-annotated Kraken2 report
/// using the external field-selection utility.
#[derive(Debug, Clone)]
pub struct ReportProjector {
    program: PathBuf,
}

impl Default for ReportProjector {
    fn default() -> Self {
        ReportProjector {
            program: PathBuf::from("cut"),
        }
    }
}

impl ReportProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the program path (used by tests to point at a mock script).
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Write columns {1,2,3,6,7,8} of `report` into `output`.
    pub fn project(&self, report: &Path, output: &Path) -> Result<(), ToolError> {
        let stdout = File::create(output)?;
        let mut cmd = Command::new(&self.program);
        cmd.arg(format!("-f{REPORT_COLUMNS}"))
            .arg(report)
            .stdout(Stdio::from(stdout));
        run_checked("cut", &mut cmd)
    }
}

/// Converts a projected Kraken2 report to the hierarchical lineage-path (MPA)
/// format via the `kreport2mpa.py` helper script.
#[derive(Debug, Clone)]
pub struct MpaConverter {
    python: PathBuf,
    script: PathBuf,
}

impl MpaConverter {
    /// `helper_root` is the pipeline installation root; the script lives under
    /// its `itm_helper` directory.
    pub fn new(helper_root: &Path) -> Self {
        MpaConverter {
            python: PathBuf::from("python"),
            script: helper_root.join("itm_helper").join("kreport2mpa.py"),
        }
    }

    /// Override the interpreter path (used by tests to point at a mock script).
    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = python.into();
        self
    }

    pub fn convert(&self, report_std: &Path, output: &Path) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.python);
        cmd.arg(&self.script)
            .arg("-r")
            .arg(report_std)
            .arg("-o")
            .arg(output);
        run_checked("kreport2mpa", &mut cmd)
    }
}

/// Alpha-diversity indices computed from a Bracken abundance file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiversityMetric {
    Shannon,
    BergerParker,
    Simpson,
    InverseSimpson,
    Fisher,
}

impl DiversityMetric {
    /// The helper script's `-a` metric code.
    pub fn code(&self) -> &'static str {
        match self {
            DiversityMetric::Shannon => "Sh",
            DiversityMetric::BergerParker => "BP",
            DiversityMetric::Simpson => "Si",
            DiversityMetric::InverseSimpson => "ISi",
            DiversityMetric::Fisher => "F",
        }
    }

    /// All metrics in invocation order.
    pub fn all() -> [DiversityMetric; 5] {
        [
            DiversityMetric::Shannon,
            DiversityMetric::BergerParker,
            DiversityMetric::Simpson,
            DiversityMetric::InverseSimpson,
            DiversityMetric::Fisher,
        ]
    }
}

/// Computes alpha-diversity metrics via the `alpha_diversity.py` helper
/// script, one invocation per metric, each appending its line to the rank's
/// diversity file.
#[derive(Debug, Clone)]
pub struct DiversityCalculator {
    python: PathBuf,
    script: PathBuf,
}

impl DiversityCalculator {
    pub fn new(helper_root: &Path) -> Self {
        DiversityCalculator {
            python: PathBuf::from("python"),
            script: helper_root.join("itm_helper").join("alpha_diversity.py"),
        }
    }

    /// Override the interpreter path (used by tests to point at a mock script).
    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = python.into();
        self
    }

    /// Run every metric against `abundance_file`, appending each output line
    /// to `output`. The file is opened once in append mode, so repeated runs
    /// accumulate lines rather than overwrite.
    pub fn append_all(&self, abundance_file: &Path, output: &Path) -> Result<(), ToolError> {
        let out_file = OpenOptions::new().create(true).append(true).open(output)?;
        for metric in DiversityMetric::all() {
            let mut cmd = Command::new(&self.python);
            cmd.arg(&self.script)
                .arg("-f")
                .arg(abundance_file)
                .arg("-a")
                .arg(metric.code())
                .stdout(Stdio::from(out_file.try_clone()?));
            run_checked("alpha_diversity", &mut cmd)?;
        }
        Ok(())
    }
}
