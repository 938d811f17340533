//! Kraken2 classifier wrapper.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::pipeline::layout::ReadInputs;
use crate::tools::{run_checked, ToolError};

/// Kraken2 invocation: database and thread count are fixed per stage, the
/// read file(s) and report/output paths vary per sample.
#[derive(Debug, Clone)]
pub struct Kraken2 {
    program: PathBuf,
    db: PathBuf,
    threads: usize,
}

impl Kraken2 {
    pub fn new(db: impl Into<PathBuf>, threads: usize) -> Self {
        Kraken2 {
            program: PathBuf::from("kraken2"),
            db: db.into(),
            threads: threads.max(1),
        }
    }

    /// Override the program path (used by tests to point at a mock script).
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Classify a sample's reads, producing the report and the raw per-read
    /// output listing. Minimizer reporting and human-readable taxon names are
    /// always enabled; paired inputs add the `--paired` flag before both mates.
    pub fn classify(
        &self,
        inputs: &ReadInputs,
        report: &Path,
        output: &Path,
    ) -> Result<(), ToolError> {
        run_checked("kraken2", &mut self.command(inputs, report, output))
    }

    fn command(&self, inputs: &ReadInputs, report: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--db")
            .arg(&self.db)
            .arg("--threads")
            .arg(self.threads.to_string())
            .arg("--report-minimizer-data")
            .arg("--report")
            .arg(report)
            .arg("--use-names")
            .arg("--output")
            .arg(output);
        if inputs.is_paired() {
            cmd.arg("--paired");
        }
        for path in inputs.paths() {
            cmd.arg(path);
        }
        cmd
    }
}
