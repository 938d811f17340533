//! Bracken abundance-estimation wrapper.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::tools::{run_checked, ToolError};

/// Read length Bracken was built for; fixed across the stage.
const READ_LENGTH: u32 = 100;
/// Minimum reads a taxon needs to receive re-estimated abundance.
const MIN_READS: u32 = 2;

/// Taxonomic ranks this stage re-estimates abundances at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbundanceRank {
    Genus,
    Species,
    Family,
    Order,
}

impl AbundanceRank {
    /// Bracken's `-l` rank letter.
    pub fn letter(&self) -> &'static str {
        match self {
            AbundanceRank::Genus => "G",
            AbundanceRank::Species => "S",
            AbundanceRank::Family => "F",
            AbundanceRank::Order => "O",
        }
    }

    /// Lowercase tag used in artifact filenames (`{id}.{tag}.bracken`).
    pub fn tag(&self) -> &'static str {
        match self {
            AbundanceRank::Genus => "g",
            AbundanceRank::Species => "s",
            AbundanceRank::Family => "f",
            AbundanceRank::Order => "o",
        }
    }

    /// The ranks abundance is estimated at, in invocation order.
    pub fn estimated() -> [AbundanceRank; 4] {
        [
            AbundanceRank::Genus,
            AbundanceRank::Species,
            AbundanceRank::Family,
            AbundanceRank::Order,
        ]
    }

    /// The ranks diversity metrics are computed for, in invocation order.
    pub fn diversity_ranks() -> [AbundanceRank; 2] {
        [AbundanceRank::Genus, AbundanceRank::Species]
    }
}

/// Bracken invocation: re-estimates taxon abundances from a Kraken2 report at
/// one taxonomic rank.
#[derive(Debug, Clone)]
pub struct Bracken {
    program: PathBuf,
    db: PathBuf,
}

impl Bracken {
    pub fn new(db: impl Into<PathBuf>) -> Self {
        Bracken {
            program: PathBuf::from("bracken"),
            db: db.into(),
        }
    }

    /// Override the program path (used by tests to point at a mock script).
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Estimate abundances at `rank` from the Kraken2 report into `output`.
    pub fn estimate(
        &self,
        report: &Path,
        rank: AbundanceRank,
        output: &Path,
    ) -> Result<(), ToolError> {
        run_checked("bracken", &mut self.command(report, rank, output))
    }

    fn command(&self, report: &Path, rank: AbundanceRank, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-d")
            .arg(&self.db)
            .arg("-i")
            .arg(report)
            .arg("-o")
            .arg(output)
            .arg("-r")
            .arg(READ_LENGTH.to_string())
            .arg("-l")
            .arg(rank.letter())
            .arg("-t")
            .arg(MIN_READS.to_string());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::recording_mock;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rank_codes() {
        assert_eq!(AbundanceRank::Genus.letter(), "G");
        assert_eq!(AbundanceRank::Species.letter(), "S");
        assert_eq!(AbundanceRank::Family.letter(), "F");
        assert_eq!(AbundanceRank::Order.letter(), "O");
        assert_eq!(AbundanceRank::Genus.tag(), "g");
        assert_eq!(AbundanceRank::Order.tag(), "o");
    }

    #[test]
    fn test_rank_invocation_order() {
        let letters: Vec<_> = AbundanceRank::estimated()
            .iter()
            .map(|r| r.letter())
            .collect();
        assert_eq!(letters, vec!["G", "S", "F", "O"]);

        let diversity: Vec<_> = AbundanceRank::diversity_ranks()
            .iter()
            .map(|r| r.tag())
            .collect();
        assert_eq!(diversity, vec!["g", "s"]);
    }

    #[test]
    fn test_command_arguments() {
        let bracken = Bracken::new("/db/ku");
        let cmd = bracken.command(
            Path::new("/out/S1.kraken.report.txt"),
            AbundanceRank::Species,
            Path::new("/out/S1.s.bracken"),
        );
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-d",
                "/db/ku",
                "-i",
                "/out/S1.kraken.report.txt",
                "-o",
                "/out/S1.s.bracken",
                "-r",
                "100",
                "-l",
                "S",
                "-t",
                "2",
            ]
        );
    }

    #[test]
    fn test_estimate_runs_program() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("calls.log");
        let mock = recording_mock(dir.path(), "bracken", &log);

        let bracken = Bracken::new("/db/ku").with_program(&mock);
        bracken
            .estimate(
                Path::new("/out/r.txt"),
                AbundanceRank::Genus,
                Path::new("/out/S1.g.bracken"),
            )
            .unwrap();

        let recorded = fs::read_to_string(&log).unwrap();
        assert!(recorded.contains("-l G"));
        assert!(recorded.contains("-t 2"));
    }
}
