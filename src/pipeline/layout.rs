//! File-naming conventions shared across pipeline stages.
//!
//! Every artifact a sample produces is derived from its ID by a fixed pattern;
//! downstream stages rely on these names, so they must not change.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::tools::bracken::AbundanceRank;

/// Sequencing read layout of the input batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndType {
    PairedEnd,
    SingleEnd,
}

impl EndType {
    /// Filename suffix marking a sample's (first) read file in the reads
    /// directory. The paired mate 2 file is implied, never matched directly.
    pub fn read_suffix(&self) -> &'static str {
        match self {
            EndType::PairedEnd => "_rcr_1.fastq.gz",
            EndType::SingleEnd => "_rcr.fastq.gz",
        }
    }

    /// Extract the sample ID from a read filename. Returns `None` when the
    /// filename does not carry this end type's suffix; such files are not
    /// part of the batch.
    pub fn sample_id_from_filename(&self, name: &str) -> Option<String> {
        name.strip_suffix(self.read_suffix())
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string())
    }

    /// Input read file(s) for a sample under the reads directory.
    pub fn read_inputs(&self, reads_dir: &Path, sample_id: &str) -> ReadInputs {
        match self {
            EndType::PairedEnd => ReadInputs::Paired(
                reads_dir.join(format!("{sample_id}_rcr_1.fastq.gz")),
                reads_dir.join(format!("{sample_id}_rcr_2.fastq.gz")),
            ),
            EndType::SingleEnd => {
                ReadInputs::Single(reads_dir.join(format!("{sample_id}_rcr.fastq.gz")))
            }
        }
    }
}

/// Resolved input read file(s) for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadInputs {
    Single(PathBuf),
    Paired(PathBuf, PathBuf),
}

impl ReadInputs {
    pub fn is_paired(&self) -> bool {
        matches!(self, ReadInputs::Paired(..))
    }

    /// The read file paths in mate order.
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            ReadInputs::Single(p) => vec![p],
            ReadInputs::Paired(p1, p2) => vec![p1, p2],
        }
    }
}

/// All artifact paths for one sample, derived from its ID and the two output
/// directories.
#[derive(Debug, Clone)]
pub struct SampleLayout {
    pub sample_id: String,
    /// `{id}.kraken.report.txt` — Kraken2 report.
    pub kraken_report: PathBuf,
    /// `{id}.kraken.output.txt` — Kraken2 raw per-read output.
    pub kraken_output: PathBuf,
    /// `{id}.kraken.report.std.txt` — report projected to the standard columns.
    pub report_std: PathBuf,
    /// `{id}.kraken.mpa.std.txt` — lineage-path (MPA) formatted report.
    pub mpa_std: PathBuf,
    /// `{id}.task.complete` — completion marker.
    pub task_complete: PathBuf,
    abundance_dir: PathBuf,
}

impl SampleLayout {
    pub fn new(sample_id: &str, classifier_dir: &Path, abundance_dir: &Path) -> Self {
        SampleLayout {
            sample_id: sample_id.to_string(),
            kraken_report: classifier_dir.join(format!("{sample_id}.kraken.report.txt")),
            kraken_output: classifier_dir.join(format!("{sample_id}.kraken.output.txt")),
            report_std: classifier_dir.join(format!("{sample_id}.kraken.report.std.txt")),
            mpa_std: classifier_dir.join(format!("{sample_id}.kraken.mpa.std.txt")),
            task_complete: classifier_dir.join(format!("{sample_id}.task.complete")),
            abundance_dir: abundance_dir.to_path_buf(),
        }
    }

    /// `{id}.{r}.bracken` — Bracken abundance estimate at the given rank.
    pub fn bracken_output(&self, rank: AbundanceRank) -> PathBuf {
        self.abundance_dir
            .join(format!("{}.{}.bracken", self.sample_id, rank.tag()))
    }

    /// `{id}.diversity.{r}.txt` — accumulated diversity metrics at the given rank.
    pub fn diversity_output(&self, rank: AbundanceRank) -> PathBuf {
        self.abundance_dir
            .join(format!("{}.diversity.{}.txt", self.sample_id, rank.tag()))
    }
}

/// List the reads directory and collect the IDs of every sample matching the
/// end type's naming convention. Files with other names are ignored.
pub fn discover_batch(reads_dir: &Path, end_type: EndType) -> io::Result<Vec<String>> {
    let mut sample_ids = Vec::new();
    for entry in fs::read_dir(reads_dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(id) = end_type.sample_id_from_filename(name) {
            sample_ids.push(id);
        }
    }
    Ok(sample_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_read_suffixes() {
        assert_eq!(EndType::PairedEnd.read_suffix(), "_rcr_1.fastq.gz");
        assert_eq!(EndType::SingleEnd.read_suffix(), "_rcr.fastq.gz");
    }

    #[test]
    fn test_sample_id_extraction() {
        assert_eq!(
            EndType::PairedEnd.sample_id_from_filename("TCGA-01_rcr_1.fastq.gz"),
            Some("TCGA-01".to_string())
        );
        // Mate 2 is implied by mate 1, never matched itself
        assert_eq!(
            EndType::PairedEnd.sample_id_from_filename("TCGA-01_rcr_2.fastq.gz"),
            None
        );
        assert_eq!(
            EndType::SingleEnd.sample_id_from_filename("TCGA-01_rcr.fastq.gz"),
            Some("TCGA-01".to_string())
        );
        assert_eq!(
            EndType::SingleEnd.sample_id_from_filename("TCGA-01_rcr_1.fastq.gz"),
            None
        );
        assert_eq!(EndType::PairedEnd.sample_id_from_filename("notes.txt"), None);
        // A bare suffix carries no sample ID
        assert_eq!(
            EndType::SingleEnd.sample_id_from_filename("_rcr.fastq.gz"),
            None
        );
    }

    #[test]
    fn test_read_inputs_paths() {
        let dir = Path::new("/data/reads");
        let inputs = EndType::PairedEnd.read_inputs(dir, "S1");
        assert_eq!(
            inputs,
            ReadInputs::Paired(
                PathBuf::from("/data/reads/S1_rcr_1.fastq.gz"),
                PathBuf::from("/data/reads/S1_rcr_2.fastq.gz"),
            )
        );
        assert!(inputs.is_paired());

        let inputs = EndType::SingleEnd.read_inputs(dir, "S1");
        assert_eq!(
            inputs,
            ReadInputs::Single(PathBuf::from("/data/reads/S1_rcr.fastq.gz"))
        );
        assert!(!inputs.is_paired());
    }

    #[test]
    fn test_sample_layout_artifact_paths() {
        let layout = SampleLayout::new("S1", Path::new("/out/ku2"), Path::new("/out/bracken"));
        assert_eq!(
            layout.kraken_report,
            PathBuf::from("/out/ku2/S1.kraken.report.txt")
        );
        assert_eq!(
            layout.kraken_output,
            PathBuf::from("/out/ku2/S1.kraken.output.txt")
        );
        assert_eq!(
            layout.report_std,
            PathBuf::from("/out/ku2/S1.kraken.report.std.txt")
        );
        assert_eq!(layout.mpa_std, PathBuf::from("/out/ku2/S1.kraken.mpa.std.txt"));
        assert_eq!(
            layout.task_complete,
            PathBuf::from("/out/ku2/S1.task.complete")
        );
        assert_eq!(
            layout.bracken_output(AbundanceRank::Genus),
            PathBuf::from("/out/bracken/S1.g.bracken")
        );
        assert_eq!(
            layout.bracken_output(AbundanceRank::Order),
            PathBuf::from("/out/bracken/S1.o.bracken")
        );
        assert_eq!(
            layout.diversity_output(AbundanceRank::Species),
            PathBuf::from("/out/bracken/S1.diversity.s.txt")
        );
    }

    #[test]
    fn test_discover_batch_by_end_type() {
        let dir = TempDir::new().unwrap();
        for name in [
            "A_rcr_1.fastq.gz",
            "A_rcr_2.fastq.gz",
            "B_rcr.fastq.gz",
            "README.md",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }

        let paired = discover_batch(dir.path(), EndType::PairedEnd).unwrap();
        assert_eq!(paired, vec!["A".to_string()]);

        let single = discover_batch(dir.path(), EndType::SingleEnd).unwrap();
        assert_eq!(single, vec!["B".to_string()]);
    }

    #[test]
    fn test_discover_batch_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(discover_batch(&missing, EndType::PairedEnd).is_err());
    }
}
