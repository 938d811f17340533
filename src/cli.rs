//! Command-line surface of the profiling stage.
//!
//! Flag names are kept verbatim (underscores included) so existing pipeline
//! drivers keep working.

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::layout::EndType;
use crate::pipeline::processor::StageConfig;

/// Taxonomic classification with Kraken2 and abundance estimation with
/// Bracken for a batch of decontaminated read files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to microbiome reads after decontamination
    #[arg(long = "path6_rcr")]
    pub path6_rcr: PathBuf,

    /// Path to Kraken2 outputs for report
    #[arg(long = "path7_ku2")]
    pub path7_ku2: PathBuf,

    /// Path for Bracken outputs
    #[arg(long = "path8_bracken")]
    pub path8_bracken: PathBuf,

    /// Path to Kraken2 database
    #[arg(long = "db_ku")]
    pub db_ku: PathBuf,

    /// Path to the pipeline installation containing the helper scripts
    #[arg(long = "itm_path")]
    pub itm_path: PathBuf,

    /// Number of threads for Kraken2
    #[arg(long = "num_threads", default_value_t = 8)]
    pub num_threads: usize,

    /// Reprocess samples even if marked complete
    #[arg(long)]
    pub force: bool,

    /// Treat inputs as single-end reads (default: paired-end)
    #[arg(long)]
    pub se: bool,
}

impl From<Args> for StageConfig {
    fn from(args: Args) -> Self {
        StageConfig {
            reads_dir: args.path6_rcr,
            classifier_dir: args.path7_ku2,
            abundance_dir: args.path8_bracken,
            db: args.db_ku,
            helper_root: args.itm_path,
            threads: args.num_threads,
            force: args.force,
            end_type: if args.se {
                EndType::SingleEnd
            } else {
                EndType::PairedEnd
            },
        }
    }
}
