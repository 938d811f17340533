use anyhow::Result;
use clap::Parser;
use log::info;

use kraken2bracken::cli::Args;
use kraken2bracken::pipeline::processor::StageConfig;
use kraken2bracken::pipeline::stage::run_stage;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = StageConfig::from(args);

    let summary = run_stage(cfg)?;
    info!(
        "Done: {} processed, {} skipped, {} failed",
        summary.processed, summary.skipped, summary.failed
    );

    if summary.failed > 0 {
        anyhow::bail!("{} sample(s) failed; rerun to retry them", summary.failed);
    }
    Ok(())
}
