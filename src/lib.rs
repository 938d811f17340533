//! Batch Kraken2/Bracken profiling stage.
//!
//! This crate orchestrates one stage of a metagenomics workflow: taxonomic
//! classification of decontaminated reads with Kraken2, report post-processing,
//! abundance re-estimation with Bracken, and alpha-diversity computation, with
//! per-sample completion tracking so interrupted batches can be resumed.
//!
//! All substantive computation is delegated to external tools invoked as
//! blocking subprocesses; this crate owns batch discovery, the file-naming
//! conventions shared across stages, invocation arguments, and exit-status
//! checking.

pub mod cli;
pub mod pipeline;
pub mod tools;
