pub mod layout;
pub mod processor;
pub mod stage;

pub use processor::{SampleProcessor, SampleStatus, StageConfig};
pub use stage::{run_stage, StageSummary};
