pub mod orchestrator;
pub mod artifacts;

pub use orchestrator::ReviewPipeline;
