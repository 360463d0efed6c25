pub mod orchestrator;
pub mod planner;

pub use orchestrator::CascadeService;
