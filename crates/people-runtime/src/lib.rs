//! Runtime orchestrator — enriches person input with age, gender, and
//! nationality guesses before handing the merged record to the store.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Orchestrator;
pub use types::*;
