//! Search orchestrator: paginated URL generation and bounded concurrent fan-out.
//!
//! Every requested engine runs concurrently; within an engine at most
//! `workers_per_engine` fetches are in flight. Completion order is ignored:
//! each engine's documents are sorted by pagination offset before they are
//! returned.

pub mod pages;
pub mod search;

pub use search::{EngineDocuments, SearchOrchestrator};
