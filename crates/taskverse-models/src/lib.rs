//! Shared data models for the TaskVerse backend.
//!
//! This crate provides:
//! - [`Job`] and [`JobPatch`] for documents in the jobs collection
//! - [`AcceptedTask`] for documents in the accepted-tasks collection
//! - JSON <-> BSON conversions for the wire format ([`wire`])

pub mod job;
pub mod task;
pub mod wire;

// Re-export common types
pub use job::{Job, JobPatch};
pub use task::AcceptedTask;
