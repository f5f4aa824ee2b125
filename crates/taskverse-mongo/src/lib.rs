//! MongoDB access layer for the TaskVerse backend.
//!
//! This crate provides:
//! - [`MongoStore`]: the shared client handle and collection accessors
//! - [`JobRepository`] and [`AcceptedTaskRepository`]: typed operations on
//!   the two collections
//! - [`query`]: filter, sort, and pagination builders for job listings
//! - [`report`]: serializable summaries of write operations

pub mod client;
pub mod error;
pub mod metrics;
pub mod query;
pub mod report;
pub mod repos;

// Re-export common types
pub use bson::oid::ObjectId;
pub use client::{MongoStore, StoreConfig, ACCEPTED_TASKS_COLLECTION, JOBS_COLLECTION};
pub use error::{StoreError, StoreResult};
pub use query::{JobFilter, Page, SortKey};
pub use report::{DeleteReport, InsertReport, UpdateReport};
pub use repos::{AcceptedTaskRepository, JobRepository};
