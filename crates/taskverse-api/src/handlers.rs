//! Request handlers.

pub mod health;
pub mod jobs;
pub mod stats;
pub mod tasks;

pub use health::*;
pub use jobs::*;
pub use stats::*;
pub use tasks::*;
