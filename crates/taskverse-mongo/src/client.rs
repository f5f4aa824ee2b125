//! MongoDB client handle and configuration.

use mongodb::{Client, Database};
use tracing::info;

use crate::error::StoreResult;
use crate::repos::{AcceptedTaskRepository, JobRepository};

/// Default database name.
pub const DATABASE_NAME: &str = "TaskVerseDB";

/// Collection holding job postings.
pub const JOBS_COLLECTION: &str = "jobs";

/// Collection holding accepted-task records.
pub const ACCEPTED_TASKS_COLLECTION: &str = "accepted-tasks";

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection string.
    pub uri: String,
    /// Database name.
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: DATABASE_NAME.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    ///
    /// `MONGODB_URI` wins; otherwise `DB_USER`/`DB_PASS`/`DB_HOST` are
    /// composed into an Atlas-style `mongodb+srv` URI; otherwise localhost.
    pub fn from_env() -> Self {
        let uri = std::env::var("MONGODB_URI")
            .ok()
            .or_else(compose_srv_uri)
            .unwrap_or_else(|| "mongodb://localhost:27017".to_string());

        let database =
            std::env::var("MONGODB_DB").unwrap_or_else(|_| DATABASE_NAME.to_string());

        Self { uri, database }
    }
}

fn compose_srv_uri() -> Option<String> {
    let user = std::env::var("DB_USER").ok()?;
    let pass = std::env::var("DB_PASS").ok()?;
    let host = std::env::var("DB_HOST").ok()?;
    Some(format!(
        "mongodb+srv://{user}:{pass}@{host}/?retryWrites=true&w=majority"
    ))
}

/// Shared MongoDB handle.
///
/// The driver connects lazily and owns its connection pool; one `MongoStore`
/// is created at startup and cloned into request state.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Initialize the client from configuration.
    ///
    /// Fails on a malformed connection string; actual connectivity faults
    /// surface on first use.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let db = client.database(&config.database);
        info!(database = %config.database, "Initialized MongoDB client");
        Ok(Self { db })
    }

    /// Repository over the jobs collection.
    pub fn jobs(&self) -> JobRepository {
        JobRepository::new(self.db.collection(JOBS_COLLECTION))
    }

    /// Repository over the accepted-tasks collection.
    pub fn accepted_tasks(&self) -> AcceptedTaskRepository {
        AcceptedTaskRepository::new(self.db.collection(ACCEPTED_TASKS_COLLECTION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_the_taskverse_database() {
        let config = StoreConfig::default();
        assert_eq!(config.database, "TaskVerseDB");
        assert!(config.uri.starts_with("mongodb://"));
    }
}
