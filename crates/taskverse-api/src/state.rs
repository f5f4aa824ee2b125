//! Shared application state.

use std::sync::Arc;

use taskverse_mongo::{MongoStore, StoreConfig};

use crate::auth::{FirebaseTokenVerifier, TokenVerifier};
use crate::config::ApiConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<MongoStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = MongoStore::connect(StoreConfig::from_env()).await?;
        let verifier = FirebaseTokenVerifier::from_env()?;

        Ok(Self {
            config,
            store: Arc::new(store),
            verifier: Arc::new(verifier),
        })
    }
}
