//! API configuration.

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Gate policy for the historically open endpoints
    pub auth_policy: AuthPolicy,
}

/// Which of the historically open endpoints require a valid token.
///
/// The deployed frontend calls these without a token, so everything
/// defaults to open.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthPolicy {
    /// Require auth on `POST /addJob`.
    pub protect_job_create: bool,
    /// Require auth on `DELETE /my-accepted-tasks/:id`.
    pub protect_task_delete: bool,
    /// Require auth on the public job listings.
    pub protect_public_listings: bool,
}

impl AuthPolicy {
    /// Read the policy flags from environment variables.
    pub fn from_env() -> Self {
        Self {
            protect_job_create: env_flag("PROTECT_JOB_CREATE"),
            protect_task_delete: env_flag("PROTECT_TASK_DELETE"),
            protect_public_listings: env_flag("PROTECT_PUBLIC_LISTINGS"),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: vec!["*".to_string()],
            max_body_size: 10 * 1024 * 1024, // 10MB
            auth_policy: AuthPolicy::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            auth_policy: AuthPolicy::from_env(),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}
