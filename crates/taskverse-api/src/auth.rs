//! Firebase ID token verification.
//!
//! Tokens are RS256 JWTs signed by Google's securetoken service. Public
//! keys are fetched from the JWKS endpoint and cached for an hour;
//! verification checks signature, issuer, audience and expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Claims carried by a verified Firebase ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseClaims {
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub auth_time: Option<i64>,
}

impl FirebaseClaims {
    pub fn uid(&self) -> &str {
        &self.sub
    }
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JwkKey>,
}

#[derive(Debug, Deserialize)]
struct JwkKey {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token header has no key id")]
    MissingKeyId,

    #[error("No JWKS key matches kid {0}")]
    UnknownKeyId(String),

    #[error("JWKS refresh failed: {0}")]
    Refresh(#[from] reqwest::Error),

    #[error("Key error: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),
}

/// Verifies bearer tokens into claims. Object-safe so handlers and tests
/// can swap in stub verifiers.
#[axum::async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<FirebaseClaims, VerifyError>;
}

pub struct FirebaseTokenVerifier {
    http: reqwest::Client,
    jwks_url: String,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_refresh: RwLock<Instant>,
    project_id: String,
}

impl FirebaseTokenVerifier {
    pub fn new(project_id: impl Into<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            jwks_url: GOOGLE_JWKS_URL.to_string(),
            keys: RwLock::new(HashMap::new()),
            // Backdated so the first verification triggers a refresh.
            last_refresh: RwLock::new(Instant::now() - JWKS_CACHE_TTL),
            project_id: project_id.into(),
        })
    }

    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let project_id = std::env::var("FIREBASE_PROJECT_ID")
            .or_else(|_| std::env::var("GCP_PROJECT_ID"))
            .map_err(|_| "FIREBASE_PROJECT_ID is not set")?;
        Self::new(project_id)
    }

    #[cfg(test)]
    fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    async fn refresh_keys(&self) -> Result<(), VerifyError> {
        debug!("Refreshing JWKS keys");

        let response = self.http.get(&self.jwks_url).send().await?;
        let jwks: JwksResponse = response.error_for_status()?.json().await?;

        let mut parsed = HashMap::with_capacity(jwks.keys.len());
        for key in jwks.keys {
            parsed.insert(key.kid, DecodingKey::from_rsa_components(&key.n, &key.e)?);
        }

        let key_count = parsed.len();
        *self.keys.write().await = parsed;
        *self.last_refresh.write().await = Instant::now();

        debug!("Refreshed {} JWKS keys", key_count);
        Ok(())
    }

    async fn get_key(&self, kid: &str) -> Option<DecodingKey> {
        let needs_refresh = {
            let last = self.last_refresh.read().await;
            last.elapsed() > JWKS_CACHE_TTL
        };

        if needs_refresh {
            if let Err(error) = self.refresh_keys().await {
                // Keep serving cached keys when the endpoint is unreachable.
                warn!(error = %error, "JWKS refresh failed");
            }
        }

        self.keys.read().await.get(kid).cloned()
    }
}

#[axum::async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<FirebaseClaims, VerifyError> {
        let header =
            decode_header(token).map_err(|e| VerifyError::InvalidToken(e.to_string()))?;
        let kid = header.kid.ok_or(VerifyError::MissingKeyId)?;

        let key = self
            .get_key(&kid)
            .await
            .ok_or_else(|| VerifyError::UnknownKeyId(kid.clone()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[format!("{}{}", FIREBASE_ISSUER_PREFIX, self.project_id)]);
        validation.set_audience(&[&self.project_id]);

        let data = decode::<FirebaseClaims>(token, &key, &validation)
            .map_err(|e| VerifyError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }
}

/// Bearer token gate for protected routes.
///
/// A request without an `Authorization` header is turned away before the
/// token is even looked at; anything else is handed to the verifier and
/// rejected on failure. Handlers never see the claims, they keep reading
/// identity from the request itself.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        metrics::record_auth_failure("missing_header");
        return ApiError::unauthorized("Unauthorized Access. Token not found").into_response();
    };

    // A header that is present but not readable as a string counts as an
    // invalid token, not a missing one.
    let Ok(header) = header.to_str() else {
        metrics::record_auth_failure("invalid_token");
        return ApiError::unauthorized("Unauthorized Access").into_response();
    };

    let token = header.split(' ').nth(1).unwrap_or_default();

    match state.verifier.verify(token).await {
        Ok(claims) => {
            debug!(uid = %claims.uid(), "Token verified");
            next.run(request).await
        }
        Err(error) => {
            debug!(error = %error, "Token rejected");
            metrics::record_auth_failure("invalid_token");
            ApiError::unauthorized("Unauthorized Access").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // RSA modulus from RFC 7517's example key. Valid key material, but we
    // never hold the private half, so signatures can't check out.
    const TEST_MODULUS: &str = "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw";

    fn bearer_token(kid: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"alg":"RS256","kid":"{kid}","typ":"JWT"}}"#
        ));
        let claims = URL_SAFE_NO_PAD.encode(
            r#"{"sub":"user-1","iss":"https://securetoken.google.com/test-project","aud":"test-project","iat":0,"exp":4102444800}"#,
        );
        let signature = URL_SAFE_NO_PAD.encode("not-a-signature");
        format!("{header}.{claims}.{signature}")
    }

    #[tokio::test]
    async fn jwks_refresh_and_signature_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "keys": [{ "kid": "test-key", "n": TEST_MODULUS, "e": "AQAB", "kty": "RSA", "alg": "RS256", "use": "sig" }]
            })))
            .mount(&server)
            .await;

        let verifier = FirebaseTokenVerifier::new("test-project")
            .unwrap()
            .with_jwks_url(server.uri());

        // The key is fetched and matched by kid, then the forged
        // signature fails validation.
        let result = verifier.verify(&bearer_token("test-key")).await;
        assert!(matches!(result, Err(VerifyError::InvalidToken(_))));
        assert!(verifier.keys.read().await.contains_key("test-key"));
    }

    #[tokio::test]
    async fn unknown_key_id_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "keys": [] })),
            )
            .mount(&server)
            .await;

        let verifier = FirebaseTokenVerifier::new("test-project")
            .unwrap()
            .with_jwks_url(server.uri());

        let result = verifier.verify(&bearer_token("nobody-knows-me")).await;
        assert!(matches!(result, Err(VerifyError::UnknownKeyId(_))));
    }

    #[tokio::test]
    async fn malformed_token_header_is_rejected() {
        let verifier = FirebaseTokenVerifier::new("test-project").unwrap();

        // Fails at header decode, before any JWKS traffic.
        let result = verifier.verify("garbage").await;
        assert!(matches!(result, Err(VerifyError::InvalidToken(_))));
    }
}
