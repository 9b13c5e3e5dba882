//! SDS Authentication
//!
//! Supplies bearer tokens for SDS requests. Tokens come from a fixed value
//! supplied by the caller or from the OAuth2 client-credentials flow against
//! the service's identity endpoint.

use super::http::SdsHttpClient;
use crate::error::{Result, SdsError};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// TTL used when the identity server does not report `expires_in`
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Where tokens come from
#[derive(Clone)]
pub enum CredentialSource {
    /// No Authorization header is sent
    Anonymous,
    /// A pre-issued bearer token
    Token(String),
    /// OAuth2 client credentials, exchanged at `{resource}/identity`
    ClientCredentials {
        resource: String,
        client_id: String,
        client_secret: String,
    },
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Token(_) => write!(f, "Token(***)"),
            Self::ClientCredentials { resource, client_id, .. } => f
                .debug_struct("ClientCredentials")
                .field("resource", resource)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenIdConfiguration {
    token_endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// SDS credentials holder with token caching
#[derive(Clone, Debug)]
pub struct SdsCredentials {
    source: CredentialSource,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl SdsCredentials {
    pub fn new(source: CredentialSource) -> Self {
        Self {
            source,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(CredentialSource::Anonymous)
    }

    pub fn token(token: impl Into<String>) -> Self {
        Self::new(CredentialSource::Token(token.into()))
    }

    pub fn client_credentials(
        resource: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::new(CredentialSource::ClientCredentials {
            resource: resource.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// Get an access token for API calls, `None` for anonymous access
    pub async fn get_token(&self, http: &SdsHttpClient) -> Result<Option<String>> {
        let (resource, client_id, client_secret) = match &self.source {
            CredentialSource::Anonymous => return Ok(None),
            CredentialSource::Token(token) => return Ok(Some(token.clone())),
            CredentialSource::ClientCredentials {
                resource,
                client_id,
                client_secret,
            } => (resource, client_id, client_secret),
        };

        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(Some(cached.token.clone()));
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let token = fetch_token(http, resource, client_id, client_secret).await?;

        let ttl = token
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);
        let expires_at = Instant::now() + ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.access_token.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached, expires in ~{} seconds",
            ttl.saturating_sub(TOKEN_EXPIRY_BUFFER).as_secs()
        );

        Ok(Some(token.access_token))
    }

    /// Force refresh the token
    pub async fn refresh_token(&self, http: &SdsHttpClient) -> Result<Option<String>> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }
        self.get_token(http).await
    }
}

/// Discover the token endpoint and run the client-credentials exchange
async fn fetch_token(
    http: &SdsHttpClient,
    resource: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<TokenResponse> {
    let discovery_url = format!("{}/identity/.well-known/openid-configuration", resource);
    tracing::debug!("GET {}", discovery_url);

    let discovery = http
        .inner()
        .get(&discovery_url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;
    if !discovery.status().is_success() {
        return Err(SdsError::Auth(format!(
            "Failed to discover token endpoint: {}",
            discovery.status()
        )));
    }
    let discovery: OpenIdConfiguration = discovery
        .json()
        .await
        .map_err(|e| SdsError::Auth(format!("Invalid OpenID configuration: {}", e)))?;

    tracing::info!("Requesting access token for client {}", client_id);

    let response = http
        .inner()
        .post(&discovery.token_endpoint)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ])
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(SdsError::Auth(format!(
            "Token request failed: {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| SdsError::Auth(format!("Invalid token response: {}", e)))
}
