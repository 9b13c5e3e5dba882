//! Configuration Management
//!
//! Connection settings for the `sds-dataviews` binary: a JSON file merged
//! with `SDS_*` environment variables.

use crate::error::{Result, SdsError};
use crate::sds::{SdsClient, SdsCredentials, DEFAULT_API_VERSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection configuration
#[derive(Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Service base URL, e.g. `https://dat-b.osisoft.com`
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// Namespace used when none is given on the command line
    #[serde(default)]
    pub namespace_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Pre-issued bearer token, takes precedence over client credentials
    #[serde(default)]
    pub access_token: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("resource", &self.resource)
            .field("api_version", &self.api_version)
            .field("tenant_id", &self.tenant_id)
            .field("namespace_id", &self.namespace_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Config {
    /// Default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sds-dataviews").join("config.json"))
    }

    /// Load configuration from `path`, or from the default location
    ///
    /// A missing default file yields an empty config; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|e| {
            SdsError::Config(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SdsError::Config(format!("Invalid config {}: {}", path.display(), e))
        })
    }

    /// Override fields from `SDS_*` environment variables
    pub fn merge_env(self) -> Self {
        self.merge_from(|key| std::env::var(key).ok())
    }

    fn merge_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fields: [(&str, &mut Option<String>); 7] = [
            ("SDS_RESOURCE", &mut self.resource),
            ("SDS_API_VERSION", &mut self.api_version),
            ("SDS_TENANT_ID", &mut self.tenant_id),
            ("SDS_NAMESPACE_ID", &mut self.namespace_id),
            ("SDS_CLIENT_ID", &mut self.client_id),
            ("SDS_CLIENT_SECRET", &mut self.client_secret),
            ("SDS_ACCESS_TOKEN", &mut self.access_token),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = Some(value);
            }
        }
        self
    }

    pub fn effective_api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    /// Pick credentials: access token > client credentials > anonymous
    pub fn credentials(&self) -> Result<SdsCredentials> {
        if let Some(token) = &self.access_token {
            return Ok(SdsCredentials::token(token.clone()));
        }
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => {
                let resource = self.resource.as_deref().ok_or_else(|| {
                    SdsError::Config("resource is required".to_string())
                })?;
                Ok(SdsCredentials::client_credentials(resource, id.clone(), secret.clone()))
            }
            (Some(_), None) | (None, Some(_)) => Err(SdsError::Config(
                "client_id and client_secret must be set together".to_string(),
            )),
            (None, None) => Ok(SdsCredentials::anonymous()),
        }
    }

    /// Build the base client described by this config
    pub fn build_client(&self) -> Result<SdsClient> {
        let resource = self
            .resource
            .as_deref()
            .ok_or_else(|| SdsError::Config("resource is required".to_string()))?;
        let tenant_id = self
            .tenant_id
            .as_deref()
            .ok_or_else(|| SdsError::Config("tenant_id is required".to_string()))?;

        SdsClient::new(
            resource,
            self.effective_api_version(),
            tenant_id,
            self.credentials()?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sds::CredentialSource;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"resource": "https://sds.example", "tenantId": "t1", "namespaceId": "ns1"}"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.resource.as_deref(), Some("https://sds.example"));
        assert_eq!(config.tenant_id.as_deref(), Some("t1"));
        assert_eq!(config.namespace_id.as_deref(), Some("ns1"));
        assert_eq!(config.effective_api_version(), "v1");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, SdsError::Config(_)));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, SdsError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error: Invalid config"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = Config {
            tenant_id: Some("file-tenant".to_string()),
            namespace_id: Some("file-ns".to_string()),
            ..Default::default()
        }
        .merge_from(env(&[("SDS_TENANT_ID", "env-tenant"), ("SDS_NAMESPACE_ID", "")]));

        assert_eq!(config.tenant_id.as_deref(), Some("env-tenant"));
        // blank variables are ignored
        assert_eq!(config.namespace_id.as_deref(), Some("file-ns"));
    }

    #[test]
    fn test_credentials_precedence() {
        let mut config = Config {
            resource: Some("https://sds.example".to_string()),
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.credentials().unwrap().source(),
            CredentialSource::ClientCredentials { .. }
        ));

        config.access_token = Some("tok".to_string());
        assert!(matches!(
            config.credentials().unwrap().source(),
            CredentialSource::Token(_)
        ));

        assert!(matches!(
            Config::default().credentials().unwrap().source(),
            CredentialSource::Anonymous
        ));
    }

    #[test]
    fn test_half_configured_client_credentials() {
        let config = Config {
            client_id: Some("id".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.credentials(), Err(SdsError::Config(_))));
    }

    #[test]
    fn test_build_client() {
        let config = Config {
            resource: Some("https://sds.example".to_string()),
            api_version: Some("v2".to_string()),
            tenant_id: Some("t1".to_string()),
            ..Default::default()
        };
        let client = config.build_client().unwrap();
        assert_eq!(client.api_root(), "https://sds.example/api/v2");

        assert!(Config::default().build_client().is_err());
    }

    #[test]
    fn test_debug_masks_secrets() {
        let config = Config {
            client_secret: Some("hunter2".to_string()),
            access_token: Some("tok".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("\"tok\""));
    }
}
