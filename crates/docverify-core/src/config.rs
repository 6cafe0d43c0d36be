//! Verifier configuration
//!
//! Everything the flow needs is passed in explicitly, so several
//! independent verifiers can live side by side (and tests stay
//! deterministic).
//!
//! The constructors below build a configuration as given. It is checked
//! by [`VerifierConfig::validated`], which [`VerifierConfig::from_json`]
//! and `VerificationFlow::from_config` both run.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::record::DocumentTable;
use crate::resolver::{ConfiguredResolver, Endpoint, HttpTransport, LocalResolver, RemoteResolver};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifierConfig {
    /// Remote verification endpoint; the local table is used when absent
    pub endpoint: Option<String>,
    /// Upper-case codes after trimming
    pub uppercase: bool,
    /// Table used by the local strategy
    pub table: DocumentTable,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            uppercase: true,
            table: DocumentTable::demo(),
        }
    }
}

impl VerifierConfig {
    /// Local-table configuration
    pub fn local(table: DocumentTable) -> Self {
        Self {
            endpoint: None,
            table,
            ..Self::default()
        }
    }

    /// Remote configuration; the table is left empty
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            table: DocumentTable::new(),
            ..Self::default()
        }
    }

    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// Parse and validate a JSON configuration
    ///
    /// Missing keys fall back to [`VerifierConfig::default`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        config.validated()
    }

    /// Normalize table keys and check invariants
    ///
    /// A blank endpoint is treated as "no endpoint".
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.endpoint = match self.endpoint.take() {
            Some(url) if url.trim().is_empty() => None,
            Some(url) => {
                Endpoint::parse(&url)?;
                Some(url.trim().to_string())
            }
            None => None,
        };

        self.table = self.table.normalized(self.uppercase)?;
        self.table.validate()?;
        Ok(self)
    }

    pub fn is_remote(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Build the strategy this configuration selects
    ///
    /// The transport is only used when an endpoint is configured.
    pub fn resolver<T: HttpTransport>(
        &self,
        transport: T,
    ) -> Result<ConfiguredResolver<T>, ConfigError> {
        let resolver = match &self.endpoint {
            Some(endpoint) => {
                let endpoint = Endpoint::parse(endpoint)?;
                ConfiguredResolver::Remote(RemoteResolver::new(endpoint, transport))
            }
            None => ConfiguredResolver::Local(LocalResolver::new(self.table.clone())),
        };
        Ok(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::resolver::{HttpReply, Resolver};

    struct NoTransport;

    impl HttpTransport for NoTransport {
        async fn get(&self, _url: &str) -> Result<HttpReply, LookupError> {
            Err(LookupError::Transport("not configured".to_string()))
        }
    }

    #[test]
    fn test_default_is_local_demo() {
        let config = VerifierConfig::default();
        assert!(!config.is_remote());
        assert!(config.uppercase);
        assert_eq!(config.table.len(), 3);
        assert_eq!(config.resolver(NoTransport).unwrap().strategy(), "local");
    }

    #[test]
    fn test_remote_selects_remote_strategy() {
        let config = VerifierConfig::remote("https://api.example.com/verify");
        assert!(config.is_remote());
        assert_eq!(config.resolver(NoTransport).unwrap().strategy(), "remote");
    }

    #[test]
    fn test_from_json_partial() {
        let config = VerifierConfig::from_json(r#"{"uppercase": false}"#).unwrap();
        assert!(!config.uppercase);
        assert_eq!(config.endpoint, None);
        assert_eq!(config.table.len(), 3);
    }

    #[test]
    fn test_from_json_blank_endpoint_is_local() {
        let config = VerifierConfig::from_json(r#"{"endpoint": "  "}"#).unwrap();
        assert!(!config.is_remote());
    }

    #[test]
    fn test_from_json_relative_endpoint() {
        let config = VerifierConfig::from_json(r#"{"endpoint": "/verify"}"#).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("/verify"));
    }

    #[test]
    fn test_from_json_rejects_bad_endpoint() {
        let result = VerifierConfig::from_json(r#"{"endpoint": "ftp://nope"}"#);
        assert!(matches!(result, Err(ConfigError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_from_json_rejects_scheme_only_endpoint() {
        let result = VerifierConfig::from_json(r#"{"endpoint": "https://"}"#);
        assert!(matches!(result, Err(ConfigError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_resolver_rejects_unvalidated_bad_endpoint() {
        let config = VerifierConfig::remote("not a url");
        assert!(matches!(
            config.resolver(NoTransport),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_validated_is_idempotent() {
        let config = VerifierConfig::from_json(r#"{"endpoint": " /verify "}"#).unwrap();
        assert_eq!(config.clone().validated(), Ok(config));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = VerifierConfig::from_json("not json");
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_normalizes_table_keys() {
        let json = r#"{
            "table": {
                " abc1 ": {"docName":"D","issuer":"I","issuedAt":"2026-02-01","status":"valid","owner":"O"}
            }
        }"#;
        let config = VerifierConfig::from_json(json).unwrap();
        assert_eq!(config.table.iter().next().map(|(k, _)| k), Some("ABC1"));
    }
}
