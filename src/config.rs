use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::auth::Credentials;

/// connection settings for a keycloak server
///
/// `url` is the server root the realms are served from, e.g. `https://sso.example.com/auth` for
/// older keycloak distributions or `https://sso.example.com` for newer ones.
#[derive(Clone, Deserialize)]
pub struct KeycloakConfig {
    pub url: Url,

    #[serde(default)]
    pub admin_username: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,

    #[serde(default = "defaults::client_id")]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "defaults::connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,
    #[serde(default = "defaults::timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

mod defaults {
    use std::time::Duration;

    pub fn client_id() -> String {
        "admin-cli".into()
    }

    pub const fn connect_timeout() -> Duration {
        Duration::from_secs(5)
    }

    pub const fn timeout() -> Duration {
        Duration::from_secs(30)
    }
}

impl KeycloakConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            admin_username: None,
            admin_password: None,
            client_id: defaults::client_id(),
            client_secret: None,
            connect_timeout: defaults::connect_timeout(),
            timeout: defaults::timeout(),
        }
    }

    /// read the configuration from `KEYCLOAK__*` environment variables
    ///
    /// e.g. `KEYCLOAK__URL`, `KEYCLOAK__ADMIN_USERNAME`, `KEYCLOAK__TIMEOUT=1m`
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::from_source(config::Environment::with_prefix("KEYCLOAK"))
    }

    /// same as [`from_env`](Self::from_env), but reads from the given map instead of the process
    /// environment
    pub fn from_set<K, V>(set: HashMap<K, V>) -> Result<Self, crate::Error>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let set = set.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self::from_source(config::Environment::with_prefix("KEYCLOAK").source(Some(set)))
    }

    fn from_source(env: config::Environment) -> Result<Self, crate::Error> {
        let env = env.try_parsing(true).separator("__");
        config::Config::builder()
            .add_source(env)
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(crate::error::config)
    }

    /// admin credentials, if both username and password are configured
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for KeycloakConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("KeycloakConfig")
            .field("url", &self.url.as_str())
            .field("admin_username", &self.admin_username)
            .field("admin_password", &redacted(&self.admin_password))
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(&self.client_secret))
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_set_defaults() {
        let mut env = HashMap::<&str, &str>::new();
        env.insert("KEYCLOAK__URL", "http://localhost:8080/auth");

        let config = KeycloakConfig::from_set(env).unwrap();
        assert_eq!(config.url.as_str(), "http://localhost:8080/auth");
        assert_eq!(config.client_id, "admin-cli");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_from_set_full() {
        let mut env = HashMap::<&str, &str>::new();
        env.insert("KEYCLOAK__URL", "https://sso.example.com");
        env.insert("KEYCLOAK__ADMIN_USERNAME", "admin");
        env.insert("KEYCLOAK__ADMIN_PASSWORD", "s3cr3t-pw");
        env.insert("KEYCLOAK__CLIENT_ID", "operator");
        env.insert("KEYCLOAK__TIMEOUT", "1m");

        let config = KeycloakConfig::from_set(env).unwrap();
        assert_eq!(config.client_id, "operator");
        assert_eq!(config.timeout, Duration::from_secs(60));
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.username(), "admin");
        assert!(!format!("{config:?}").contains("s3cr3t-pw"));
    }

    #[test]
    fn test_missing_url() {
        let env = HashMap::<&str, &str>::new();
        let err = KeycloakConfig::from_set(env).unwrap_err();
        assert!(matches!(err.kind(), crate::ErrorKind::Config));
    }
}
