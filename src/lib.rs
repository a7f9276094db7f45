//! typed async client for the keycloak admin rest api
//!
//! ```no_run
//! use keycloak_admin_api::{auth::Credentials, prelude::*};
//!
//! # async fn example() -> Result<(), keycloak_admin_api::Error> {
//! let keycloak = Keycloak::new_with_client("http://localhost:8080/auth", reqwest::Client::new())?
//!     .with_credentials(Credentials::new("admin", "admin"));
//! for realm in keycloak.list_realms().await? {
//!     println!("{}", realm.realm);
//! }
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
mod request;
pub mod rest;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use url::Url;

use self::auth::{Credentials, TokenStore};
pub use self::config::KeycloakConfig;
pub use self::error::ErrorKind;
use self::rest::{paths, TokenRequest, TokenResponse};

pub type Error = self::error::KeycloakError;

pub mod prelude {
    pub use crate::api::{
        KeycloakAuthenticationExt, KeycloakClientExt, KeycloakGroupExt, KeycloakRealmExt,
        KeycloakRoleExt, KeycloakUserExt,
    };
    pub use crate::Keycloak;
}

/// high-level keycloak admin api client
///
/// see also the extension traits in the [api] module for available methods.
///
/// the client holds the current access token and logs in with its [`Credentials`] whenever it has
/// no token yet or the server rejects the held one. it can be shared between tasks (e.g. behind an
/// `Arc`), the token is swapped atomically.
pub struct Keycloak {
    base_url: Url,
    client_id: String,
    client_secret: Option<String>,
    credentials: Option<Credentials>,
    token: TokenStore,
    /// transport for all requests, connection pooling and timeouts are configured on it
    http: reqwest::Client,
}

impl Keycloak {
    /// create a client from the given configuration
    ///
    /// this does not contact the server, the first request logs in with the configured admin
    /// credentials.
    pub fn new(config: &KeycloakConfig) -> Result<Self, crate::Error> {
        let http = reqwest::ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(crate::error::reqwest)?;
        let mut keycloak = Self::from_parts(config.url.clone(), http);
        keycloak.client_id = config.client_id.clone();
        keycloak.client_secret = config.client_secret.clone();
        keycloak.credentials = config.credentials();
        Ok(keycloak)
    }

    /// create a client sending its requests through the given `reqwest` client
    pub fn new_with_client(base_url: &str, client: reqwest::Client) -> Result<Self, crate::Error> {
        let base_url = Url::parse(base_url).map_err(crate::error::url)?;
        Ok(Self::from_parts(base_url, client))
    }

    fn from_parts(base_url: Url, http: reqwest::Client) -> Self {
        Self {
            base_url,
            client_id: "admin-cli".into(),
            client_secret: None,
            credentials: None,
            token: TokenStore::default(),
            http,
        }
    }

    /// credentials used to log in when no token is held or the held token is rejected
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// start out with an already obtained access token
    pub fn with_access_token(self, access_token: impl Into<String>) -> Self {
        self.token.replace(access_token.into());
        self
    }

    /// oidc client used for logging in (defaults to `admin-cli`)
    pub fn with_client_id(mut self, client_id: &str, client_secret: Option<&str>) -> Self {
        self.client_id = client_id.into();
        self.client_secret = client_secret.map(Into::into);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// the currently held access token
    pub fn access_token(&self) -> Option<Arc<String>> {
        self.token.current()
    }

    /// log in using keycloak's direct access grant and keep the obtained access token
    ///
    /// replaces any previously held token. the given credentials are not stored.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), crate::Error> {
        self.request_token(username, password).await?;
        Ok(())
    }

    pub(crate) async fn login_with_credentials(&self) -> Result<Arc<String>, crate::Error> {
        let Some(credentials) = &self.credentials else {
            tracing::debug!("no credentials to log in with");
            return Err(Error::new_kind(ErrorKind::MissingAccessToken));
        };
        self.request_token(credentials.username(), credentials.password())
            .await
    }

    async fn request_token(&self, username: &str, password: &str) -> Result<Arc<String>, crate::Error> {
        let request = TokenRequest::new_password(
            &self.client_id,
            self.client_secret.as_deref(),
            username,
            password,
        );
        let token = self
            .exchange_token(&request)
            .await
            .map_err(crate::error::authentication)?;
        tracing::debug!("obtained new access token");
        Ok(self.token.replace(token.access_token))
    }

    async fn exchange_token(&self, request: &TokenRequest<'_>) -> Result<TokenResponse, crate::Error> {
        let url = crate::request::build_url(&self.base_url, &[], paths::TOKEN, &[], &[])?;
        let response = self
            .http
            .post(url)
            .form(request)
            .send()
            .await
            .map_err(crate::error::reqwest)?;
        if !response.status().is_success() {
            return Err(crate::error::error_response(response).await);
        }
        let bytes = response.bytes().await.map_err(crate::error::reqwest)?;
        let token: TokenResponse =
            serde_json::from_slice(&bytes).map_err(crate::error::deserialize)?;
        if token.access_token.is_empty() {
            return Err(Error::new_kind(ErrorKind::MissingAccessToken));
        }
        Ok(token)
    }

    /// query general server information, useful as a connectivity and permission check
    #[tracing::instrument(skip(self))]
    pub async fn server_info(&self) -> Result<crate::rest::ServerInfo, crate::Error> {
        tracing::debug!("querying server info");
        self.fetch(crate::request::ApiRequest::get(paths::SERVER_INFO, &[]))
            .await
    }
}

impl std::fmt::Debug for Keycloak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keycloak")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("credentials", &self.credentials)
            .field("has_token", &self.token.is_set())
            .finish_non_exhaustive()
    }
}
