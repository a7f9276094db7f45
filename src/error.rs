use std::fmt::Display;

use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{kind}")]
pub struct KeycloakError {
    kind: ErrorKind,
    source: Option<InnerError>,
}

#[derive(Debug, Clone, Error)]
pub enum ErrorKind {
    #[error("failed to deserialize")]
    Deserialize,
    #[error("failed to serialize request body")]
    Serialize,
    #[error("reqwest error")]
    Reqwest,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("no access token available")]
    MissingAccessToken,
    #[error("authentication failed")]
    Authentication,
    #[error("http response error (status code {status})")]
    ResponseError {
        status: StatusCode,
        response: Option<Bytes>,
    },
    #[error("{0}")]
    KeycloakError(KeycloakErrorBody),
    #[error("missing id")]
    MissingId,
    #[error("invalid configuration")]
    Config,
}

/// JSON body returned by Keycloak for errors
///
/// the token endpoint uses `error`/`error_description`, the admin api uses `errorMessage`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeycloakErrorBody {
    #[serde(alias = "errorMessage")]
    pub error: String,
    pub error_description: Option<String>,
}

impl KeycloakError {
    pub(crate) fn new<E>(kind: ErrorKind, inner: Option<E>) -> Self
    where
        E: Into<InnerError>,
    {
        Self {
            kind,
            source: inner.map(Into::into),
        }
    }

    pub(crate) fn new_kind(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// get the http response status code associated with this error (if any)
    pub fn status(&self) -> Option<StatusCode> {
        if let ErrorKind::ResponseError { status, .. } = self.kind() {
            return Some(*status);
        }
        if let Some(inner) = self.source.as_ref() {
            match inner {
                InnerError::Keycloak(e) => return e.status(),
                InnerError::Reqwest(e) => return e.status(),
                _ => {}
            }
        }
        None
    }

    /// the response body of a failed request, if the server sent one
    pub fn response_body(&self) -> Option<&Bytes> {
        match self.kind() {
            ErrorKind::ResponseError { response, .. } => response.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

pub fn deserialize(err: serde_json::Error) -> KeycloakError {
    KeycloakError::new(ErrorKind::Deserialize, Some(err))
}

pub fn serialize(err: serde_json::Error) -> KeycloakError {
    KeycloakError::new(ErrorKind::Serialize, Some(err))
}

pub fn reqwest(err: reqwest::Error) -> KeycloakError {
    KeycloakError::new(ErrorKind::Reqwest, Some(err))
}

pub fn url(err: url::ParseError) -> KeycloakError {
    KeycloakError::new(ErrorKind::InvalidUrl(err.to_string()), Some(InnerError::from_any(err)))
}

pub fn config(err: config::ConfigError) -> KeycloakError {
    KeycloakError::new(ErrorKind::Config, Some(InnerError::from_any(err)))
}

/// wrap any error into an authentication error, unless it already is one
pub fn authentication(err: KeycloakError) -> KeycloakError {
    if matches!(err.kind(), ErrorKind::Authentication) {
        err
    } else {
        KeycloakError::new(ErrorKind::Authentication, Some(err))
    }
}

pub(crate) fn from_response(status: StatusCode, bytes: Bytes) -> KeycloakError {
    if let Ok(body) = serde_json::from_slice::<KeycloakErrorBody>(&bytes) {
        KeycloakError::new(
            ErrorKind::ResponseError {
                status,
                response: Some(bytes),
            },
            Some(KeycloakError::new_kind(ErrorKind::KeycloakError(body))),
        )
    } else {
        KeycloakError::new_kind(ErrorKind::ResponseError {
            status,
            response: Some(bytes),
        })
    }
}

pub async fn error_response(resp: reqwest::Response) -> KeycloakError {
    let status = resp.status();
    match resp.bytes().await {
        Ok(bytes) => from_response(status, bytes),
        Err(e) => KeycloakError::new(
            ErrorKind::ResponseError {
                status,
                response: None,
            },
            Some(e),
        ),
    }
}

impl Display for KeycloakErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self.error))?;
        if let Some(description) = &self.error_description {
            f.write_fmt(format_args!(": {description}"))?;
        }
        Ok(())
    }
}

/// enum of possible inner errors for a [`KeycloakError`]
#[derive(Debug)]
pub enum InnerError {
    // boxed to prevent `KeycloakError` containing itself
    Keycloak(Box<KeycloakError>),
    Serde(serde_json::Error),
    Reqwest(reqwest::Error),
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl InnerError {
    /// explicitly allow using a boxed and type-erased error as inner error
    pub fn from_any<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Other(Box::new(err))
    }
}

impl std::ops::Deref for InnerError {
    type Target = dyn std::error::Error + Send + Sync;
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Keycloak(e) => e.as_ref(),
            Self::Serde(e) => e,
            Self::Reqwest(e) => e,
            Self::Other(e) => e.as_ref(),
        }
    }
}

impl From<KeycloakError> for InnerError {
    fn from(value: KeycloakError) -> Self {
        Self::Keycloak(Box::new(value))
    }
}

impl From<serde_json::Error> for InnerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl From<reqwest::Error> for InnerError {
    fn from(value: reqwest::Error) -> Self {
        Self::Reqwest(value)
    }
}
