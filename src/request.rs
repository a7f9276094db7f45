//! the generic request pipeline every api operation is built from
//!
//! an [`ApiRequest`] describes one admin api call: method, path template with its positional
//! arguments, optional query and json body, and whether a 404 means "absent" or is an error.
//! [`Keycloak::execute`] takes care of authentication, sends the request and classifies the
//! response.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{Error, ErrorKind, Keycloak};

type Result<T, E = Error> = std::result::Result<T, E>;

/// path segments prepended to every admin api template
const ADMIN_ROOT: &[&str] = &["admin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NotFound {
    Error,
    Absent,
}

pub(crate) struct ApiRequest<'a> {
    method: Method,
    template: &'static str,
    args: Vec<&'a str>,
    query: Vec<(&'static str, String)>,
    body: Option<Bytes>,
    not_found: NotFound,
}

impl<'a> ApiRequest<'a> {
    pub(crate) fn new(method: Method, template: &'static str, args: &[&'a str]) -> Self {
        Self {
            method,
            template,
            args: args.to_vec(),
            query: Vec::new(),
            body: None,
            not_found: NotFound::Error,
        }
    }

    pub(crate) fn get(template: &'static str, args: &[&'a str]) -> Self {
        Self::new(Method::GET, template, args)
    }

    pub(crate) fn post(template: &'static str, args: &[&'a str]) -> Self {
        Self::new(Method::POST, template, args)
    }

    pub(crate) fn put(template: &'static str, args: &[&'a str]) -> Self {
        Self::new(Method::PUT, template, args)
    }

    pub(crate) fn delete(template: &'static str, args: &[&'a str]) -> Self {
        Self::new(Method::DELETE, template, args)
    }

    /// serialize `body` as the json request body
    pub(crate) fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(crate::error::serialize)?;
        self.body = Some(bytes.into());
        Ok(self)
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// treat a 404 response as a valid "does not exist" result
    pub(crate) fn not_found_is_absent(mut self) -> Self {
        self.not_found = NotFound::Absent;
        self
    }
}

/// result of a request that made it past status classification
#[derive(Debug)]
pub(crate) enum Outcome {
    Body(Bytes),
    NotFound,
}

impl Outcome {
    /// body of a request that was not marked with `not_found_is_absent`
    fn into_body(self) -> Bytes {
        match self {
            Outcome::Body(bytes) => bytes,
            Outcome::NotFound => unreachable!("404 is only absent when requested"),
        }
    }
}

/// authentication state of a single call
///
/// a call starts either `Unauthenticated` or `Authenticated` with the held token. a rejected
/// token moves to `Retrying` once per call, after which a rejection is returned to the caller.
enum AuthState {
    Unauthenticated,
    Authenticated { token: Arc<String>, retried: bool },
    Retrying,
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// substitute the positional `args` into `template` and append the result to `base`
///
/// every `{}` segment of the template takes exactly one argument, encoded as a single path
/// segment.
pub(crate) fn build_url(
    base: &Url,
    root: &[&str],
    template: &str,
    args: &[&str],
    query: &[(&str, String)],
) -> Result<Url> {
    let invalid = |message: String| Error::new_kind(ErrorKind::InvalidUrl(message));

    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| invalid(format!("{base} cannot be used as a base url")))?;
        segments.pop_if_empty();
        segments.extend(root);

        let mut args = args.iter();
        for segment in template.split('/') {
            if segment == "{}" {
                let Some(arg) = args.next() else {
                    return Err(invalid(format!("missing path argument for {template}")));
                };
                segments.push(arg);
            } else {
                segments.push(segment);
            }
        }
        if args.next().is_some() {
            return Err(invalid(format!("too many path arguments for {template}")));
        }
    }
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}

impl Keycloak {
    pub(crate) fn admin_url(&self, request: &ApiRequest<'_>) -> Result<Url> {
        build_url(
            &self.base_url,
            ADMIN_ROOT,
            request.template,
            &request.args,
            &request.query,
        )
    }

    /// run a request through authentication, sending and status classification
    ///
    /// sends the request at most twice: once with the held (or lazily obtained) token and, if
    /// that token is rejected with 401/403, once more after logging in again
    #[tracing::instrument(skip_all, fields(method = %request.method, path = request.template))]
    pub(crate) async fn execute(&self, request: &ApiRequest<'_>) -> Result<Outcome> {
        let url = self.admin_url(request)?;

        let mut state = match self.token.current() {
            Some(token) => AuthState::Authenticated {
                token,
                retried: false,
            },
            None => AuthState::Unauthenticated,
        };
        loop {
            state = match state {
                AuthState::Unauthenticated => {
                    tracing::debug!("no access token yet, logging in");
                    AuthState::Authenticated {
                        token: self.login_with_credentials().await?,
                        retried: false,
                    }
                }
                AuthState::Retrying => {
                    tracing::debug!("access token rejected, logging in again");
                    AuthState::Authenticated {
                        token: self.login_with_credentials().await?,
                        retried: true,
                    }
                }
                AuthState::Authenticated { token, retried } => {
                    let response = self.send_once(request, url.clone(), &token).await?;
                    let status = response.status();
                    if is_auth_failure(status) && !retried && self.credentials.is_some() {
                        AuthState::Retrying
                    } else {
                        return classify(request, response).await;
                    }
                }
            };
        }
    }

    async fn send_once(
        &self,
        request: &ApiRequest<'_>,
        url: Url,
        token: &str,
    ) -> Result<reqwest::Response> {
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .bearer_auth(token);
        if let Some(body) = &request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        builder.send().await.map_err(crate::error::reqwest)
    }

    /// execute a request whose response body is of no interest
    pub(crate) async fn send(&self, request: ApiRequest<'_>) -> Result<()> {
        self.execute(&request).await?;
        Ok(())
    }

    /// execute a request and decode the response body
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest<'_>) -> Result<T> {
        let bytes = self.execute(&request).await?.into_body();
        decode(&bytes)
    }

    /// execute a lookup, a 404 response results in `None`
    pub(crate) async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: ApiRequest<'_>,
    ) -> Result<Option<T>> {
        match self.execute(&request.not_found_is_absent()).await? {
            Outcome::Body(bytes) => decode(&bytes).map(Some),
            Outcome::NotFound => Ok(None),
        }
    }

    /// execute a listing, an empty body or a 404 for an absent-able request is an empty list
    pub(crate) async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest<'_>,
    ) -> Result<Vec<T>> {
        match self.execute(&request).await? {
            Outcome::Body(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Outcome::Body(bytes) => decode(&bytes),
            Outcome::NotFound => Ok(Vec::new()),
        }
    }
}

async fn classify(request: &ApiRequest<'_>, response: reqwest::Response) -> Result<Outcome> {
    let status = response.status();
    if status.is_success() {
        let bytes = response.bytes().await.map_err(crate::error::reqwest)?;
        tracing::trace!(%status, len = bytes.len(), "request succeeded");
        return Ok(Outcome::Body(bytes));
    }
    if status == StatusCode::NOT_FOUND && request.not_found == NotFound::Absent {
        tracing::debug!("resource does not exist");
        return Ok(Outcome::NotFound);
    }
    tracing::debug!(%status, "request failed");
    Err(crate::error::error_response(response).await)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(crate::error::deserialize)
}
