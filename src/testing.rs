//! shared helpers for tests against a mock keycloak server

use wiremock::MockServer;

use crate::{
    auth::Credentials,
    rest::types::{RealmRepresentation, UserRepresentation},
    Keycloak,
};

pub(crate) const REALM: &str = "dummy";
pub(crate) const TOKEN_PATH: &str = "/auth/realms/master/protocol/openid-connect/token";

/// path of an admin api resource as seen by the mock server
pub(crate) fn admin_path(path: &str) -> String {
    format!("/auth/admin/{path}")
}

/// client pointed at the mock server, holding the token `dummy` and admin credentials
pub(crate) fn client(server: &MockServer) -> Keycloak {
    Keycloak::new_with_client(&format!("{}/auth", server.uri()), reqwest::Client::new())
        .unwrap()
        .with_credentials(Credentials::new("admin", "admin"))
        .with_access_token("dummy")
}

pub(crate) fn dummy_realm() -> RealmRepresentation {
    RealmRepresentation {
        id: Some("dummy".into()),
        realm: "dummy".into(),
        enabled: Some(false),
        display_name: Some("dummy".into()),
        ..Default::default()
    }
}

pub(crate) fn dummy_user() -> UserRepresentation {
    UserRepresentation {
        id: Some("dummy".into()),
        username: Some("dummy".into()),
        first_name: Some("dummy".into()),
        last_name: Some("dummy".into()),
        email_verified: Some(false),
        enabled: Some(false),
        ..Default::default()
    }
}
