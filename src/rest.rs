use serde::{Deserialize, Serialize};

/// types used in the api
pub mod types;

/// path templates of the admin api, relative to `{base_url}/admin/`
///
/// every `{}` is replaced by exactly one path segment, in order
pub mod paths {
    pub const SERVER_INFO: &str = "serverinfo";

    pub const REALMS: &str = "realms";
    pub const REALM: &str = "realms/{}";

    pub const USERS: &str = "realms/{}/users";
    pub const USER: &str = "realms/{}/users/{}";
    pub const USER_GROUP: &str = "realms/{}/users/{}/groups/{}";
    pub const USER_REALM_ROLES: &str = "realms/{}/users/{}/role-mappings/realm";

    pub const GROUPS: &str = "realms/{}/groups";
    pub const DEFAULT_GROUPS: &str = "realms/{}/default-groups";
    pub const DEFAULT_GROUP: &str = "realms/{}/default-groups/{}";
    pub const GROUP_CLIENT_ROLES: &str = "realms/{}/groups/{}/role-mappings/clients/{}";
    pub const GROUP_AVAILABLE_CLIENT_ROLES: &str =
        "realms/{}/groups/{}/role-mappings/clients/{}/available";

    pub const CLIENTS: &str = "realms/{}/clients";
    pub const CLIENT: &str = "realms/{}/clients/{}";

    pub const FLOW_EXECUTIONS: &str = "realms/{}/authentication/flows/{}/executions";

    /// token endpoint, relative to `{base_url}/` (not the admin root)
    pub const TOKEN: &str = "realms/master/protocol/openid-connect/token";
}

/// form body sent to the token endpoint (resource owner password grant)
///
/// intentionally not `Debug`: it carries the password
#[derive(Serialize)]
pub struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_secret: Option<&'a str>,
    username: &'a str,
    password: &'a str,
}

impl<'a> TokenRequest<'a> {
    pub fn new_password(
        client_id: &'a str,
        client_secret: Option<&'a str>,
        username: &'a str,
        password: &'a str,
    ) -> Self {
        Self {
            grant_type: "password",
            client_id,
            client_secret,
            username,
            password,
        }
    }
}

#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub system_info: ServerInfoSystemInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfoSystemInfo {
    pub version: String,
    #[serde(default)]
    pub java_version: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
    #[serde(default)]
    pub uptime_millis: Option<u64>,
    #[serde(default)]
    pub os_name: Option<String>,
}

#[cfg(test)]
mod test {
    #[test]
    fn test_token_request() {
        let request = super::TokenRequest::new_password("admin-cli", None, "user", "pass");
        let serialized = serde_json::to_string(&request).unwrap();
        assert_eq!(
            serialized,
            r#"{"grant_type":"password","client_id":"admin-cli","username":"user","password":"pass"}"#
        );

        let request = super::TokenRequest::new_password("id", Some("secret"), "user", "pass");
        let serialized = serde_json::to_string(&request).unwrap();
        assert_eq!(
            serialized,
            r#"{"grant_type":"password","client_id":"id","client_secret":"secret","username":"user","password":"pass"}"#
        );
    }

    #[test]
    fn test_token_response_minimal() {
        let token: super::TokenResponse =
            serde_json::from_str(r#"{"access_token":"dummy"}"#).unwrap();
        assert_eq!(token.access_token, "dummy");
    }

    #[test]
    fn test_token_response_ignores_expiry() {
        let token: super::TokenResponse = serde_json::from_str(
            r#"{"access_token":"dummy","expires_in":60,"refresh_token":"r","token_type":"Bearer"}"#,
        )
        .unwrap();
        assert_eq!(token.access_token, "dummy");
    }
}
