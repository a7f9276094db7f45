use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// admin username and password used to obtain access tokens
///
/// the password is never printed, see the `Debug` impl
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// the current bearer token of a client
///
/// reads and writes are single atomic pointer operations. two logins racing each other both
/// store a valid token and the later one wins.
#[derive(Default)]
pub(crate) struct TokenStore {
    token: ArcSwapOption<String>,
}

impl TokenStore {
    pub(crate) fn current(&self) -> Option<Arc<String>> {
        self.token.load_full()
    }

    pub(crate) fn replace(&self, token: String) -> Arc<String> {
        let token = Arc::new(token);
        self.token.store(Some(token.clone()));
        token
    }

    pub(crate) fn is_set(&self) -> bool {
        self.token.load().is_some()
    }
}
