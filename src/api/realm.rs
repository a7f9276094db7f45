use std::future::Future;

use crate::{
    request::ApiRequest,
    rest::{paths, types::RealmRepresentation},
    Error,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// realm-level methods of the keycloak api
pub trait KeycloakRealmExt {
    /// create a new realm
    fn create_realm(&self, realm: &RealmRepresentation) -> impl Future<Output = Result<()>> + Send;

    /// get a realm by its name
    ///
    /// a missing realm is an error, use [`list_realms`](KeycloakRealmExt::list_realms) to check
    /// for existence first
    fn get_realm(&self, realm: &str) -> impl Future<Output = Result<RealmRepresentation>> + Send;

    /// get all realms visible to the logged in user
    fn list_realms(&self) -> impl Future<Output = Result<Vec<RealmRepresentation>>> + Send;

    /// update the realm named by [`RealmRepresentation::realm`]
    fn update_realm(&self, realm: &RealmRepresentation) -> impl Future<Output = Result<()>> + Send;

    /// delete a realm and everything in it
    fn delete_realm(&self, realm: &str) -> impl Future<Output = Result<()>> + Send;
}

impl KeycloakRealmExt for crate::Keycloak {
    #[tracing::instrument(skip_all, fields(realm = %realm.realm))]
    async fn create_realm(&self, realm: &RealmRepresentation) -> Result<()> {
        tracing::debug!("creating realm");
        self.send(ApiRequest::post(paths::REALMS, &[]).json(realm)?)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_realm(&self, realm: &str) -> Result<RealmRepresentation> {
        tracing::debug!("querying realm");
        self.fetch(ApiRequest::get(paths::REALM, &[realm])).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_realms(&self) -> Result<Vec<RealmRepresentation>> {
        tracing::debug!("querying all realms");
        self.fetch_list(ApiRequest::get(paths::REALMS, &[])).await
    }

    #[tracing::instrument(skip_all, fields(realm = %realm.realm))]
    async fn update_realm(&self, realm: &RealmRepresentation) -> Result<()> {
        tracing::debug!("updating realm");
        self.send(ApiRequest::put(paths::REALM, &[realm.realm.as_str()]).json(realm)?)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_realm(&self, realm: &str) -> Result<()> {
        tracing::debug!("deleting realm");
        self.send(ApiRequest::delete(paths::REALM, &[realm])).await
    }
}

#[cfg(test)]
mod test {
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::{testing::*, ErrorKind};

    #[tokio::test]
    async fn test_create_realm() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(admin_path("realms")))
            .and(header("authorization", "Bearer dummy"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({"realm": "dummy", "displayName": "dummy"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).create_realm(&dummy_realm()).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_realm_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(admin_path("realms")))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(serde_json::json!({"errorMessage": "Conflict detected. See logs for details"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .create_realm(&dummy_realm())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::CONFLICT));
        assert!(err.response_body().is_some());
    }

    #[tokio::test]
    async fn test_get_realm() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(admin_path("realms/dummy")))
            .respond_with(ResponseTemplate::new(200).set_body_json(dummy_realm()))
            .expect(1)
            .mount(&server)
            .await;

        let realm = client(&server).get_realm(REALM).await.unwrap();
        assert_eq!(realm.realm, "dummy");
        assert_eq!(realm, dummy_realm());
    }

    #[tokio::test]
    async fn test_get_realm_missing_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(admin_path("realms/missing")))
            .respond_with(ResponseTemplate::new(404).set_body_string("realm not found"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).get_realm("missing").await.unwrap_err();
        assert!(err.is_not_found());
        // the server's body is kept on the error
        assert_eq!(
            err.response_body().map(|b| b.as_ref()),
            Some(&b"realm not found"[..])
        );
    }

    #[tokio::test]
    async fn test_get_realm_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(admin_path("realms/dummy")))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).get_realm(REALM).await.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Deserialize));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_list_realms() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(admin_path("realms")))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![dummy_realm()]))
            .expect(1)
            .mount(&server)
            .await;

        let realms = client(&server).list_realms().await.unwrap();
        assert_eq!(realms.len(), 1);
        assert_eq!(realms[0].realm, "dummy");
    }

    #[tokio::test]
    async fn test_update_realm() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(admin_path("realms/dummy")))
            .and(body_partial_json(serde_json::json!({"enabled": false})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).update_realm(&dummy_realm()).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_realm() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(admin_path("realms/dummy")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).delete_realm(REALM).await.unwrap();
    }
}
