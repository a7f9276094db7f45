use std::future::Future;

use crate::{
    request::ApiRequest,
    rest::{paths, types::ClientRepresentation},
    Error,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// client-related methods of the keycloak api
pub trait KeycloakClientExt {
    /// get all clients in the realm
    fn list_clients(
        &self,
        realm: &str,
    ) -> impl Future<Output = Result<Vec<ClientRepresentation>>> + Send;

    /// get a single client given its client id (oidc client id, not the keycloak internal uuid)
    fn find_client_by_client_id(
        &self,
        realm: &str,
        client_id: &str,
    ) -> impl Future<Output = Result<Option<ClientRepresentation>>> + Send;

    /// register a new client
    fn create_client(
        &self,
        realm: &str,
        client: &ClientRepresentation,
    ) -> impl Future<Output = Result<()>> + Send;

    /// delete a client given its uuid
    fn delete_client(
        &self,
        realm: &str,
        client_uuid: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl KeycloakClientExt for crate::Keycloak {
    #[tracing::instrument(skip(self))]
    async fn list_clients(&self, realm: &str) -> Result<Vec<ClientRepresentation>> {
        tracing::debug!("querying all clients in realm");
        let clients = paginate_api!(|first, max| {
            self.fetch_list::<ClientRepresentation>(
                ApiRequest::get(paths::CLIENTS, &[realm])
                    .query("first", first)
                    .query("max", max),
            )
            .await?
        });
        Ok(clients)
    }

    #[tracing::instrument(skip(self))]
    async fn find_client_by_client_id(
        &self,
        realm: &str,
        client_id: &str,
    ) -> Result<Option<ClientRepresentation>> {
        tracing::debug!("querying client by client id");
        let clients: Vec<ClientRepresentation> = self
            .fetch_list(
                ApiRequest::get(paths::CLIENTS, &[realm])
                    .query("clientId", client_id)
                    .not_found_is_absent(),
            )
            .await?;
        Ok(clients
            .into_iter()
            .find(|client| client.client_id.as_deref() == Some(client_id)))
    }

    #[tracing::instrument(skip(self, client), fields(client_id = ?client.client_id))]
    async fn create_client(&self, realm: &str, client: &ClientRepresentation) -> Result<()> {
        tracing::debug!("creating client");
        self.send(ApiRequest::post(paths::CLIENTS, &[realm]).json(client)?)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_client(&self, realm: &str, client_uuid: &str) -> Result<()> {
        tracing::debug!("deleting client");
        self.send(ApiRequest::delete(paths::CLIENT, &[realm, client_uuid]))
            .await
    }
}

#[cfg(test)]
mod test {
    use wiremock::{
        matchers::{body_partial_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::testing::*;

    fn dummy_client() -> ClientRepresentation {
        ClientRepresentation {
            id: Some("0b4c4e2e".into()),
            client_id: Some("dummy-app".into()),
            enabled: Some(true),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_clients() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(admin_path("realms/dummy/clients")))
            .and(query_param("first", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![dummy_client()]))
            .expect(1)
            .mount(&server)
            .await;

        let clients = client(&server).list_clients(REALM).await.unwrap();
        assert_eq!(clients, vec![dummy_client()]);
    }

    #[tokio::test]
    async fn test_find_client_by_client_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(admin_path("realms/dummy/clients")))
            .and(query_param("clientId", "dummy-app"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![dummy_client()]))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(admin_path("realms/dummy/clients")))
            .and(query_param("clientId", "missing"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let keycloak = client(&server);
        let found = keycloak
            .find_client_by_client_id(REALM, "dummy-app")
            .await
            .unwrap();
        assert_eq!(found.and_then(|c| c.id).as_deref(), Some("0b4c4e2e"));
        assert!(keycloak
            .find_client_by_client_id(REALM, "missing")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_and_delete_client() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(admin_path("realms/dummy/clients")))
            .and(body_partial_json(serde_json::json!({"clientId": "dummy-app"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(admin_path("realms/dummy/clients/0b4c4e2e")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let keycloak = client(&server);
        keycloak.create_client(REALM, &dummy_client()).await.unwrap();
        keycloak.delete_client(REALM, "0b4c4e2e").await.unwrap();
    }
}
