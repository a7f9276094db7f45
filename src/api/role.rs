use std::future::Future;

use crate::{
    request::ApiRequest,
    rest::{paths, types::RoleRepresentation},
    Error,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// client role mappings of groups
///
/// `client_id` is always the uuid of the client, not its oidc client id
pub trait KeycloakRoleExt {
    /// grant a client role to a group
    fn create_group_client_role(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
        role: &RoleRepresentation,
    ) -> impl Future<Output = Result<()>> + Send;

    /// get the client roles granted to a group
    fn list_group_client_roles(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
    ) -> impl Future<Output = Result<Vec<RoleRepresentation>>> + Send;

    /// get the client roles that could still be granted to a group
    fn list_available_group_client_roles(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
    ) -> impl Future<Output = Result<Vec<RoleRepresentation>>> + Send;

    /// get a client role granted to a group by its name
    fn find_group_client_role(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
        role_name: &str,
    ) -> impl Future<Output = Result<Option<RoleRepresentation>>> + Send;

    /// get a client role that could still be granted to a group by its name
    fn find_available_group_client_role(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
        role_name: &str,
    ) -> impl Future<Output = Result<Option<RoleRepresentation>>> + Send;
}

fn find_by_name(roles: Vec<RoleRepresentation>, role_name: &str) -> Option<RoleRepresentation> {
    roles
        .into_iter()
        .find(|role| role.name.as_deref() == Some(role_name))
}

impl KeycloakRoleExt for crate::Keycloak {
    #[tracing::instrument(skip(self, role), fields(role = ?role.name))]
    async fn create_group_client_role(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
        role: &RoleRepresentation,
    ) -> Result<()> {
        tracing::debug!("adding client role to group");
        // the endpoint takes a list of roles
        self.send(
            ApiRequest::post(paths::GROUP_CLIENT_ROLES, &[realm, group_id, client_id])
                .json(std::slice::from_ref(role))?,
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn list_group_client_roles(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        tracing::debug!("querying group client roles");
        self.fetch_list(ApiRequest::get(
            paths::GROUP_CLIENT_ROLES,
            &[realm, group_id, client_id],
        ))
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn list_available_group_client_roles(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
    ) -> Result<Vec<RoleRepresentation>> {
        tracing::debug!("querying available group client roles");
        self.fetch_list(ApiRequest::get(
            paths::GROUP_AVAILABLE_CLIENT_ROLES,
            &[realm, group_id, client_id],
        ))
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn find_group_client_role(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
        role_name: &str,
    ) -> Result<Option<RoleRepresentation>> {
        let roles = self
            .list_group_client_roles(realm, group_id, client_id)
            .await?;
        Ok(find_by_name(roles, role_name))
    }

    #[tracing::instrument(skip(self))]
    async fn find_available_group_client_role(
        &self,
        realm: &str,
        group_id: &str,
        client_id: &str,
        role_name: &str,
    ) -> Result<Option<RoleRepresentation>> {
        let roles = self
            .list_available_group_client_roles(realm, group_id, client_id)
            .await?;
        Ok(find_by_name(roles, role_name))
    }
}
