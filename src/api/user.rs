use std::future::Future;

use crate::{
    request::ApiRequest,
    rest::{
        paths,
        types::{RoleRepresentation, UserRepresentation},
    },
    Error, ErrorKind,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// user-related methods of the keycloak api
pub trait KeycloakUserExt {
    /// create a new user in the given realm
    fn create_user(
        &self,
        realm: &str,
        user: &UserRepresentation,
    ) -> impl Future<Output = Result<()>> + Send;

    /// get a single user by their uuid, `None` if no such user exists
    fn get_user(
        &self,
        realm: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserRepresentation>>> + Send;

    /// get a single user by their exact username, `None` if no such user exists
    fn find_user_by_username(
        &self,
        realm: &str,
        username: &str,
    ) -> impl Future<Output = Result<Option<UserRepresentation>>> + Send;

    /// get all users of a realm
    fn list_users(
        &self,
        realm: &str,
    ) -> impl Future<Output = Result<Vec<UserRepresentation>>> + Send;

    /// update an existing user, the user is identified by [`UserRepresentation::id`]
    fn update_user(
        &self,
        realm: &str,
        user: &UserRepresentation,
    ) -> impl Future<Output = Result<()>> + Send;

    /// delete a user given their uuid
    fn delete_user(&self, realm: &str, user_id: &str) -> impl Future<Output = Result<()>> + Send;

    /// make a user member of a group
    fn add_user_to_group(
        &self,
        realm: &str,
        user_id: &str,
        group_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// get a user's realm roles given their uuid
    fn user_realm_roles(
        &self,
        realm: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<RoleRepresentation>>> + Send;

    /// add realm roles to a user
    fn user_add_realm_roles(
        &self,
        realm: &str,
        user_id: &str,
        roles: &[RoleRepresentation],
    ) -> impl Future<Output = Result<()>> + Send;
}

impl KeycloakUserExt for crate::Keycloak {
    #[tracing::instrument(skip(self, user), fields(username = ?user.username))]
    async fn create_user(&self, realm: &str, user: &UserRepresentation) -> Result<()> {
        tracing::debug!("creating user");
        self.send(ApiRequest::post(paths::USERS, &[realm]).json(user)?)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_user(&self, realm: &str, user_id: &str) -> Result<Option<UserRepresentation>> {
        tracing::debug!("querying user by id");
        self.fetch_optional(ApiRequest::get(paths::USER, &[realm, user_id]))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn find_user_by_username(
        &self,
        realm: &str,
        username: &str,
    ) -> Result<Option<UserRepresentation>> {
        tracing::debug!("querying user by name");
        let users: Vec<UserRepresentation> = self
            .fetch_list(
                ApiRequest::get(paths::USERS, &[realm])
                    .query("username", username)
                    .query("exact", true)
                    .not_found_is_absent(),
            )
            .await?;
        // the search is a substring match on older servers
        Ok(users
            .into_iter()
            .find(|user| user.username.as_deref() == Some(username)))
    }

    #[tracing::instrument(skip(self))]
    async fn list_users(&self, realm: &str) -> Result<Vec<UserRepresentation>> {
        tracing::debug!("querying all users in realm");
        let users = paginate_api!(|first, max| {
            self.fetch_list::<UserRepresentation>(
                ApiRequest::get(paths::USERS, &[realm])
                    .query("first", first)
                    .query("max", max),
            )
            .await?
        });
        Ok(users)
    }

    #[tracing::instrument(skip(self, user), fields(user_id = ?user.id))]
    async fn update_user(&self, realm: &str, user: &UserRepresentation) -> Result<()> {
        let Some(user_id) = user.id.as_deref() else {
            return Err(Error::new_kind(ErrorKind::MissingId));
        };
        tracing::debug!("updating user");
        self.send(ApiRequest::put(paths::USER, &[realm, user_id]).json(user)?)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_user(&self, realm: &str, user_id: &str) -> Result<()> {
        tracing::debug!("deleting user");
        self.send(ApiRequest::delete(paths::USER, &[realm, user_id]))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn add_user_to_group(&self, realm: &str, user_id: &str, group_id: &str) -> Result<()> {
        tracing::debug!("adding user to group");
        self.send(ApiRequest::put(
            paths::USER_GROUP,
            &[realm, user_id, group_id],
        ))
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn user_realm_roles(&self, realm: &str, user_id: &str) -> Result<Vec<RoleRepresentation>> {
        tracing::debug!("querying user realm roles");
        self.fetch_list(ApiRequest::get(paths::USER_REALM_ROLES, &[realm, user_id]))
            .await
    }

    #[tracing::instrument(skip(self, roles), fields(roles = roles.len()))]
    async fn user_add_realm_roles(
        &self,
        realm: &str,
        user_id: &str,
        roles: &[RoleRepresentation],
    ) -> Result<()> {
        tracing::debug!("adding roles to user");
        self.send(ApiRequest::post(paths::USER_REALM_ROLES, &[realm, user_id]).json(roles)?)
            .await
    }
}
