use std::future::Future;

use crate::{
    request::ApiRequest,
    rest::{paths, types::GroupRepresentation},
    Error,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// group-related methods of the keycloak api
pub trait KeycloakGroupExt {
    /// get all top-level groups of a realm
    fn list_groups(
        &self,
        realm: &str,
    ) -> impl Future<Output = Result<Vec<GroupRepresentation>>> + Send;

    /// get the first top-level group with exactly the given name
    ///
    /// a group that doesn't exist is not an error but `None`
    fn find_group_by_name(
        &self,
        realm: &str,
        group_name: &str,
    ) -> impl Future<Output = Result<Option<GroupRepresentation>>> + Send;

    /// create a top-level group and return the id keycloak assigned to it
    ///
    /// keycloak doesn't return the id on creation, so the groups are listed again afterwards.
    /// `None` means the group was created but couldn't be found in that listing.
    fn create_group(
        &self,
        realm: &str,
        group_name: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// get the groups new users are added to automatically
    fn list_default_groups(
        &self,
        realm: &str,
    ) -> impl Future<Output = Result<Vec<GroupRepresentation>>> + Send;

    /// add a group to the default groups, nothing happens if it already is one
    fn make_group_default(
        &self,
        realm: &str,
        group_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

fn find_by_name(groups: Vec<GroupRepresentation>, group_name: &str) -> Option<GroupRepresentation> {
    groups
        .into_iter()
        .find(|group| group.name.as_deref() == Some(group_name))
}

impl KeycloakGroupExt for crate::Keycloak {
    #[tracing::instrument(skip(self))]
    async fn list_groups(&self, realm: &str) -> Result<Vec<GroupRepresentation>> {
        tracing::debug!("querying all groups");
        self.fetch_list(ApiRequest::get(paths::GROUPS, &[realm]))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn find_group_by_name(
        &self,
        realm: &str,
        group_name: &str,
    ) -> Result<Option<GroupRepresentation>> {
        tracing::debug!("querying group by name");
        let groups = self
            .fetch_list(ApiRequest::get(paths::GROUPS, &[realm]).not_found_is_absent())
            .await?;
        Ok(find_by_name(groups, group_name))
    }

    #[tracing::instrument(skip(self))]
    async fn create_group(&self, realm: &str, group_name: &str) -> Result<Option<String>> {
        tracing::debug!("creating group");
        self.send(
            ApiRequest::post(paths::GROUPS, &[realm])
                .json(&GroupRepresentation::named(group_name))?,
        )
        .await?;

        let group = self.find_group_by_name(realm, group_name).await?;
        if group.is_none() {
            tracing::warn!("created group is missing from the group listing");
        }
        Ok(group.and_then(|group| group.id))
    }

    #[tracing::instrument(skip(self))]
    async fn list_default_groups(&self, realm: &str) -> Result<Vec<GroupRepresentation>> {
        tracing::debug!("querying default groups");
        self.fetch_list(ApiRequest::get(paths::DEFAULT_GROUPS, &[realm]))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn make_group_default(&self, realm: &str, group_id: &str) -> Result<()> {
        let defaults = self.list_default_groups(realm).await?;
        if defaults
            .iter()
            .any(|group| group.id.as_deref() == Some(group_id))
        {
            tracing::debug!("group already is a default group");
            return Ok(());
        }

        tracing::debug!("making group default");
        self.send(ApiRequest::put(paths::DEFAULT_GROUP, &[realm, group_id]))
            .await
    }
}
