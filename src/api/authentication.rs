use std::future::Future;

use crate::{
    request::ApiRequest,
    rest::{paths, types::AuthenticationExecutionInfoRepresentation},
    Error,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// authentication flow methods of the keycloak api
pub trait KeycloakAuthenticationExt {
    /// get the executions of the flow with the given alias
    fn list_authentication_executions_for_flow(
        &self,
        realm: &str,
        flow_alias: &str,
    ) -> impl Future<Output = Result<Vec<AuthenticationExecutionInfoRepresentation>>> + Send;

    /// update an execution of the flow with the given alias, e.g. to change its requirement
    fn update_authentication_execution_for_flow(
        &self,
        realm: &str,
        flow_alias: &str,
        execution: &AuthenticationExecutionInfoRepresentation,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl KeycloakAuthenticationExt for crate::Keycloak {
    #[tracing::instrument(skip(self))]
    async fn list_authentication_executions_for_flow(
        &self,
        realm: &str,
        flow_alias: &str,
    ) -> Result<Vec<AuthenticationExecutionInfoRepresentation>> {
        tracing::debug!("querying flow executions");
        self.fetch_list(ApiRequest::get(paths::FLOW_EXECUTIONS, &[realm, flow_alias]))
            .await
    }

    #[tracing::instrument(skip(self, execution), fields(execution_id = ?execution.id))]
    async fn update_authentication_execution_for_flow(
        &self,
        realm: &str,
        flow_alias: &str,
        execution: &AuthenticationExecutionInfoRepresentation,
    ) -> Result<()> {
        tracing::debug!("updating flow execution");
        self.send(
            ApiRequest::put(paths::FLOW_EXECUTIONS, &[realm, flow_alias]).json(execution)?,
        )
        .await
    }
}
