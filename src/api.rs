//! this module (or rather, its submodules) implements the keycloak api using extension traits so
//! we have less clutter

pub mod authentication;
pub mod client;
pub mod group;
pub mod realm;
pub mod role;
pub mod user;

pub use self::{
    authentication::KeycloakAuthenticationExt, client::KeycloakClientExt,
    group::KeycloakGroupExt, realm::KeycloakRealmExt, role::KeycloakRoleExt,
    user::KeycloakUserExt,
};
