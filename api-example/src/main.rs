use keycloak_admin_api::{prelude::*, KeycloakConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = KeycloakConfig::from_env()?;
    let kc = Keycloak::new(&config)?;

    let info = kc.server_info().await?;
    println!("server info: {info:#?}");
    for realm in kc.list_realms().await? {
        println!("realm: {} ({:?})", realm.realm, realm.display_name);
    }

    let Err(e) = kc
        .get_realm("this_realm_is_invalid_and_does_not_exist")
        .await
    else {
        color_eyre::eyre::bail!("expected invalid realm call to fail!");
    };
    println!(
        "report for expected error:\n{:?}",
        color_eyre::Report::new(e)
    );

    let group = kc
        .find_group_by_name("master", "this_group_does_not_exist")
        .await?;
    assert!(group.is_none(), "lookups report missing groups as None");

    println!("tests passed");
    Ok(())
}
