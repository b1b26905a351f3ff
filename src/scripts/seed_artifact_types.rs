use structra_catalog::config::AppConfig;
use structra_catalog::seed;
use structra_catalog::store::{ArtifactTypeStore, PostgresStore};

/// Create the schema if needed and insert the fixed artifact types.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;
    let store = PostgresStore::new(&config.database_url()?, 1).await?;
    store.migrate().await?;

    let inserted = seed::seed_artifact_types(&store).await?;
    log::info!("Inserted {} new artifact types", inserted.len());

    for artifact_type in store.list_artifact_types().await? {
        log::info!(
            "  {} {} ({})",
            artifact_type.icon.as_deref().unwrap_or(""),
            artifact_type.name,
            artifact_type.code
        );
    }

    Ok(())
}
