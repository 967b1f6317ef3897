use postgresql_embedded::PostgreSQL;

use super::SHARED_RUNTIME;
use crate::config::StoreConfig;
use crate::store::LightBnbStore;

/// A running embedded `PostgreSQL` instance with the store schema installed.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    pub database_url: String,
    /// Working configuration with the server's real credentials and port
    pub config: StoreConfig,
}

/// Start an embedded server, create `db_name`, and install the schema into it.
///
/// The returned config points at the new database; build a store from it inside the
/// test's own runtime.
///
/// # Errors
/// Returns an error if the server cannot be set up or started, or the database or
/// schema cannot be created.
pub fn setup_postgres_embedded(
    db_name: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let mut postgresql = PostgreSQL::default();
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(db_name).await?;

        let settings = postgresql.settings();
        let port = settings.port;
        let config = StoreConfig {
            host: Some(settings.host.clone()),
            port,
            user: Some(settings.username.clone()),
            password: Some(settings.password.clone()),
            dbname: Some(db_name.to_string()),
            pool_max_size: 4,
            ..StoreConfig::default()
        };
        let database_url = format!(
            "postgres://{}@{}:{port}/{db_name}",
            settings.username, settings.host
        );

        let store = LightBnbStore::connect(&config)?;
        store.install_schema().await?;
        store.close();

        tracing::info!(%database_url, "embedded PostgreSQL ready");

        Ok(EmbeddedPostgres {
            postgresql,
            port,
            database_url,
            config,
        })
    })
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        let _ = postgresql.stop().await;
    });
}
