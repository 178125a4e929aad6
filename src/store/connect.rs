use super::schema;
use crate::config::Config;
use std::sync::Arc;
use tokio_postgres::Client;

/// Connects, runs the declarative migrations, and returns the client.
/// The schema is applied every startup so a fresh database and an
/// existing one converge to the same shape.
pub async fn connect(config: &Config) -> Arc<Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(&config.database_url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("postgres connection closed: {e}");
        }
    });
    client
        .batch_execute(schema::MATCHES_TABLE)
        .await
        .expect("create matches table");
    client
        .batch_execute(schema::MATCHES_ID_SEQUENCE)
        .await
        .expect("create matches_id_seq");
    client
        .batch_execute(schema::MATCH_VOTES_TABLE)
        .await
        .expect("create match_votes table");
    client
        .batch_execute(schema::SETTINGS_TABLE)
        .await
        .expect("create settings table");
    Arc::new(client)
}
