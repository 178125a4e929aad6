use crate::identity::Identity;
use std::sync::Arc;
use tokio_postgres::Client;

/// Key/value `settings` table, used to seed `special_users`.
pub struct SettingsStore {
    client: Arc<Client>,
}

impl SettingsStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub async fn special_users(&self) -> anyhow::Result<Vec<Identity>> {
        let row = self
            .client
            .query_opt("SELECT value FROM settings WHERE key = 'special_users'", &[])
            .await?;
        let Some(row) = row else { return Ok(Vec::new()) };
        let names: Vec<String> = serde_json::from_value(row.get("value"))?;
        Ok(names.iter().map(|n| Identity::from(n.as_str())).collect())
    }

    pub async fn set_special_users(&self, users: &[Identity]) -> anyhow::Result<()> {
        let names: Vec<String> = users.iter().map(|u| u.canonical()).collect();
        let value = serde_json::to_value(names)?;
        self.client
            .execute(
                "INSERT INTO settings (key, value) VALUES ('special_users', $1)
                 ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
                &[&value],
            )
            .await?;
        Ok(())
    }
}
