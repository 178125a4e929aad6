use std::collections::HashMap;
use tokio::sync::RwLock;

/// Canonicalizes champion references (numeric key <-> canonical name),
/// cached process-wide.
pub struct Catalog {
    version: String,
    maps: RwLock<Maps>,
}

#[derive(Default, Clone)]
struct Maps {
    key_to_name: HashMap<String, String>,
    name_to_key: HashMap<String, String>,
}

impl Catalog {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            maps: RwLock::new(Maps::default()),
        }
    }

    /// Fetches data-dragon's champion list and swaps in the new maps.
    /// Non-fatal on failure: the catalog degrades to numeric-key passthrough.
    pub async fn refresh(&self) {
        match Self::fetch(&self.version).await {
            Ok(maps) => {
                let mut guard = self.maps.write().await;
                *guard = maps;
                log::info!("champion catalog refreshed ({} entries)", guard.key_to_name.len());
            }
            Err(e) => {
                log::warn!("champion catalog refresh failed, continuing with stale/empty catalog: {e}");
            }
        }
    }

    async fn fetch(version: &str) -> anyhow::Result<Maps> {
        let url = format!(
            "https://ddragon.leagueoflegends.com/cdn/{version}/data/en_US/champion.json"
        );
        let body: serde_json::Value = reqwest::get(&url).await?.json().await?;
        let mut maps = Maps::default();
        let data = body
            .get("data")
            .and_then(|d| d.as_object())
            .ok_or_else(|| anyhow::anyhow!("champion.json missing data object"))?;
        for (name, entry) in data {
            let key = entry
                .get("key")
                .and_then(|k| k.as_str())
                .ok_or_else(|| anyhow::anyhow!("champion entry {name} missing key"))?;
            maps.key_to_name.insert(key.to_string(), name.clone());
            maps.name_to_key.insert(name.to_ascii_lowercase(), key.to_string());
        }
        Ok(maps)
    }

    /// Normalizes a client-supplied champion reference to a numeric key.
    /// Numeric strings pass through unconditionally; names are resolved
    /// case-insensitively. `None` if neither matches.
    pub async fn normalize_to_key(&self, champion_ref: &str) -> Option<String> {
        if champion_ref.chars().all(|c| c.is_ascii_digit()) && !champion_ref.is_empty() {
            return Some(champion_ref.to_string());
        }
        self.maps
            .read()
            .await
            .name_to_key
            .get(&champion_ref.to_ascii_lowercase())
            .cloned()
    }

    /// Resolves a numeric key to its canonical display name. `None` on a
    /// catalog miss — callers must treat this as non-fatal.
    pub async fn name_for(&self, key: &str) -> Option<String> {
        self.maps.read().await.key_to_name.get(key).cloned()
    }

    /// All known champion keys, used by bot autoplay to sample a random
    /// unused champion during bot auto-play.
    pub async fn all_keys(&self) -> Vec<String> {
        self.maps.read().await.key_to_name.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn numeric_passthrough_without_catalog() {
        let catalog = Catalog::new("15.19.1");
        assert_eq!(catalog.normalize_to_key("103").await, Some("103".into()));
        assert_eq!(catalog.normalize_to_key("Ahri").await, None);
        assert_eq!(catalog.name_for("103").await, None);
    }
}
