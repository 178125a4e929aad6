use crate::catalog::Catalog;
use rand::seq::IteratorRandom;
use std::collections::HashSet;

/// Picks a random champion excluding keys already used anywhere in the
/// match and keys already picked by the bot's own team. `None` if no
/// candidate remains, in which case the caller must skip the action.
pub async fn choose_champion(
    catalog: &Catalog,
    exclude_used: &HashSet<String>,
    exclude_team_picks: &HashSet<String>,
) -> Option<String> {
    let all = catalog.all_keys().await;
    let mut rng = rand::rng();
    all.into_iter()
        .filter(|k| !exclude_used.contains(k) && !exclude_team_picks.contains(k))
        .choose(&mut rng)
}
