use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Stable player identity: `gameName#tagLine`, compared case-insensitively
/// on both components.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identity {
    pub game_name: String,
    pub tag_line: String,
}

impl Identity {
    pub fn new(game_name: impl Into<String>, tag_line: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            tag_line: tag_line.into(),
        }
    }

    /// Parses the canonical `gameName#tagLine` form.
    pub fn parse(canonical: &str) -> Option<Self> {
        let (name, tag) = canonical.split_once('#')?;
        if name.is_empty() || tag.is_empty() {
            return None;
        }
        Some(Self::new(name, tag))
    }

    pub fn canonical(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }

    /// Bots are identities matching `^bot\d+$`, case-insensitive.
    pub fn is_bot(&self) -> bool {
        let name = self.game_name.trim().to_ascii_lowercase();
        match name.strip_prefix("bot") {
            Some(rest) if !rest.is_empty() => rest.bytes().all(|b| b.is_ascii_digit()),
            _ => false,
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.game_name.eq_ignore_ascii_case(&other.game_name)
            && self.tag_line.eq_ignore_ascii_case(&other.tag_line)
    }
}
impl Eq for Identity {}

impl std::hash::Hash for Identity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.game_name.to_ascii_lowercase().hash(state);
        self.tag_line.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| Self::new(s, ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_equality() {
        let a = Identity::new("Faker", "KR1");
        let b = Identity::new("faker", "kr1");
        assert_eq!(a, b);
    }

    #[test]
    fn bot_pattern() {
        assert!(Identity::new("bot1", "BOT").is_bot());
        assert!(Identity::new("BOT42", "BOT").is_bot());
        assert!(Identity::new("BoT1", "BOT").is_bot());
        assert!(Identity::new("bOT7", "BOT").is_bot());
        assert!(!Identity::new("bot", "BOT").is_bot());
        assert!(!Identity::new("robotron", "BOT").is_bot());
    }

    #[test]
    fn canonical_round_trip() {
        let id = Identity::new("Spree", "000");
        assert_eq!(Identity::parse(&id.canonical()).unwrap(), id);
    }
}
