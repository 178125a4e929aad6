mod connect;
mod matches;
mod schema;
mod settings;
mod votes;

pub use connect::connect;
pub use matches::MatchStore;
pub use settings::SettingsStore;
pub use votes::VoteStore;
