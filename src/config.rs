/// Process configuration, read once at startup from the environment.
/// No command-line flags are required for core operation.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub profile: String,
    pub champion_cdn_version: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            bind_addr: std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"),
            profile: std::env::var("PROFILE").unwrap_or_else(|_| "development".into()),
            champion_cdn_version: std::env::var("CHAMPION_CDN_VERSION")
                .unwrap_or_else(|_| "15.19.1".into()),
        }
    }
}
