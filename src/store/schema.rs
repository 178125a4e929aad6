/// Declarative, additive, forward-only schema. One `CREATE TABLE IF NOT
/// EXISTS` per table; nothing here ever drops or renames a column.
pub const MATCHES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS matches (
    id                      BIGINT PRIMARY KEY,
    status                  TEXT NOT NULL,
    team1_players           JSONB NOT NULL,
    team2_players           JSONB NOT NULL,
    average_skill_team1     REAL NOT NULL,
    average_skill_team2     REAL NOT NULL,
    draft_json              JSONB,
    game_json               JSONB,
    real_game_json          JSONB,
    linked_real_game_id     TEXT,
    actual_winner           SMALLINT,
    actual_duration         INTEGER,
    owner_backend_id        TEXT NOT NULL,
    owner_heartbeat         BIGINT NOT NULL,
    created_at              BIGINT NOT NULL,
    completed_at            BIGINT
)";

pub const MATCHES_ID_SEQUENCE: &str = "
CREATE SEQUENCE IF NOT EXISTS matches_id_seq OWNED BY matches.id";

pub const MATCH_VOTES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS match_votes (
    match_id                BIGINT NOT NULL,
    player_id               TEXT NOT NULL,
    lcu_game_id             TEXT NOT NULL,
    voted_at                BIGINT NOT NULL,
    PRIMARY KEY (match_id, player_id)
)";

pub const SETTINGS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS settings (
    key                     TEXT PRIMARY KEY,
    value                   JSONB NOT NULL
)";
