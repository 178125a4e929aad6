use serde::Deserialize;
use serde::Serialize;

/// Sentinel written to `championKey`/`championName` for an auto-skipped
/// action.
pub const SKIPPED: &str = "SKIPPED";
/// `byPlayer` sentinel recorded when the scheduler auto-skips an action
/// on timeout.
pub const TIMEOUT_ACTOR: &str = "TIMEOUT";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Ban,
    Pick,
}

/// Lane slot, indexed 0..4 per team as `[top, jungle, mid, bot, support]`,
/// matching the team arrays produced by the queue balancer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Lane {
    pub fn slot(self) -> usize {
        match self {
            Lane::Top => 0,
            Lane::Jungle => 1,
            Lane::Mid => 2,
            Lane::Adc => 3,
            Lane::Support => 4,
        }
    }
}

/// Which ban/pick phase an action belongs to, for the `currentPhase`
/// field of the serialized draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Ban1,
    Pick1,
    Ban2,
    Pick2,
    Completed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Ban1 => "ban1",
            Phase::Pick1 => "pick1",
            Phase::Ban2 => "ban2",
            Phase::Pick2 => "pick2",
            Phase::Completed => "completed",
        }
    }
}

/// One of the 20 ordered pick/ban actions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DraftAction {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub team: u8,
    pub lane: Lane,
    pub phase: Phase,
    pub champion_key: Option<String>,
    pub champion_name: Option<String>,
    pub by_player: Option<String>,
}

impl DraftAction {
    pub fn is_open(&self) -> bool {
        self.champion_key.is_none()
    }
    pub fn is_skipped(&self) -> bool {
        self.champion_key.as_deref() == Some(SKIPPED)
    }
    pub fn is_completed(&self) -> bool {
        !self.is_open() && !self.is_skipped()
    }
}

/// The fixed 20-action order. A contract: tests must assert it for
/// every index.
pub const ACTION_TABLE: [(ActionType, u8, Lane, Phase); 20] = [
    (ActionType::Ban, 1, Lane::Top, Phase::Ban1),
    (ActionType::Ban, 2, Lane::Top, Phase::Ban1),
    (ActionType::Ban, 1, Lane::Jungle, Phase::Ban1),
    (ActionType::Ban, 2, Lane::Jungle, Phase::Ban1),
    (ActionType::Ban, 1, Lane::Mid, Phase::Ban1),
    (ActionType::Ban, 2, Lane::Mid, Phase::Ban1),
    (ActionType::Pick, 1, Lane::Top, Phase::Pick1),
    (ActionType::Pick, 2, Lane::Top, Phase::Pick1),
    (ActionType::Pick, 2, Lane::Jungle, Phase::Pick1),
    (ActionType::Pick, 1, Lane::Jungle, Phase::Pick1),
    (ActionType::Pick, 1, Lane::Mid, Phase::Pick1),
    (ActionType::Pick, 2, Lane::Mid, Phase::Pick1),
    (ActionType::Ban, 2, Lane::Adc, Phase::Ban2),
    (ActionType::Ban, 1, Lane::Adc, Phase::Ban2),
    (ActionType::Ban, 2, Lane::Support, Phase::Ban2),
    (ActionType::Ban, 1, Lane::Support, Phase::Ban2),
    (ActionType::Pick, 2, Lane::Adc, Phase::Pick2),
    (ActionType::Pick, 1, Lane::Adc, Phase::Pick2),
    (ActionType::Pick, 1, Lane::Support, Phase::Pick2),
    (ActionType::Pick, 2, Lane::Support, Phase::Pick2),
];

pub fn build_actions() -> Vec<DraftAction> {
    ACTION_TABLE
        .iter()
        .enumerate()
        .map(|(index, (kind, team, lane, phase))| DraftAction {
            index,
            kind: *kind,
            team: *team,
            lane: *lane,
            phase: *phase,
            champion_key: None,
            champion_name: None,
            by_player: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_table_matches_contract() {
        let actions = build_actions();
        assert_eq!(actions.len(), 20);
        let expect = [
            (0, ActionType::Ban, 1, Lane::Top),
            (5, ActionType::Ban, 2, Lane::Mid),
            (6, ActionType::Pick, 1, Lane::Top),
            (11, ActionType::Pick, 2, Lane::Mid),
            (12, ActionType::Ban, 2, Lane::Adc),
            (15, ActionType::Ban, 1, Lane::Support),
            (18, ActionType::Pick, 1, Lane::Support),
            (19, ActionType::Pick, 2, Lane::Support),
        ];
        for (idx, kind, team, lane) in expect {
            let a = &actions[idx];
            assert_eq!(a.kind, kind);
            assert_eq!(a.team, team);
            assert_eq!(a.lane, lane);
        }
    }
}
