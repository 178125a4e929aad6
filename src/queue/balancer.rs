use super::QueuedPlayer;
use crate::draft::Lane;
use crate::draft::RosterPlayer;

const LANES: [Lane; 5] = [Lane::Top, Lane::Jungle, Lane::Mid, Lane::Adc, Lane::Support];

/// Result of balancing a full 10-player queue into two 5-player
/// rosters. Roster order matches `Lane::slot()`, the order `DraftState`
/// and the draft engine expect.
pub struct BalancedMatch {
    pub team1: [RosterPlayer; 5],
    pub team2: [RosterPlayer; 5],
    pub average_skill_team1: f32,
    pub average_skill_team2: f32,
}

struct Candidate {
    delta: f32,
    autofill_sum: u32,
    lexicographic_key: String,
    team1_idx: Vec<usize>,
    team2_idx: Vec<usize>,
    assignment1: [usize; 5],
    assignment2: [usize; 5],
}

/// Partitions 10 queued players into two skill-balanced teams, each
/// covering all five lanes, preferring each player's declared lanes.
/// Exhaustive over team splits (C(10,5)=252) and lane assignments
/// (5!=120 per team); trivial at this scale.
pub fn balance(players: Vec<QueuedPlayer>) -> BalancedMatch {
    assert_eq!(players.len(), 10, "balancer requires exactly 10 players");

    let mut best: Option<Candidate> = None;
    for team1_idx in combinations(10, 5) {
        let team2_idx: Vec<usize> = (0..10).filter(|i| !team1_idx.contains(i)).collect();

        let team1_players: Vec<&QueuedPlayer> = team1_idx.iter().map(|&i| &players[i]).collect();
        let team2_players: Vec<&QueuedPlayer> = team2_idx.iter().map(|&i| &players[i]).collect();

        let (assignment1, autofill1) = assign_lanes(&team1_players);
        let (assignment2, autofill2) = assign_lanes(&team2_players);

        let avg1 = average(&team1_players);
        let avg2 = average(&team2_players);
        let candidate = Candidate {
            delta: (avg1 - avg2).abs(),
            autofill_sum: autofill1 + autofill2,
            lexicographic_key: lexicographic_key(&team1_players, &team2_players),
            team1_idx,
            team2_idx,
            assignment1,
            assignment2,
        };

        let better = match &best {
            None => true,
            Some(b) => {
                (candidate.delta, candidate.autofill_sum, &candidate.lexicographic_key)
                    < (b.delta, b.autofill_sum, &b.lexicographic_key)
            }
        };
        if better {
            best = Some(candidate);
        }
    }

    let best = best.expect("10 players always admit a valid team split");
    let team1_players: Vec<&QueuedPlayer> = best.team1_idx.iter().map(|&i| &players[i]).collect();
    let team2_players: Vec<&QueuedPlayer> = best.team2_idx.iter().map(|&i| &players[i]).collect();

    BalancedMatch {
        team1: to_roster(&team1_players, &best.assignment1),
        team2: to_roster(&team2_players, &best.assignment2),
        average_skill_team1: average(&team1_players),
        average_skill_team2: average(&team2_players),
    }
}

fn average(players: &[&QueuedPlayer]) -> f32 {
    players.iter().map(|p| p.skill_rating).sum::<f32>() / players.len() as f32
}

/// `assignment[lane.slot()]` = index into `players` (team-local).
fn to_roster(players: &[&QueuedPlayer], assignment: &[usize; 5]) -> [RosterPlayer; 5] {
    std::array::from_fn(|slot| {
        let player = players[assignment[slot]];
        RosterPlayer { identity: player.identity.clone(), mmr: player.skill_rating }
    })
}

fn lexicographic_key(team1: &[&QueuedPlayer], team2: &[&QueuedPlayer]) -> String {
    let mut names: Vec<String> =
        team1.iter().chain(team2.iter()).map(|p| p.identity.canonical()).collect();
    names.sort();
    names.concat()
}

/// Brute-forces the lane assignment minimizing total cost (0=primary,
/// 1=secondary, 2=autofill) over all 5! permutations; returns the
/// winning assignment and its autofill count.
fn assign_lanes(team: &[&QueuedPlayer]) -> ([usize; 5], u32) {
    assert_eq!(team.len(), 5);
    let mut best: Option<([usize; 5], u32, u32)> = None;
    for perm in permutations(5) {
        let mut cost = 0u32;
        let mut autofill = 0u32;
        for (slot, &player_idx) in perm.iter().enumerate() {
            let lane = LANES[slot];
            let player = team[player_idx];
            if player.primary_lane == lane {
            } else if player.secondary_lane == lane {
                cost += 1;
            } else {
                cost += 2;
                autofill += 1;
            }
        }
        let better = best.as_ref().map(|(_, c, _)| cost < *c).unwrap_or(true);
        if better {
            let mut fixed = [0usize; 5];
            fixed.copy_from_slice(&perm);
            best = Some((fixed, cost, autofill));
        }
    }
    let (assignment, _, autofill) = best.expect("5 players always admit a lane assignment");
    (assignment, autofill)
}

/// All `n`-choose-`k` index combinations, smallest-first.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    fn recurse(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            recurse(i + 1, n, k, current, out);
            current.pop();
        }
    }
    recurse(0, n, k, &mut current, &mut out);
    out
}

/// All permutations of `0..n`, in lexicographic order of index sequence.
fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut used = vec![false; n];
    let mut chosen = Vec::with_capacity(n);
    fn recurse(n: usize, used: &mut [bool], chosen: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if chosen.len() == n {
            out.push(chosen.clone());
            return;
        }
        for i in 0..n {
            if !used[i] {
                used[i] = true;
                chosen.push(i);
                recurse(n, used, chosen, out);
                chosen.pop();
                used[i] = false;
            }
        }
    }
    recurse(n, &mut used, &mut chosen, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;

    fn player(name: &str, primary: Lane, secondary: Lane, skill: f32) -> QueuedPlayer {
        QueuedPlayer {
            identity: Identity::new(name, "NA1"),
            primary_lane: primary,
            secondary_lane: secondary,
            skill_rating: skill,
        }
    }

    #[test]
    fn covers_all_five_lanes_per_team_with_clean_preferences() {
        let players = vec![
            player("a1", Lane::Top, Lane::Jungle, 1000.0),
            player("a2", Lane::Jungle, Lane::Top, 1000.0),
            player("a3", Lane::Mid, Lane::Top, 1000.0),
            player("a4", Lane::Adc, Lane::Support, 1000.0),
            player("a5", Lane::Support, Lane::Adc, 1000.0),
            player("b1", Lane::Top, Lane::Jungle, 1000.0),
            player("b2", Lane::Jungle, Lane::Top, 1000.0),
            player("b3", Lane::Mid, Lane::Top, 1000.0),
            player("b4", Lane::Adc, Lane::Support, 1000.0),
            player("b5", Lane::Support, Lane::Adc, 1000.0),
        ];
        let result = balance(players);
        assert_eq!(result.team1.len(), 5);
        assert_eq!(result.team2.len(), 5);
        assert_eq!(result.average_skill_team1, result.average_skill_team2);
    }

    #[test]
    fn minimizes_skill_delta() {
        let players = vec![
            player("a1", Lane::Top, Lane::Jungle, 2000.0),
            player("a2", Lane::Jungle, Lane::Top, 1000.0),
            player("a3", Lane::Mid, Lane::Top, 1000.0),
            player("a4", Lane::Adc, Lane::Support, 1000.0),
            player("a5", Lane::Support, Lane::Adc, 1000.0),
            player("b1", Lane::Top, Lane::Jungle, 1000.0),
            player("b2", Lane::Jungle, Lane::Top, 1000.0),
            player("b3", Lane::Mid, Lane::Top, 1000.0),
            player("b4", Lane::Adc, Lane::Support, 1000.0),
            player("b5", Lane::Support, Lane::Adc, 2000.0),
        ];
        let result = balance(players);
        assert!((result.average_skill_team1 - result.average_skill_team2).abs() < 1.0);
    }
}
