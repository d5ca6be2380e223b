//! Penalty scoring for candidate arrangements.
//!
//! Total = Σ per-pair directional penalties + one ring penalty for the
//! whole arrangement. Scoring only reads history.

use crate::{
    arrangement::Arrangement,
    history::HistoryStore,
    types::{ParticipantId, Penalty, YearsAgo},
};
use serde::{Deserialize, Serialize};

/// Which side of a past relationship a penalty looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The giver gave to this receiver before.
    GaveTo,
    /// The receiver received from this giver before.
    ReceivedFrom,
}

/// Caller-supplied scoring rules. Both functions must be pure and total.
pub trait PenaltyPolicy {
    /// Penalty for a relationship seen `years_ago` years back.
    fn action_penalty(&self, direction: Direction, years_ago: YearsAgo) -> Penalty;

    /// Penalty for the arrangement's full list of ring sizes.
    /// Called once per arrangement, not once per ring.
    fn ring_penalty(&self, ring_sizes: &[usize]) -> Penalty;
}

/// A policy built from two closures.
pub struct FnPolicy<A, R> {
    action: A,
    ring:   R,
}

impl<A, R> FnPolicy<A, R>
where
    A: Fn(Direction, YearsAgo) -> Penalty,
    R: Fn(&[usize]) -> Penalty,
{
    pub fn new(action: A, ring: R) -> Self {
        Self { action, ring }
    }
}

impl<A, R> PenaltyPolicy for FnPolicy<A, R>
where
    A: Fn(Direction, YearsAgo) -> Penalty,
    R: Fn(&[usize]) -> Penalty,
{
    fn action_penalty(&self, direction: Direction, years_ago: YearsAgo) -> Penalty {
        (self.action)(direction, years_ago)
    }

    fn ring_penalty(&self, ring_sizes: &[usize]) -> Penalty {
        (self.ring)(ring_sizes)
    }
}

/// Every arrangement is perfect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroPolicy;

impl PenaltyPolicy for ZeroPolicy {
    fn action_penalty(&self, _direction: Direction, _years_ago: YearsAgo) -> Penalty {
        0.0
    }

    fn ring_penalty(&self, _ring_sizes: &[usize]) -> Penalty {
        0.0
    }
}

/// Table-driven policy, loadable from config.
///
/// `gave_to[0]` is the penalty for having given to the same person 1 year
/// ago, `gave_to[1]` for 2 years ago, and so on. Years past the end of a
/// list cost nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyTable {
    pub gave_to:               Vec<Penalty>,
    pub received_from:         Vec<Penalty>,
    /// Charged once if any ring has exactly two members.
    pub mutual_pair_penalty:   Penalty,
    /// Charged once if the arrangement splits into more than one ring.
    pub multiple_rings_penalty: Penalty,
}

impl Default for PenaltyTable {
    fn default() -> Self {
        Self {
            gave_to:                vec![100.0, 50.0, 20.0],
            received_from:          vec![30.0, 10.0],
            mutual_pair_penalty:    100.0,
            multiple_rings_penalty: 0.0,
        }
    }
}

impl PenaltyPolicy for PenaltyTable {
    fn action_penalty(&self, direction: Direction, years_ago: YearsAgo) -> Penalty {
        let table = match direction {
            Direction::GaveTo       => &self.gave_to,
            Direction::ReceivedFrom => &self.received_from,
        };
        years_ago
            .checked_sub(1)
            .and_then(|i| table.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }

    fn ring_penalty(&self, ring_sizes: &[usize]) -> Penalty {
        let mut penalty = 0.0;
        if ring_sizes.contains(&2) {
            penalty += self.mutual_pair_penalty;
        }
        if ring_sizes.len() > 1 {
            penalty += self.multiple_rings_penalty;
        }
        penalty
    }
}

/// One directional term of a pair's score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionTerm {
    pub years_ago: YearsAgo,
    pub penalty:   Penalty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub giver:         ParticipantId,
    pub receiver:      ParticipantId,
    /// Giver previously gave to receiver.
    pub gave_to:       Option<ActionTerm>,
    /// Receiver previously received from giver.
    pub received_from: Option<ActionTerm>,
}

impl PairScore {
    pub fn penalty(&self) -> Penalty {
        self.gave_to.map_or(0.0, |t| t.penalty) + self.received_from.map_or(0.0, |t| t.penalty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub pairs:        Vec<PairScore>,
    pub ring_sizes:   Vec<usize>,
    pub ring_penalty: Penalty,
    pub total:        Penalty,
}

/// Total penalty for `arrangement` under `policy`.
pub fn score_arrangement(
    arrangement: &Arrangement,
    history: &HistoryStore,
    policy: &dyn PenaltyPolicy,
) -> Penalty {
    score_breakdown(arrangement, history, policy).total
}

/// Score with every term kept, for audit output.
///
/// For each pair, the receiver is looked up in the giver's history
/// (`GaveTo`) and the giver in the receiver's history (`ReceivedFrom`).
/// No match means no term.
pub fn score_breakdown(
    arrangement: &Arrangement,
    history: &HistoryStore,
    policy: &dyn PenaltyPolicy,
) -> ScoreBreakdown {
    let pairs: Vec<PairScore> = arrangement
        .pairs()
        .iter()
        .map(|pair| {
            let gave_to = history
                .years_since_gave(&pair.giver, &pair.receiver)
                .map(|years_ago| ActionTerm {
                    years_ago,
                    penalty: policy.action_penalty(Direction::GaveTo, years_ago),
                });
            let received_from = history
                .years_since_gave(&pair.receiver, &pair.giver)
                .map(|years_ago| ActionTerm {
                    years_ago,
                    penalty: policy.action_penalty(Direction::ReceivedFrom, years_ago),
                });
            PairScore {
                giver: pair.giver.clone(),
                receiver: pair.receiver.clone(),
                gave_to,
                received_from,
            }
        })
        .collect();

    let ring_sizes = arrangement.ring_sizes();
    let ring_penalty = policy.ring_penalty(&ring_sizes);
    let total = pairs.iter().map(PairScore::penalty).sum::<Penalty>() + ring_penalty;

    ScoreBreakdown { pairs, ring_sizes, ring_penalty, total }
}
