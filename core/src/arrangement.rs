//! Arrangements: one full round of giver → receiver pairs.
//!
//! An arrangement is a derangement of the participants written as an
//! explicit edge list. Pairs are always ring-contiguous: each ring's pairs
//! appear together, in the order the ring is walked. Ring decomposition
//! relies on that ordering and nothing else.

use crate::{
    error::{SantaError, SantaResult},
    rng::{SantaRng, Seed},
    types::ParticipantId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub giver:    ParticipantId,
    pub receiver: ParticipantId,
}

impl Pair {
    pub fn new(giver: impl Into<ParticipantId>, receiver: impl Into<ParticipantId>) -> Self {
        Self {
            giver:    giver.into(),
            receiver: receiver.into(),
        }
    }
}

/// One cycle of the arrangement's permutation, listed in giving order.
/// The last member gives to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub members: Vec<ParticipantId>,
}

impl Ring {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Serialized as a plain list of pairs; deserializing re-validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Pair>", into = "Vec<Pair>")]
pub struct Arrangement {
    pairs: Vec<Pair>,
}

impl TryFrom<Vec<Pair>> for Arrangement {
    type Error = SantaError;

    fn try_from(pairs: Vec<Pair>) -> SantaResult<Self> {
        Self::from_pairs(pairs)
    }
}

impl From<Arrangement> for Vec<Pair> {
    fn from(arrangement: Arrangement) -> Self {
        arrangement.pairs
    }
}

impl Arrangement {
    /// Draw one random arrangement over `participants`.
    ///
    /// Givers are processed in input order against a shrinking pool of
    /// receivers. Each draw is rejection-sampled until it is not the giver
    /// itself, except when a single candidate remains, which is taken as-is.
    /// If that last candidate is the last giver, the attempt is thrown away
    /// and drawing starts over from the current RNG state.
    pub fn generate(rng: &mut SantaRng, participants: &[ParticipantId]) -> SantaResult<Self> {
        check_participants(participants)?;
        loop {
            if let Some(receiver_of) = draw_receivers(rng, participants.len()) {
                return Ok(walk_rings(participants, &receiver_of));
            }
            log::trace!("last giver drew themselves; redrawing arrangement");
        }
    }

    /// Build an arrangement from caller-supplied pairs.
    /// Pairs must form a derangement and be ring-contiguous.
    pub fn from_pairs(pairs: Vec<Pair>) -> SantaResult<Self> {
        if pairs.len() < 2 {
            return Err(SantaError::TooFewParticipants { count: pairs.len() });
        }

        let mut givers = HashSet::new();
        let mut receivers = HashSet::new();
        for pair in &pairs {
            if pair.giver == pair.receiver {
                return Err(invalid(format!("'{}' gives to themselves", pair.giver)));
            }
            if !givers.insert(pair.giver.as_str()) {
                return Err(invalid(format!("'{}' gives more than once", pair.giver)));
            }
            if !receivers.insert(pair.receiver.as_str()) {
                return Err(invalid(format!("'{}' receives more than once", pair.receiver)));
            }
        }
        if givers != receivers {
            return Err(invalid("givers and receivers are different sets".into()));
        }

        // Every ring must close before the next one starts.
        let mut ring_start = 0;
        for i in 0..pairs.len() {
            let continues = pairs
                .get(i + 1)
                .is_some_and(|next| next.giver == pairs[i].receiver);
            if !continues {
                if pairs[i].receiver != pairs[ring_start].giver {
                    return Err(invalid(format!(
                        "ring starting at '{}' is not contiguous",
                        pairs[ring_start].giver
                    )));
                }
                ring_start = i + 1;
            }
        }

        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn givers(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.giver.as_str())
    }

    pub fn receivers(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.receiver.as_str())
    }

    /// Who `giver` gives to in this arrangement.
    pub fn receiver_of(&self, giver: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.giver == giver)
            .map(|p| p.receiver.as_str())
    }

    /// Split the pairs into rings. A new ring starts whenever a pair's giver
    /// is not the previous pair's receiver.
    pub fn rings(&self) -> Vec<Ring> {
        let mut rings = Vec::new();
        let mut members: Vec<ParticipantId> = Vec::new();
        let mut last_receiver: Option<&str> = None;

        for pair in &self.pairs {
            if !members.is_empty() && last_receiver != Some(pair.giver.as_str()) {
                rings.push(Ring { members: std::mem::take(&mut members) });
            }
            members.push(pair.giver.clone());
            last_receiver = Some(pair.receiver.as_str());
        }
        if !members.is_empty() {
            rings.push(Ring { members });
        }
        rings
    }

    pub fn ring_sizes(&self) -> Vec<usize> {
        self.rings().iter().map(Ring::size).collect()
    }
}

/// Generate one arrangement from a fresh RNG seeded with `seed`.
pub fn generate_arrangement(
    seed: impl Into<Seed>,
    participants: &[ParticipantId],
) -> SantaResult<Arrangement> {
    let mut rng = SantaRng::new(seed);
    Arrangement::generate(&mut rng, participants)
}

pub(crate) fn check_participants(participants: &[ParticipantId]) -> SantaResult<()> {
    if participants.len() < 2 {
        return Err(SantaError::TooFewParticipants { count: participants.len() });
    }
    let mut seen = HashSet::new();
    for name in participants {
        if !seen.insert(name.as_str()) {
            return Err(SantaError::DuplicateParticipant { name: name.clone() });
        }
    }
    Ok(())
}

/// One pass of pool drawing. Returns `receiver_of[giver]` by index, or None
/// if the final giver was left holding themselves.
fn draw_receivers(rng: &mut SantaRng, n: usize) -> Option<Vec<usize>> {
    let mut pool: Vec<usize> = (0..n).collect();
    let mut receiver_of = vec![0; n];

    for giver in 0..n {
        let receiver = if pool.len() == 1 {
            pool.remove(0)
        } else {
            loop {
                let slot = rng.next_index_below(pool.len());
                if pool[slot] != giver {
                    break pool.remove(slot);
                }
            }
        };
        if receiver == giver {
            return None;
        }
        receiver_of[giver] = receiver;
    }
    Some(receiver_of)
}

/// Re-walk the giver → receiver map from each participant in input order so
/// that every ring's pairs come out contiguously.
fn walk_rings(participants: &[ParticipantId], receiver_of: &[usize]) -> Arrangement {
    let mut visited = vec![false; participants.len()];
    let mut pairs = Vec::with_capacity(participants.len());

    for start in 0..participants.len() {
        let mut giver = start;
        while !visited[giver] {
            visited[giver] = true;
            let receiver = receiver_of[giver];
            pairs.push(Pair::new(
                participants[giver].clone(),
                participants[receiver].clone(),
            ));
            giver = receiver;
        }
    }
    Arrangement { pairs }
}

fn invalid(reason: String) -> SantaError {
    SantaError::InvalidArrangement { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<ParticipantId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn walk_groups_rings_contiguously() {
        // A→C, B→D, C→A, D→B
        let arrangement = walk_rings(&names(&["A", "B", "C", "D"]), &[2, 3, 0, 1]);
        let order: Vec<(&str, &str)> = arrangement
            .pairs()
            .iter()
            .map(|p| (p.giver.as_str(), p.receiver.as_str()))
            .collect();
        assert_eq!(order, vec![("A", "C"), ("C", "A"), ("B", "D"), ("D", "B")]);
    }

    #[test]
    fn rings_split_on_broken_chain() {
        let arrangement = Arrangement::from_pairs(vec![
            Pair::new("A", "B"),
            Pair::new("B", "C"),
            Pair::new("C", "A"),
            Pair::new("D", "E"),
            Pair::new("E", "D"),
        ])
        .unwrap();
        let rings = arrangement.rings();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].members, names(&["A", "B", "C"]));
        assert_eq!(rings[1].members, names(&["D", "E"]));
        assert_eq!(arrangement.ring_sizes(), vec![3, 2]);
    }

    #[test]
    fn from_pairs_rejects_self_gift() {
        let err = Arrangement::from_pairs(vec![Pair::new("A", "A"), Pair::new("B", "B")]);
        assert!(matches!(err, Err(SantaError::InvalidArrangement { .. })));
    }

    #[test]
    fn from_pairs_rejects_interleaved_rings() {
        // A↔C and B↔D interleaved: not ring-contiguous.
        let err = Arrangement::from_pairs(vec![
            Pair::new("A", "C"),
            Pair::new("B", "D"),
            Pair::new("C", "A"),
            Pair::new("D", "B"),
        ]);
        assert!(matches!(err, Err(SantaError::InvalidArrangement { .. })));
    }

    #[test]
    fn dead_end_redraws_from_the_same_stream() {
        // With three people, seed 17's first pass leaves the last giver
        // holding themselves.
        let roster = names(&["Ann", "Bob", "Cat"]);
        let mut replay = SantaRng::new(17u64);
        assert_eq!(draw_receivers(&mut replay, roster.len()), None);
        let second = draw_receivers(&mut replay, roster.len()).unwrap();

        let generated = generate_arrangement(17u64, &roster).unwrap();
        assert_eq!(generated, walk_rings(&roster, &second));
    }

    #[test]
    fn duplicate_participants_rejected() {
        let err = generate_arrangement(1u64, &names(&["A", "B", "A"]));
        assert!(matches!(err, Err(SantaError::DuplicateParticipant { name }) if name == "A"));
    }
}
