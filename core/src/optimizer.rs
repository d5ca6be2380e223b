//! Monte Carlo search over random arrangements.
//!
//! DRAW ORDER (fixed, never reordered):
//!   1. The outer RNG is seeded once from the caller's seed.
//!   2. Each iteration draws exactly one i32 sub-seed from the outer RNG.
//!   3. That iteration's arrangement is generated from a fresh RNG seeded
//!      with the sub-seed, and nothing else touches it.
//!
//! Both entry points share this loop, so for the same seed they see the
//! same sequence of arrangements.

use crate::{
    arrangement::{check_participants, Arrangement},
    error::{SantaError, SantaResult},
    history::HistoryStore,
    rng::{SantaRng, Seed},
    scoring::{score_arrangement, PenaltyPolicy},
    types::{ParticipantId, Penalty},
};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// Result of a best-arrangement search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub arrangement:        Arrangement,
    pub penalty:            Penalty,
    /// Iterations actually run. Less than the budget on early exit.
    pub iterations_run:     u64,
    /// 1-based iteration that produced `arrangement`.
    pub found_at_iteration: u64,
    /// How many times a strictly better arrangement replaced the incumbent.
    pub improvements:       u64,
}

impl SearchOutcome {
    pub fn is_optimal(&self) -> bool {
        is_optimal(self.penalty)
    }
}

/// Search for the lowest-penalty arrangement.
///
/// The first arrangement found at a given penalty is kept; later ties do
/// not replace it. Stops as soon as a zero-penalty arrangement turns up.
pub fn best_arrangement(
    seed: impl Into<Seed>,
    iterations: u64,
    policy: &dyn PenaltyPolicy,
    participants: &[ParticipantId],
    history: &HistoryStore,
) -> SantaResult<SearchOutcome> {
    let seed = seed.into();
    let mut best: Option<SearchOutcome> = None;

    let iterations_run = drive(&seed, iterations, participants, |iteration, arrangement| {
        let penalty = score_arrangement(&arrangement, history, policy);
        let improvements = match &best {
            None => Some(0),
            Some(incumbent) if penalty < incumbent.penalty => {
                log::debug!(
                    "iteration {iteration}: penalty {} -> {penalty}",
                    incumbent.penalty
                );
                Some(incumbent.improvements + 1)
            }
            Some(_) => None,
        };
        if let Some(improvements) = improvements {
            best = Some(SearchOutcome {
                arrangement,
                penalty,
                iterations_run: 0,
                found_at_iteration: iteration,
                improvements,
            });
        }
        if is_optimal(penalty) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;

    let mut outcome = best.ok_or(SantaError::InvalidIterations { iterations })?;
    outcome.iterations_run = iterations_run;
    log::info!(
        "seed {seed}: best penalty {} found at iteration {} of {} ({} improvements)",
        outcome.penalty,
        outcome.found_at_iteration,
        outcome.iterations_run,
        outcome.improvements
    );
    Ok(outcome)
}

/// Count how many of `iterations` draws score zero. Always runs the full
/// budget.
pub fn optimal_arrangement_count(
    seed: impl Into<Seed>,
    iterations: u64,
    policy: &dyn PenaltyPolicy,
    participants: &[ParticipantId],
    history: &HistoryStore,
) -> SantaResult<u64> {
    let seed = seed.into();
    let mut optimal = 0u64;

    drive(&seed, iterations, participants, |_, arrangement| {
        if is_optimal(score_arrangement(&arrangement, history, policy)) {
            optimal += 1;
        }
        ControlFlow::Continue(())
    })?;

    log::info!("seed {seed}: {optimal} of {iterations} arrangements are optimal");
    Ok(optimal)
}

/// Only an exact zero is perfect. Negative totals are ordinary scores.
fn is_optimal(penalty: Penalty) -> bool {
    penalty == 0.0
}

/// Shared driving loop. Returns the number of iterations run.
fn drive<F>(
    seed: &Seed,
    iterations: u64,
    participants: &[ParticipantId],
    mut visit: F,
) -> SantaResult<u64>
where
    F: FnMut(u64, Arrangement) -> ControlFlow<()>,
{
    check_participants(participants)?;
    if iterations == 0 {
        return Err(SantaError::InvalidIterations { iterations });
    }

    let mut rng = SantaRng::new(seed.clone());
    for iteration in 1..=iterations {
        let mut iteration_rng = SantaRng::new(rng.next_i32());
        let arrangement = Arrangement::generate(&mut iteration_rng, participants)?;
        if visit(iteration, arrangement).is_break() {
            return Ok(iteration);
        }
    }
    Ok(iterations)
}
