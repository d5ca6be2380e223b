//! Human-readable audit output for an arrangement.
//!
//! Format (one item per line):
//!   Ann -> Bob
//!     gave to Bob 2 years ago: 50
//!     received from Ann 1 year ago: 30
//!   Ring sizes: [3]
//!   Ring penalty: 0
//!   Total penalty: 80
//!
//! With a policy, only nonzero terms are listed and the ring penalty and
//! total are appended. Without one, every prior relationship is listed
//! without a penalty and the last two lines are omitted.

use crate::{
    arrangement::Arrangement,
    history::HistoryStore,
    scoring::{score_breakdown, ActionTerm, PenaltyPolicy, ZeroPolicy},
    types::YearsAgo,
};
use std::fmt::Write;

pub fn render_arrangement(
    arrangement: &Arrangement,
    history: &HistoryStore,
    policy: Option<&dyn PenaltyPolicy>,
) -> String {
    let breakdown = score_breakdown(arrangement, history, policy.unwrap_or(&ZeroPolicy));
    let mut out = String::new();

    for pair in &breakdown.pairs {
        let _ = writeln!(out, "{} -> {}", pair.giver, pair.receiver);
        if let Some(term) = pair.gave_to {
            let what = format!("gave to {}", pair.receiver);
            write_term(&mut out, &what, term, policy.is_some());
        }
        if let Some(term) = pair.received_from {
            let what = format!("received from {}", pair.giver);
            write_term(&mut out, &what, term, policy.is_some());
        }
    }

    let _ = writeln!(out, "Ring sizes: {:?}", breakdown.ring_sizes);
    if policy.is_some() {
        let _ = writeln!(out, "Ring penalty: {}", breakdown.ring_penalty);
        let _ = writeln!(out, "Total penalty: {}", breakdown.total);
    }
    out
}

fn write_term(out: &mut String, what: &str, term: ActionTerm, with_penalty: bool) {
    let when = years_ago_text(term.years_ago);
    if !with_penalty {
        let _ = writeln!(out, "  {what} {when}");
    } else if term.penalty != 0.0 {
        let _ = writeln!(out, "  {what} {when}: {}", term.penalty);
    }
}

fn years_ago_text(years_ago: YearsAgo) -> String {
    if years_ago == 1 {
        "1 year ago".to_string()
    } else {
        format!("{years_ago} years ago")
    }
}
