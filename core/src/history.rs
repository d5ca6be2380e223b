//! The history store: who gave to whom, year by year.
//!
//! Each participant maps to a sequence of recipient slots, oldest first.
//! `None` means the participant did not give that year. Sequences may have
//! different lengths: a short sequence is read as if right-padded with
//! `None` up to the common year count, i.e. the missing years are the most
//! recent ones.
//!
//! RULE: history is append-only. A year, once applied, is never rewritten.

use crate::{
    arrangement::Arrangement,
    error::{SantaError, SantaResult},
    types::{ParticipantId, YearsAgo},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cell text that stands for "did not take part that year" in tabular input.
pub const DEFAULT_NO_PARTICIPATION_MARKER: &str = "N/A";

/// One year of one participant's history.
pub type HistorySlot = Option<ParticipantId>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStore {
    entries: BTreeMap<ParticipantId, Vec<HistorySlot>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an already-parsed grid of strings.
    ///
    /// Row 0 is a header and is skipped. In every other row, column 0 is the
    /// giver and each following column is one year, oldest first. Empty
    /// cells and `marker` cells become empty slots. Rows with a blank giver
    /// are ignored.
    pub fn from_rows(rows: &[Vec<String>], marker: &str) -> SantaResult<Self> {
        let header = rows.first().ok_or(SantaError::EmptyTable)?;
        let width = header.len();
        if width == 0 {
            return Err(SantaError::EmptyTable);
        }

        let mut store = Self::new();
        for (row_index, row) in rows.iter().enumerate().skip(1) {
            if row.len() != width {
                return Err(SantaError::MalformedTable {
                    row:      row_index,
                    expected: width,
                    actual:   row.len(),
                });
            }
            let giver = row[0].trim();
            if giver.is_empty() {
                continue;
            }
            let slots = row[1..]
                .iter()
                .map(|cell| {
                    let cell = cell.trim();
                    if cell.is_empty() || cell == marker {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            store.insert_history(giver, slots)?;
        }
        Ok(store)
    }

    /// Export as a rectangular grid, the inverse of `from_rows`.
    /// Every row is padded to the common year count.
    pub fn to_rows(&self, marker: &str) -> Vec<Vec<String>> {
        let years = self.number_of_years();
        let mut header = Vec::with_capacity(years + 1);
        header.push("Name".to_string());
        header.extend((1..=years).map(|y| format!("Year {y}")));

        let mut rows = vec![header];
        for (name, slots) in &self.entries {
            let mut row = Vec::with_capacity(years + 1);
            row.push(name.clone());
            for year in 0..years {
                let cell = slots.get(year).cloned().flatten();
                row.push(cell.unwrap_or_else(|| marker.to_string()));
            }
            rows.push(row);
        }
        rows
    }

    /// Add a participant's full history sequence. Fails if one already exists.
    pub fn insert_history(
        &mut self,
        name: impl Into<ParticipantId>,
        slots: Vec<HistorySlot>,
    ) -> SantaResult<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(SantaError::DuplicateParticipant { name });
        }
        self.entries.insert(name, slots);
        Ok(())
    }

    /// Number of elapsed years: the longest sequence in the store.
    /// Recomputed on every call.
    pub fn number_of_years(&self) -> usize {
        self.entries.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw history sequence for `name`, oldest first, unpadded.
    pub fn history(&self, name: &str) -> Option<&[HistorySlot]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Who `giver` gave to `years_ago` years back, if anyone.
    pub fn recipient_years_ago(&self, giver: &str, years_ago: YearsAgo) -> Option<&str> {
        let years = self.number_of_years();
        let years_ago = years_ago as usize;
        if years_ago == 0 || years_ago > years {
            return None;
        }
        self.entries
            .get(giver)?
            .get(years - years_ago)?
            .as_deref()
    }

    /// How many years ago `giver` gave to `receiver`.
    ///
    /// The sequence is searched from the oldest year, so if the same
    /// receiver appears more than once, the oldest match wins.
    pub fn years_since_gave(&self, giver: &str, receiver: &str) -> Option<YearsAgo> {
        let index = self
            .entries
            .get(giver)?
            .iter()
            .position(|slot| slot.as_deref() == Some(receiver))?;
        Some(self.years_ago_at(index))
    }

    /// Years-ago value for a sequence index. Never below 1.
    fn years_ago_at(&self, index: usize) -> YearsAgo {
        let distance = self.number_of_years().saturating_sub(index).max(1);
        YearsAgo::try_from(distance).unwrap_or(YearsAgo::MAX)
    }

    /// Fold a chosen arrangement in as the next year.
    ///
    /// Each giver's sequence is padded with empty slots to the year count
    /// as it stood before this round, then the receiver is appended.
    /// Receivers who did not give are left untouched.
    pub fn apply(&mut self, arrangement: &Arrangement) {
        let years = self.number_of_years();
        for pair in arrangement.pairs() {
            let slots = self.entries.entry(pair.giver.clone()).or_default();
            if slots.len() < years {
                slots.resize(years, None);
            }
            slots.push(Some(pair.receiver.clone()));
        }
        log::debug!(
            "Applied {} pairs; history now spans {} years",
            arrangement.len(),
            self.number_of_years()
        );
    }

    /// Copy of this store with `arrangement` applied.
    pub fn applied(&self, arrangement: &Arrangement) -> Self {
        let mut next = self.clone();
        next.apply(arrangement);
        next
    }
}
