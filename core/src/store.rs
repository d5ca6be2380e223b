//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine itself never persists anything; callers load history from
//! here, run the optimizer, and write the chosen year back.

use crate::{
    arrangement::Arrangement,
    error::SantaResult,
    history::{HistorySlot, HistoryStore},
    optimizer::SearchOutcome,
    rng::Seed,
    types::Penalty,
};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;

pub struct SantaStore {
    conn: Connection,
}

/// A chosen arrangement as recorded for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub year_index:     usize,
    pub penalty:        Penalty,
    pub iterations_run: u64,
    pub arrangement:    Arrangement,
}

impl SantaStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> SantaResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SantaResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SantaResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: &Seed,
        iterations: u64,
        version: &str,
    ) -> SantaResult<()> {
        write_run(&self.conn, run_id, seed, iterations, version)
    }

    // ── History ────────────────────────────────────────────────

    pub fn load_history(&self) -> SantaResult<HistoryStore> {
        let mut stmt = self.conn.prepare(
            "SELECT participant, year_index, recipient
             FROM history_slot ORDER BY participant ASC, year_index ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)? as usize,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut sequences: BTreeMap<String, Vec<HistorySlot>> = BTreeMap::new();
        for (participant, year_index, recipient) in rows {
            let slots = sequences.entry(participant).or_default();
            if slots.len() <= year_index {
                slots.resize(year_index + 1, None);
            }
            slots[year_index] = recipient;
        }

        let mut history = HistoryStore::new();
        for (participant, slots) in sequences {
            history.insert_history(participant, slots)?;
        }
        Ok(history)
    }

    /// Replace the stored history. All-or-nothing.
    pub fn save_history(&self, history: &HistoryStore) -> SantaResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        write_history(&tx, history)?;
        tx.commit()?;
        Ok(())
    }

    // ── Rounds ─────────────────────────────────────────────────

    pub fn record_round(
        &self,
        run_id: &str,
        year_index: usize,
        outcome: &SearchOutcome,
    ) -> SantaResult<()> {
        write_round(&self.conn, run_id, year_index, outcome)
    }

    /// Fold `outcome` into `history` as the next year and persist it.
    ///
    /// The new history, the run row and the round row are written in one
    /// transaction: either all three land or none do. Returns the history
    /// as stored.
    pub fn apply_round(
        &self,
        run_id: &str,
        seed: &Seed,
        iterations: u64,
        version: &str,
        history: &HistoryStore,
        outcome: &SearchOutcome,
    ) -> SantaResult<HistoryStore> {
        let year_index = history.number_of_years();
        let next = history.applied(&outcome.arrangement);

        let tx = self.conn.unchecked_transaction()?;
        write_history(&tx, &next)?;
        write_run(&tx, run_id, seed, iterations, version)?;
        write_round(&tx, run_id, year_index, outcome)?;
        tx.commit()?;

        log::info!("Applied year {} as run {run_id}", year_index + 1);
        Ok(next)
    }

    pub fn rounds_for_run(&self, run_id: &str) -> SantaResult<Vec<RoundRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT year_index, penalty, iterations_run, arrangement_json
             FROM round WHERE run_id = ?1
             ORDER BY year_index ASC, id ASC",
        )?;
        let raw = stmt
            .query_map(params![run_id], |row| {
                Ok((
                    row.get::<_, i64>(0)? as usize,
                    row.get::<_, f64>(1)?,
                    row.get::<_, i64>(2)? as u64,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(year_index, penalty, iterations_run, json)| -> SantaResult<RoundRecord> {
                Ok(RoundRecord {
                    year_index,
                    penalty,
                    iterations_run,
                    arrangement: serde_json::from_str(&json)?,
                })
            })
            .collect()
    }
}

// ── Writers shared by single statements and transactions ───────────────────

fn write_run(
    conn: &Connection,
    run_id: &str,
    seed: &Seed,
    iterations: u64,
    version: &str,
) -> SantaResult<()> {
    conn.execute(
        "INSERT INTO run (run_id, seed, iterations, version, started_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            run_id,
            seed.to_string(),
            iterations as i64,
            version,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn write_history(conn: &Connection, history: &HistoryStore) -> SantaResult<()> {
    conn.execute("DELETE FROM history_slot", [])?;
    let mut insert = conn.prepare(
        "INSERT INTO history_slot (participant, year_index, recipient)
         VALUES (?1, ?2, ?3)",
    )?;
    for participant in history.participants() {
        let slots = history.history(participant).unwrap_or_default();
        for (year_index, recipient) in slots.iter().enumerate() {
            insert.execute(params![participant, year_index as i64, recipient])?;
        }
    }
    log::debug!(
        "Wrote history for {} participants over {} years",
        history.participants().count(),
        history.number_of_years()
    );
    Ok(())
}

fn write_round(
    conn: &Connection,
    run_id: &str,
    year_index: usize,
    outcome: &SearchOutcome,
) -> SantaResult<()> {
    conn.execute(
        "INSERT INTO round (run_id, year_index, penalty, iterations_run,
                            arrangement_json, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            run_id,
            year_index as i64,
            outcome.penalty,
            outcome.iterations_run as i64,
            serde_json::to_string(&outcome.arrangement)?,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}
