//! Secret santa arrangement engine.
//!
//! Given a participant history and a seed, draws random derangements,
//! scores them against a penalty policy, and searches for the arrangement
//! least like recent years.

pub mod arrangement;
pub mod config;
pub mod error;
pub mod history;
pub mod optimizer;
pub mod render;
pub mod rng;
pub mod scoring;
pub mod store;
pub mod types;

pub use arrangement::{generate_arrangement, Arrangement, Pair, Ring};
pub use error::{SantaError, SantaResult};
pub use history::HistoryStore;
pub use optimizer::{best_arrangement, optimal_arrangement_count, SearchOutcome};
pub use render::render_arrangement;
pub use rng::{SantaRng, Seed};
pub use scoring::{score_arrangement, Direction, FnPolicy, PenaltyPolicy, PenaltyTable, ZeroPolicy};
