//! Shared primitive types used across the entire engine.

/// A participant's unique identity. Sole key into the history store.
pub type ParticipantId = String;

/// A penalty score. Lower is better; zero is a perfect arrangement.
pub type Penalty = f64;

/// Distance into history. 1 = the immediately preceding year.
pub type YearsAgo = u32;
