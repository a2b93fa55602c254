//! ArkVanity Pattern Matching
//!
//! Prefix/suffix rules, combined with AND or OR, optionally case-insensitive.

mod matcher;
mod difficulty;

pub use matcher::{JobSpec, JobError};
pub use difficulty::{calculate_difficulty, format_difficulty};
