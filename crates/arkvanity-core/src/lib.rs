//! ArkVanity Core Engine
//!
//! Adaptive concurrent search for passphrases whose derived address matches
//! a prefix/suffix rule.

mod jobs;
mod search;
mod sink;
mod stats;
mod tuner;

pub use jobs::{CandidateOutcome, JobSet, Match, MatchResult, NetworkSpec};
pub use search::{DispatchMode, SearchConfig, SearchError, SearchReport, VanitySearch};
pub use sink::{ConsoleSink, FileSink, ResultSink};
pub use stats::{Progress, ProgressCadence, SearchStats};
pub use tuner::{AdaptiveTuner, BatchSample, TunerConfig, TunerEvent, TunerState};

// Re-exports for convenience
pub use arkvanity_networks::{
    all_networks, get_network, AddressOracle, ArkOracle, DeriveError, NetworkParams,
    DEFAULT_ENTROPY_BITS,
};
pub use arkvanity_pattern::{calculate_difficulty, format_difficulty, JobError, JobSpec};
