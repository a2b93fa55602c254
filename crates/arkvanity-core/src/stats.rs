//! Live search statistics

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Search statistics shared between the dispatch loop and observers.
///
/// Counters are written only by the dispatch loop; `stop` may be called from
/// any thread to cancel the search.
#[derive(Debug)]
pub struct SearchStats {
    /// Candidates evaluated (matches are counted separately)
    checked: AtomicU64,
    /// Matches reported to the sink
    matches: AtomicU64,
    /// Start time
    start_time: Instant,
    /// Whether search is running
    running: AtomicBool,
}

impl SearchStats {
    /// Create new stats
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_checked(&self, count: u64) {
        self.checked.fetch_add(count, Ordering::Relaxed);
    }

    pub fn total_checked(&self) -> u64 {
        self.checked.load(Ordering::Relaxed)
    }

    pub fn add_match(&self) -> u64 {
        self.matches.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total_matches(&self) -> u64 {
        self.matches.load(Ordering::Relaxed)
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Candidates per second since start
    pub fn per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_checked() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Check if running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop the search
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Snapshot for progress reporting
    pub fn progress(&self) -> Progress {
        Progress {
            checked: self.total_checked(),
            elapsed: self.elapsed(),
            per_second: self.per_second(),
        }
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self {
            checked: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            start_time: Instant::now(),
            running: AtomicBool::new(true),
        }
    }
}

/// One progress notification
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Progress {
    pub checked: u64,
    pub elapsed: Duration,
    pub per_second: f64,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Checked {} passphrases within {:.2?} [{:.0} p/s]",
            self.checked, self.elapsed, self.per_second
        )
    }
}

/// When to emit progress notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressCadence {
    /// Every N candidates
    Every(u64),
    /// At most once per wall-clock interval
    Interval(Duration),
}

impl Default for ProgressCadence {
    fn default() -> Self {
        ProgressCadence::Interval(Duration::from_secs(1))
    }
}

/// Decides when the next progress notification is due
#[derive(Debug)]
pub(crate) struct ProgressClock {
    cadence: ProgressCadence,
    last_emit: Instant,
    last_checked: u64,
}

impl ProgressClock {
    pub(crate) fn new(cadence: ProgressCadence) -> Self {
        Self {
            cadence,
            last_emit: Instant::now(),
            last_checked: 0,
        }
    }

    /// True when a notification should be emitted for `checked` candidates
    pub(crate) fn tick(&mut self, checked: u64) -> bool {
        let due = match self.cadence {
            ProgressCadence::Every(0) => false,
            ProgressCadence::Every(n) => checked / n > self.last_checked / n,
            ProgressCadence::Interval(interval) => self.last_emit.elapsed() >= interval,
        };
        if due {
            self.last_emit = Instant::now();
            self.last_checked = checked;
        }
        due
    }
}
