//! Adaptive batch-size tuner
//!
//! The best number of concurrently evaluated candidates depends on the
//! machine and on its current load, so it is measured rather than configured.
//! The tuner sweeps batch sizes `1..=size_max`, repeats the sweep `round_max`
//! times, and settles on the size with the highest mean throughput. Once the
//! lifetime candidate count crosses `rerun_threshold` it starts over.
//!
//! The tuner is owned by the dispatch loop and only mutated between batches.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Elapsed times below this are clamped so throughput stays finite
const MIN_ELAPSED: Duration = Duration::from_micros(1);

/// Tuner limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunerConfig {
    /// Largest batch size tried during a sweep
    pub size_max: usize,
    /// Number of sweeps averaged before choosing
    pub round_max: u32,
    /// Candidates evaluated at the chosen size before benchmarking again
    pub rerun_threshold: u64,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            size_max: 500,
            round_max: 3,
            rerun_threshold: 10_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TunerState {
    /// Tuning off: the user fixed the batch size
    Disabled { size: usize },
    /// Measuring `size` during sweep `round`
    Benchmarking { size: usize, round: u32 },
    /// Sweep finished, `size` won
    Stable { size: usize },
}

/// Throughput measured for one batch
#[derive(Debug, Clone, Copy)]
pub struct BatchSample {
    pub batch_size: usize,
    pub elapsed: Duration,
    pub items: u64,
}

impl BatchSample {
    /// Candidates per millisecond
    pub fn per_ms(&self) -> f64 {
        let secs = self.elapsed.max(MIN_ELAPSED).as_secs_f64();
        self.items as f64 / (secs * 1000.0)
    }
}

/// State transitions worth telling the user about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TunerEvent {
    BenchmarkStarted,
    BenchmarkComplete { size: usize, per_ms: f64 },
}

#[derive(Debug)]
pub struct AdaptiveTuner {
    config: TunerConfig,
    state: TunerState,
    /// Per-ms throughput of every sample, keyed by batch size
    samples: BTreeMap<usize, Vec<f64>>,
    /// Candidates seen since the last benchmark completed
    lifetime: u64,
}

impl AdaptiveTuner {
    /// A `concurrency` of zero enables tuning; anything else fixes the batch size
    pub fn new(config: TunerConfig, concurrency: usize) -> Self {
        let config = TunerConfig {
            size_max: config.size_max.max(1),
            round_max: config.round_max.max(1),
            ..config
        };
        let state = if concurrency == 0 {
            TunerState::Benchmarking { size: 1, round: 1 }
        } else {
            TunerState::Disabled { size: concurrency }
        };

        Self {
            config,
            state,
            samples: BTreeMap::new(),
            lifetime: 0,
        }
    }

    pub fn state(&self) -> TunerState {
        self.state
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    /// Batch size for the next iteration
    pub fn batch_size(&self) -> usize {
        match self.state {
            TunerState::Disabled { size }
            | TunerState::Benchmarking { size, .. }
            | TunerState::Stable { size } => size,
        }
    }

    pub fn is_auto(&self) -> bool {
        !matches!(self.state, TunerState::Disabled { .. })
    }

    pub fn is_benchmarking(&self) -> bool {
        matches!(self.state, TunerState::Benchmarking { .. })
    }

    /// Throw away any result and sweep again from batch size 1
    pub fn restart(&mut self) -> Option<TunerEvent> {
        if !self.is_auto() {
            return None;
        }
        self.samples.clear();
        self.lifetime = 0;
        self.state = TunerState::Benchmarking { size: 1, round: 1 };
        Some(TunerEvent::BenchmarkStarted)
    }

    /// Feed the measurement of the batch that just completed
    pub fn record_batch(&mut self, sample: BatchSample) -> Option<TunerEvent> {
        self.lifetime += sample.items;

        match self.state {
            TunerState::Disabled { .. } => None,
            TunerState::Stable { .. } => {
                if self.lifetime >= self.config.rerun_threshold {
                    self.restart()
                } else {
                    None
                }
            }
            TunerState::Benchmarking { size, round } => {
                self.samples.entry(size).or_default().push(sample.per_ms());

                if size < self.config.size_max {
                    self.state = TunerState::Benchmarking { size: size + 1, round };
                    None
                } else if round < self.config.round_max {
                    self.state = TunerState::Benchmarking { size: 1, round: round + 1 };
                    None
                } else {
                    let (size, per_ms) = self.best();
                    self.samples.clear();
                    self.lifetime = 0;
                    self.state = TunerState::Stable { size };
                    Some(TunerEvent::BenchmarkComplete { size, per_ms })
                }
            }
        }
    }

    /// Size with the highest mean throughput; the smallest size wins ties
    fn best(&self) -> (usize, f64) {
        let mut best_size = 1;
        let mut best_per_ms = 0.0;

        for (&size, samples) in &self.samples {
            if samples.is_empty() {
                continue;
            }
            let mean = samples.iter().sum::<f64>() / samples.len() as f64;
            if mean > best_per_ms {
                best_size = size;
                best_per_ms = mean;
            }
        }

        (best_size, best_per_ms)
    }
}
