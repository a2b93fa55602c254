//! Vanity search engine

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use arkvanity_networks::{AddressOracle, DeriveError};

use crate::jobs::{CandidateOutcome, JobSet};
use crate::sink::ResultSink;
use crate::stats::{Progress, ProgressCadence, ProgressClock, SearchStats};
use crate::tuner::{AdaptiveTuner, BatchSample, TunerConfig, TunerEvent};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("No runnable job: every job needs a prefix and/or a suffix")]
    NoRunnableJobs,
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Address derivation failed: {0}")]
    Derivation(#[from] DeriveError),
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Matches to find before stopping (0 = run until cancelled)
    pub target_matches: u64,
    /// Candidates in flight per batch (0 = auto-tune)
    pub concurrency: usize,
    /// Worker threads (0 = one per CPU)
    pub workers: usize,
    /// Progress notification cadence
    pub progress: ProgressCadence,
    /// Auto-tuning limits
    pub tuner: TunerConfig,
    /// Keep a constant number of tasks in flight while running unbounded
    pub streaming: bool,
    /// Candidates after which streaming falls back to fixed batches (0 = never)
    pub streaming_cutoff: u64,
    /// Maximum candidates (0 = unlimited)
    pub max_candidates: u64,
    /// Maximum time in seconds (0 = unlimited)
    pub max_time_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target_matches: 1,
            concurrency: 0,
            workers: 0,
            progress: ProgressCadence::default(),
            tuner: TunerConfig::default(),
            streaming: true,
            streaming_cutoff: 10_000_000,
            max_candidates: 0,
            max_time_secs: 0,
        }
    }
}

/// How tasks are issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DispatchMode {
    /// Issue a batch, wait for all of it, repeat
    Batched,
    /// Replace each consumed task immediately, up to the batch size
    Streaming,
}

/// Summary of a finished search
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub candidates_checked: u64,
    pub matches_found: u64,
    pub elapsed_secs: f64,
    pub per_second: f64,
    /// Batch size in use when the search ended
    pub batch_size: usize,
    pub mode: DispatchMode,
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Checked {} passphrases within {:.2?}",
            self.candidates_checked,
            Duration::from_secs_f64(self.elapsed_secs)
        )
    }
}

/// What a worker task sends back
enum WorkerOutcome {
    Evaluated(CandidateOutcome),
    Failed(DeriveError),
}

/// Vanity search engine
pub struct VanitySearch {
    jobs: Arc<JobSet>,
    oracle: Arc<dyn AddressOracle>,
    config: SearchConfig,
    pool: rayon::ThreadPool,
    stats: Arc<SearchStats>,
}

impl VanitySearch {
    /// Create a new vanity search. Skipped jobs are reported and ignored; a
    /// job set with nothing left to run is an error.
    pub fn new(
        jobs: JobSet,
        oracle: Arc<dyn AddressOracle>,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        for network in jobs.networks() {
            for job in &network.jobs {
                if let Err(e) = job.validate() {
                    warn!("Skipping job on {}: {}", network.params.name, e);
                }
            }
        }
        if jobs.runnable_jobs() == 0 {
            return Err(SearchError::NoRunnableJobs);
        }

        let num_threads = if config.workers == 0 {
            num_cpus::get()
        } else {
            config.workers
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("arkvanity-worker-{}", i))
            .build()?;

        Ok(Self {
            jobs: Arc::new(jobs),
            oracle,
            config,
            pool,
            stats: SearchStats::new(),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn jobs(&self) -> &JobSet {
        &self.jobs
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Handle for cancelling the search from another thread
    pub fn stop_handle(&self) -> Arc<SearchStats> {
        Arc::clone(&self.stats)
    }

    /// Expected candidates until any job matches
    pub fn difficulty(&self) -> f64 {
        self.jobs.difficulty(self.oracle.valid_address_chars().len())
    }

    /// Run the search, printing progress to stderr
    pub fn run(&self, sink: &mut dyn ResultSink) -> Result<SearchReport, SearchError> {
        self.dispatch(sink, |progress| eprint!("\r\x1b[2K{}", progress), true)
    }

    /// Run the search with a callback for progress.
    ///
    /// Blocks until the target match count is reached, a limit is hit, the
    /// search is stopped, or the oracle fails. Tasks still in flight when it
    /// returns finish on their own and their results are dropped.
    pub fn run_with_callback<F>(
        &self,
        sink: &mut dyn ResultSink,
        callback: F,
    ) -> Result<SearchReport, SearchError>
    where
        F: FnMut(&Progress),
    {
        self.dispatch(sink, callback, false)
    }

    /// `inline_progress` means the callback leaves an unterminated line on
    /// stderr that log output must not be appended to
    fn dispatch<F>(
        &self,
        sink: &mut dyn ResultSink,
        callback: F,
        inline_progress: bool,
    ) -> Result<SearchReport, SearchError>
    where
        F: FnMut(&Progress),
    {
        let result = Dispatcher::new(self, sink, callback, inline_progress).run();
        self.stats.stop();
        result
    }

    fn spawn_task(&self, tx: &Sender<WorkerOutcome>) {
        let jobs = Arc::clone(&self.jobs);
        let oracle = Arc::clone(&self.oracle);
        let tx = tx.clone();

        self.pool.spawn(move || {
            // thread-local CSPRNG, never shared with a concurrently running task
            let mut rng = rand::thread_rng();
            let outcome = match jobs.evaluate_candidate(oracle.as_ref(), &mut rng) {
                Ok(outcome) => WorkerOutcome::Evaluated(outcome),
                Err(e) => WorkerOutcome::Failed(e),
            };
            // the receiver is gone once the search has finished
            let _ = tx.send(outcome);
        });
    }
}

enum Flow {
    Continue,
    Done,
}

/// Outcomes consumed since the tuner last got a sample
struct Window {
    size: usize,
    consumed: usize,
    start: Instant,
}

impl Window {
    fn new(size: usize) -> Self {
        Self {
            size,
            consumed: 0,
            start: Instant::now(),
        }
    }
}

/// State of one `run` call. Owns the tuner, so nothing here is ever touched
/// by a worker task.
struct Dispatcher<'a, F> {
    search: &'a VanitySearch,
    sink: &'a mut dyn ResultSink,
    on_progress: F,
    tuner: AdaptiveTuner,
    clock: ProgressClock,
    tx: Sender<WorkerOutcome>,
    rx: Receiver<WorkerOutcome>,
    mode: DispatchMode,
    in_flight: usize,
    window: Window,
    inline_progress: bool,
    /// A progress line is on stderr without a trailing newline
    line_open: bool,
}

impl<'a, F: FnMut(&Progress)> Dispatcher<'a, F> {
    fn new(
        search: &'a VanitySearch,
        sink: &'a mut dyn ResultSink,
        on_progress: F,
        inline_progress: bool,
    ) -> Self {
        let config = &search.config;
        let tuner = AdaptiveTuner::new(config.tuner, config.concurrency);
        let mode = if config.streaming && config.target_matches == 0 {
            DispatchMode::Streaming
        } else {
            DispatchMode::Batched
        };
        let (tx, rx) = unbounded();
        let window = Window::new(tuner.batch_size());

        Self {
            search,
            sink,
            on_progress,
            tuner,
            clock: ProgressClock::new(config.progress),
            tx,
            rx,
            mode,
            in_flight: 0,
            window,
            inline_progress,
            line_open: false,
        }
    }

    fn run(mut self) -> Result<SearchReport, SearchError> {
        if self.tuner.is_benchmarking() {
            info!("Benchmarking...");
        }
        debug!("Dispatching in {:?} mode", self.mode);

        loop {
            if self.limits_reached() {
                break;
            }
            self.refill();

            if let Flow::Done = self.receive()? {
                break;
            }
            if self.window.consumed >= self.window.size {
                if let Flow::Done = self.finish_window()? {
                    break;
                }
            }
        }

        Ok(self.report())
    }

    fn limits_reached(&self) -> bool {
        let stats = &self.search.stats;
        let config = &self.search.config;

        !stats.is_running()
            || (config.max_candidates > 0 && stats.total_checked() >= config.max_candidates)
            || (config.max_time_secs > 0 && stats.elapsed().as_secs() >= config.max_time_secs)
    }

    /// Issue tasks up to the in-flight budget
    fn refill(&mut self) {
        let budget = self.tuner.batch_size();
        let count = match self.mode {
            // batches are a barrier: the next one starts once the last result is in
            DispatchMode::Batched if self.in_flight > 0 => 0,
            DispatchMode::Batched => {
                self.window = Window::new(budget);
                budget
            }
            DispatchMode::Streaming => budget.saturating_sub(self.in_flight),
        };

        for _ in 0..count {
            self.search.spawn_task(&self.tx);
        }
        self.in_flight += count;
    }

    /// Consume one outcome, forwarding its matches to the sink
    fn receive(&mut self) -> Result<Flow, SearchError> {
        // we hold a sender, so this only fails if nothing was ever issued
        let outcome = match self.rx.recv() {
            Ok(outcome) => outcome,
            Err(_) => return Ok(Flow::Done),
        };
        self.in_flight -= 1;
        self.window.consumed += 1;

        let stats = &self.search.stats;
        stats.add_checked(1);

        let outcome = match outcome {
            WorkerOutcome::Evaluated(outcome) => outcome,
            WorkerOutcome::Failed(e) => {
                stats.stop();
                return Err(SearchError::Derivation(e));
            }
        };

        let target = self.search.config.target_matches;
        let mut flow = Flow::Continue;
        for found in outcome.into_matches() {
            self.sink.emit(&found);
            if stats.add_match() >= target && target > 0 {
                flow = Flow::Done;
                break;
            }
        }

        if self.clock.tick(stats.total_checked()) {
            (self.on_progress)(&stats.progress());
            self.line_open = self.inline_progress;
        }

        Ok(flow)
    }

    /// Hand the finished window to the tuner and start the next one
    fn finish_window(&mut self) -> Result<Flow, SearchError> {
        let sample = BatchSample {
            batch_size: self.window.size,
            elapsed: self.window.start.elapsed(),
            items: self.window.consumed as u64,
        };
        debug!(
            "Batch {} took {:?} ({:.3} per ms)",
            sample.batch_size,
            sample.elapsed,
            sample.per_ms()
        );
        if let Some(event) = self.tuner.record_batch(sample) {
            self.announce(&event);
        }

        let cutoff = self.search.config.streaming_cutoff;
        let checked = self.search.stats.total_checked();
        if self.mode == DispatchMode::Streaming && cutoff > 0 && checked >= cutoff {
            self.break_progress_line();
            info!(
                "Checked {} passphrases, switching from streaming to fixed batches",
                checked
            );
            self.mode = DispatchMode::Batched;
            if let Flow::Done = self.drain(0)? {
                return Ok(Flow::Done);
            }
            if let Some(event) = self.tuner.restart() {
                self.announce(&event);
            }
        }

        // a smaller size must not be timed while the larger one's tasks still run
        let budget = self.tuner.batch_size();
        if self.mode == DispatchMode::Streaming && self.in_flight > budget {
            if let Flow::Done = self.drain(budget)? {
                return Ok(Flow::Done);
            }
        }

        self.window = Window::new(budget);
        Ok(Flow::Continue)
    }

    /// Wait until at most `limit` tasks are in flight
    fn drain(&mut self, limit: usize) -> Result<Flow, SearchError> {
        while self.in_flight > limit {
            if let Flow::Done = self.receive()? {
                return Ok(Flow::Done);
            }
        }
        Ok(Flow::Continue)
    }

    fn announce(&mut self, event: &TunerEvent) {
        self.break_progress_line();
        match *event {
            TunerEvent::BenchmarkStarted => info!("Benchmarking..."),
            TunerEvent::BenchmarkComplete { size, per_ms } => {
                info!("Batch {} processed {} per ms", size, per_ms as u64);
                info!("Benchmark complete. Threads set to {}", size);
            }
        }
    }

    /// Move off an open progress line. Returns whether a newline was written.
    fn break_progress_line(&mut self) -> bool {
        if !self.line_open {
            return false;
        }
        eprintln!();
        self.line_open = false;
        true
    }

    fn report(&self) -> SearchReport {
        let stats = &self.search.stats;
        SearchReport {
            candidates_checked: stats.total_checked(),
            matches_found: stats.total_matches(),
            elapsed_secs: stats.elapsed().as_secs_f64(),
            per_second: stats.per_second(),
            batch_size: self.tuner.batch_size(),
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use arkvanity_crypto::{MnemonicError, RngCore};
    use arkvanity_networks::{get_network, ArkOracle, NetworkParams};
    use arkvanity_pattern::JobSpec;

    use crate::jobs::{Match, NetworkSpec};

    /// The first `matching` candidates derive to "AMATCH<n>", the rest do not
    /// match. Candidate number `fail_at` fails.
    struct ScriptedOracle {
        calls: AtomicUsize,
        matching: usize,
        fail_at: Option<usize>,
    }

    impl ScriptedOracle {
        fn new(matching: usize, fail_at: Option<usize>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                matching,
                fail_at,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AddressOracle for ScriptedOracle {
        fn generate_passphrase(&self, _rng: &mut dyn RngCore) -> Result<String, DeriveError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if Some(n) == self.fail_at {
                return Err(DeriveError::Passphrase(MnemonicError::InvalidEntropy(0)));
            }
            Ok(n.to_string())
        }

        fn derive_address(&self, passphrase: &str, _network: &NetworkParams) -> Result<String, DeriveError> {
            let n: usize = passphrase.parse().unwrap_or(usize::MAX);
            if n <= self.matching {
                Ok(format!("AMATCH{}", n))
            } else {
                Ok(format!("ANOPE{}", n))
            }
        }

        fn export_key(&self, passphrase: &str, _network: &NetworkParams) -> Result<String, DeriveError> {
            Ok(format!("wif{}", passphrase))
        }

        fn valid_address_chars(&self) -> &'static str {
            arkvanity_crypto::encoding::BASE58_ALPHABET
        }
    }

    fn jobs(prefix: &str) -> JobSet {
        JobSet::new(vec![NetworkSpec::new(
            get_network("mainnet").unwrap(),
            vec![JobSpec::prefix(prefix)],
        )])
    }

    fn config() -> SearchConfig {
        SearchConfig {
            workers: 2,
            progress: ProgressCadence::Every(0),
            ..Default::default()
        }
    }

    #[test]
    fn test_stops_exactly_at_target() {
        let oracle = ScriptedOracle::new(3, None);
        let search = VanitySearch::new(
            jobs("AMATCH"),
            oracle.clone(),
            SearchConfig {
                target_matches: 3,
                concurrency: 2,
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();

        assert_eq!(found.len(), 3);
        assert_eq!(report.matches_found, 3);
        assert_eq!(report.mode, DispatchMode::Batched);
        // two batches of two: nothing beyond the second batch is ever issued
        assert!(report.candidates_checked <= 4);
        assert!(oracle.calls() <= 4);

        let mut addresses: Vec<String> = found.into_iter().map(|m| m.address).collect();
        addresses.sort();
        assert_eq!(addresses, vec!["AMATCH1", "AMATCH2", "AMATCH3"]);
    }

    #[test]
    fn test_target_reached_while_benchmarking() {
        let oracle = ScriptedOracle::new(3, None);
        let search = VanitySearch::new(
            jobs("AMATCH"),
            oracle.clone(),
            SearchConfig {
                target_matches: 3,
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();

        // batch sizes 1 then 2 cover the three matching candidates
        assert_eq!(report.matches_found, 3);
        assert_eq!(report.candidates_checked, 3);
        assert_eq!(report.batch_size, 2);
    }

    #[test]
    fn test_checked_count_excludes_matches() {
        let oracle = ScriptedOracle::new(1, None);
        let search = VanitySearch::new(
            jobs("AMATCH"),
            oracle,
            SearchConfig {
                target_matches: 1,
                concurrency: 1,
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();
        assert_eq!(report.candidates_checked, 1);
        assert_eq!(report.matches_found, 1);
        assert_eq!(report.to_string().split(" within ").next(), Some("Checked 1 passphrases"));
    }

    #[test]
    fn test_derivation_error_is_fatal() {
        let oracle = ScriptedOracle::new(0, Some(5));
        let search = VanitySearch::new(
            jobs("AMATCH"),
            oracle,
            SearchConfig {
                target_matches: 1,
                concurrency: 3,
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let result = search.run_with_callback(&mut found, |_| {});
        assert!(matches!(result, Err(SearchError::Derivation(_))));
        assert!(found.is_empty());
        assert!(!search.stats().is_running());
    }

    #[test]
    fn test_no_runnable_jobs() {
        let set = JobSet::new(vec![NetworkSpec::new(
            get_network("mainnet").unwrap(),
            vec![JobSpec::new("", "", true, false)],
        )]);
        let result = VanitySearch::new(set, ScriptedOracle::new(0, None), config());
        assert!(matches!(result, Err(SearchError::NoRunnableJobs)));
    }

    #[test]
    fn test_invalid_job_skipped_others_run() {
        let set = JobSet::new(vec![NetworkSpec::new(
            get_network("mainnet").unwrap(),
            vec![JobSpec::new("", "", false, false), JobSpec::prefix("AMATCH")],
        )]);
        let search = VanitySearch::new(
            set,
            ScriptedOracle::new(1, None),
            SearchConfig {
                concurrency: 1,
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();
        assert_eq!(report.matches_found, 1);
    }

    #[test]
    fn test_unbounded_streams_until_limit() {
        let search = VanitySearch::new(
            jobs("AMATCH"),
            ScriptedOracle::new(0, None),
            SearchConfig {
                target_matches: 0,
                concurrency: 8,
                max_candidates: 200,
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();
        assert_eq!(report.mode, DispatchMode::Streaming);
        assert_eq!(report.candidates_checked, 200);
        assert!(found.is_empty());
    }

    #[test]
    fn test_streaming_cutoff_falls_back_to_batches() {
        let search = VanitySearch::new(
            jobs("AMATCH"),
            ScriptedOracle::new(0, None),
            SearchConfig {
                target_matches: 0,
                streaming_cutoff: 20,
                max_candidates: 300,
                tuner: TunerConfig {
                    size_max: 4,
                    round_max: 1,
                    rerun_threshold: 1_000,
                },
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();
        assert_eq!(report.mode, DispatchMode::Batched);
        assert!(report.candidates_checked >= 300);
        assert!((1..=4).contains(&report.batch_size));
    }

    #[test]
    fn test_streaming_disabled_by_config() {
        let search = VanitySearch::new(
            jobs("AMATCH"),
            ScriptedOracle::new(0, None),
            SearchConfig {
                target_matches: 0,
                streaming: false,
                concurrency: 4,
                max_candidates: 40,
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();
        assert_eq!(report.mode, DispatchMode::Batched);
        assert_eq!(report.candidates_checked, 40);
    }

    #[test]
    fn test_stop_handle_cancels() {
        let search = VanitySearch::new(
            jobs("AMATCH"),
            ScriptedOracle::new(0, None),
            SearchConfig {
                target_matches: 0,
                ..config()
            },
        )
        .unwrap();

        let handle = search.stop_handle();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            handle.stop();
        });

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();
        stopper.join().unwrap();

        assert!(report.candidates_checked > 0);
        assert_eq!(report.matches_found, 0);
    }

    #[test]
    fn test_progress_on_count_cadence() {
        let search = VanitySearch::new(
            jobs("AMATCH"),
            ScriptedOracle::new(0, None),
            SearchConfig {
                target_matches: 0,
                concurrency: 5,
                max_candidates: 50,
                progress: ProgressCadence::Every(10),
                ..config()
            },
        )
        .unwrap();

        let mut seen = Vec::new();
        let mut found: Vec<Match> = Vec::new();
        search
            .run_with_callback(&mut found, |progress| seen.push(progress.checked))
            .unwrap();
        assert_eq!(seen, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_real_oracle_finds_easy_prefix() {
        // every mainnet address starts with 'A'
        let search = VanitySearch::new(
            jobs("A"),
            Arc::new(ArkOracle::default()),
            SearchConfig {
                target_matches: 2,
                concurrency: 2,
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();
        assert_eq!(report.matches_found, 2);
        for m in &found {
            assert!(m.address.starts_with('A'));
            assert_eq!(m.passphrase.split(' ').count(), 12);
        }
    }

    /// Every candidate takes a fixed wall-clock time and never matches
    struct SlowOracle {
        delay: Duration,
    }

    impl AddressOracle for SlowOracle {
        fn generate_passphrase(&self, _rng: &mut dyn RngCore) -> Result<String, DeriveError> {
            thread::sleep(self.delay);
            Ok("slow".to_string())
        }

        fn derive_address(&self, _passphrase: &str, _network: &NetworkParams) -> Result<String, DeriveError> {
            Ok("ANOPE".to_string())
        }

        fn export_key(&self, passphrase: &str, _network: &NetworkParams) -> Result<String, DeriveError> {
            Ok(format!("wif{}", passphrase))
        }

        fn valid_address_chars(&self) -> &'static str {
            arkvanity_crypto::encoding::BASE58_ALPHABET
        }
    }

    fn tuned_size(streaming: bool) -> usize {
        // 16 workers and at most 8 tasks in flight: throughput grows with size
        let search = VanitySearch::new(
            jobs("AMATCH"),
            Arc::new(SlowOracle {
                delay: Duration::from_millis(5),
            }),
            SearchConfig {
                target_matches: 0,
                workers: 16,
                streaming,
                max_candidates: 200,
                tuner: TunerConfig {
                    size_max: 8,
                    round_max: 3,
                    rerun_threshold: u64::MAX,
                },
                ..config()
            },
        )
        .unwrap();

        let mut found: Vec<Match> = Vec::new();
        let report = search.run_with_callback(&mut found, |_| {}).unwrap();
        let expected = if streaming {
            DispatchMode::Streaming
        } else {
            DispatchMode::Batched
        };
        assert_eq!(report.mode, expected);
        report.batch_size
    }

    #[test]
    fn test_streaming_tunes_to_largest_useful_size() {
        let size = tuned_size(true);
        assert!(size >= 6, "streaming chose {size}");
    }

    #[test]
    fn test_batched_tunes_to_largest_useful_size() {
        let size = tuned_size(false);
        assert!(size >= 6, "batched chose {size}");
    }

    #[test]
    fn test_tuner_lines_start_on_fresh_line() {
        let search = VanitySearch::new(jobs("AMATCH"), ScriptedOracle::new(0, None), config()).unwrap();
        let mut found: Vec<Match> = Vec::new();

        let mut inline = Dispatcher::new(&search, &mut found, |_: &Progress| {}, true);
        assert!(!inline.break_progress_line());
        inline.line_open = true;
        assert!(inline.break_progress_line());
        assert!(!inline.break_progress_line());
    }

    #[test]
    fn test_callback_progress_leaves_no_open_line() {
        let search = VanitySearch::new(
            jobs("AMATCH"),
            ScriptedOracle::new(0, None),
            SearchConfig {
                progress: ProgressCadence::Every(1),
                ..config()
            },
        )
        .unwrap();
        let mut found: Vec<Match> = Vec::new();

        let mut dispatcher = Dispatcher::new(&search, &mut found, |_: &Progress| {}, false);
        dispatcher.refill();
        assert!(matches!(dispatcher.receive(), Ok(Flow::Continue)));
        assert!(!dispatcher.line_open);
    }

    #[test]
    fn test_difficulty() {
        let search = VanitySearch::new(jobs("AB"), ScriptedOracle::new(0, None), config()).unwrap();
        assert!((search.difficulty() - 3364.0).abs() < 1e-6);
    }
}
