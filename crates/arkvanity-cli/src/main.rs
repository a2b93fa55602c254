//! ArkVanity CLI
//!
//! Vanity passphrase/address generator for ARK-style networks.

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use arkvanity_core::{
    all_networks, format_difficulty, get_network, ArkOracle, ConsoleSink, FileSink, JobSet, JobSpec,
    Match, NetworkParams, NetworkSpec, ProgressCadence, ResultSink, SearchConfig, SearchError, SearchReport,
    TunerConfig, VanitySearch, DEFAULT_ENTROPY_BITS,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::FileConfig;

#[derive(Parser)]
#[command(name = "arkvanity")]
#[command(author = "ArkVanity Team")]
#[command(version = "0.1.0")]
#[command(about = "Vanity address generator for ARK-style passphrase wallets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for vanity addresses
    Generate(GenerateArgs),

    /// List built-in networks
    Networks,

    /// Run the batch-size benchmark without searching for anything
    Benchmark {
        /// Duration in seconds
        #[arg(short, long, default_value = "30")]
        duration: u64,

        /// Worker threads (0 = one per CPU)
        #[arg(long, default_value = "0")]
        workers: usize,

        /// Largest batch size to try
        #[arg(long, default_value = "500")]
        size_max: usize,

        /// Sweeps averaged before choosing
        #[arg(long, default_value = "3")]
        rounds: u32,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Address prefix to search for
    #[arg(short, long, default_value = "")]
    prefix: String,

    /// Address suffix to search for
    #[arg(short, long, default_value = "")]
    suffix: String,

    /// Require both prefix and suffix to match
    #[arg(long, alias = "ps")]
    prefix_and_suffix: bool,

    /// Case insensitive search
    #[arg(short = 'i', long)]
    case_insensitive: bool,

    /// Passphrase entropy in bits (128-256, multiple of 32)
    #[arg(short, long, default_value_t = DEFAULT_ENTROPY_BITS)]
    entropy: usize,

    /// Built-in network preset (mainnet, devnet)
    #[arg(long, default_value = "mainnet")]
    network: String,

    /// Address version byte, overrides the preset
    #[arg(short, long)]
    address_format: Option<u8>,

    /// WIF version byte, overrides the preset
    #[arg(short, long)]
    wif: Option<u8>,

    /// Candidates per batch (0 = benchmark and pick automatically)
    #[arg(short, long, default_value = "0")]
    threads: usize,

    /// Worker threads (0 = one per CPU)
    #[arg(long, default_value = "0")]
    workers: usize,

    /// Matches to find (0 = run until interrupted)
    #[arg(short, long, default_value = "1")]
    count: u64,

    /// Report progress every N passphrases (0 = on a timer)
    #[arg(short, long, default_value = "0")]
    milestone: u64,

    /// Progress timer in milliseconds
    #[arg(long, default_value = "1000")]
    progress_ms: u64,

    /// File that matches are appended to (empty = none)
    #[arg(short, long, default_value = "results.txt")]
    output: String,

    /// Maximum passphrases to check (0 = unlimited)
    #[arg(long, default_value = "0")]
    max_candidates: u64,

    /// Maximum time in seconds (0 = unlimited)
    #[arg(long, default_value = "0")]
    max_time: u64,

    /// Always dispatch in fixed batches, even when running unbounded
    #[arg(long)]
    no_streaming: bool,

    /// JSON config file with networks and jobs, replaces the job flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args)?,
        Commands::Networks => cmd_networks(),
        Commands::Benchmark {
            duration,
            workers,
            size_max,
            rounds,
        } => cmd_benchmark(duration, workers, size_max, rounds)?,
    }

    Ok(())
}

/// Everything `generate` needs once flags and config file are merged
struct GeneratePlan {
    networks: Vec<NetworkSpec>,
    entropy: usize,
    output: Option<PathBuf>,
    search: SearchConfig,
}

impl GenerateArgs {
    fn plan(&self) -> Result<GeneratePlan> {
        let file = match &self.config {
            Some(path) => Some(FileConfig::load(path)?),
            None => None,
        };

        let networks = match &file {
            Some(file) => file.network_specs()?,
            None => vec![NetworkSpec::new(
                self.network_params()?,
                vec![JobSpec::new(
                    self.prefix.as_str(),
                    self.suffix.as_str(),
                    self.prefix_and_suffix,
                    self.case_insensitive,
                )],
            )],
        };

        let entropy = file.as_ref().and_then(|f| f.entropy).unwrap_or(self.entropy);
        let count = file.as_ref().and_then(|f| f.count).unwrap_or(self.count);
        let threads = file.as_ref().and_then(|f| f.threads).unwrap_or(self.threads);
        let output = file
            .as_ref()
            .and_then(|f| f.output.clone())
            .unwrap_or_else(|| self.output.clone());

        let progress = if self.milestone > 0 {
            ProgressCadence::Every(self.milestone)
        } else {
            ProgressCadence::Interval(Duration::from_millis(self.progress_ms))
        };

        Ok(GeneratePlan {
            networks,
            entropy,
            output: (!output.is_empty()).then(|| PathBuf::from(output)),
            search: SearchConfig {
                target_matches: count,
                concurrency: threads,
                workers: self.workers,
                progress,
                streaming: !self.no_streaming,
                max_candidates: self.max_candidates,
                max_time_secs: self.max_time,
                ..Default::default()
            },
        })
    }

    fn network_params(&self) -> Result<NetworkParams> {
        let mut params = get_network(&self.network)
            .ok_or_else(|| anyhow!("Unknown network: {}", self.network))?;
        if let Some(version) = self.address_format {
            params.address_version = version;
        }
        if let Some(wif) = self.wif {
            params.wif = wif;
        }
        Ok(params)
    }
}

/// Console output, optional results file, and an in-memory copy for `--json`
struct CliSink {
    console: Option<ConsoleSink>,
    file: Option<FileSink>,
    found: Vec<Match>,
}

impl ResultSink for CliSink {
    fn emit(&mut self, found: &Match) {
        if let Some(console) = &mut self.console {
            console.emit(found);
        }
        if let Some(file) = &mut self.file {
            file.emit(found);
        }
        self.found.emit(found);
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a SearchReport,
    matches: &'a [Match],
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let plan = args.plan()?;

    let oracle = ArkOracle::new(plan.entropy)
        .map_err(|_| anyhow!("Entropy value must be between 128 and 256 and a multiple of 32"))?;

    let jobs = JobSet::new(plan.networks);
    let search = VanitySearch::new(jobs, Arc::new(oracle), plan.search).map_err(|e| match e {
        SearchError::NoRunnableJobs => anyhow!("Must pass prefix and/or suffix"),
        other => other.into(),
    })?;

    if !args.json {
        eprintln!("ArkVanity v0.1.0");
        for network in search.jobs().networks() {
            for job in network.jobs.iter().filter(|job| !job.is_skipped()) {
                eprintln!("Looking for Address with {} on {}", job.describe(), network.params);
            }
        }
        eprintln!("Difficulty: {}", format_difficulty(search.difficulty()));
        if let Some(path) = &plan.output {
            eprintln!("Results: {}", path.display());
        }
        eprintln!();
    }

    let handle = search.stop_handle();
    ctrlc::set_handler(move || handle.stop()).context("Could not install Ctrl+C handler")?;

    let mut sink = CliSink {
        console: (!args.json).then_some(ConsoleSink),
        file: plan.output.map(FileSink::new),
        found: Vec::new(),
    };

    let report = if args.json {
        search.run_with_callback(&mut sink, |_| {})?
    } else {
        search.run(&mut sink)?
    };

    if args.json {
        let output = JsonOutput {
            report: &report,
            matches: &sink.found,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!();
        eprintln!("{}", report);
    }

    Ok(())
}

fn cmd_networks() {
    println!("Built-in Networks:");
    println!("{:-<40}", "");
    println!("{:<10} {:<16} {}", "Name", "Address Version", "WIF");
    println!("{:-<40}", "");

    for network in all_networks() {
        println!(
            "{:<10} {:<16} {}",
            network.name, network.address_version, network.wif
        );
    }
}

fn cmd_benchmark(duration_secs: u64, workers: usize, size_max: usize, rounds: u32) -> Result<()> {
    let network = all_networks()
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No built-in network"))?;

    eprintln!("Benchmarking {} for {} seconds...", network.name, duration_secs);
    eprintln!();

    // '0' is not a base58 character, so nothing ever matches
    let jobs = JobSet::new(vec![NetworkSpec::new(network, vec![JobSpec::prefix("0")])]);
    let config = SearchConfig {
        target_matches: 0,
        concurrency: 0,
        workers,
        streaming: false,
        max_time_secs: duration_secs,
        tuner: TunerConfig {
            size_max,
            round_max: rounds,
            ..Default::default()
        },
        ..Default::default()
    };

    let search = VanitySearch::new(jobs, Arc::new(ArkOracle::default()), config)?;
    let handle = search.stop_handle();
    ctrlc::set_handler(move || handle.stop()).context("Could not install Ctrl+C handler")?;

    let mut sink: Vec<Match> = Vec::new();
    let report = search.run(&mut sink)?;

    eprintln!();
    eprintln!("{} [{:.0} p/s]", report, report.per_second);
    eprintln!("Batch size in use: {}", report.batch_size);

    Ok(())
}
