//! Job set: every match rule evaluated against each candidate

use std::collections::HashSet;

use arkvanity_crypto::RngCore;
use arkvanity_networks::{AddressOracle, DeriveError, NetworkParams};
use arkvanity_pattern::{calculate_difficulty, JobSpec};
use serde::{Deserialize, Serialize};

/// Jobs evaluated under one set of address-derivation parameters
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSpec {
    pub params: NetworkParams,
    pub jobs: Vec<JobSpec>,
}

impl NetworkSpec {
    pub fn new(params: NetworkParams, jobs: Vec<JobSpec>) -> Self {
        Self { params, jobs }
    }

    pub fn runnable_jobs(&self) -> usize {
        self.jobs.iter().filter(|job| !job.is_skipped()).count()
    }
}

/// A confirmed match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Network the address was derived under
    pub network: String,
    pub address: String,
    pub passphrase: String,
    /// Private key in the network's WIF
    pub wif: String,
}

/// Verdict for one (candidate, job) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    NoMatch,
    Match(Match),
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match(_))
    }
}

/// Everything one worker task learned about its candidate
#[derive(Debug, Clone, Default)]
pub struct CandidateOutcome {
    /// One entry per job, in job-set order
    pub results: Vec<MatchResult>,
}

impl CandidateOutcome {
    pub fn into_matches(self) -> impl Iterator<Item = Match> {
        self.results.into_iter().filter_map(|result| match result {
            MatchResult::Match(found) => Some(found),
            MatchResult::NoMatch => None,
        })
    }
}

/// Ordered collection of networks and their jobs. Immutable once built.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobSet {
    networks: Vec<NetworkSpec>,
}

impl JobSet {
    pub fn new(networks: Vec<NetworkSpec>) -> Self {
        Self { networks }
    }

    pub fn networks(&self) -> &[NetworkSpec] {
        &self.networks
    }

    pub fn total_jobs(&self) -> usize {
        self.networks.iter().map(|network| network.jobs.len()).sum()
    }

    pub fn runnable_jobs(&self) -> usize {
        self.networks.iter().map(NetworkSpec::runnable_jobs).sum()
    }

    /// Expected candidates until any runnable job matches
    pub fn difficulty(&self, alphabet_size: usize) -> f64 {
        let rate: f64 = self
            .networks
            .iter()
            .flat_map(|network| network.jobs.iter())
            .filter(|job| !job.is_skipped())
            .map(|job| 1.0 / calculate_difficulty(job, alphabet_size))
            .sum();
        if rate > 0.0 {
            1.0 / rate
        } else {
            f64::INFINITY
        }
    }

    /// Generate one candidate and evaluate it against every job.
    ///
    /// One passphrase is drawn per call and derived under each network. An
    /// address that already matched an earlier job of this candidate is
    /// reported as `NoMatch` for later jobs.
    pub fn evaluate_candidate(
        &self,
        oracle: &dyn AddressOracle,
        rng: &mut dyn RngCore,
    ) -> Result<CandidateOutcome, DeriveError> {
        let passphrase = oracle.generate_passphrase(rng)?;
        let mut results = Vec::with_capacity(self.total_jobs());
        let mut seen: HashSet<String> = HashSet::new();

        for network in &self.networks {
            if network.runnable_jobs() == 0 {
                results.extend(network.jobs.iter().map(|_| MatchResult::NoMatch));
                continue;
            }

            let address = oracle.derive_address(&passphrase, &network.params)?;
            for job in &network.jobs {
                if !job.evaluate(&address) || seen.contains(&address) {
                    results.push(MatchResult::NoMatch);
                    continue;
                }

                seen.insert(address.clone());
                results.push(MatchResult::Match(Match {
                    network: network.params.name.clone(),
                    address: address.clone(),
                    passphrase: passphrase.clone(),
                    wif: oracle.export_key(&passphrase, &network.params)?,
                }));
            }
        }

        Ok(CandidateOutcome { results })
    }
}
