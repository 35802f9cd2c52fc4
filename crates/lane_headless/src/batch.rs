//! Batch match runner for balance testing.
//!
//! Runs many matches with consecutive seeds in parallel using rayon and
//! folds their reports into a [`BatchSummary`].

use lane_core::factions::Faction;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::HeadlessError;
use crate::runner::{run_match, MatchReport, RunConfig};

/// Configuration for a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Number of matches.
    pub count: u32,
    /// Seed of the first match; match `i` uses `seed_start + i`.
    pub seed_start: u64,
    /// Worker threads (0 = rayon default).
    pub parallel: usize,
    /// Settings shared by every match.
    pub run: RunConfig,
}

impl BatchConfig {
    /// Create a batch of `count` matches with default settings.
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self {
            count,
            seed_start: 0,
            parallel: 0,
            run: RunConfig::default(),
        }
    }

    /// Set seed start.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }
}

/// Aggregate results of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Matches played.
    pub games: u32,
    /// Human victories.
    pub human_wins: u32,
    /// Undead victories.
    pub undead_wins: u32,
    /// Matches that hit the time cap.
    pub draws: u32,
    /// Mean game time in seconds.
    pub average_duration_seconds: f64,
    /// Human share of decided matches, 0 when none were decided.
    pub human_win_rate: f64,
}

impl BatchSummary {
    /// Summarize a set of match reports.
    #[must_use]
    pub fn from_reports(reports: &[MatchReport]) -> Self {
        let wins = |faction: Faction| {
            reports
                .iter()
                .filter(|r| r.winner == Some(faction))
                .count() as u32
        };
        let human_wins = wins(Faction::Human);
        let undead_wins = wins(Faction::Undead);
        let games = reports.len() as u32;
        let decided = human_wins + undead_wins;

        let average_duration_seconds = if reports.is_empty() {
            0.0
        } else {
            reports.iter().map(|r| r.duration_seconds).sum::<f64>() / f64::from(games)
        };
        let human_win_rate = if decided == 0 {
            0.0
        } else {
            f64::from(human_wins) / f64::from(decided)
        };

        Self {
            games,
            human_wins,
            undead_wins,
            draws: games - decided,
            average_duration_seconds,
            human_win_rate,
        }
    }
}

/// Run a batch of matches.
///
/// Reports come back in seed order regardless of scheduling.
///
/// # Errors
///
/// Returns an error if the worker pool cannot be built.
pub fn run_batch(config: &BatchConfig) -> Result<(Vec<MatchReport>, BatchSummary), HeadlessError> {
    info!(
        count = config.count,
        seed_start = config.seed_start,
        parallel = config.parallel,
        "Starting batch run"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallel)
        .build()?;
    let reports: Vec<MatchReport> = pool.install(|| {
        (0..config.count)
            .into_par_iter()
            .map(|i| run_match(&config.run.with_seed(config.seed_start.wrapping_add(u64::from(i)))))
            .collect()
    });

    let summary = BatchSummary::from_reports(&reports);
    info!(
        games = summary.games,
        human_wins = summary.human_wins,
        undead_wins = summary.undead_wins,
        draws = summary.draws,
        "Batch finished"
    );
    Ok((reports, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_core::config::MatchConfig;
    use lane_core::math::Fixed;

    fn report(seed: u64, winner: Option<Faction>, duration: f64) -> MatchReport {
        MatchReport {
            seed,
            winner,
            duration_seconds: duration,
            ticks: 0,
            factions: Vec::new(),
            state_hash: 0,
        }
    }

    #[test]
    fn test_summary_counts() {
        let summary = BatchSummary::from_reports(&[
            report(0, Some(Faction::Human), 100.0),
            report(1, Some(Faction::Undead), 200.0),
            report(2, Some(Faction::Human), 300.0),
            report(3, None, 400.0),
        ]);
        assert_eq!(summary.games, 4);
        assert_eq!(summary.human_wins, 2);
        assert_eq!(summary.undead_wins, 1);
        assert_eq!(summary.draws, 1);
        assert!((summary.average_duration_seconds - 250.0).abs() < f64::EPSILON);
        assert!((summary.human_win_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::from_reports(&[]);
        assert_eq!(summary.games, 0);
        assert_eq!(summary.average_duration_seconds, 0.0);
    }

    #[test]
    fn test_batch_is_seed_ordered_and_reproducible() {
        let mut config = BatchConfig::new(4).with_seed(10);
        config.parallel = 2;
        config.run = RunConfig {
            match_config: MatchConfig {
                max_delta: Fixed::ONE,
                ..MatchConfig::default()
            },
            max_minutes: 1,
            dt: Fixed::from_num(1) / 2,
            ..RunConfig::default()
        };

        let (first, summary) = run_batch(&config).unwrap();
        let (second, _) = run_batch(&config).unwrap();

        let seeds: Vec<u64> = first.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![10, 11, 12, 13]);
        assert_eq!(first, second);
        assert_eq!(summary.games, 4);
    }
}
