//! Headless match runner for policy-vs-policy playtesting and CI.
//!
//! Plays LegionAi-versus-LegionAi matches without rendering and emits
//! JSON reports:
//!
//! - **stdout**: JSON reports
//! - **stderr**: Logs (human-readable)
//!
//! # Example
//!
//! ```bash
//! # One match
//! cargo run -p lane_headless -- run --seed 7
//!
//! # 200 matches across all cores
//! cargo run -p lane_headless -- batch --count 200
//! ```

pub mod batch;
pub mod error;
pub mod runner;

pub use batch::{run_batch, BatchConfig, BatchSummary};
pub use error::HeadlessError;
pub use runner::{run_match, FactionReport, MatchReport, RunConfig};
