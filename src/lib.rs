//! # loadgrid
//!
//! Execution core of a distributed load-testing harness: a checkpointed
//! event scheduler that spreads millions of time-stamped work events over
//! any number of worker invocations, and a windowed aggregator that turns
//! the recorded results into smoothed per-event statistics.
//!
//! ## Usage
//!
//! ```bash
//! loadgrid run --output-event login --interval-ms 10 --target 5000 --store results.jsonl
//! loadgrid results --store results.jsonl ts --time-unit seconds --smoothing 5
//! ```
//!
//! ## Modules
//!
//! - `events` - Event and result value types and the processor boundary
//! - `scheduler` - Resumable, checkpointed generator of work events
//! - `results` - Stored result records, streaming statistics and mergeable aggregates
//! - `store` - Result store contract with in-memory and JSONL backends
//! - `aggregator` - Pull-based stream of time-windowed statistics
//! - `query` - Parameter validation and row shaping for dashboards
//! - `driver` - In-process executor for local runs and tests
//! - `config` - Configuration file loading and environment overrides
//! - `app` - Logging setup and fatal error reporting
//! - `cli` - Command-line interface
pub mod aggregator;
pub mod app;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod query;
pub mod results;
pub mod scheduler;
pub mod store;

pub use error::{LoadgridError, Result};
