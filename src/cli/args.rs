//! CLI argument structures

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ErrorCode, LoadgridError, Result};
use crate::scheduler::SchedulerConfig;

/// Schedule load-test events and report on their results
#[derive(Parser)]
#[command(name = "loadgrid")]
#[command(about = "loadgrid - Checkpointed event scheduling and windowed result statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (.toml, .yaml or .json)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one scheduler invocation and print the result
    Schedule {
        #[command(flatten)]
        scheduler: SchedulerArgs,

        /// Checkpoint JSON from a previous self-event; omit to start a run
        #[arg(long, value_name = "JSON")]
        checkpoint: Option<String>,
    },

    /// Drive a whole run in this process, recording results into a store
    Run {
        #[command(flatten)]
        scheduler: SchedulerArgs,

        /// Result store: `memory` or a JSONL file path
        #[arg(long, value_name = "STORE")]
        store: Option<String>,

        /// Stop after processing this many events
        #[arg(long)]
        max_events: Option<u64>,
    },

    /// Query recorded results
    Results {
        /// Result store: `memory` or a JSONL file path
        #[arg(long, global = true, value_name = "STORE")]
        store: Option<String>,

        #[command(subcommand)]
        command: ResultsCommands,
    },
}

#[derive(Subcommand)]
pub enum ResultsCommands {
    /// Time series of smoothed per-event statistics
    Ts {
        /// Epoch milliseconds to start from
        #[arg(long)]
        from_time: Option<i64>,

        /// Unit of the report period (NANOSECONDS .. DAYS)
        #[arg(long)]
        time_unit: Option<String>,

        /// Report period as a multiple of the time unit
        #[arg(long)]
        report_period: Option<i64>,

        /// Report periods per smoothing window
        #[arg(long)]
        smoothing: Option<i64>,

        /// Include events excluded from charts
        #[arg(long)]
        all_events: bool,
    },

    /// Distinct event names
    Names,

    /// Individual event results
    Events {
        /// Event name, or "(All Events)"
        #[arg(long)]
        name: Option<String>,

        /// All, Success or Failed
        #[arg(long, default_value = "All")]
        filter: String,

        #[arg(long, default_value_t = 0)]
        skip: usize,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

/// Scheduler settings; each flag overrides the `[scheduler]` section
#[derive(Debug, Clone, Default, Args)]
pub struct SchedulerArgs {
    /// Name of the emitted work events
    #[arg(long, value_name = "NAME")]
    pub output_event: Option<String>,

    /// Milliseconds between consecutive work events
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Total work events for the run
    #[arg(long)]
    pub target: Option<u64>,

    /// Work events per invocation
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Name of the scheduler's own event
    #[arg(long, value_name = "NAME")]
    pub self_event: Option<String>,
}

impl SchedulerArgs {
    /// Merge the flags over `base`
    ///
    /// Without a base, the output event, interval and target are required.
    pub fn resolve(&self, base: Option<&SchedulerConfig>) -> Result<SchedulerConfig> {
        let mut config = match base {
            Some(base) => base.clone(),
            None => {
                let (Some(output), Some(interval), Some(target)) =
                    (&self.output_event, self.interval_ms, self.target)
                else {
                    return Err(LoadgridError::config_with_code(
                        ErrorCode::CONFIG_MISSING_REQUIRED,
                        "no [scheduler] section; pass --output-event, --interval-ms and --target",
                    ));
                };
                SchedulerConfig::new(output.clone(), Duration::from_millis(interval), target)
            }
        };

        if let Some(output) = &self.output_event {
            config.output_event_name = output.clone();
        }
        if let Some(interval) = self.interval_ms {
            config.time_between_events = Duration::from_millis(interval);
        }
        if let Some(target) = self.target {
            config.target_count = target;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(name) = &self.self_event {
            config.self_event_name = name.clone();
        }
        config.validate()?;
        Ok(config)
    }
}
