//! CLI command implementations

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cli::args::{ResultsCommands, SchedulerArgs};
use crate::config::LoadgridConfig;
use crate::driver::{scheduler_registry, LocalExecutor, ProcessorRegistry};
use crate::error::LoadgridError;
use crate::events::Event;
use crate::query::{QueryService, TimeSeriesParams, ALL_EVENT_NAMES};
use crate::results::EventResultFilter;
use crate::scheduler::{failure_result, EventScheduler};
use crate::store::{open_store, StoreConfig};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{json}");
    Ok(())
}

fn format_millis(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

fn store_config(config: &LoadgridConfig, flag: Option<&str>) -> StoreConfig {
    flag.map(StoreConfig::from_override)
        .unwrap_or_else(|| config.store.clone())
}

/// One scheduler invocation; prints the resulting `EventResult`
pub async fn run_schedule(
    config: &LoadgridConfig,
    args: &SchedulerArgs,
    checkpoint: Option<&str>,
) -> Result<()> {
    let scheduler = EventScheduler::new(args.resolve(config.scheduler.as_ref())?)?;

    let event = match checkpoint {
        None => scheduler.start_event(),
        Some(raw) => {
            let payload: Value = serde_json::from_str(raw).map_err(|e| {
                LoadgridError::invalid_argument("checkpoint", format!("not valid JSON: {e}"))
            })?;
            let start = scheduler.start_event();
            Event::new(start.name(), start.scheduled_time(), payload)
        }
    };
    debug!("Invoking scheduler with {:?}", event);

    match scheduler.try_process(&event) {
        Ok(result) => print_json(&result),
        Err(e) => {
            print_json(&failure_result(&e))?;
            Err(e.into())
        }
    }
}

/// Drive a full run through the local executor
pub async fn run_local(
    config: &LoadgridConfig,
    args: &SchedulerArgs,
    store: Option<&str>,
    max_events: Option<u64>,
) -> Result<()> {
    let scheduler = Arc::new(EventScheduler::new(args.resolve(config.scheduler.as_ref())?)?);
    let start = scheduler.start_event();
    let store = open_store(&store_config(config, store)).map_err(LoadgridError::from)?;

    info!(
        "Scheduling {} '{}' events starting {}",
        scheduler.config().target_count,
        scheduler.config().output_event_name,
        format_millis(start.scheduled_time())
    );

    let registry = scheduler_registry(scheduler, ProcessorRegistry::new());
    let mut executor = LocalExecutor::new(registry, store);
    if let Some(max) = max_events {
        executor = executor.with_max_events(max);
    }

    let summary = executor.run([start]).await?;
    print_json(&summary)
}

/// Query surface over a store
pub async fn run_results(
    config: &LoadgridConfig,
    store: Option<&str>,
    command: ResultsCommands,
) -> Result<()> {
    let store = open_store(&store_config(config, store)).map_err(LoadgridError::from)?;
    let service = QueryService::new(store);

    match command {
        ResultsCommands::Ts {
            from_time,
            time_unit,
            report_period,
            smoothing,
            all_events,
        } => {
            let defaults = &config.query;
            let params = TimeSeriesParams {
                from_time: from_time.unwrap_or(defaults.from_time),
                time_unit: time_unit.unwrap_or_else(|| defaults.time_unit.clone()),
                report_period: report_period.unwrap_or(defaults.report_period),
                smoothing: smoothing.unwrap_or(defaults.smoothing),
                chart_only: defaults.chart_only && !all_events,
            };
            print_json(&service.time_series(&params).await?)
        }
        ResultsCommands::Names => print_json(&service.event_names().await?),
        ResultsCommands::Events {
            name,
            filter,
            skip,
            limit,
        } => {
            let filter: EventResultFilter = filter.parse()?;
            let name = name.as_deref().unwrap_or(ALL_EVENT_NAMES);
            print_json(&service.event_results(filter, name, skip, limit).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "1970-01-01T00:00:00+00:00");
        assert_eq!(format_millis(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn test_store_flag_wins() {
        let config = LoadgridConfig::new();
        assert_eq!(store_config(&config, Some("memory")), StoreConfig::memory());
        assert_eq!(store_config(&config, None), config.store);
    }

    #[tokio::test]
    async fn test_schedule_rejects_foreign_checkpoint() {
        let args = SchedulerArgs {
            output_event: Some("login".into()),
            interval_ms: Some(10),
            target: Some(5),
            ..Default::default()
        };
        let err = run_schedule(&LoadgridConfig::new(), &args, Some("[1, 2]"))
            .await
            .unwrap_err();
        let err = err.downcast_ref::<LoadgridError>().unwrap();
        assert_eq!(err.code(), ErrorCode::SCHEDULER_INVALID_INBOUND);
    }

    #[tokio::test]
    async fn test_schedule_reports_time_overflow_code() {
        let args = SchedulerArgs {
            output_event: Some("login".into()),
            interval_ms: Some(10),
            target: Some(5),
            ..Default::default()
        };
        let checkpoint = format!(r#"{{"totalEmitted": 0, "lastEventTime": {}}}"#, i64::MAX - 5);
        let err = run_schedule(&LoadgridConfig::new(), &args, Some(&checkpoint))
            .await
            .unwrap_err();
        let err = err.downcast_ref::<LoadgridError>().unwrap();
        assert_eq!(err.code(), ErrorCode::SCHEDULER_TIME_OVERFLOW);
    }
}
