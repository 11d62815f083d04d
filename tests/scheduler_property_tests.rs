//! Property tests for the checkpointed scheduler
//!
//! Runs are driven invocation by invocation the way a distributed executor
//! would, handing each self-event back to the scheduler.

mod common;

use common::{drive_to_completion, scheduler, work_events, NOW};
use loadgrid::events::Event;
use loadgrid::scheduler::{SchedulerCheckpoint, SchedulerState, ERR_INCORRECT_INBOUND_TYPE};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_run_of_2500_takes_three_invocations() {
    let scheduler = scheduler(2500, 1000, 10);
    let results = drive_to_completion(&scheduler, 10);

    assert_eq!(results.len(), 3);
    assert_eq!(work_events(&results, "work").len(), 2500);

    let states: Vec<SchedulerState> = results.iter().map(|r| scheduler.classify(r)).collect();
    assert!(matches!(states[0], SchedulerState::Resumed(cp) if cp.total_emitted == 1000));
    assert!(matches!(states[1], SchedulerState::Resumed(cp) if cp.total_emitted == 2000));
    assert_eq!(states[2], SchedulerState::Exhausted);

    assert_eq!(results[2].message(), "Scheduled 500 events named work.");
}

#[test]
fn test_exhausted_checkpoint_schedules_nothing() {
    let scheduler = scheduler(100, 10, 10);
    let checkpoint = SchedulerCheckpoint {
        total_emitted: 100,
        last_event_time: NOW,
    };
    let result = scheduler.process(&Event::new("raiseEvents", NOW, checkpoint.to_payload()));

    assert!(result.is_success());
    assert!(result.follow_up_events().is_empty());
    assert_eq!(result.message(), "Scheduled   0 events named work.");
}

#[test]
fn test_foreign_payloads_are_rejected() {
    let scheduler = scheduler(100, 10, 10);
    for payload in [
        json!("go"),
        json!(42),
        json!([1, 2, 3]),
        json!({"totalEmitted": 1}),
        json!({"totalEmitted": 101, "lastEventTime": NOW}),
        json!({"totalEmitted": -1, "lastEventTime": NOW}),
        json!({"totalEmitted": 1, "lastEventTime": NOW, "extra": true}),
    ] {
        let result = scheduler.process(&Event::new("raiseEvents", NOW, payload.clone()));
        assert!(!result.is_success(), "accepted {payload}");
        assert!(result.follow_up_events().is_empty());
        assert_eq!(result.message(), ERR_INCORRECT_INBOUND_TYPE);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_run_emits_exactly_target(
        target in 0u64..3_000,
        batch in 1usize..700,
        interval in 1u64..50,
    ) {
        let scheduler = scheduler(target, batch, interval);
        let expected_invocations = if target == 0 {
            1
        } else {
            target.div_ceil(batch as u64) as usize
        };
        let results = drive_to_completion(&scheduler, expected_invocations + 1);

        prop_assert_eq!(results.len(), expected_invocations);
        prop_assert_eq!(work_events(&results, "work").len() as u64, target);
        prop_assert!(results.iter().all(|r| r.is_success()));

        // only the last invocation omits the self-event
        let with_self_event = results
            .iter()
            .filter(|r| r.follow_up_events().iter().any(|e| e.name() == "raiseEvents"))
            .count();
        prop_assert_eq!(with_self_event, expected_invocations - 1);
        prop_assert!(results.last().is_some_and(|r| r.is_terminal() == (target == 0)));
    }

    #[test]
    fn prop_work_times_strictly_increase_by_interval(
        target in 1u64..2_000,
        batch in 1usize..300,
        interval in 1u64..1_000,
    ) {
        let scheduler = scheduler(target, batch, interval);
        let results = drive_to_completion(&scheduler, 3_000);
        let times: Vec<i64> = work_events(&results, "work")
            .iter()
            .map(|e| e.scheduled_time())
            .collect();

        prop_assert_eq!(times[0], NOW + interval as i64);
        for pair in times.windows(2) {
            prop_assert_eq!(pair[1] - pair[0], interval as i64);
        }
    }

    #[test]
    fn prop_resuming_from_any_checkpoint_finishes_the_run(
        target in 1u64..500,
        emitted in 0u64..500,
        batch in 1usize..100,
    ) {
        prop_assume!(emitted <= target);
        let scheduler = scheduler(target, batch, 10);
        let checkpoint = SchedulerCheckpoint {
            total_emitted: emitted,
            last_event_time: NOW,
        };
        let result = scheduler.process(&Event::new("raiseEvents", NOW, checkpoint.to_payload()));

        let emitted_now = work_events(std::slice::from_ref(&result), "work").len() as u64;
        prop_assert_eq!(emitted_now, (target - emitted).min(batch as u64));
        match scheduler.classify(&result) {
            SchedulerState::Resumed(next) => {
                prop_assert_eq!(next.total_emitted, emitted + emitted_now);
                prop_assert!(next.total_emitted < target);
            }
            SchedulerState::Exhausted => prop_assert_eq!(emitted + emitted_now, target),
            SchedulerState::Failed => prop_assert!(false, "valid checkpoint rejected"),
        }
    }
}
