use super::*;
use cantine_protocols::testing::ScriptedApi;
use cantine_protocols::FixedClock;
use chrono::{Local, TimeZone, Weekday};
use tokio::sync::mpsc;

fn fixed_clock() -> Arc<dyn Clock> {
    // A Monday.
    Arc::new(FixedClock(
        Local.with_ymd_and_hms(2026, 8, 31, 9, 0, 0).unwrap(),
    ))
}

fn orchestrator(api: Arc<ScriptedApi>) -> (BookingBatchOrchestrator, mpsc::UnboundedReceiver<String>) {
    let (bridge, rx) = HostBridge::channel();
    let orchestrator =
        BookingBatchOrchestrator::new(api, bridge, fixed_clock(), BookingConfig::default());
    (orchestrator, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<HostMessage> {
    let mut messages = Vec::new();
    while let Ok(raw) = rx.try_recv() {
        if let Some(message) = HostMessage::parse(&raw) {
            messages.push(message);
        }
    }
    messages
}

#[test]
fn test_compute_week_monday_is_idempotent() {
    let sunday = NaiveDate::from_ymd_opt(2026, 9, 6).unwrap();
    let monday = compute_week_monday(sunday, 0);
    assert_eq!(monday, NaiveDate::from_ymd_opt(2026, 8, 31).unwrap());
    assert_eq!(compute_week_monday(monday, 0), monday);
}

#[test]
fn test_compute_week_monday_offsets() {
    let wednesday = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
    for offset in 0..=2u8 {
        let monday = compute_week_monday(wednesday, offset);
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(
            monday,
            NaiveDate::from_ymd_opt(2026, 8, 31).unwrap() + Days::new(7 * offset as u64)
        );
    }
}

#[test]
fn test_weekday_targets_shape() {
    let monday = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
    let targets = weekday_targets(monday, &BookingConfig::default());

    assert_eq!(targets.len(), 5);
    assert_eq!(targets[0].date.weekday(), Weekday::Mon);
    assert_eq!(targets[4].date.weekday(), Weekday::Fri);
    for window in targets.windows(2) {
        assert_eq!(window[1].date, window[0].date + Days::new(1));
        assert_eq!(window[0].date.iso_week(), window[1].date.iso_week());
    }
    for target in &targets {
        assert_eq!(target.time, "11:30");
        assert_eq!(target.organization_id, 1);
        assert_eq!(target.service_id, 2);
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_batch_success() {
    let api = Arc::new(ScriptedApi::with_user("4217"));
    let (orchestrator, mut rx) = orchestrator(api.clone());

    orchestrator.run_batch(0).await;

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 1, "exactly one terminal message");
    let HostMessage::WeeklyBookingComplete { results } = &messages[0] else {
        panic!("expected a completion message");
    };
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|outcome| outcome.success));

    let requests = api.requests();
    assert_eq!(requests.len(), 5);
    assert!(requests.windows(2).all(|w| w[0].date < w[1].date));
    assert!(requests.iter().all(|r| r.user_id == "4217"));
    assert!(requests.iter().all(|r| r.origin == "WEB"));
}

#[tokio::test(start_paused = true)]
async fn test_identity_failure_emits_single_error() {
    let api = Arc::new(ScriptedApi::without_identity());
    let (orchestrator, mut rx) = orchestrator(api.clone());

    orchestrator.run_batch(1).await;

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 1);
    assert!(matches!(
        messages[0],
        HostMessage::WeeklyBookingError { .. }
    ));
    assert!(api.requests().is_empty(), "no per-date request may be sent");
}

#[tokio::test(start_paused = true)]
async fn test_partial_failure_continues_batch() {
    let api = Arc::new(ScriptedApi::with_user("4217"));
    // Fail the third day (Wednesday of the reference week).
    let wednesday = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
    api.fail_date(wednesday);

    let (orchestrator, mut rx) = orchestrator(api.clone());
    orchestrator.run_batch(0).await;

    let messages = drain(&mut rx);
    assert_eq!(messages.len(), 1);
    let HostMessage::WeeklyBookingComplete { results } = &messages[0] else {
        panic!("a partial failure still completes the batch");
    };
    assert_eq!(results.len(), 5);
    for outcome in results {
        if outcome.date == wednesday {
            assert!(!outcome.success);
            assert!(outcome.data.is_none());
        } else {
            assert!(outcome.success);
            assert!(outcome.data.is_some());
        }
    }
    assert_eq!(api.requests().len(), 5, "all five dates must be attempted");
}

#[tokio::test(start_paused = true)]
async fn test_requests_are_paced() {
    let api = Arc::new(ScriptedApi::with_user("4217"));
    let (orchestrator, _rx) = orchestrator(api.clone());

    let started = tokio::time::Instant::now();
    orchestrator.run_batch(0).await;

    // Four pacing delays between five requests.
    assert!(started.elapsed() >= Duration::from_millis(4 * 500));
}
