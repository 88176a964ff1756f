use super::*;

#[test]
fn test_credentials_debug_redacts_secret() {
    let credentials = Credentials::new("alice@example.org", "hunter2");
    let rendered = format!("{credentials:?}");
    assert!(rendered.contains("alice@example.org"));
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn test_batch_completion() {
    let date = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
    let target = BookingTarget {
        date,
        time: "11:30".to_string(),
        organization_id: 1,
        service_id: 2,
    };
    let mut batch = BookingBatch::new(vec![target.clone(), target]);
    assert!(!batch.is_complete());

    batch.record(BookingOutcome::failed(date));
    assert!(!batch.is_complete());

    batch.record(BookingOutcome::succeeded(date, serde_json::json!({})));
    assert!(batch.is_complete());
    assert_eq!(batch.into_outcomes().len(), 2);
}
