mod common;

use common::{pipeline, MockGenerator, MockOcr, MEETING_TEXT};
use picsync::calendar::{build_url, CALENDAR_BASE_URL};
use picsync::extractor::extract;
use picsync::model::Confidence;
use picsync::{Error, EventRecord};

/// The full pipeline without a model keeps the deterministic draft
#[tokio::test]
async fn test_image_to_calendar_url() {
    let result = pipeline(Some(MockOcr::new(MEETING_TEXT)), None)
        .process_image(b"png bytes")
        .await
        .unwrap();

    assert_eq!(result.extracted_text, MEETING_TEXT);
    assert_eq!(result.event.title.as_deref(), Some("Team Meeting"));
    assert_eq!(result.event.date.as_deref(), Some("10/03/2025"));
    assert_eq!(result.event.start_time.as_deref(), Some("2:30 PM"));
    assert!(result.calendar_url.starts_with(CALENDAR_BASE_URL));
    assert!(result.calendar_url.contains("text=Team%20Meeting"));
    assert!(result
        .calendar_url
        .contains("dates=20251003T143000/20251003T153000"));
    assert!(result.calendar_url.contains("location=Room%3A%20204"));
}

/// Model answers overlay the draft but never blank it
#[tokio::test]
async fn test_refiner_overlays_draft() {
    let reply = r#"```json
{"title": "Quarterly Team Meeting", "location": "", "timezone": "America/New_York", "confidence": "high"}
```"#;
    let result = pipeline(
        Some(MockOcr::new(MEETING_TEXT)),
        Some(MockGenerator::reply(reply)),
    )
    .process_image(b"png bytes")
    .await
    .unwrap();

    assert_eq!(result.event.title.as_deref(), Some("Quarterly Team Meeting"));
    assert_eq!(result.event.location.as_deref(), Some("Room: 204"));
    assert_eq!(result.event.timezone.as_deref(), Some("America/New_York"));
    assert_eq!(result.event.confidence, Some(Confidence::High));
    assert!(result.calendar_url.contains("ctz=America%2FNew_York"));
}

/// A failing or nonsensical model leaves the draft untouched
#[tokio::test]
async fn test_refiner_failures_keep_draft() {
    let draft = extract(MEETING_TEXT);

    for generator in [
        MockGenerator::Fail,
        MockGenerator::reply("I could not find an event, sorry."),
        MockGenerator::reply("[1, 2, 3]"),
    ] {
        let result = pipeline(Some(MockOcr::new(MEETING_TEXT)), Some(generator))
            .process_image(b"png bytes")
            .await
            .unwrap();
        assert_eq!(result.event, draft);
    }
}

#[tokio::test]
async fn test_pipeline_errors() {
    let err = pipeline(None, None).process_image(b"png").await.unwrap_err();
    assert!(matches!(err, Error::ServiceUnavailable(_)));

    let err = pipeline(Some(MockOcr::new("   ")), None)
        .process_image(b"png")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoTextFound));
    assert!(err.is_client_error());
}

/// Any text yields some record and a link, even one with no signal at all
#[tokio::test]
async fn test_text_without_event_still_builds_link() {
    let result = pipeline(None, None).process_text("lorem").await;

    assert!(result.calendar_url.starts_with(CALENDAR_BASE_URL));
    assert!(!result.calendar_url.contains("dates="));
    assert_eq!(result.event.title.as_deref(), Some("lorem"));
}

/// A range past midnight never yields an end before the start
#[tokio::test]
async fn test_overnight_range_is_clamped() {
    let result = pipeline(None, None)
        .process_text("Late Show\n22:00 - 01:00\nDate: Oct 3, 2025")
        .await;

    assert_eq!(result.event.end_time.as_deref(), Some("01:00"));
    assert!(result
        .calendar_url
        .contains("dates=20251003T220000/20251003T235900"));
}

/// Full month names keep the extracted time
#[tokio::test]
async fn test_full_month_name_in_text() {
    let result = pipeline(None, None)
        .process_text("Alumni Mixer\nJoin us on September 12th, 2025 at 6 PM")
        .await;

    assert!(result
        .calendar_url
        .contains("dates=20250912T180000/20250912T190000"));
}

#[test]
fn test_unparseable_date_falls_back_to_noon() {
    let record = EventRecord {
        title: Some("Launch".to_string()),
        date: Some("someday/soon".to_string()),
        ..Default::default()
    };
    let url = build_url(&record);

    assert!(url.contains("dates=somedaysoonT120000/somedaysoonT130000"));
}
