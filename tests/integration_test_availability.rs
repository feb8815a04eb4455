mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_doctor(app: &TestApp, name: &str) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/doctors")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": name,
                "email": "doctor@clinic.test",
                "specialization": "Cardiology"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn add_rule(app: &TestApp, doctor_id: &str, rule: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/doctors/{}/availability-rules", doctor_id))
            .header("Content-Type", "application/json")
            .body(Body::from(rule.to_string())).unwrap()
    ).await.unwrap()
}

async fn get_availability(app: &TestApp, doctor_id: &str, from: &str, to: &str) -> Value {
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/doctors/{}/availability?from={}&to={}", doctor_id, from, to))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

#[tokio::test]
async fn test_date_rule_expands_to_free_slots() {
    let app = TestApp::new().await;
    let doctor_id = create_doctor(&app, "Dr. Slots").await;

    let res = add_rule(&app, &doctor_id, json!({
        "type": "date", "date": "2024-06-10",
        "startTime": "09:00", "endTime": "10:00", "duration": 30
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = get_availability(&app, &doctor_id, "2024-06-10", "2024-06-10").await;
    let slots = body["2024-06-10"].as_array().unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["start"], "2024-06-10T09:00:00Z");
    assert_eq!(slots[0]["end"], "2024-06-10T09:30:00Z");
    assert_eq!(slots[0]["status"], "free");
    assert_eq!(slots[1]["start"], "2024-06-10T09:30:00Z");
    assert_eq!(slots[1]["status"], "free");
}

#[tokio::test]
async fn test_booked_interval_tags_only_overlapping_slots() {
    let app = TestApp::new().await;
    let doctor_id = create_doctor(&app, "Dr. Booked").await;

    add_rule(&app, &doctor_id, json!({
        "type": "date", "date": "2024-06-10",
        "startTime": "09:00", "endTime": "10:00", "duration": 30
    })).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/appointments")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "doctor": doctor_id,
                "patientName": "John Smith",
                "patientEmail": "john@x.com",
                "start": "2024-06-10T09:00:00Z"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = get_availability(&app, &doctor_id, "2024-06-10", "2024-06-10").await;
    let slots = body["2024-06-10"].as_array().unwrap();

    // The appointment ends exactly where the second slot begins, so
    // only the first slot is booked.
    assert_eq!(slots[0]["status"], "booked");
    assert_eq!(slots[1]["status"], "free");
}

#[tokio::test]
async fn test_weekly_rule_spans_month_boundary() {
    let app = TestApp::new().await;
    let doctor_id = create_doctor(&app, "Dr. Weekly").await;

    // Mondays, 09:00-11:00 in hour slots.
    add_rule(&app, &doctor_id, json!({
        "type": "weekly", "dayOfWeek": 1,
        "startTime": "09:00", "endTime": "11:00", "duration": 60
    })).await;

    let body = get_availability(&app, &doctor_id, "2024-06-24", "2024-07-08").await;
    let days = body.as_object().unwrap();

    let keys: Vec<&String> = days.keys().collect();
    assert_eq!(keys, vec!["2024-06-24", "2024-07-01", "2024-07-08"]);
    assert_eq!(days["2024-07-01"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_date_rule_overrides_weekly_rule() {
    let app = TestApp::new().await;
    let doctor_id = create_doctor(&app, "Dr. Override").await;

    add_rule(&app, &doctor_id, json!({
        "type": "weekly", "dayOfWeek": 1,
        "startTime": "08:00", "endTime": "12:00", "duration": 60
    })).await;
    add_rule(&app, &doctor_id, json!({
        "type": "date", "date": "2024-06-10",
        "startTime": "09:00", "endTime": "10:00", "duration": 30
    })).await;

    let body = get_availability(&app, &doctor_id, "2024-06-10", "2024-06-17").await;

    // 2024-06-10 uses the date rule's window, the following Monday the
    // weekly one.
    let overridden = body["2024-06-10"].as_array().unwrap();
    assert_eq!(overridden.len(), 2);
    assert_eq!(overridden[0]["start"], "2024-06-10T09:00:00Z");

    let next_monday = body["2024-06-17"].as_array().unwrap();
    assert_eq!(next_monday.len(), 4);
    assert_eq!(next_monday[0]["start"], "2024-06-17T08:00:00Z");
}

#[tokio::test]
async fn test_dates_without_rules_are_absent() {
    let app = TestApp::new().await;
    let doctor_id = create_doctor(&app, "Dr. Empty").await;

    let body = get_availability(&app, &doctor_id, "2024-06-10", "2024-06-16").await;
    assert!(body.as_object().unwrap().is_empty());

    add_rule(&app, &doctor_id, json!({
        "type": "date", "date": "2024-06-10",
        "startTime": "09:00", "endTime": "10:00", "duration": 30
    })).await;

    let body = get_availability(&app, &doctor_id, "2024-06-10", "2024-06-16").await;
    assert!(body.get("2024-06-10").is_some());
    assert!(body.get("2024-06-11").is_none());
}

#[tokio::test]
async fn test_malformed_stored_rule_is_skipped() {
    let app = TestApp::new().await;
    let doctor_id = create_doctor(&app, "Dr. Resilient").await;

    add_rule(&app, &doctor_id, json!({
        "type": "date", "date": "2024-06-10",
        "startTime": "11:00", "endTime": "12:00", "duration": 30
    })).await;

    // A row that bypassed API validation; one bad rule must not blank
    // out the rest of the doctor's availability.
    sqlx::query(
        "INSERT INTO availability_rules (id, doctor_id, kind, day_of_week, date, start_time, end_time, duration_min, created_at)
         VALUES (?, ?, 'date', 1, '2024-06-10', '17:00', '09:00', 30, ?)"
    )
        .bind(Uuid::new_v4().to_string())
        .bind(&doctor_id)
        .bind(chrono::Utc::now())
        .execute(&app.pool).await.unwrap();

    let body = get_availability(&app, &doctor_id, "2024-06-10", "2024-06-10").await;
    let slots = body["2024-06-10"].as_array().unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["start"], "2024-06-10T11:00:00Z");
}

#[tokio::test]
async fn test_availability_query_validation() {
    let app = TestApp::new().await;
    let doctor_id = create_doctor(&app, "Dr. Params").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/doctors/{}/availability?from=2024-06-20&to=2024-06-10", doctor_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri("/api/v1/doctors/no-such-doctor/availability?from=2024-06-10&to=2024-06-10")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
