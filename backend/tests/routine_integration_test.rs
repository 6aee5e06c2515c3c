//! Integration tests for the exercise catalog and routine endpoints

mod common;

use axum::http::StatusCode;
use fitcontrol_shared::DayOfWeek;
use serde_json::{json, Value};

async fn first_exercise_id(app: &common::TestApp, token: &str) -> i64 {
    let (status, groups) = app.get_authed("/api/v1/catalog/muscle-groups", token).await;
    assert_eq!(status, StatusCode::OK);
    let group_id = groups[0]["id"].as_i64().unwrap();

    let (_, muscles) = app
        .get_authed(&format!("/api/v1/catalog/muscle-groups/{}/muscles", group_id), token)
        .await;
    let muscle_id = muscles[0]["id"].as_i64().unwrap();

    let (_, exercises) = app
        .get_authed(&format!("/api/v1/catalog/muscles/{}/exercises", muscle_id), token)
        .await;
    exercises[0]["id"].as_i64().unwrap()
}

fn routine_body(name: &str, weekdays: &[&str], exercise_id: i64) -> Value {
    let days: Vec<Value> = weekdays
        .iter()
        .map(|day| {
            json!({
                "weekday": day,
                "exercises": [{"exercise_id": exercise_id, "sets": 4, "reps": 8, "load_kg": 60.0}]
            })
        })
        .collect();
    json!({"name": name, "days": days})
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_catalog_unknown_muscle_is_404() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, _) = app
        .get_authed("/api/v1/catalog/muscles/999999/exercises", &token)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_routine_crud() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;
    let exercise_id = first_exercise_id(&app, &token).await;

    let (status, created) = app
        .post_authed(
            "/api/v1/routines",
            &token,
            routine_body("Push/Pull", &["lunes", "wednesday"], exercise_id),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["days"][0]["weekday"], "monday");
    assert_eq!(created["days"][0]["exercises"][0]["exercise"]["id"], exercise_id);
    let id = created["id"].as_i64().unwrap();
    let monday_id = created["days"][0]["id"].as_i64().unwrap();

    let (status, updated) = app
        .put_authed(
            &format!("/api/v1/routines/{}", id),
            &token,
            routine_body("Full body", &["monday", "friday"], exercise_id),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Full body");
    // Monday survived the replacement and keeps its id
    assert_eq!(updated["days"][0]["id"].as_i64().unwrap(), monday_id);
    assert_eq!(updated["days"][1]["weekday"], "friday");

    let status = app.delete_authed(&format!("/api/v1/routines/{}", id), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get_authed(&format!("/api/v1/routines/{}", id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_routine_validation() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;
    let exercise_id = first_exercise_id(&app, &token).await;

    let (status, body) = app
        .post_authed(
            "/api/v1/routines",
            &token,
            routine_body("Twice", &["monday", "lunes"], exercise_id),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "weekday");

    let (status, body) = app
        .post_authed("/api/v1/routines", &token, routine_body("Ghost", &["monday"], 999_999))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "exercise_id");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_routines_are_private() {
    let app = common::TestApp::new().await;
    let owner = app.register_user().await;
    let other = app.register_user().await;
    let exercise_id = first_exercise_id(&app, &owner).await;

    let (_, created) = app
        .post_authed("/api/v1/routines", &owner, routine_body("Mine", &["monday"], exercise_id))
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = app.get_authed(&format!("/api/v1/routines/{}", id), &other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let status = app.delete_authed(&format!("/api/v1/routines/{}", id), &other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_tracker_completion_counts_toward_streak() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;
    let exercise_id = first_exercise_id(&app, &token).await;
    let today = DayOfWeek::of(app.state.today());

    app.post_authed(
        "/api/v1/routines",
        &token,
        routine_body("Today", &[today.as_str()], exercise_id),
    )
    .await;

    let (status, tracker) = app.get_authed("/api/v1/routines/tracker/today", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracker["completed"], false);
    let compliance_id = tracker["compliance_id"].as_i64().unwrap();

    let (_, overview) = app.get_authed("/api/v1/routines/overview", &token).await;
    assert_eq!(overview["streak"], 0);
    assert_eq!(overview["calendar"].as_array().unwrap().len(), 35);

    let (status, record) = app
        .put_authed(
            &format!("/api/v1/routines/compliance/{}", compliance_id),
            &token,
            json!({"completed": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["completed"], true);

    let (_, overview) = app.get_authed("/api/v1/routines/overview", &token).await;
    assert_eq!(overview["streak"], 1);
    assert_eq!(overview["calendar"][34]["status"], "completed");
    assert_eq!(overview["active_routine"]["name"], "Today");
}
