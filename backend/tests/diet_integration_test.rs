//! Integration tests for the diet plan and tracker

mod common;

use axum::http::StatusCode;
use fitcontrol_shared::DayOfWeek;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_empty_diet_is_created_lazily() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, overview) = app.get_authed("/api/v1/diet", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["streak"], 0);
    assert!(overview["diet"]["slots"].as_array().unwrap().is_empty());
    assert_eq!(overview["calendar"].as_array().unwrap().len(), 35);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_food_crud_and_daily_calories() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, oats) = app
        .post_authed(
            "/api/v1/diet/foods",
            &token,
            json!({"weekday": "martes", "meal": "desayuno", "name": "Oats", "calories": 350.0, "grams": 80.0}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let oats_id = oats["id"].as_i64().unwrap();

    app.post_authed(
        "/api/v1/diet/foods",
        &token,
        json!({"weekday": "tuesday", "meal": "dinner", "name": "Salmon", "calories": 500.0}),
    )
    .await;

    let (status, updated) = app
        .put_authed(&format!("/api/v1/diet/foods/{}", oats_id), &token, json!({"calories": 400.0}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Oats");
    assert_eq!(updated["calories"], 400.0);

    let (_, overview) = app.get_authed("/api/v1/diet", &token).await;
    assert_eq!(overview["daily_calories"]["tuesday"], 900.0);

    let status = app
        .delete_authed(&format!("/api/v1/diet/foods/{}", oats_id), &token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, overview) = app.get_authed("/api/v1/diet", &token).await;
    assert_eq!(overview["daily_calories"]["tuesday"], 500.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_food_validation() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, body) = app
        .post_authed(
            "/api/v1/diet/foods",
            &token,
            json!({"weekday": "monday", "meal": "lunch", "name": "Rice", "calories": -10.0}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "calories");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_tracker_day_completion_drives_streak() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;
    let today = DayOfWeek::of(app.state.today());

    app.post_authed(
        "/api/v1/diet/foods",
        &token,
        json!({"weekday": today.as_str(), "meal": "breakfast", "name": "Eggs", "calories": 300.0}),
    )
    .await;
    app.post_authed(
        "/api/v1/diet/foods",
        &token,
        json!({"weekday": today.as_str(), "meal": "lunch", "name": "Rice", "calories": 600.0}),
    )
    .await;

    let (status, tracker) = app.get_authed("/api/v1/diet/tracker/today", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracker["completed"], false);
    let meals = tracker["meals"].as_array().unwrap();
    assert_eq!(meals.len(), 2);
    assert_eq!(meals[0]["meal"], "breakfast");

    // The day cannot be completed while a meal is unchecked
    let day_id = tracker["day_compliance_id"].as_i64().unwrap();
    let (status, _) = app
        .put_authed(
            &format!("/api/v1/diet/compliance/days/{}", day_id),
            &token,
            json!({"completed": true}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Ticking a meal does not complete the day
    let meal_id = meals[0]["compliance_id"].as_i64().unwrap();
    let (status, _) = app
        .put_authed(
            &format!("/api/v1/diet/compliance/meals/{}", meal_id),
            &token,
            json!({"completed": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, overview) = app.get_authed("/api/v1/diet", &token).await;
    assert_eq!(overview["streak"], 0);

    let second_meal = meals[1]["compliance_id"].as_i64().unwrap();
    app.put_authed(
        &format!("/api/v1/diet/compliance/meals/{}", second_meal),
        &token,
        json!({"completed": true}),
    )
    .await;

    let (status, _) = app
        .put_authed(
            &format!("/api/v1/diet/compliance/days/{}", day_id),
            &token,
            json!({"completed": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, overview) = app.get_authed("/api/v1/diet", &token).await;
    assert_eq!(overview["streak"], 1);

    let (_, dashboard) = app.get_authed("/api/v1/dashboard", &token).await;
    assert_eq!(dashboard["diet_streak"], 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_compliance_of_other_user_is_404() {
    let app = common::TestApp::new().await;
    let owner = app.register_user().await;
    let other = app.register_user().await;
    let today = DayOfWeek::of(app.state.today());

    app.post_authed(
        "/api/v1/diet/foods",
        &owner,
        json!({"weekday": today.as_str(), "meal": "snacks", "name": "Nuts", "calories": 200.0}),
    )
    .await;
    let (_, tracker) = app.get_authed("/api/v1/diet/tracker/today", &owner).await;
    let day_id = tracker["day_compliance_id"].as_i64().unwrap();

    let (status, _) = app
        .put_authed(
            &format!("/api/v1/diet/compliance/days/{}", day_id),
            &other,
            json!({"completed": true}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
