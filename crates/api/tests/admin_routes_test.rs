mod test_utils;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use test_utils::{at, spawn_app};

#[tokio::test]
async fn test_create_and_filter_agencies() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/admin/agencies")
        .json(&json!({
            "name": "Villeurbanne",
            "address": "3 cours Emile Zola",
            "working_hours": [
                { "day": "Mon", "start_minute": 540, "end_minute": 1020 }
            ]
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["name"], "Villeurbanne");

    let all: Value = app.server.get("/api/admin/agencies").await.json();
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["name"], "Lyon Part-Dieu");

    let filtered: Value = app
        .server
        .get("/api/admin/agencies")
        .add_query_param("name", "villeur")
        .await
        .json();
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["name"], "Villeurbanne");
}

#[tokio::test]
async fn test_agency_requires_name_and_address() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/admin/agencies")
        .json(&json!({ "name": " ", "address": "" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["fields"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_overlapping_agency_hours_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/admin/agencies")
        .json(&json!({
            "name": "Villeurbanne",
            "address": "3 cours Emile Zola",
            "working_hours": [
                { "day": "Mon", "start_minute": 540, "end_minute": 720 },
                { "day": "Mon", "start_minute": 700, "end_minute": 1020 }
            ]
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_advisor_within_agency_hours() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/admin/advisors")
        .json(&json!({
            "name": "Julien Moreau",
            "email": "julien.moreau@example.com",
            "agency_id": app.agency.id,
            "working_hours": [
                { "day": "Wed", "start_minute": 600, "end_minute": 960 }
            ]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let advisor: Value = response.json();
    assert_eq!(advisor["active"], true);
    assert_eq!(advisor["agency_id"], json!(app.agency.id));
}

#[tokio::test]
async fn test_advisor_hours_as_office_hours() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/admin/advisors")
        .json(&json!({
            "name": "Julien Moreau",
            "email": "julien.moreau@example.com",
            "agency_id": app.agency.id,
            "working_hours": [
                { "day": "Wed", "starthours": 930, "endhours": 1630 }
            ]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let advisor: Value = response.json();
    assert_eq!(
        advisor["working_hours"],
        json!([{ "day": "Wed", "start_minute": 570, "end_minute": 990 }])
    );
}

#[tokio::test]
async fn test_advisor_hours_outside_agency_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/admin/advisors")
        .json(&json!({
            "name": "Julien Moreau",
            "email": "julien.moreau@example.com",
            "agency_id": app.agency.id,
            "working_hours": [
                { "day": "Wed", "start_minute": 420, "end_minute": 960 },
                { "day": "Sat", "start_minute": 600, "end_minute": 720 }
            ]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Validation error: Advisor hours fall outside the agency's opening hours on Wed, Sat"
    );
}

#[tokio::test]
async fn test_advisor_requires_valid_email() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/admin/advisors")
        .json(&json!({
            "name": "Julien Moreau",
            "email": "not-an-address",
            "agency_id": app.agency.id
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["fields"][0]["field"], "email");
}

#[tokio::test]
async fn test_appointment_types() {
    let app = spawn_app().await;

    app.server
        .post("/api/admin/appointment-types")
        .json(&json!({ "name": "Insurance" }))
        .await
        .assert_status(StatusCode::CREATED);

    let types: Value = app.server.get("/api/admin/appointment-types").await.json();
    let names: Vec<&str> = types
        .as_array()
        .unwrap()
        .iter()
        .map(|kind| kind["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Insurance", "Mortgage"]);
}

#[tokio::test]
async fn test_admin_booking_list_filters() {
    let app = spawn_app().await;
    app.book(at(10, 0), at(11, 0)).await;
    app.book(at(14, 0), at(15, 0)).await;

    let all: Value = app.server.get("/api/admin/bookings").await.json();
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["title"], "Mortgage appointment on 19-03-2025 10:00");

    let by_title: Value = app
        .server
        .get("/api/admin/bookings")
        .add_query_param("title", "14:00")
        .await
        .json();
    assert_eq!(by_title.as_array().unwrap().len(), 1);

    let by_adviser: Value = app
        .server
        .get("/api/admin/bookings")
        .add_query_param("adviser", "sophie")
        .add_query_param("agency", app.agency.id)
        .await
        .json();
    assert_eq!(by_adviser.as_array().unwrap().len(), 2);

    let nobody: Value = app
        .server
        .get("/api/admin/bookings")
        .add_query_param("adviser", "marc")
        .await
        .json();
    assert_eq!(nobody, json!([]));
}

#[tokio::test]
async fn test_admin_booking_list_with_blank_filters() {
    let app = spawn_app().await;
    app.book(at(10, 0), at(11, 0)).await;

    let response = app
        .server
        .get("/api/admin/bookings")
        .add_query_param("title", "")
        .add_query_param("agency", "")
        .add_query_param("type", "")
        .add_query_param("adviser", "")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);
}
