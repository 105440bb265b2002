#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::test_state;

const NO_UPSTREAM: &str = "http://127.0.0.1:9";

#[actix_web::test]
async fn create_returns_record_with_empty_patients() {
    let state = test_state(NO_UPSTREAM).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/hospitals")
        .set_json(json!({
            "name": "Mercy General",
            "address": "4 Harbor Rd",
            "email": "contact@mercy.example",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Mercy General");
    assert_eq!(body["data"]["patients"], json!([]));
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["createdAt"].is_string());
}

#[actix_web::test]
async fn duplicate_email_is_rejected() {
    let state = test_state(NO_UPSTREAM).await;
    let app = init_app!(state);
    let hospital = json!({ "name": "A", "address": "1 St", "email": "dup@example.org" });

    let first = test::TestRequest::post().uri("/api/hospitals").set_json(&hospital).to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::CREATED);

    let second = test::TestRequest::post().uri("/api/hospitals").set_json(&hospital).to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "A hospital with this email already exists");
}

#[actix_web::test]
async fn missing_fields_are_rejected() {
    let state = test_state(NO_UPSTREAM).await;
    let app = init_app!(state);

    for payload in [
        json!({ "address": "1 St", "email": "a@example.org" }),
        json!({ "name": "A", "email": "a@example.org" }),
        json!({ "name": "A", "address": "1 St", "email": "" }),
    ] {
        let req = test::TestRequest::post().uri("/api/hospitals").set_json(&payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing required fields");
    }
}

#[actix_web::test]
async fn malformed_body_uses_error_envelope() {
    let state = test_state(NO_UPSTREAM).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/hospitals")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn get_update_and_delete_by_id() {
    let state = test_state(NO_UPSTREAM).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/hospitals")
        .set_json(json!({ "name": "Valley", "address": "9 Ridge", "email": "valley@example.org" }))
        .to_request();
    let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/hospitals/{}", id))
        .set_json(json!({ "address": "10 Ridge" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["data"]["address"], "10 Ridge");
    assert_eq!(updated["data"]["name"], "Valley");

    let req = test::TestRequest::get().uri(&format!("/api/hospitals/{}", id)).to_request();
    let fetched: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(fetched["data"]["address"], "10 Ridge");

    let req = test::TestRequest::delete().uri(&format!("/api/hospitals/{}", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Hospital and associated patients deleted successfully");

    let req = test::TestRequest::get().uri(&format!("/api/hospitals/{}", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Hospital not found");
}

#[actix_web::test]
async fn invalid_id_is_bad_request() {
    let state = test_state(NO_UPSTREAM).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/hospitals/not-a-uuid").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid hospital ID");
}

#[actix_web::test]
async fn list_populates_patient_names_and_ages() {
    let state = test_state(NO_UPSTREAM).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/hospitals")
        .set_json(json!({ "name": "North", "address": "1 Pole", "email": "north@example.org" }))
        .to_request();
    let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/hospitals/{}/patients", id))
        .set_json(json!({ "name": "Erin", "age": 29 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/hospitals").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let patients = &body["data"][0]["patients"];
    assert_eq!(patients[0]["name"], "Erin");
    assert_eq!(patients[0]["age"], 29);
    assert!(patients[0].get("drugUsage").is_none());

    let req = test::TestRequest::get().uri("/api/hospitals?populate=false").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(body["data"][0]["patients"][0].is_string());
}

#[actix_web::test]
async fn malformed_query_uses_error_envelope() {
    let state = test_state(NO_UPSTREAM).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/hospitals?populate=maybe").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid query string"));
}
