//! Handler tests for the server-rendered web app and the JSON endpoint.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mealplan::api::Server;
use mealplan::planner::PlannerBuilder;
use tower::ServiceExt;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn plan_text() -> String {
    serde_json::json!([
        {
            "day": "Monday",
            "breakfast": {"mealName": "Avocado toast", "ingredients": ["bread", "avocado"], "calories": 420},
            "lunch": {"mealName": "Quinoa salad", "ingredients": ["quinoa", "feta"], "calories": 580},
            "dinner": {"mealName": "Veggie curry", "ingredients": ["chickpeas", "spinach"], "calories": 800}
        }
    ])
    .to_string()
}

fn candidate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            {"content": {"parts": [{"text": text}]}}
        ]
    })
}

/// Router backed by a planner that talks to the given mock API.
fn test_router(mock_url: &str) -> axum::Router {
    let planner = PlannerBuilder::new()
        .api_key("TEST_KEY")
        .base_url(mock_url)
        .resilient_attempts(2)
        .resilient_backoff(1, 2)
        .build()
        .unwrap();
    Server::new(planner).router()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_serves_the_requirements_form() {
    let api = MockServer::start().await;
    let router = test_router(&api.uri());

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("<form method=\"post\" action=\"/plan\">"));
    assert!(html.contains("name=\"calories\""));
    assert!(html.contains("name=\"allergens\""));
}

#[tokio::test]
async fn form_submit_renders_the_plan_table() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(&plan_text())))
        .expect(1)
        .mount(&api)
        .await;

    let router = test_router(&api.uri());
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/plan")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "diet=Vegetarian&calories=1800&preferences=no+mushrooms&cuisine=&allergens=peanuts",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Generated 7-Day Structured Meal Plan"));
    assert!(html.contains("<td>Monday</td>"));
    assert!(html.contains("<td>Avocado toast</td>"));
    assert!(html.contains("Monday: 1800 kcal"));
}

#[tokio::test]
async fn form_submit_renders_an_error_page_on_upstream_failure() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&api)
        .await;

    let router = test_router(&api.uri());
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/plan")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("diet=Keto&calories=2000"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("Retry limit reached"));
}

#[tokio::test]
async fn json_endpoint_returns_plan_and_rows() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(&plan_text())))
        .expect(1)
        .mount(&api)
        .await;

    let router = test_router(&api.uri());
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/plan")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "diet": "Vegetarian",
                        "daily_calories": 1800,
                        "allergens": ["peanuts"]
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["plan"][0]["day"], "Monday");
    assert_eq!(body["rows"].as_array().unwrap().len(), 3);
    assert_eq!(body["rows"][0]["slot"], "Breakfast");
    assert_eq!(body["rows"][0]["ingredients"], "bread, avocado");
}

#[tokio::test]
async fn json_endpoint_maps_auth_failures_to_401() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&api)
        .await;

    let router = test_router(&api.uri());
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/plan")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"diet": "Keto", "daily_calories": 2000}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
