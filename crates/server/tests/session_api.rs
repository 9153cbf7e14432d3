//! API tests for the search session routes, driven in-process.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;

use common::{fixtures, TestFixture};

#[tokio::test]
async fn test_health_reports_configuration() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["configured"], true);

    let fixture = TestFixture::unconfigured().await;
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["configured"], false);
}

#[tokio::test]
async fn test_config_hides_api_key() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["omdb"]["api_key_configured"], true);
    assert_eq!(response.body["session"]["debounce_ms"], 350);
    assert!(!response.text.contains("test-key"));
}

#[tokio::test]
async fn test_unconfigured_session_routes_unavailable() {
    let fixture = TestFixture::unconfigured().await;

    let response = fixture.get("/api/v1/session").await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("not configured"));

    let response = fixture
        .put("/api/v1/session/query", json!({ "query": "matrix" }))
        .await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);

    let response = fixture.post("/api/v1/session/details/tt0133093").await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(fixture.catalog.query_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_query_is_debounced_then_searched() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .set_search_results("matrix", vec![fixtures::matrix()])
        .await;

    let response = fixture
        .put("/api/v1/session/query", json!({ "query": "matr" }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["query"], "matr");

    let response = fixture
        .put("/api/v1/session/query", json!({ "query": "matrix" }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["results"], json!([]));

    fixture.settle().await;

    let response = fixture.get("/api/v1/session").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["loading"], false);
    assert_eq!(response.body["total_results"], 1);
    assert_eq!(response.body["results"][0]["imdb_id"], "tt0133093");
    assert_eq!(response.body["results"][0]["title"], "The Matrix");
    assert_eq!(
        response.body["results"][0]["poster"],
        "https://img.example/tt0133093.jpg"
    );
    assert_eq!(fixture.catalog.search_queries().await, vec!["matrix"]);
}

#[tokio::test(start_paused = true)]
async fn test_clear_query() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .set_search_results("matrix", vec![fixtures::matrix()])
        .await;

    fixture
        .put("/api/v1/session/query", json!({ "query": "matrix" }))
        .await;
    fixture.settle().await;

    let response = fixture.delete("/api/v1/session/query").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["query"], "");
    assert_eq!(response.body["results"], json!([]));
    assert_eq!(response.body["total_results"], 0);
}

#[tokio::test(start_paused = true)]
async fn test_filters_apply_and_reset() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .set_search_results(
            "star",
            vec![
                fixtures::summary("tt1", "Star Wars", "1977"),
                fixtures::summary("tt2", "a Star Is Born", "2018"),
                fixtures::summary("tt3", "Stardust", "2007"),
            ],
        )
        .await;

    fixture
        .put("/api/v1/session/query", json!({ "query": "star" }))
        .await;
    fixture.settle().await;

    let response = fixture
        .put(
            "/api/v1/session/filters",
            json!({ "sort": "title-desc", "year_from": 2000 }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    let titles: Vec<&str> = response.body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Stardust", "a Star Is Born"]);
    assert_eq!(response.body["total_results"], 3);
    assert_eq!(response.body["criteria"]["sort"], "title-desc");

    let response = fixture.delete("/api/v1/session/filters").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["results"].as_array().unwrap().len(), 3);
    assert_eq!(response.body["criteria"]["sort"], "title-asc");
}

#[tokio::test(start_paused = true)]
async fn test_rating_filter_backfills_details() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .set_search_results(
            "heat",
            vec![
                fixtures::summary("tt1", "Heat", "1995"),
                fixtures::summary("tt2", "Heat Wave", "2009"),
            ],
        )
        .await;
    fixture
        .catalog
        .add_details(fixtures::detail("tt1", "Heat", "1995", "8.3"))
        .await;
    fixture
        .catalog
        .add_details(fixtures::detail("tt2", "Heat Wave", "2009", "4.2"))
        .await;

    fixture
        .put("/api/v1/session/query", json!({ "query": "heat" }))
        .await;
    fixture.settle().await;

    let response = fixture
        .put("/api/v1/session/filters", json!({ "min_rating": 7.0 }))
        .await;
    assert_status!(response, StatusCode::OK);
    // Both kept until their ratings are known
    assert_eq!(response.body["results"].as_array().unwrap().len(), 2);

    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = fixture.get("/api/v1/session").await;
    let results = response.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["imdb_id"], "tt1");
    let rating = results[0]["rating"].as_f64().unwrap();
    assert!((rating - 8.3).abs() < 1e-4);
}

#[tokio::test]
async fn test_malformed_filters_rejected() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .put_raw("/api/v1/session/filters", r#"{"sort": "by-rating"}"#)
        .await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_open_and_close_details() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .add_details(fixtures::detail("tt0133093", "The Matrix", "1999", "8.7"))
        .await;

    let response = fixture.post("/api/v1/session/details/tt0133093").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["modal"]["title"], "The Matrix");
    assert_eq!(response.body["modal"]["imdb_rating"], "8.7");
    assert_eq!(
        response.body["modal"]["imdb_url"],
        "https://www.imdb.com/title/tt0133093/"
    );
    assert!(response.body["modal"]["poster"]
        .as_str()
        .unwrap()
        .contains("placeholder"));
    assert_eq!(response.body["loading"], false);

    let response = fixture
        .delete("/api/v1/session/details?reason=escape")
        .await;
    assert_status!(response, StatusCode::OK);
    assert!(response.body.get("modal").is_none());
}

#[tokio::test]
async fn test_open_unknown_details_not_found() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/v1/session/details/tt404").await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let response = fixture.get("/api/v1/session").await;
    assert!(response.body.get("modal").is_none());
    assert_eq!(response.body["loading"], false);
}

#[tokio::test]
async fn test_close_details_without_reason() {
    let fixture = TestFixture::new().await;
    let response = fixture.delete("/api/v1/session/details").await;
    assert_status!(response, StatusCode::OK);

    let response = fixture
        .delete("/api/v1/session/details?reason=sideways")
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/v1/health").await;

    let response = fixture.get("/api/v1/metrics").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("moviesearch_http_requests_total"));
    assert!(response.text.contains("moviesearch_session_results"));
}
