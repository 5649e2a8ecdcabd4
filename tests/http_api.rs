use async_trait::async_trait;
use astrolumina::server::{router, AppState};
use astrolumina::{
    GeoDataset, PlanetPosition, ReadingError, ReadingRequest, ReadingResult, ReadingSource,
};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedSource {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl ReadingSource for FixedSource {
    async fn fetch_reading(
        &self,
        _request: &ReadingRequest,
    ) -> Result<ReadingResult, ReadingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ReadingError::Transport("connection refused".to_string()));
        }
        Ok(ReadingResult {
            dynamic_texts: vec![
                PlanetPosition::new("Moon", "Cancer", "House 4"),
                PlanetPosition::new("Sun", "Taurus", "House 10"),
            ],
        })
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

fn app(fail: bool) -> (axum::Router, Arc<FixedSource>) {
    let source = Arc::new(FixedSource {
        calls: AtomicUsize::new(0),
        fail,
    });
    let state = AppState {
        dataset: Arc::new(GeoDataset::bundled().unwrap()),
        source: source.clone(),
    };
    (router(state), source)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: axum::Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn form() -> Value {
    json!({
        "fullName": "Ana",
        "birthDate": "1990-05-14",
        "birthHour": "13:30:00",
        "country": "RO",
        "county": "CJ",
        "city": "Cluj-Napoca"
    })
}

#[tokio::test]
async fn lists_countries() {
    let (app, _) = app(false);
    let (status, body) = get_json(app, "/api/countries").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_array()
        .unwrap()
        .contains(&json!({"code": "RO", "label": "Romania"})));
}

#[tokio::test]
async fn lists_counties_with_clean_labels() {
    let (app, _) = app(false);
    let (status, body) = get_json(app, "/api/counties?country=RO").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_array()
        .unwrap()
        .contains(&json!({"code": "CJ", "label": "Cluj"})));
}

#[tokio::test]
async fn unknown_country_has_no_counties() {
    let (app, _) = app(false);
    let (status, body) = get_json(app, "/api/counties?country=ZZ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn lists_cities_with_coordinates() {
    let (app, _) = app(false);
    let (_, body) = get_json(app, "/api/cities?country=RO&county=CJ").await;
    let cities = body.as_array().unwrap();
    assert_eq!(cities.len(), 3);
    assert_eq!(cities[0]["name"], "Cluj-Napoca");
    assert_eq!(cities[0]["latitude"], json!(46.76667));
}

#[tokio::test]
async fn reading_returns_sorted_rows() {
    let (app, source) = app(false);
    let (status, body) = post_json(app, "/api/reading", form()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    let rows = body["chart"]["rows"].as_array().unwrap();
    assert_eq!(rows[0]["planet"], "Sun");
    assert_eq!(rows[1]["planet"], "Moon");
    assert_eq!(body["display"]["location"], "Cluj-Napoca, RO");
}

#[tokio::test]
async fn incomplete_form_is_rejected_without_fetch() {
    let (app, source) = app(false);
    let mut payload = form();
    payload["fullName"] = json!(" ");
    payload["city"] = json!("");

    let (status, body) = post_json(app, "/api/reading", payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["fullName"], "Full Name is required");
    assert_eq!(body["errors"]["birthCity"], "Birth City is required");
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_city_is_rejected_without_fetch() {
    let (app, source) = app(false);
    let mut payload = form();
    payload["city"] = json!("Atlantis");

    let (status, body) = post_json(app, "/api/reading", payload).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("coordinates"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fetch_failure_maps_to_bad_gateway() {
    let (app, source) = app(true);
    let (status, body) = post_json(app, "/api/reading", form()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to fetch reading");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}
