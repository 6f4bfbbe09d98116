//! Tests du routeur HTTP : téléversements, page et API JSON

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use sentinel_coverage::config::AoiSource;
use sentinel_coverage::server::router;
use sentinel_coverage::view::MISSING_PLANS_MESSAGE;
use sentinel_coverage::{Config, Dashboard};
use swath::Satellite;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]]
    })
}

fn feature(date: &str, geometry: Value) -> Value {
    json!({
        "type": "Feature",
        "properties": { "acquisition": format!("{date}T06:30:00Z") },
        "geometry": geometry
    })
}

fn collection(features: Vec<Value>) -> Vec<u8> {
    serde_json::to_vec(&json!({ "type": "FeatureCollection", "features": features })).unwrap()
}

fn plan(satellite: Satellite) -> Vec<u8> {
    match satellite {
        Satellite::S1A => collection(vec![feature("2024-01-13", rect(20.0, 20.0, 25.0, 25.0))]),
        Satellite::S2A => collection(vec![feature("2024-01-05", rect(5.0, 0.0, 10.0, 5.0))]),
        _ => collection(vec![]),
    }
}

/// Répertoire de données avec une AOI 0..10 x 0..10 et aucun plan
fn data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "sentinel-coverage-it-{name}-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(dir.join("aois")).unwrap();
    std::fs::write(
        dir.join("aois/box.geojson"),
        collection(vec![json!({
            "type": "Feature",
            "properties": { "name": "box" },
            "geometry": rect(0.0, 0.0, 10.0, 10.0)
        })]),
    )
    .unwrap();
    dir
}

fn app(dir: PathBuf, max_upload_bytes: usize) -> Router {
    let config = Config {
        data_dir: dir,
        aois: vec![AoiSource {
            key: "box".to_string(),
            name: "Box".to_string(),
            path: PathBuf::from("aois/box.geojson"),
            fallback: None,
        }],
        max_upload_bytes,
        ..Config::default()
    };
    router(Arc::new(Dashboard::new(config)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn post(app: &Router, uri: &str, body: Vec<u8>) -> StatusCode {
    let len = body.len();
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/geo+json")
        .header("content-length", len)
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

/// Objet `MAP_CONFIG` injecté dans la page
fn map_config(page: &str) -> Value {
    let start = page.find("const MAP_CONFIG = ").unwrap() + "const MAP_CONFIG = ".len();
    let end = start + page[start..].find(";\n").unwrap();
    serde_json::from_str(&page[start..end]).unwrap()
}

async fn upload_all_plans(app: &Router) {
    for sat in Satellite::ALL {
        let status = post(app, &format!("/upload/plan/{sat}"), plan(sat)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}

#[tokio::test]
async fn test_healthz() {
    let app = app(data_dir("health"), 1024);
    let (status, body) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_page_waits_for_plans() {
    let app = app(data_dir("waiting"), 1024 * 1024);
    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(MISSING_PLANS_MESSAGE));
    assert!(body.contains("Waiting for S2C_10day_reference_coverage_plan.geojson"));
    assert!(body.contains(r#"data-upload="/upload/plan/S1A""#));
    assert!(!body.contains(r#"<div id="map""#));
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = app(data_dir("reject"), 64);

    assert_eq!(
        post(&app, "/upload/plan/S9Z", b"{}".to_vec()).await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        post(&app, "/upload/aoi/atlantis", b"{}".to_vec()).await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        post(&app, "/upload/plan/S1A", Vec::new()).await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        post(&app, "/upload/plan/S1A", vec![b' '; 128]).await,
        StatusCode::PAYLOAD_TOO_LARGE
    );
}

#[tokio::test]
async fn test_view_after_uploads() {
    let app = app(data_dir("view"), 1024 * 1024);
    upload_all_plans(&app).await;

    let (status, body) = get(&app, "/api/view?date=2024-01-25&aoi=box").await;
    assert_eq!(status, StatusCode::OK);

    let report: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(report["ready"], true);
    assert_eq!(report["aoi"], "Box");
    assert_eq!(report["coverage_percent"], 25.0);

    // S1A : 2024-01-13 est de même phase (12 jours) mais hors AOI
    let s1a = &report["satellites"][0];
    assert_eq!(s1a["satellite"], "S1A");
    assert_eq!(s1a["reference_date"], "2024-01-13");
    assert_eq!(s1a["swaths"], 0);

    let s2a = &report["satellites"][2];
    assert_eq!(s2a["reference_date"], "2024-01-05");
    assert_eq!(s2a["swaths"], 1);

    // Plan vide : pas de date de référence
    assert!(report["satellites"][3]["reference_date"].is_null());
}

#[tokio::test]
async fn test_page_with_map_and_coverage() {
    let app = app(data_dir("page"), 1024 * 1024);
    upload_all_plans(&app).await;

    let (status, body) = get(&app, "/?date=2024-01-25&aoi=box&basemap=carto-light").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<div id="map" style="height:720px"#));
    assert!(body.contains(r#""basemap":"Carto Light""#));
    assert!(body.contains(r#""name":"S2A""#));
    assert!(!body.contains(r#""name":"S1A""#));
    assert!(body.contains("<strong>25.00%</strong>"));

    let config = map_config(&body);
    assert_eq!(config["bounds"], json!([[0.0, 0.0], [10.0, 10.0]]));
    assert_eq!(config["aoi"]["features"].as_array().unwrap().len(), 1);

    // Dates portées uniquement par des horodatages (2024-01-05T06:30:00Z)
    let layers = config["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0]["color"], Satellite::S2A.color());
    let swath = &layers[0]["data"]["features"][0];
    assert_eq!(swath["properties"]["acquisition"], "2024-01-05T06:30:00Z");
    assert_eq!(swath["geometry"]["type"], "Polygon");
}

#[tokio::test]
async fn test_page_without_aoi_has_no_readout() {
    let app = app(data_dir("no-aoi"), 1024 * 1024);
    upload_all_plans(&app).await;

    let (status, body) = get(&app, "/?date=2024-01-25").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""aoi":null"#));
    assert!(map_config(&body)["bounds"].is_null());
    assert!(body.contains(r#""name":"S1A""#));
    assert!(!body.contains("<strong>"));
}

#[tokio::test]
async fn test_invalid_date_warns() {
    let app = app(data_dir("bad-date"), 1024 * 1024);
    let (status, body) = get(&app, "/api/view?date=yesterday").await;
    assert_eq!(status, StatusCode::OK);

    let report: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(report["ready"], false);
    assert_eq!(report["missing_files"].as_array().unwrap().len(), 5);
    assert!(report["notices"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid date 'yesterday'"));
}
