// Integration tests for `TrafficMapExtractor` and stat enrichment,
// using wiremock for the controller and its asset endpoint.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dpiscope_api::{
    ControllerConfig, DpiGroupBy, Error, SessionClient, TrafficMapExtractor, TransportConfig,
    UNLISTED, enrich_dpi_stats,
};

// A minified console asset with one categories/applications pair.
const DPI_ASSET: &str = concat!(
    "!function(e,t,n){e.exports={categories:{4:{name:\"Streaming Media\"},",
    "13:{name:\"Web\"}},applications:{4:{name:\"HTTP\",cat:13},",
    "186:{name:\"Netflix\",cat:4}}}},{}],2:function(e,t,n){}"
);

fn extractor_for(server: &MockServer, build_id: &str) -> TrafficMapExtractor {
    let base = server.uri().parse().unwrap();
    TrafficMapExtractor::new(base, &TransportConfig::default())
        .unwrap()
        .with_build_id(build_id)
}

async fn mount_asset(server: &MockServer, build_id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/manage/angular/{build_id}/js/dynamic.dpi.js")))
        .respond_with(ResponseTemplate::new(200).set_body_string(DPI_ASSET))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_maps_from_versioned_asset() {
    let server = MockServer::start().await;
    mount_asset(&server, "g12345").await;

    let (cats, apps) = extractor_for(&server, "g12345").fetch_maps().await.unwrap();

    assert_eq!(cats.name_for(13), Some("Web"));
    assert_eq!(apps.name_for(186), Some("Netflix"));
    // categories and applications come from distinct fragments
    assert_eq!(cats.len(), 2);
    assert!(cats.name_for(186).is_none());
}

#[tokio::test]
async fn test_missing_asset_version_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = extractor_for(&server, "gstale").fetch_maps().await.unwrap_err();

    match err {
        Error::Extraction(inner) => {
            let message = inner.to_string();
            assert!(message.contains("404"), "got: {message}");
            assert!(message.contains("gstale"), "got: {message}");
        }
        other => panic!("expected Extraction error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_asset_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("404 page not found"))
        .mount(&server)
        .await;

    let err = extractor_for(&server, "g12345").fetch_maps().await.unwrap_err();
    assert!(err.is_extraction(), "got: {err:?}");
}

// Full flow: login, by-app station DPI, asset fetch, enrichment.
#[tokio::test]
async fn test_dpi_stats_enriched_with_extracted_names() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/stadpi"))
        .and(body_json(json!({ "type": "by_app" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "mac": "aa:bb:cc:dd:ee:01",
                  "by_app": [ { "app": 999_999, "cat": 13, "rx_bytes": 512 } ] },
                { "mac": "aa:bb:cc:dd:ee:02",
                  "by_app": [ { "app": 999_999, "cat": 13, "rx_bytes": 2048 } ] },
            ],
            "meta": { "rc": "ok" },
        })))
        .mount(&server)
        .await;
    mount_asset(&server, "g12345").await;

    let config =
        ControllerConfig::from_uri(&server.uri().replace("http://", "http://admin:pw@")).unwrap();
    let transport = TransportConfig::default();
    let client = SessionClient::connect(&config, &transport).await.unwrap();

    let mut stats = client
        .get_station_dpi("default", DpiGroupBy::ByApp, None, None)
        .await
        .unwrap();

    let base = client.base_url().clone();
    let (cats, apps) = TrafficMapExtractor::new(base, &transport)
        .unwrap()
        .with_build_id("g12345")
        .fetch_maps()
        .await
        .unwrap();

    enrich_dpi_stats(&mut stats, &cats, &apps);

    for device in stats["data"].as_array().unwrap() {
        let entry = &device["by_app"][0];
        assert_eq!(entry["x_cat"], "Web");
        assert_eq!(entry["x_app"], UNLISTED);
        // raw fields survive enrichment
        assert_eq!(entry["cat"], 13);
    }
}
