// Integration tests for `SessionClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dpiscope_api::{
    ControllerConfig, DpiGroupBy, ElementType, Error, Interval, SessionClient, StatRequest,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> ControllerConfig {
    let uri = server.uri().replace("http://", "http://admin:s%40cret@");
    ControllerConfig::from_uri(&uri).unwrap()
}

fn login_ok() -> Mock {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "username": "admin", "password": "s@cret" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [], "meta": { "rc": "ok" } })),
        )
}

async fn connected_client(server: &MockServer) -> SessionClient {
    login_ok().mount(server).await;
    SessionClient::connect(&config_for(server), &TransportConfig::default())
        .await
        .unwrap()
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_decodes_password() {
    let server = MockServer::start().await;
    login_ok().expect(1).mount(&server).await;

    let client = SessionClient::connect(&config_for(&server), &TransportConfig::default())
        .await
        .unwrap();

    assert_eq!(client.base_url().as_str(), format!("{}/", server.uri()));

    // debug output names the controller but never the session state
    let rendered = format!("{client:?}");
    assert!(rendered.contains("base_url"), "got: {rendered}");
    assert!(!rendered.contains("cookie"), "got: {rendered}");
}

#[tokio::test]
async fn test_login_rejection_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "meta": { "rc": "error" } })))
        .mount(&server)
        .await;

    let err = SessionClient::connect(&config_for(&server), &TransportConfig::default())
        .await
        .unwrap_err();

    match err {
        Error::Authentication { endpoint, status } => {
            assert!(endpoint.ends_with("/api/login"));
            assert_eq!(status, 401);
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

// ── Read endpoints ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sites_returns_verbatim_body() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    let body = json!({
        "data": [ { "name": "default", "desc": "Default" } ],
        "meta": { "rc": "ok" },
    });
    Mock::given(method("GET"))
        .and(path("/api/self/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    // no envelope stripping: meta survives
    assert_eq!(client.list_sites().await.unwrap(), body);
}

#[tokio::test]
async fn test_list_devices_hits_site_scoped_path() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/s/branch/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client.list_devices("branch").await.unwrap();
}

#[tokio::test]
async fn test_server_error_carries_endpoint_and_status() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/sta"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.list_active_clients("default").await.unwrap_err();

    match err {
        Error::Endpoint {
            operation,
            endpoint,
            status,
        } => {
            assert_eq!(operation, "list active clients");
            assert!(endpoint.ends_with("/api/s/default/stat/sta"));
            assert_eq!(status, 500);
        }
        other => panic!("expected Endpoint error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_site_id_fails_before_any_request() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.get_ddns_info("").await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got: {err:?}");
}

// ── Stat reports ────────────────────────────────────────────────────

#[tokio::test]
async fn test_stat_report_posts_attribute_body() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/report/hourly.site"))
        .and(body_json(json!({
            "attrs": ["bytes", "time"],
            "start": 1000,
            "end": 2000,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let request = StatRequest {
        attrs: vec!["bytes".into(), "time".into()],
        ..StatRequest::default()
    }
    .with_window(1000, 2000);

    client
        .get_site_stats("default", Interval::Hourly, ElementType::Site, &request)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_daily_ap_wrapper_selects_every_attribute() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/report/daily.ap"))
        .and(body_json(json!({
            "attrs": [
                "bytes", "wan-tx_bytes", "wan-rx_bytes", "wlan_bytes", "num_sta",
                "lan-num_sta", "wlan-num_sta", "time", "rx_bytes", "tx_bytes",
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client.daily_ap_all_stats("default", None).await.unwrap();
}

#[tokio::test]
async fn test_invalid_attribute_never_reaches_the_wire() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/report/hourly.site"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = StatRequest {
        attrs: vec!["packets".into()],
        ..StatRequest::default()
    };
    let err = client
        .get_site_stats("default", Interval::Hourly, ElementType::Site, &request)
        .await
        .unwrap_err();

    assert!(err.is_validation(), "got: {err:?}");
}

// ── DPI ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_station_dpi_carries_type_and_filters() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/stadpi"))
        .and(body_json(json!({
            "type": "by_app",
            "macs": ["aa:bb:cc:dd:ee:ff"],
            "cats": [13],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let macs = vec!["aa:bb:cc:dd:ee:ff".to_owned()];
    client
        .get_station_dpi("default", DpiGroupBy::ByApp, Some(&macs), Some(&[13]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_site_dpi_by_category_omits_filters() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/sitedpi"))
        .and(body_json(json!({ "type": "by_cat" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    // category filter is dropped in by-category mode
    client
        .get_site_dpi("default", DpiGroupBy::ByCat, Some(&[4, 13]))
        .await
        .unwrap();
}
