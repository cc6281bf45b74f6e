//! End-to-end tests of the HTTP surface, driving a real server on an
//! ephemeral port with raw TCP clients.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use stationreg::{
    AdmissionGate, MemoryStore, NoopCapture, RegistryServer, StatsEngine, V1FailureMode,
};

/// Start a registry server on an ephemeral port, returning its address
async fn start_server(mode: V1FailureMode, window: Duration) -> std::net::SocketAddr {
    let store = Arc::new(MemoryStore::new());
    let gate = Arc::new(AdmissionGate::new(
        store.clone(),
        Arc::new(NoopCapture),
        window,
    ));
    let stats = Arc::new(StatsEngine::new(store, "30d", 2000));
    let server = Arc::new(RegistryServer::new(gate, stats, mode));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.run(listener));
    addr
}

/// Send one HTTP/1.1 request and return (status, body)
async fn send(addr: std::net::SocketAddr, request: String) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8_lossy(&response).to_string();

    let status: u16 = response
        .split_whitespace()
        .nth(1)
        .expect("status line")
        .parse()
        .expect("numeric status");
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_default();
    (status, body)
}

async fn get(addr: std::net::SocketAddr, path_and_query: &str) -> (u16, String) {
    send(
        addr,
        format!(
            "GET {} HTTP/1.1\r\nHost: registry\r\nConnection: close\r\n\r\n",
            path_and_query
        ),
    )
    .await
}

async fn post_json(addr: std::net::SocketAddr, path: &str, body: &str) -> (u16, String) {
    send(
        addr,
        format!(
            "POST {} HTTP/1.1\r\nHost: registry\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            path,
            body.len(),
            body
        ),
    )
    .await
}

#[tokio::test]
async fn v1_register_success_has_empty_body() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;
    let (status, body) = get(
        addr,
        "/api/v1/stations?station_url=http%3A%2F%2Fexample.com&latitude=45.0&longitude=-122.0",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, "");
}

#[tokio::test]
async fn v1_missing_station_url_current_generation() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;
    let (status, body) = get(addr, "/api/v1/stations?description=no+url").await;
    // Current generation: callers must inspect the body, not the status
    assert_eq!(status, 200);
    assert_eq!(body, "FAIL. Missing parameter station_url");
}

#[tokio::test]
async fn v1_missing_station_url_legacy_generation() {
    let addr = start_server(V1FailureMode::StatusCode, Duration::from_secs(3600)).await;
    let (status, body) = get(addr, "/api/v1/stations?description=no+url").await;
    assert_eq!(status, 400);
    assert_eq!(body, "Missing parameter station_url");
}

#[tokio::test]
async fn v1_rate_limit_is_429() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;
    let query = "/api/v1/stations?station_url=http%3A%2F%2Fexample.com";
    let (status, _) = get(addr, query).await;
    assert_eq!(status, 200);

    let (status, body) = get(addr, query).await;
    assert_eq!(status, 429);
    assert!(body.starts_with("FAIL. Registering too frequently"));
}

#[tokio::test]
async fn v1_rate_limit_legacy_body_has_no_prefix() {
    let addr = start_server(V1FailureMode::StatusCode, Duration::from_secs(3600)).await;
    let query = "/api/v1/stations?station_url=http%3A%2F%2Fexample.com";
    get(addr, query).await;
    let (status, body) = get(addr, query).await;
    assert_eq!(status, 429);
    assert_eq!(body, "Registering too frequently");
}

#[tokio::test]
async fn v1_out_of_range_latitude_rejected() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;
    let (status, body) = get(
        addr,
        "/api/v1/stations?station_url=http%3A%2F%2Fexample.com&latitude=95.0",
    )
    .await;
    assert_eq!(status, 200);
    assert!(body.starts_with("FAIL. "));
    assert!(body.contains("latitude"));
}

#[tokio::test]
async fn v2_register_and_list_round_trip() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;

    let (status, body) = post_json(
        addr,
        "/api/v2/stations",
        r#"{"station_url": "http://example.com", "weewx_info": "4.10.2", "latitude": 45.0}"#,
    )
    .await;
    assert_eq!(status, 200, "unexpected failure: {}", body);

    let (status, body) = get(addr, "/api/v2/stations").await;
    assert_eq!(status, 200);
    let stations: serde_json::Value = serde_json::from_str(&body).unwrap();
    let stations = stations.as_array().unwrap();
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0]["station_url"], "http://example.com");
    assert_eq!(stations[0]["latitude"], 45.0);
    assert_eq!(stations[0]["last_addr"], "127.0.0.1");
}

#[tokio::test]
async fn v2_register_rate_limit_is_429() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;
    let body = r#"{"station_url": "http://example.com"}"#;
    post_json(addr, "/api/v2/stations", body).await;
    let (status, text) = post_json(addr, "/api/v2/stations", body).await;
    assert_eq!(status, 429);
    assert!(text.starts_with("FAIL. Registering too frequently"));
}

#[tokio::test]
async fn v2_register_missing_field_reports_fail_body() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;
    let (status, body) = post_json(addr, "/api/v2/stations", r#"{"description": "x"}"#).await;
    assert_eq!(status, 200);
    assert_eq!(body, "FAIL. Missing parameter station_url");

    let (status, body) = post_json(addr, "/api/v2/stations", "not json").await;
    assert_eq!(status, 200);
    assert!(body.starts_with("FAIL. "));
}

#[tokio::test]
async fn v2_list_rejects_conflicting_filters() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;
    let (status, body) = get(addr, "/api/v2/stations?since=1000&max_age=7d").await;
    assert_eq!(status, 400);
    assert_eq!(body, "Badly formed request");
}

#[tokio::test]
async fn v2_list_rejects_bad_max_age_and_limit() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;

    let (status, body) = get(addr, "/api/v2/stations?max_age=90b").await;
    assert_eq!(status, 400);
    assert_eq!(body, "Badly formed request");

    let (status, _) = get(addr, "/api/v2/stations?limit=many").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn v2_stats_consolidated_groups() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;

    for (i, version) in ["4.0.0", "4.0.1", "4.1.0"].iter().enumerate() {
        let (status, body) = post_json(
            addr,
            "/api/v2/stations",
            &format!(
                r#"{{"station_url": "http://s{}.example.com", "weewx_info": "{}"}}"#,
                i, version
            ),
        )
        .await;
        assert_eq!(status, 200, "seed failed: {}", body);
    }

    let (status, body) = get(addr, "/api/v2/stats/weewx_info?consolidate=true").await;
    assert_eq!(status, 200);
    let stats: serde_json::Value = serde_json::from_str(&body).unwrap();
    let groups = stats.as_object().unwrap();
    assert_eq!(groups.len(), 2);

    // Each group is a pair of equal-length arrays: timestamps and counts
    let four_zero = groups["4.0"].as_array().unwrap();
    assert_eq!(four_zero.len(), 2);
    let counts = four_zero[1].as_array().unwrap();
    assert_eq!(counts.last().unwrap().as_u64(), Some(2));
}

#[tokio::test]
async fn v2_stats_unknown_info_type_is_400() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;
    let (status, _) = get(addr, "/api/v2/stats/last_addr").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let addr = start_server(V1FailureMode::FailBody, Duration::from_secs(3600)).await;
    let (status, _) = get(addr, "/api/v3/stations").await;
    assert_eq!(status, 404);
}
