//! Integration tests for the upstream client (wiremock-based)

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use transit::{DbRestClient, TransitClient, TransitConfig, TransitError};

fn config_for_mock(base_url: &str) -> TransitConfig {
    TransitConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..TransitConfig::default()
    }
}

const fn sample_locations_json() -> &'static str {
    r#"[
        {
            "type": "stop",
            "id": "8000107",
            "name": "Freiburg(Breisgau) Hbf",
            "location": { "latitude": 47.997696, "longitude": 7.841632 }
        },
        {
            "type": "stop",
            "id": "680948",
            "name": "Bertoldsbrunnen, Freiburg im Breisgau",
            "location": { "latitude": 47.995207, "longitude": 7.849298 }
        }
    ]"#
}

const fn sample_departures_json() -> &'static str {
    r#"{
        "departures": [{
            "when": "2026-08-06T10:02:00+02:00",
            "plannedWhen": "2026-08-06T10:00:00+02:00",
            "delay": 120,
            "platform": "1",
            "direction": "Littenweiler",
            "line": { "name": "STR 1", "product": "tram", "mode": "train" },
            "destination": { "type": "stop", "name": "Lassbergstraße" }
        }],
        "realtimeDataUpdatedAt": 1770362520
    }"#
}

const fn sample_journeys_json() -> &'static str {
    r#"{
        "journeys": [{
            "legs": [{
                "origin": { "type": "stop", "id": "8000107", "name": "Freiburg(Breisgau) Hbf" },
                "destination": { "type": "stop", "id": "8000290", "name": "Offenburg" },
                "departure": "2026-08-06T10:00:00+02:00",
                "arrival": "2026-08-06T10:40:00+02:00",
                "direction": "Karlsruhe Hbf",
                "line": { "name": "RE 7", "product": "regional", "mode": "train" }
            }]
        }]
    }"#
}

#[tokio::test]
async fn test_nearby_stops_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/nearby"))
        .and(query_param("distance", "500"))
        .and(query_param("stops", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_locations_json()))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    let stops = client.nearby_stops(47.9959, 7.8522, 500, 10).await.unwrap();

    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0].id, "8000107");
    assert!(stops[0].distance_meters.is_none());
}

#[tokio::test]
async fn test_search_stops_sends_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .and(query_param("query", "Freiburg"))
        .and(query_param("fuzzy", "true"))
        .and(query_param("addresses", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_locations_json()))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    let stops = client.search_stops("Freiburg", 10).await.unwrap();

    assert_eq!(stops.len(), 2);
    assert_eq!(stops[1].name, "Bertoldsbrunnen, Freiburg im Breisgau");
}

#[tokio::test]
async fn test_departures_wrapped_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/8000107/departures"))
        .and(query_param("duration", "60"))
        .and(query_param("taxi", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_departures_json()))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    let departures = client.departures("8000107", None, 10, 60).await.unwrap();

    assert_eq!(departures.len(), 1);
    assert_eq!(departures[0].line, "STR 1");
    assert_eq!(departures[0].destination, "Lassbergstraße");
    assert_eq!(departures[0].delay_minutes, Some(2));
}

#[tokio::test]
async fn test_departures_bare_array_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/8000107/departures"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{ "plannedWhen": "2026-08-06T10:00:00+02:00", "direction": "Günterstal" }]"#,
        ))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    let departures = client.departures("8000107", None, 10, 60).await.unwrap();

    assert_eq!(departures.len(), 1);
    assert_eq!(departures[0].line, "?");
}

#[tokio::test]
async fn test_arrivals_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/8000107/arrivals"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "arrivals": [{
                "plannedWhen": "2026-08-06T11:00:00+02:00",
                "provenance": "Offenburg",
                "line": { "name": "RE 7", "product": "regional" }
            }] }"#,
        ))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    let arrivals = client.arrivals("8000107", None, 10, 60).await.unwrap();

    assert_eq!(arrivals.len(), 1);
    assert_eq!(arrivals[0].origin, "Offenburg");
}

#[tokio::test]
async fn test_journeys_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/journeys"))
        .and(query_param("from", "8000107"))
        .and(query_param("to", "8000290"))
        .and(query_param("stopovers", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_journeys_json()))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    let routes = client.journeys("8000107", "8000290", None, 5).await.unwrap();

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].legs.len(), 1);
    assert_eq!(routes[0].duration_minutes, Some(40));
    assert_eq!(routes[0].legs[0].line.as_deref(), Some("RE 7"));
}

#[tokio::test]
async fn test_server_error_maps_to_upstream_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/nearby"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .nearby_stops(47.9959, 7.8522, 500, 10)
        .await
        .unwrap_err();

    assert_eq!(err.upstream_status(), Some(503));
}

#[tokio::test]
async fn test_rate_limit_maps_to_upstream_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/journeys"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .journeys("8000107", "8000290", None, 5)
        .await
        .unwrap_err();

    assert_eq!(err.upstream_status(), Some(429));
}

#[tokio::test]
async fn test_malformed_payload_maps_to_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/nearby"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .nearby_stops(47.9959, 7.8522, 500, 10)
        .await
        .unwrap_err();

    assert!(matches!(err, TransitError::Upstream { status: None, .. }));
    assert!(err.to_string().contains("malformed payload"));
}

#[tokio::test]
async fn test_is_healthy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    assert!(client.is_healthy().await);
}

#[tokio::test]
async fn test_is_healthy_false_on_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = DbRestClient::new(&config_for_mock(&server.uri())).unwrap();
    assert!(!client.is_healthy().await);
}
