//! Mock controller serving the JSON interface.

use keenergy::KeEnergy;
use serde_json::Value;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const READ_PATH: &str = "/var/readWriteVars";

pub fn client(server: &MockServer) -> KeEnergy {
    KeEnergy::new(&server.address().to_string(), false)
}

/// Respond to a read request with exactly the `request` body.
pub async fn mock_read(server: &MockServer, request: Value, response: Value) {
    mock_read_times(server, request, response, 1).await;
}

/// Like [`mock_read`], for a request that is sent `times` times.
pub async fn mock_read_times(server: &MockServer, request: Value, response: Value, times: u64) {
    Mock::given(method("POST"))
        .and(path(READ_PATH))
        .and(body_json(request))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(times)
        .mount(server)
        .await;
}

/// Accept a write request with exactly the `request` body.
pub async fn mock_write(server: &MockServer, request: Value) {
    Mock::given(method("POST"))
        .and(path(READ_PATH))
        .and(query_param("action", "set"))
        .and(body_json(request))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mock_any(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("POST")).and(path(endpoint)).respond_with(response).mount(server).await;
}

/// Bodies of the requests received so far, in order.
pub async fn received_bodies(server: &MockServer) -> Vec<Value> {
    let requests = server.received_requests().await.unwrap_or_default();
    requests.iter().map(|r| serde_json::from_slice(&r.body).unwrap_or(Value::Null)).collect()
}
