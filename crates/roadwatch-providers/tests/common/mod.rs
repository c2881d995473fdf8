// crates/roadwatch-providers/tests/common/mod.rs
// ============================================================================
// Module: Provider Test Helpers
// Description: Local scripted HTTP server and GeoJSON fixtures.
// Purpose: Drive remote providers against deterministic local responses.
// Dependencies: tiny_http
// ============================================================================

//! ## Overview
//! Providers are tested against a local server that plays back a scripted
//! sequence of responses and records the request URLs it saw, so tests can
//! assert both parsing behavior and outbound query construction.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only fixtures; not every suite uses every helper."
)]

use std::thread;

use tiny_http::Response;
use tiny_http::Server;

/// One scripted HTTP response.
pub struct ScriptedResponse {
    /// Status code returned to the client.
    pub status: u16,
    /// Response body returned to the client.
    pub body: String,
}

impl ScriptedResponse {
    /// Creates an HTTP 200 response with the given body.
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    /// Creates a response with an explicit status code.
    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// Spawns a local server that plays back the scripted responses in order.
///
/// Joining the returned handle yields the request URLs seen by the server.
pub fn spawn_scripted(responses: Vec<ScriptedResponse>) -> (String, thread::JoinHandle<Vec<String>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = format!("http://{addr}");

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for scripted in responses {
            let Ok(request) = server.recv() else {
                break;
            };
            seen.push(request.url().to_string());
            let response = Response::from_string(scripted.body).with_status_code(scripted.status);
            let _ = request.respond(response);
        }
        seen
    });

    (url, handle)
}

/// Builds a feature collection body from rendered feature fragments.
pub fn feature_collection(features: &[String]) -> String {
    format!(
        "{{\"type\":\"FeatureCollection\",\"features\":[{}]}}",
        features.join(",")
    )
}

/// Builds a square polygon feature with the given project number.
pub fn polygon_feature(project_number: &str) -> String {
    format!(
        "{{\"type\":\"Feature\",\"geometry\":{{\"type\":\"Polygon\",\"coordinates\":[[[0,0],[10,0],[10,10],[0,10],[0,0]]]}},\"properties\":{{\"projectnummer\":\"{project_number}\"}}}}"
    )
}

/// Builds a two-part multipolygon feature; the second part is larger.
pub fn multipolygon_feature(project_number: &str) -> String {
    format!(
        "{{\"type\":\"Feature\",\"geometry\":{{\"type\":\"MultiPolygon\",\"coordinates\":[[[[0,0],[1,0],[1,1],[0,1],[0,0]]],[[[20,20],[40,20],[40,40],[20,40],[20,20]]]]}},\"properties\":{{\"projectnummer\":\"{project_number}\"}}}}"
    )
}

/// Builds a line feature with arbitrary properties JSON.
pub fn line_feature(coordinates: &str, properties: &str) -> String {
    format!(
        "{{\"type\":\"Feature\",\"geometry\":{{\"type\":\"LineString\",\"coordinates\":{coordinates}}},\"properties\":{properties}}}"
    )
}
