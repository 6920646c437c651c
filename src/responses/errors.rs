use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;
use tracing::{error, info};

/// Convert a ServerError into a JSON `{"message": ...}` response.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    if err.is_client_error() {
        info!(status, "request rejected: {err}");
    } else {
        error!(status, "request failed: {err}");
    }

    let body = json!({ "message": err.to_string() }).to_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
