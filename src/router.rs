use crate::errors::{ResultResp, ServerError};
use crate::responses::error_to_response;
use crate::handlers;
use crate::state::AppState;
use astra::{Body, Request, Response};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::time::Instant;
use tracing::info;

/// Every path the API serves. All of them take a POST with a JSON body.
pub const API_ROUTES: &[&str] = &[
    "/api/get_data",
    "/api/coordinates",
    "/api/crime",
    "/api/rental_price",
    "/api/pollution",
    "/api/walkability",
    "/api/livability",
    "/api/population",
    "/api/diversity",
    "/api/nearest",
];

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let start = Instant::now();
    let (parts, mut body) = req.into_parts();
    let method = parts.method.as_str();
    let path = parts.uri.path();

    let result = route(method, path, &mut body, state);

    info!(
        method,
        path,
        ok = result.is_ok(),
        elapsed = ?start.elapsed(),
        "handled request"
    );
    result
}

/// `handle`, with errors rendered as JSON responses.
pub fn respond(req: Request, state: &AppState) -> Response {
    handle(req, state).unwrap_or_else(error_to_response)
}

fn route(method: &str, path: &str, body: &mut Body, state: &AppState) -> ResultResp {
    match (method, path) {
        ("POST", "/api/get_data") => handlers::get_data(read_json(body)?, state),
        ("POST", "/api/coordinates") => handlers::coordinates(read_json(body)?, state),
        ("POST", "/api/crime") => handlers::crime(read_json(body)?, state),
        ("POST", "/api/rental_price") => handlers::rental_price(read_json(body)?, state),
        ("POST", "/api/pollution") => handlers::pollution(read_json(body)?, state),
        ("POST", "/api/walkability") => handlers::walkability(read_json(body)?, state),
        ("POST", "/api/livability") => handlers::livability(read_json(body)?, state),
        ("POST", "/api/population") => handlers::population(read_json(body)?, state),
        ("POST", "/api/diversity") => handlers::diversity(read_json(body)?, state),
        ("POST", "/api/nearest") => handlers::nearest(read_json(body)?, state),
        (_, p) if API_ROUTES.contains(&p) => Err(ServerError::MethodNotAllowed),
        _ => Err(ServerError::UnknownRoute),
    }
}

/// Unreadable JSON is a 400; well-formed JSON of the wrong shape is a 422.
fn read_json<T: DeserializeOwned>(body: &mut Body) -> Result<T, ServerError> {
    serde_json::from_reader(body.reader()).map_err(|e| match e.classify() {
        Category::Data => ServerError::InvalidBody(e.to_string()),
        Category::Io | Category::Syntax | Category::Eof => {
            ServerError::BadRequest(format!("Invalid JSON body: {e}"))
        }
    })
}
