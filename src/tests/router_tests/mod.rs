mod endpoint_tests;
mod error_tests;

use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;

fn post(path: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_body(resp: Response) -> serde_json::Value {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    serde_json::from_str(&body).unwrap_or_else(|e| panic!("not JSON ({e}): {body}"))
}
