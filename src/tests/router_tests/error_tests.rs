use super::{json_body, post};
use crate::errors::ServerError;
use crate::router::{handle, respond};
use crate::tests::utils::{seeded_state, StubScores};
use astra::Body;
use http::{Method, Request};
use serde_json::json;
use std::sync::Arc;

#[test]
fn unknown_city_is_a_client_error_naming_the_city() {
    let fx = seeded_state();

    let resp = respond(
        post("/api/livability", json!({"city": "atlantis", "state": "GA"})),
        &fx.state,
    );

    assert_eq!(resp.status(), 422);
    assert_eq!(
        json_body(resp),
        json!({"message": "No data found for Atlantis, GA"})
    );
}

#[test]
fn unknown_state_name_is_rejected() {
    let fx = seeded_state();

    let err = handle(
        post("/api/crime", json!({"city": "Cair Paravel", "state": "Narnia"})),
        &fx.state,
    )
    .unwrap_err();

    assert!(matches!(err, ServerError::InvalidInput { field: "state", .. }));
    assert_eq!(err.status(), 422);
}

#[test]
fn missing_walk_score_is_a_client_error() {
    let fx = seeded_state();
    let mut state = fx.state.clone();
    state.scores = Arc::new(StubScores::unavailable());

    for path in ["/api/walkability", "/api/livability", "/api/get_data"] {
        let resp = respond(post(path, json!({"city": "Austin", "state": "TX"})), &state);
        assert_eq!(resp.status(), 422, "{path}");
        assert_eq!(
            json_body(resp)["message"],
            json!("Walkscore not found for Austin, TX"),
            "{path}"
        );
    }
}

#[test]
fn single_field_endpoints_do_not_need_walk_scores() {
    let fx = seeded_state();
    let mut state = fx.state.clone();
    state.scores = Arc::new(StubScores::unavailable());

    let resp = respond(
        post("/api/coordinates", json!({"city": "Austin", "state": "TX"})),
        &state,
    );
    assert_eq!(resp.status(), 200);
}

#[test]
fn zero_weights_are_rejected() {
    let fx = seeded_state();

    let resp = respond(
        post(
            "/api/livability",
            json!({
                "city": "Austin",
                "state": "TX",
                "weights": {
                    "walkability": 0, "diversity": 0, "low_rent": 0,
                    "low_pollution": 0, "low_crime": 0
                }
            }),
        ),
        &fx.state,
    );
    assert_eq!(resp.status(), 422);
}

#[test]
fn malformed_body_is_bad_request() {
    let fx = seeded_state();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/crime")
        .body(Body::from("{\"city\": \"Austin\""))
        .unwrap();

    let err = handle(req, &fx.state).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn well_formed_body_of_the_wrong_shape_is_422() {
    let fx = seeded_state();

    let resp = respond(post("/api/crime", json!({"city": "Austin"})), &fx.state);
    assert_eq!(resp.status(), 422);

    let err = handle(
        post(
            "/api/livability",
            json!({"city": "Austin", "state": "TX", "weights": {"sunshine": 1.0}}),
        ),
        &fx.state,
    )
    .unwrap_err();
    assert!(matches!(err, ServerError::InvalidBody(_)));
}

#[test]
fn get_on_api_path_is_method_not_allowed() {
    let fx = seeded_state();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/crime")
        .body(Body::empty())
        .unwrap();

    assert_eq!(respond(req, &fx.state).status(), 405);
}

#[test]
fn unknown_route_is_404() {
    let fx = seeded_state();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/horoscope")
        .body(Body::empty())
        .unwrap();

    let resp = respond(req, &fx.state);
    assert_eq!(resp.status(), 404);
    assert_eq!(json_body(resp), json!({"message": "Not Found"}));
}
