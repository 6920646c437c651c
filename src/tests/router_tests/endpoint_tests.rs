use super::{json_body, post};
use crate::router::respond;
use crate::tests::utils::seeded_state;
use serde_json::json;

#[test]
fn coordinates_normalize_full_state_name() {
    let fx = seeded_state();

    let resp = respond(
        post("/api/coordinates", json!({"city": "new york", "state": "new york"})),
        &fx.state,
    );

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/json"
    );
    assert_eq!(
        json_body(resp),
        json!({"latitude": 40.7128, "longitude": -74.006})
    );
}

#[test]
fn single_field_endpoints() {
    let fx = seeded_state();
    let austin = json!({"city": "AUSTIN", "state": "tx"});

    let cases = [
        ("/api/crime", json!({"crime": "Medium"})),
        ("/api/rental_price", json!({"rental_price": 1800.0})),
        ("/api/pollution", json!({"air_quality_index": "Good"})),
        ("/api/population", json!({"population": 961855})),
        ("/api/diversity", json!({"diversity_index": 0.6})),
        ("/api/walkability", json!({"walkability": 88})),
    ];

    for (path, expected) in cases {
        let resp = respond(post(path, austin.clone()), &fx.state);
        assert_eq!(resp.status(), 200, "{path}");
        assert_eq!(json_body(resp), expected, "{path}");
    }
}

#[test]
fn livability_with_and_without_weights() {
    let fx = seeded_state();

    // Boulder with walk 88: [88, 50, 40, 50, 50]
    let resp = respond(
        post("/api/livability", json!({"city": "boulder", "state": "colorado"})),
        &fx.state,
    );
    assert_eq!(resp.status(), 200);
    assert_eq!(json_body(resp), json!({"livability": 56}));

    let resp = respond(
        post(
            "/api/livability",
            json!({"city": "boulder", "state": "CO", "weights": {"walkability": 2}}),
        ),
        &fx.state,
    );
    assert_eq!(resp.status(), 200);
    // (176 + 50 + 40 + 50 + 50) / 6 = 61
    assert_eq!(json_body(resp), json!({"livability": 61}));
}

#[test]
fn nearest_keeps_neighbor_order() {
    let fx = seeded_state();

    let resp = respond(
        post("/api/nearest", json!({"city": "New York", "state": "NY"})),
        &fx.state,
    );

    assert_eq!(resp.status(), 200);
    assert_eq!(
        json_body(resp),
        json!({
            "recommendations": [
                {"city": "Austin", "state": "TX"},
                {"city": "Portland", "state": "OR"},
                {"city": "Boulder", "state": "CO"}
            ],
            "missing": []
        })
    );
}

#[test]
fn nearest_reports_dangling_ids() {
    let fx = seeded_state();

    let resp = respond(
        post("/api/nearest", json!({"city": "portland", "state": "or"})),
        &fx.state,
    );

    let body = json_body(resp);
    assert_eq!(body["recommendations"], json!([{"city": "Boulder", "state": "CO"}]));
    assert_eq!(body["missing"], json!([42]));
}

#[test]
fn get_data_merges_everything() {
    let fx = seeded_state();

    let resp = respond(
        post("/api/get_data", json!({"city": "boulder", "state": "co"})),
        &fx.state,
    );
    assert_eq!(resp.status(), 200);

    let body = json_body(resp);
    assert_eq!(body["city"], json!({"city": "Boulder", "state": "CO"}));
    assert_eq!(body["rental_price"], json!(2000.0));
    assert_eq!(body["crime"], json!("Low"));
    assert_eq!(body["air_quality_index"], json!("Good"));
    assert_eq!(body["population"], json!(105485));
    assert_eq!(body["walkability"], json!(88));
    assert_eq!(body["livability"], json!(56));
    assert_eq!(
        body["recommendations"],
        json!([
            {"city": "Austin", "state": "TX"},
            {"city": "Portland", "state": "OR"}
        ])
    );
    assert_eq!(body["missing_recommendations"], json!([]));
}
