//! HTTP surface tests over the full router with scripted capabilities.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chemviz_core::lookup::{CompoundHit, MockLookup};
use chemviz_core::oracle::{MockOracle, StructureOracle};
use chemviz_core::resolver::NO_INPUT_MESSAGE;
use chemviz_web::router::build_router;
use chemviz_web::state::AppState;
use tower::ServiceExt;

fn offline_router() -> Router {
    build_router(AppState::with_capabilities(
        None,
        Arc::new(MockLookup::new()),
    ))
}

fn lookup_router() -> Router {
    let lookup = MockLookup::new().with_compound(
        "ethanol",
        CompoundHit {
            smiles: "CCO".to_string(),
            molecular_formula: Some("C2H6O".to_string()),
            molecular_weight: Some(46.07),
            cid: Some(702),
        },
    );
    build_router(AppState::with_capabilities(None, Arc::new(lookup)))
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_visualize(router: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/visualize")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_health_reports_capabilities() {
    let (status, json) = get_json(offline_router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["oracle_enabled"], false);

    let with_oracle = build_router(AppState::with_capabilities(
        Some(Arc::new(MockOracle::new()) as Arc<dyn StructureOracle>),
        Arc::new(MockLookup::new()),
    ));
    let (_, json) = get_json(with_oracle, "/health").await;
    assert_eq!(json["oracle_enabled"], true);
}

#[tokio::test]
async fn test_visualize_named_compound() {
    let (status, json) =
        post_visualize(lookup_router(), serde_json::json!({"input": "ethanol"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "resolved");
    assert_eq!(json["record"]["source"], "database");
    assert_eq!(json["record"]["smiles"], "CCO");
    assert_eq!(json["record"]["pubchem_cid"], 702);
    assert!(json["message"].is_null());

    let properties = json["properties"].as_array().unwrap();
    assert_eq!(properties.len(), 8);
    assert_eq!(properties[0]["label"], "Molecular Weight");
    assert_eq!(properties[0]["display"], "46.07 g/mol");

    let molblock = json["molblock"].as_str().unwrap();
    assert!(molblock.contains("  9  8  0"));
    assert!(molblock.contains("M  END"));

    assert_eq!(json["atom_colors"]["C"], "#909090");
    assert_eq!(json["atom_colors"]["O"], "#FF0D0D");
    assert_eq!(json["atom_colors"]["H"], "#FFFFFF");
}

#[tokio::test]
async fn test_visualize_notation_directly() {
    let (status, json) =
        post_visualize(offline_router(), serde_json::json!({"input": "c1ccccc1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "resolved");
    assert_eq!(json["record"]["source"], "direct_parse");
    assert_eq!(json["record"]["molecular_formula"], "C6H6");
    let rings = json["properties"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["label"] == "Rings")
        .cloned()
        .unwrap();
    assert_eq!(rings["display"], "1");
}

#[tokio::test]
async fn test_visualize_gibberish_is_unresolved() {
    let (status, json) =
        post_visualize(offline_router(), serde_json::json!({"input": "xyzzy blorp"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "unresolved");
    assert!(json["record"]["smiles"].is_null());
    assert!(json["molblock"].is_null());
    assert_eq!(json["properties"], serde_json::json!([]));
    assert!(!json["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_visualize_empty_input() {
    let (status, json) = post_visualize(offline_router(), serde_json::json!({"input": "  "})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "unresolved");
    assert_eq!(json["message"], NO_INPUT_MESSAGE);
}

#[tokio::test]
async fn test_visualize_disconnected_notation_is_embedding_failure() {
    let (status, json) =
        post_visualize(offline_router(), serde_json::json!({"input": "C.C"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "embedding_failed");
    assert_eq!(json["record"]["source"], "direct_parse");
    assert!(json["molblock"].is_null());
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("could not build its 3D geometry"));
}

#[tokio::test]
async fn test_visualize_through_oracle() {
    let oracle = MockOracle::new().with_response(
        "```json\n{\"smiles\": \"CC(=O)Oc1ccccc1C(=O)O\", \"common_name\": \"aspirin\", \"pubchem_cid\": 2244}\n```",
    );
    let router = build_router(AppState::with_capabilities(
        Some(Arc::new(oracle) as Arc<dyn StructureOracle>),
        Arc::new(MockLookup::new().offline()),
    ));

    let (status, json) = post_visualize(router, serde_json::json!({"input": "aspirin"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "resolved");
    assert_eq!(json["record"]["source"], "oracle");
    assert_eq!(json["record"]["common_name"], "aspirin");
    let heavy = json["properties"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["label"] == "Heavy Atoms")
        .cloned()
        .unwrap();
    assert_eq!(heavy["display"], "13");
}

#[tokio::test]
async fn test_missing_input_field_is_client_error() {
    let (status, _) = post_visualize(offline_router(), serde_json::json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
