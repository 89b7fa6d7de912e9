use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use fleet_navigator::compliance::{ComplianceError, ComplianceStatus, ComplianceTarget};
use fleet_navigator::sources::{FleetSource, HttpFleetSource};
use fleet_navigator::voyage::{
    predict_voyage, HttpVoyagePredictor, ResponseDetail, VoyageInput, VoyagePredictor,
};
use serde_json::{json, Value};
use url::Url;

async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("upstream serves");
    });
    addr
}

fn url(addr: SocketAddr, path: &str) -> Url {
    Url::parse(&format!("http://{addr}{path}")).expect("valid url")
}

fn fleet_source(addr: SocketAddr) -> HttpFleetSource {
    HttpFleetSource::new(url(addr, "/api/fleet"), Duration::from_secs(2)).expect("client builds")
}

fn predictor(addr: SocketAddr, timeout: Duration) -> HttpVoyagePredictor {
    HttpVoyagePredictor::new(url(addr, "/api/predict"), timeout).expect("client builds")
}

fn tanker_voyage() -> VoyageInput {
    VoyageInput::new("Tanker Ship", 100.0, 2000.0, Some("HFO".to_string()))
}

#[tokio::test]
async fn fleet_records_are_fetched_in_source_order() {
    let router = Router::new().route(
        "/api/fleet",
        get(|| async {
            Json(json!([
                {"ship_id": "NG001", "ship_type": "Tanker Ship", "route_id": "Warri-Bonny",
                 "Compliance_Status": "Surplus", "Compliance_Balance": 19.34, "GHG_Intensity": 70.0},
                {"ship_id": "NG002", "ship_type": "Fishing Trawler", "route_id": "",
                 "Compliance_Status": "", "Compliance_Balance": "", "GHG_Intensity": 95.0},
            ]))
        }),
    );
    let addr = spawn_upstream(router).await;

    let records = fleet_source(addr).fetch().await.expect("fleet fetched");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].ship_id, "NG001");
    assert_eq!(records[0].compliance_balance, Some(19.34));
    assert_eq!(records[1].compliance_balance, None);
    assert_eq!(records[1].ghg_intensity, Some(95.0));
}

#[tokio::test]
async fn fleet_server_error_is_service_unavailable() {
    let router = Router::new().route(
        "/api/fleet",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Run train_model.py first to generate data."})),
            )
        }),
    );
    let addr = spawn_upstream(router).await;

    let err = fleet_source(addr).fetch().await.expect_err("500 upstream");
    assert!(matches!(err, ComplianceError::ServiceUnavailable { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn fleet_body_of_the_wrong_shape_is_distinct_from_an_outage() {
    let router = Router::new().route(
        "/api/fleet",
        get(|| async { Json(json!({"message": "Strategic Navigator API"})) }),
    );
    let addr = spawn_upstream(router).await;

    let err = fleet_source(addr).fetch().await.expect_err("object, not list");
    assert!(matches!(err, ComplianceError::InvalidResponseShape { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unreachable_fleet_source_is_service_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = fleet_source(addr).fetch().await.expect_err("nothing listening");
    assert!(matches!(err, ComplianceError::ServiceUnavailable { .. }));
}

#[tokio::test]
async fn predictor_receives_voyage_fields_and_answer_is_classified() {
    let router = Router::new().route(
        "/api/predict",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["ship_type"], "Tanker Ship");
            assert_eq!(body["distance"], 100.0);
            assert_eq!(body["fuel_consumption"], 2000.0);
            assert_eq!(body["fuel_type"], "HFO");
            Json(json!({
                "predicted_co2": 500.0,
                "ghg_intensity": 91.0,
                "target_used": 89.34,
            }))
        }),
    );
    let addr = spawn_upstream(router).await;
    let predictor = predictor(addr, Duration::from_secs(2));

    let assessment = predict_voyage(&predictor, &tanker_voyage(), &ComplianceTarget::reference())
        .await
        .expect("prediction classified");

    assert_eq!(assessment.status(), ComplianceStatus::Deficit);
    assert!((assessment.balance() + 1.66).abs() < 1e-9);
    assert_eq!(assessment.detail, ResponseDetail::Enriched);
}

#[tokio::test]
async fn predictor_without_predicted_co2_is_an_invalid_shape() {
    let router = Router::new().route(
        "/api/predict",
        post(|| async { Json(json!({"status_code": 400, "detail": "column mismatch"})) }),
    );
    let addr = spawn_upstream(router).await;

    let err = predictor(addr, Duration::from_secs(2))
        .predict(&tanker_voyage())
        .await
        .expect_err("missing predicted_co2");
    assert!(matches!(err, ComplianceError::InvalidResponseShape { .. }));
}

#[tokio::test]
async fn slow_predictor_times_out_as_service_unavailable() {
    let router = Router::new().route(
        "/api/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"predicted_co2": 1.0}))
        }),
    );
    let addr = spawn_upstream(router).await;

    let err = predictor(addr, Duration::from_millis(200))
        .predict(&tanker_voyage())
        .await
        .expect_err("timeout");
    match err {
        ComplianceError::ServiceUnavailable { detail, .. } => {
            assert!(detail.contains("timed out"), "unexpected detail: {detail}")
        }
        other => panic!("expected ServiceUnavailable, got {other:?}"),
    }
}
