#![cfg(feature = "server")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use std::any::Any;
use thesis_database::Database;
use thesis_kernel::domain::registry::{FeatureSlice, InitializedSlice};
use thesis_kernel::server::{ApiState, system_router};
use tower::ServiceExt;

#[derive(Debug)]
struct Probe(u8);

impl FeatureSlice for Probe {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Missing;

impl FeatureSlice for Missing {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

async fn state() -> ApiState {
    let db = Database::builder().url("mem://").session("thesis", "kernel").init().await.unwrap();
    ApiState::builder().db(db).register_slice(InitializedSlice::new(Probe(7))).build().unwrap()
}

#[tokio::test]
async fn registered_slices_are_found_by_type() {
    let state = state().await;
    assert_eq!(state.try_get_slice::<Probe>().unwrap().0, 7);
    assert!(state.try_get_slice::<Missing>().is_err());
    assert_eq!(state.slice_names(), vec!["Probe"]);
}

#[tokio::test]
async fn state_requires_a_database_and_unique_slices() {
    assert!(ApiState::builder().build().is_err());

    let db = Database::builder().url("mem://").session("thesis", "twice").init().await.unwrap();
    let err = ApiState::builder()
        .db(db)
        .register_slice(InitializedSlice::new(Probe(1)))
        .register_slices([InitializedSlice::new(Missing), InitializedSlice::new(Probe(2))])
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("Probe"));
}

#[tokio::test]
async fn health_reports_database_status() {
    let state = state().await;
    let (router, _api) = system_router().split_for_parts();

    let response = router
        .with_state(state)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], true);
}
