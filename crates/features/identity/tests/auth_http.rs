use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::middleware::from_fn_with_state;
use http_body_util::BodyExt;
use serde_json::Value;
use thesis_database::Database;
use thesis_identity::{CreateUserRequest, Identity, require_auth};
use thesis_kernel::domain::config::ApiConfig;
use thesis_kernel::prelude::{ApiState, InitializedSlice, Role};
use tower::ServiceExt;

struct Harness {
    router: axum::Router,
    identity: Identity,
}

async fn harness() -> Harness {
    let mut config = ApiConfig::default();
    config.security.jwt.secret = "http-test".into();

    let db = Database::builder().url("mem://").session("thesis", "auth").init().await.unwrap();
    let identity = thesis_identity::init(&config, &db).await.unwrap();
    let state = ApiState::builder()
        .config(config)
        .db(db)
        .register_slice(InitializedSlice::new(identity.clone()))
        .build()
        .unwrap();

    let (router, _) = thesis_identity::router().split_for_parts();
    let router = router.layer(from_fn_with_state(state.clone(), require_auth)).with_state(state);
    Harness { router, identity }
}

async fn call(router: &axum::Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::get(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = router.clone().oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn missing_and_invalid_tokens_get_401_envelopes() {
    let h = harness().await;

    let (status, body) = call(&h.router, "/api/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 401);
    assert_eq!(body["message"], "Thiếu token xác thực");

    let (status, body) = call(&h.router, "/api/me", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token không hợp lệ hoặc đã hết hạn");
}

#[tokio::test]
async fn valid_token_reaches_handler_and_roles_are_enforced() {
    let h = harness().await;
    let student = h
        .identity
        .users
        .create(CreateUserRequest {
            email: "sv@uni.vn".into(),
            full_name: "Sinh Viên".into(),
            role: Role::Student,
        })
        .await
        .unwrap();
    let token = h.identity.tokens.issue(&student.uid, Role::Student).unwrap();

    let (status, body) = call(&h.router, "/api/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "sv@uni.vn");
    assert_eq!(body["data"]["role"], "STUDENT");

    let (status, body) = call(&h.router, "/api/users", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Bạn không có quyền thực hiện thao tác này");
}

#[tokio::test]
async fn tokens_of_unknown_accounts_are_rejected() {
    let h = harness().await;
    let token = h.identity.tokens.issue("ghost", Role::Admin).unwrap();

    let (status, _) = call(&h.router, "/api/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
