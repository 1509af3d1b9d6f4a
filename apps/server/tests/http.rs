use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use thesis::domain::config::{ApiConfig, BootstrapAdmin};
use thesis::features::identity::Identity;
use thesis_server::Server;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@uni.vn";

struct App {
    router: Router,
    admin_token: String,
}

async fn app() -> App {
    let mut config = ApiConfig::default();
    config.database.database = "http".into();
    config.security.jwt.secret = "server-http-test".into();
    config.security.bootstrap_admin =
        Some(BootstrapAdmin { email: ADMIN_EMAIL.into(), full_name: "Quản Trị".into() });

    let server = Server::builder().config(config).build().await.unwrap();
    let identity = server.state().try_get_slice::<Identity>().unwrap();
    let admin = identity.users.find_by_email(ADMIN_EMAIL).await.unwrap().unwrap();
    let admin_token = identity.tokens.issue(&admin.uid, admin.role).unwrap();

    App { router: server.router(), admin_token }
}

async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        },
        None => Body::empty(),
    };

    let response = router.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_is_public_and_api_is_not() {
    let app = app().await;

    let (status, body) = call(&app.router, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], true);

    let (status, body) =
        call(&app.router, Method::GET, "/api/submission-periods", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn bootstrap_admin_manages_users_and_periods() {
    let app = app().await;
    let token = Some(app.admin_token.as_str());

    let (status, body) = call(&app.router, Method::GET, "/api/me", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);

    let (status, body) = call(
        &app.router,
        Method::POST,
        "/api/users",
        token,
        Some(json!({ "email": "gv@uni.vn", "fullName": "Giảng Viên", "role": "LECTURER" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "Tạo người dùng thành công");

    let (status, body) = call(
        &app.router,
        Method::POST,
        "/api/submission-periods",
        token,
        Some(json!({
            "semester": "SU25",
            "roundNumber": 1,
            "startDate": "2025-05-01",
            "endDate": "2025-05-31",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["semester"], "SU25");
    assert_eq!(body["data"]["status"], "COMPLETE");
    let id = body["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) =
        call(&app.router, Method::GET, &format!("/api/submission-periods/{id}"), token, None)
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["roundNumber"], 1);
}

#[tokio::test]
async fn errors_use_the_envelope() {
    let app = app().await;
    let token = Some(app.admin_token.as_str());

    let (status, body) =
        call(&app.router, Method::GET, "/api/submission-periods/missing", token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Không tìm thấy đợt nộp");

    let (status, body) = call(
        &app.router,
        Method::POST,
        "/api/submission-periods",
        token,
        Some(json!({
            "semester": "SU25",
            "roundNumber": 1,
            "startDate": "2025-05-31",
            "endDate": "2025-05-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}
