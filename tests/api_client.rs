use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use betomeshi::api::{ApiClient, RequestOptions};
use betomeshi::error::ApiError;
use betomeshi::models::{
    Credentials, Dish, RegistrationRequest, UpdatePasswordRequest, UpdateUserRequest,
};
use betomeshi::session::{MemoryTokenStore, Session};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde_json::{Value, json};
use tokio::net::TcpListener;

const TOKEN: &str = "abc";

#[derive(Debug, Clone)]
struct Seen {
    path: &'static str,
    authorization: Option<String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct Backend {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Backend {
    fn record(&self, path: &'static str, headers: &HeaderMap, body: Option<Value>) {
        let authorization = header_str(headers, header::AUTHORIZATION);
        self.seen.lock().unwrap().push(Seen {
            path,
            authorization,
            body,
        });
    }

    fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    header_str(headers, header::AUTHORIZATION).as_deref() == Some("Bearer abc")
}

async fn login(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record("/auth/login", &headers, Some(body.clone()));
    if body["password"] == "Secret123!" {
        Json(json!({"token": TOKEN, "message": "ok"})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials", "message": "ignored"})),
        )
            .into_response()
    }
}

async fn register(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record("/auth/register", &headers, Some(body));
    (StatusCode::CREATED, Json(json!({"message": "User registered successfully"}))).into_response()
}

async fn me(State(b): State<Backend>, headers: HeaderMap) -> Response {
    b.record("/me", &headers, None);
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"}))).into_response();
    }
    Json(json!({
        "data": {
            "name": "Haru",
            "national": "Japan",
            "email": "u@example.com",
            "avatar": "/haru.png"
        }
    }))
    .into_response()
}

async fn famous_dishes(State(b): State<Backend>, headers: HeaderMap) -> Response {
    b.record("/disharmonious", &headers, None);
    Json(json!({
        "status": "success",
        "data": [{"id": 1, "name": "Pho", "imageUrl": "/p.jpg", "rate": 4.8}]
    }))
    .into_response()
}

async fn top3(State(b): State<Backend>, headers: HeaderMap) -> Response {
    b.record("/favourite-top3", &headers, None);
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Missing token"}))).into_response();
    }
    Json(json!({
        "status": "success",
        "data": [
            {"id": 1, "dishesname": "Bun Cha", "restaurantname": "Hanoi Corner", "distance": 1.2, "imageUrl": "/b.jpg"},
            {"id": 2, "dishesname": "Com Tam", "restaurantname": "Saigon House", "distance": 0.4, "imageUrl": "/c.jpg"}
        ]
    }))
    .into_response()
}

async fn update_user(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record("/updateUser", &headers, Some(body));
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"}))).into_response();
    }
    Json(json!({"message": "User information updated successfully"})).into_response()
}

async fn update_password(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record("/updatePassword", &headers, Some(body.clone()));
    if body["oldPassword"] != "Secret123!" {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Old password is incorrect"}))).into_response();
    }
    Json(json!({"message": "Password updated successfully"})).into_response()
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "authorization": header_str(&headers, header::AUTHORIZATION),
        "contentType": header_str(&headers, header::CONTENT_TYPE),
    }))
}

async fn start_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/me", get(me))
        .route("/disharmonious", get(famous_dishes))
        .route("/favourite-top3", get(top3))
        .route("/updateUser", put(update_user))
        .route("/updatePassword", put(update_password))
        .route("/echo-headers", get(echo_headers))
        .route("/fail/text", get(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded") }))
        .route("/fail/empty", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/fail/json-other",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"detail": "missing"}))) }),
        )
        .route("/not-json", get(|| async { "hello" }))
        .with_state(backend.clone());

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind mock backend");
    let addr: SocketAddr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("mock backend error: {}", e);
        }
    });

    (format!("http://{}", addr), backend)
}

fn anonymous(base: &str) -> ApiClient {
    ApiClient::new(base, Session::in_memory())
}

fn logged_in(base: &str) -> ApiClient {
    ApiClient::new(base, Session::new(MemoryTokenStore::with_token(TOKEN)))
}

#[tokio::test]
async fn login_returns_body_unchanged() {
    let (base, backend) = start_backend().await;
    let client = anonymous(&base);

    let response = client
        .auth()
        .login(&Credentials {
            username: "u@example.com".into(),
            password: "Secret123!".into(),
        })
        .await
        .expect("login");

    assert_eq!(response.token, "abc");
    assert_eq!(response.message, "ok");

    let seen = backend.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization, None);
    assert_eq!(
        seen[0].body,
        Some(json!({"username": "u@example.com", "password": "Secret123!"}))
    );
}

#[tokio::test]
async fn failed_login_uses_error_field() {
    let (base, _) = start_backend().await;
    let err = anonymous(&base)
        .auth()
        .login(&Credentials {
            username: "u@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn register_accepts_created() {
    let (base, backend) = start_backend().await;
    let response = anonymous(&base)
        .auth()
        .register(&RegistrationRequest {
            name: "Haru".into(),
            username: "u@example.com".into(),
            password: "Secret123!".into(),
            national: "Japan".into(),
        })
        .await
        .expect("register");

    assert_eq!(response.message, "User registered successfully");
    assert_eq!(backend.requests()[0].body.as_ref().unwrap()["national"], "Japan");
}

#[tokio::test]
async fn current_user_without_token_is_unauthorized() {
    let (base, backend) = start_backend().await;
    let err = anonymous(&base).auth().get_current_user().await.unwrap_err();

    assert_eq!(err.to_string(), "unauthorized");
    assert!(matches!(err, ApiError::Request { .. }));
    assert_eq!(backend.requests()[0].authorization, None);
}

#[tokio::test]
async fn current_user_with_token_sends_bearer() {
    let (base, backend) = start_backend().await;
    let profile = logged_in(&base).auth().get_current_user().await.expect("me");

    assert_eq!(profile.name, "Haru");
    assert_eq!(profile.nationality, "Japan");
    assert_eq!(profile.avatar.as_deref(), Some("/haru.png"));
    assert_eq!(backend.requests()[0].authorization.as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn famous_dishes_keep_float_precision() {
    let (base, _) = start_backend().await;
    let response = anonymous(&base).dish().get_famous_dishes().await.expect("dishes");

    assert!(response.is_success());
    assert_eq!(
        response.data,
        vec![Dish {
            id: 1,
            name: "Pho".into(),
            image_url: "/p.jpg".into(),
            rate: 4.8,
        }]
    );
    assert_eq!(response.message, None);
}

#[tokio::test]
async fn top3_favorites_is_idempotent() {
    let (base, _) = start_backend().await;
    let client = logged_in(&base);

    let first = client.favorite().get_top3_favorites().await.expect("first");
    let second = client.favorite().get_top3_favorites().await.expect("second");

    assert_eq!(first, second);
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.data[0].dish_name, "Bun Cha");
    assert_eq!(first.data[1].restaurant_name.as_deref(), Some("Saigon House"));
}

#[tokio::test]
async fn token_set_after_login_is_used_for_later_requests() {
    let (base, backend) = start_backend().await;
    let client = anonymous(&base);

    let login = client
        .auth()
        .login(&Credentials {
            username: "u@example.com".into(),
            password: "Secret123!".into(),
        })
        .await
        .expect("login");
    client.session().set_token(&login.token).expect("store token");

    client.favorite().get_top3_favorites().await.expect("favorites");
    client.session().clear().expect("clear");
    let err = client.favorite().get_top3_favorites().await.unwrap_err();
    assert_eq!(err.to_string(), "Missing token");

    let auth: Vec<Option<String>> = backend
        .requests()
        .into_iter()
        .map(|s| s.authorization)
        .collect();
    assert_eq!(auth, vec![None, Some("Bearer abc".into()), None]);
}

#[tokio::test]
async fn update_user_sends_nulls_and_bearer() {
    let (base, backend) = start_backend().await;
    let response = logged_in(&base)
        .user()
        .update_user(&UpdateUserRequest {
            fullname: Some("Haru Tanaka".into()),
            ..Default::default()
        })
        .await
        .expect("update");

    assert_eq!(response.message, "User information updated successfully");
    let seen = &backend.requests()[0];
    assert_eq!(seen.path, "/updateUser");
    assert_eq!(seen.authorization.as_deref(), Some("Bearer abc"));
    assert_eq!(
        seen.body,
        Some(json!({"fullname": "Haru Tanaka", "national": null, "avatar": null, "email": null}))
    );
}

#[tokio::test]
async fn wrong_old_password_surfaces_backend_message() {
    let (base, _) = start_backend().await;
    let err = logged_in(&base)
        .user()
        .update_password(&UpdatePasswordRequest {
            old_password: "Nope123!".into(),
            new_password: "Fresh123!".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Old password is incorrect");
}

#[tokio::test]
async fn text_and_empty_failure_bodies() {
    let (base, _) = start_backend().await;
    let client = anonymous(&base);

    let err = client
        .request::<Value>("/fail/text", RequestOptions::get())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "upstream exploded");

    let err = client
        .request::<Value>("/fail/empty", RequestOptions::get())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 500");

    let err = client
        .request::<Value>("/fail/json-other", RequestOptions::get())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 404");
}

#[tokio::test]
async fn caller_headers_merge_and_bearer_wins() {
    let (base, _) = start_backend().await;
    let options = RequestOptions::get()
        .header(CONTENT_TYPE, HeaderValue::from_static("application/vnd.betomeshi+json"))
        .header(AUTHORIZATION, HeaderValue::from_static("Basic dTpw"));

    let echoed: Value = logged_in(&base)
        .request("/echo-headers", options)
        .await
        .expect("echo");

    assert_eq!(echoed["authorization"], "Bearer abc");
    assert_eq!(echoed["contentType"], "application/vnd.betomeshi+json");

    let echoed: Value = anonymous(&base)
        .request("/echo-headers", RequestOptions::get())
        .await
        .expect("echo");
    assert_eq!(echoed["authorization"], Value::Null);
    assert_eq!(echoed["contentType"], "application/json");
}

#[tokio::test]
async fn non_json_success_body_is_invalid() {
    let (base, _) = start_backend().await;
    let err = anonymous(&base)
        .request::<Value>("/not-json", RequestOptions::get())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidBody(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Grab a free port, then let it go so nothing is listening there.
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = anonymous(&format!("http://{}", addr))
        .dish()
        .get_famous_dishes()
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.to_string(), "Network error occurred");
}
