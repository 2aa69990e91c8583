use std::sync::Arc;

use api::{repositories::memory::InMemoryTodoStore, routes::create_router, state::AppState};
use auth::{TokenService, clock::ManualClock, config::JwtConfig};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    tokens: TokenService,
    clock: Arc<ManualClock>,
}

impl TestApp {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let config = JwtConfig::new(b"api-tests-signing-key-000000000000000000".to_vec()).unwrap();
        let tokens = TokenService::with_clock(&config, clock.clone());

        let router = create_router(AppState {
            todo_store: Arc::new(InMemoryTodoStore::new()),
            tokens: tokens.clone(),
        });

        Self {
            router,
            tokens,
            clock,
        }
    }

    fn bearer(&self, username: &str, user_id: i64) -> String {
        format!(
            "Bearer {}",
            self.tokens
                .issue(username, user_id, Some(Duration::minutes(20)))
                .unwrap()
        )
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn todo(title: &str, priority: i64) -> Value {
    json!({
        "title": title,
        "description": "from the test suite",
        "priority": priority,
        "complete": false
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let response = app.send("GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_todo_routes_require_a_token() {
    let app = TestApp::new();

    for (method, uri) in [
        ("GET", "/todo"),
        ("GET", "/todo/1"),
        ("DELETE", "/todo/1"),
    ] {
        let response = app.send(method, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    let response = app
        .send("POST", "/todo", None, Some(todo("sneaky", 3)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_crud_round() {
    let app = TestApp::new();
    let alice = app.bearer("alice", 42);

    let response = app
        .send("POST", "/todo", Some(&alice), Some(todo("buy milk", 2)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["title"], "buy milk");
    assert!(created.get("owner_id").is_none());
    let id = created["id"].as_i64().unwrap();

    let response = app
        .send("GET", &format!("/todo/{}", id), Some(&alice), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    let mut change = todo("buy oat milk", 4);
    change["complete"] = json!(true);
    let response = app
        .send("PUT", &format!("/todo/{}", id), Some(&alice), Some(change))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "buy oat milk");
    assert_eq!(updated["priority"], 4);
    assert_eq!(updated["complete"], true);

    let response = app.send("GET", "/todo", Some(&alice), None).await;
    assert_eq!(body_json(response).await, json!([updated]));

    let response = app
        .send("DELETE", &format!("/todo/{}", id), Some(&alice), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .send("GET", &format!("/todo/{}", id), Some(&alice), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_cannot_see_each_others_todos() {
    let app = TestApp::new();
    let alice = app.bearer("alice", 1);
    let bob = app.bearer("bob", 2);

    let response = app
        .send("POST", "/todo", Some(&alice), Some(todo("alice's secret", 5)))
        .await;
    let id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/todo/{}", id);

    let response = app.send("GET", &uri, Some(&bob), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send("PUT", &uri, Some(&bob), Some(todo("defaced", 1)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send("DELETE", &uri, Some(&bob), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send("GET", "/todo", Some(&bob), None).await;
    assert_eq!(body_json(response).await, json!([]));

    let response = app.send("GET", &uri, Some(&alice), None).await;
    assert_eq!(body_json(response).await["title"], "alice's secret");
}

#[tokio::test]
async fn test_priority_is_validated() {
    let app = TestApp::new();
    let alice = app.bearer("alice", 1);

    for priority in [0, 6] {
        let response = app
            .send("POST", "/todo", Some(&alice), Some(todo("bad", priority)))
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await["detail"],
            "The priority must be between 1-5"
        );
    }
}

#[tokio::test]
async fn test_bad_bodies_get_a_detail_envelope() {
    let app = TestApp::new();
    let alice = app.bearer("alice", 1);

    let response = app
        .send("POST", "/todo", Some(&alice), Some(json!({ "title": "no priority" })))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail = body_json(response).await["detail"].clone();
    assert!(detail.as_str().unwrap().contains("priority"));

    let response = app.send("PUT", "/todo/1", Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body_json(response).await["detail"].is_string());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/todo")
                .header(header::AUTHORIZATION, &alice)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["detail"].is_string());
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new();
    let alice = app.bearer("alice", 1);

    let response = app.send("GET", "/todo", Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    app.clock.advance(Duration::minutes(21));
    let response = app.send("GET", "/todo", Some(&alice), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["detail"],
        "Could not validate credentials"
    );
}
