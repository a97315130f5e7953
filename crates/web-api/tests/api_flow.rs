//! HTTP 边界测试
//!
//! 用内存替身组装完整路由，通过 tower oneshot 驱动请求，
//! 校验状态码映射和响应体形状。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use domain::{
    CreateUserCommand, PasswordHash, PersonName, RepositoryError, User, UserEmail, UserId,
};
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};
use tower::ServiceExt;
use uuid::Uuid;

use application::{
    Clock, CommandQueue, CommandQueueError, GetUserUseCase, LoginUseCase, PasswordHasher,
    PasswordHasherError, SubmitUserUseCase, UserRepository,
};
use web_api::{router, AppState};

#[derive(Default)]
struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        let mut guard = self.users.write().await;
        if guard.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(Uuid::from(user.id), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: UserEmail) -> Result<Option<User>, RepositoryError> {
        let guard = self.users.read().await;
        Ok(guard.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let guard = self.users.read().await;
        Ok(guard.get(&Uuid::from(id)).cloned())
    }
}

#[derive(Default)]
struct CapturingQueue {
    commands: Mutex<Vec<CreateUserCommand>>,
}

#[async_trait]
impl CommandQueue for CapturingQueue {
    async fn enqueue_user_creation(
        &self,
        command: &CreateUserCommand,
    ) -> Result<(), CommandQueueError> {
        self.commands.lock().await.push(command.clone());
        Ok(())
    }
}

struct UnavailableQueue;

#[async_trait]
impl CommandQueue for UnavailableQueue {
    async fn enqueue_user_creation(
        &self,
        _command: &CreateUserCommand,
    ) -> Result<(), CommandQueueError> {
        Err(CommandQueueError::unavailable("connection refused"))
    }
}

/// 与测试内固定哈希格式配套的校验桩。
struct FakePasswordHasher;

#[async_trait]
impl PasswordHasher for FakePasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        PasswordHash::new(format!("hashed:{plaintext}"))
            .map_err(|err| PasswordHasherError::hash_error(err.to_string()))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(hashed.as_str() == format!("hashed:{plaintext}"))
    }
}

struct TestClock;

impl Clock for TestClock {
    fn now(&self) -> domain::Timestamp {
        Utc::now()
    }
}

fn build_router(
    repository: Arc<InMemoryUserRepository>,
    queue: Arc<dyn CommandQueue>,
) -> Router {
    let state = AppState::new(
        Arc::new(SubmitUserUseCase::new(queue)),
        Arc::new(GetUserUseCase::new(repository.clone())),
        Arc::new(LoginUseCase::new(repository, Arc::new(FakePasswordHasher))),
    );
    router(state)
}

async fn seed_user(repository: &InMemoryUserRepository, email: &str, password: &str) -> Uuid {
    let user = User::create(
        PersonName::parse("Ann").unwrap(),
        UserEmail::parse(email).unwrap(),
        PasswordHash::new(format!("hashed:{password}")).unwrap(),
        TestClock.now(),
    );
    let stored = repository.save(user).await.unwrap();
    Uuid::from(stored.id)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn accepting_a_create_user_request_returns_202_and_enqueues_the_command() {
    let repository = Arc::new(InMemoryUserRepository::default());
    let queue = Arc::new(CapturingQueue::default());
    let app = build_router(repository, queue.clone());

    let response = app
        .oneshot(post_json(
            "/api/v1/users",
            json!({"name": "Ann", "email": "ann@x.com", "password": "p1"}),
        ))
        .await
        .unwrap();

    // 202：已接受，尚未处理
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "user creation request accepted");

    let commands = queue.commands.lock().await;
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].email, "ann@x.com");
}

#[tokio::test]
async fn garbage_email_is_rejected_with_400() {
    let repository = Arc::new(InMemoryUserRepository::default());
    let queue = Arc::new(CapturingQueue::default());
    let app = build_router(repository, queue.clone());

    let response = app
        .oneshot(post_json(
            "/api/v1/users",
            json!({"name": "Ann", "email": "not-an-email", "password": "p1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(queue.commands.lock().await.is_empty());
}

#[tokio::test]
async fn broker_outage_maps_to_503() {
    let repository = Arc::new(InMemoryUserRepository::default());
    let app = build_router(repository, Arc::new(UnavailableQueue));

    let response = app
        .oneshot(post_json(
            "/api/v1/users",
            json!({"name": "Ann", "email": "ann@x.com", "password": "p1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BROKER_UNAVAILABLE");
}

#[tokio::test]
async fn get_user_returns_projection_without_credential_field() {
    let repository = Arc::new(InMemoryUserRepository::default());
    let user_id = seed_user(&repository, "ann@x.com", "p1").await;
    let app = build_router(repository, Arc::new(CapturingQueue::default()));

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/users/{user_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["name"], "Ann");
    assert_eq!(body["email"], "ann@x.com");
    let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert!(!keys.iter().any(|key| key.contains("password")));
}

#[tokio::test]
async fn unknown_user_id_returns_404() {
    let repository = Arc::new(InMemoryUserRepository::default());
    let app = build_router(repository, Arc::new(CapturingQueue::default()));

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/users/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn login_with_valid_credentials_returns_bearer_token() {
    let repository = Arc::new(InMemoryUserRepository::default());
    seed_user(&repository, "ann@x.com", "p1").await;
    let app = build_router(repository, Arc::new(CapturingQueue::default()));

    let response = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"email": "ann@x.com", "password": "p1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["access_token"], "dummy-jwt-for-Ann");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_both_return_401() {
    let repository = Arc::new(InMemoryUserRepository::default());
    seed_user(&repository, "ann@x.com", "p1").await;
    let app = build_router(repository, Arc::new(CapturingQueue::default()));

    let wrong_password = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"email": "ann@x.com", "password": "wrong"}),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"email": "nobody@x.com", "password": "p1"}),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // 两种失败的响应体一致，不泄露用户是否存在
    let first = body_json(wrong_password).await;
    let second = body_json(unknown_email).await;
    assert_eq!(first, second);
}
