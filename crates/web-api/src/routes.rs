use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use application::{LoginRequest, ReadUser, SubmitUserRequest};
use domain::AuthToken;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
struct CreateUserPayload {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

/// 202 响应体：请求已接受，区别于“已处理完成”。
#[derive(Debug, Serialize)]
struct AcceptedBody {
    message: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(accept_create_user))
        .route("/users/{user_id}", get(get_user))
        .route("/auth/login", post(login))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// 接受创建用户请求，把命令发往队列后立即返回 202。
async fn accept_create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<AcceptedBody>), ApiError> {
    state
        .submit_user
        .execute(SubmitUserRequest {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedBody {
            message: "user creation request accepted",
        }),
    ))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ReadUser>, ApiError> {
    let read_user = state.get_user.execute(user_id).await?;
    Ok(Json(read_user))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthToken>, ApiError> {
    let token = state
        .login
        .execute(LoginRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(token))
}
