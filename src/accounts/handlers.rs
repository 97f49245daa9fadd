use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    accounts::{
        dto::{
            EvaluatePasswordRequest, LoginRequest, PublicProfile, RegisterRequest,
            SessionResponse, UpdateProfileRequest,
        },
        error::AccountError,
        policy::{evaluate_password, PasswordReport},
        services::AccountState,
    },
    state::AppState,
};

type Rejection = (StatusCode, String);

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/session", get(session))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me).delete(delete_me))
}

pub fn password_routes() -> Router<AppState> {
    Router::new().route("/password/evaluate", post(evaluate))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicProfile>), Rejection> {
    let accounts = state.accounts.lock().await;
    let user = accounts.register(payload)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<PublicProfile>, Rejection> {
    let accounts = state.accounts.lock().await;
    let user = accounts.login(&payload.email, &payload.password)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, Rejection> {
    state.accounts.lock().await.logout()?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    let response = match state.accounts.lock().await.state() {
        AccountState::Authenticated(email) => SessionResponse {
            authenticated: true,
            email: Some(email),
        },
        AccountState::Anonymous => SessionResponse {
            authenticated: false,
            email: None,
        },
    };
    Json(response)
}

#[instrument(skip(state))]
pub async fn get_me(State(state): State<AppState>) -> Result<Json<PublicProfile>, Rejection> {
    let user = state
        .accounts
        .lock()
        .await
        .current()
        .ok_or(AccountError::NotAuthenticated)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicProfile>, Rejection> {
    let accounts = state.accounts.lock().await;
    let user = accounts.update_profile(payload)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_me(State(state): State<AppState>) -> Result<StatusCode, Rejection> {
    let email = state.accounts.lock().await.delete_account()?;
    info!(email = %email, "account removed via api");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(payload))]
pub async fn evaluate(Json(payload): Json<EvaluatePasswordRequest>) -> Json<PasswordReport> {
    Json(evaluate_password(&payload.password))
}
