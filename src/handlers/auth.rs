use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use crate::auth::{
    jwt::create_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::db::users::UserRepository;
use crate::dto::{AuthResponse, LoginRequest, MeResponse, RegisterRequest};
use crate::error::{AppError, AppResult};
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    body.validate()?;
    let email = body.email.trim().to_lowercase();

    let users = UserRepository::new(&state.db);
    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let pwd_hash = hash_password(&body.password)?;
    let user = users.create(&email, &pwd_hash).await?;
    let token = create_token(user.id, &user.email, &state.config)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".into(),
            token,
            user_id: user.id,
            email: user.email,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;
    let email = body.email.trim().to_lowercase();

    let user = UserRepository::new(&state.db)
        .find_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected: bad password");
        return Err(AppError::Unauthorized);
    }

    let token = create_token(user.id, &user.email, &state.config)?;
    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        user_id: user.id,
        email: user.email,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MeResponse>> {
    let user = UserRepository::new(&state.db)
        .find_by_id(auth_user.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(MeResponse {
        user_id: user.id,
        email: user.email,
    }))
}
