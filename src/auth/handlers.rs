use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, ProfileUpdatedResponse, PublicUser, RegisterRequest,
            UpdateProfileRequest, UserProfile,
        },
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, is_long_enough, verify_password},
        repo_types::NewUser,
        services::{is_valid_email, non_blank, normalize_email},
    },
    db::StoreError,
    error::{AppError, AppResult},
    extract::ApiJson,
    state::AppState,
};

/// Same text for unknown email and wrong password.
pub const INVALID_CREDENTIALS: &str = "Email ou senha inválidos";
const EMAIL_TAKEN: &str = "Email já cadastrado";
const USER_NOT_FOUND: &str = "Usuário não encontrado";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/registrar", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/usuario/me", get(get_me))
        .route("/usuario/perfil", put(update_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let name = non_blank(payload.name);
    let email = non_blank(payload.email).map(|e| normalize_email(&e));
    let password = payload.password.filter(|p| !p.is_empty());
    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        warn!("registration with missing fields");
        return Err(AppError::validation("Nome, email e senha são obrigatórios"));
    };

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Email inválido"));
    }

    if !is_long_enough(&password) {
        warn!("password too short");
        return Err(AppError::validation(
            "Senha deve ter pelo menos 6 caracteres",
        ));
    }

    // Ensure email is not taken
    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(EMAIL_TAKEN.into()));
    }

    let password_hash = hash_password(&password)?;
    let user = state
        .users
        .create(NewUser {
            name,
            email,
            password_hash,
            phone: non_blank(payload.phone),
        })
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent registration
            StoreError::Duplicate => AppError::Conflict(EMAIL_TAKEN.into()),
            other => other.into(),
        })?;

    let token = JwtKeys::from_ref(&state).sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            mensagem: "Usuário criado com sucesso",
            usuario: PublicUser::from(&user),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = non_blank(payload.email).map(|e| normalize_email(&e));
    let password = payload.password.filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(AppError::validation("Email e senha são obrigatórios"));
    };

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id, &user.email)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        mensagem: "Login realizado com sucesso",
        usuario: PublicUser::from(&user),
        token,
    }))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id, email = %auth.email))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .users
        .find_by_id(auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id, email = %auth.email))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileUpdatedResponse>> {
    let user = state
        .users
        .update_profile(auth.id, non_blank(payload.name), non_blank(payload.phone))
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    info!("profile updated");
    Ok(Json(ProfileUpdatedResponse {
        mensagem: "Perfil atualizado com sucesso",
        usuario: user.into(),
    }))
}
