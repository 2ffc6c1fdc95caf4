use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        password::{hash_password, is_long_enough},
        services::{non_blank, normalize_email},
    },
    dto::MessageResponse,
    error::{AppError, AppResult},
    extract::{ApiJson, ApiQuery},
    recovery::{
        dto::{ResetPasswordRequest, ResetRequest, VerifyTokenQuery, VerifyTokenResponse},
        services::{generate_reset_token, hash_reset_token, reset_email, reset_link},
    },
    state::AppState,
};

/// Sent whether or not the address is registered.
pub const RESET_REQUESTED: &str =
    "Se o email está registrado, você receberá um link para resetar a senha";
pub const INVALID_RESET_TOKEN: &str = "Token inválido ou expirado";
const VERIFY_FAILED: &str = "Erro ao verificar token";

pub fn recovery_routes() -> Router<AppState> {
    Router::new()
        .route("/password/recuperar-senha", post(request_reset))
        .route("/password/verificar-token", get(verify_token))
        .route("/password/resetar-senha", post(reset_password))
}

#[instrument(skip(state, payload))]
pub async fn request_reset(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetRequest>,
) -> AppResult<Json<MessageResponse>> {
    let Some(email) = non_blank(payload.email).map(|e| normalize_email(&e)) else {
        return Err(AppError::validation("Email é obrigatório"));
    };

    let Some(user) = state.users.find_by_email(&email).await? else {
        info!("reset requested for unknown email");
        return Ok(Json(MessageResponse::new(RESET_REQUESTED)));
    };

    let token = generate_reset_token();
    let ttl_minutes = state.config.reset_token_ttl_minutes;
    let expires_at = OffsetDateTime::now_utc() + Duration::minutes(ttl_minutes);
    state
        .users
        .set_reset_token(user.id, &token.hash, expires_at)
        .await?;

    let link = reset_link(&state.config.frontend_url, &token.raw);
    let email = reset_email(&user.email, &user.name, &link, ttl_minutes);
    if let Err(e) = state.mailer.send(email).await {
        // The caller gets the same answer either way.
        error!(error = ?e, user_id = %user.id, "failed to send reset email");
    }

    info!(user_id = %user.id, "reset token issued");
    Ok(Json(MessageResponse::new(RESET_REQUESTED)))
}

/// Read-only check used by the reset page on load; does not consume the token.
/// Every outcome, store failures included, carries `valido`.
#[instrument(skip(state, query))]
pub async fn verify_token(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<VerifyTokenQuery>,
) -> (StatusCode, Json<VerifyTokenResponse>) {
    let Some(token) = non_blank(query.token) else {
        return not_valid(StatusCode::BAD_REQUEST, "Token não fornecido");
    };

    let hash = hash_reset_token(&token);
    match state
        .users
        .find_by_reset_token(&hash, OffsetDateTime::now_utc())
        .await
    {
        Ok(Some(_)) => (
            StatusCode::OK,
            Json(VerifyTokenResponse {
                valido: true,
                erro: None,
            }),
        ),
        Ok(None) => not_valid(StatusCode::BAD_REQUEST, INVALID_RESET_TOKEN),
        Err(e) => {
            error!(error = ?e, "reset token lookup failed");
            not_valid(StatusCode::INTERNAL_SERVER_ERROR, VERIFY_FAILED)
        }
    }
}

fn not_valid(status: StatusCode, erro: &'static str) -> (StatusCode, Json<VerifyTokenResponse>) {
    (
        status,
        Json(VerifyTokenResponse {
            valido: false,
            erro: Some(erro),
        }),
    )
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let token = non_blank(payload.token);
    let new_password = payload.new_password.filter(|p| !p.is_empty());
    let confirm = payload.confirm_password.filter(|p| !p.is_empty());
    let (Some(token), Some(new_password), Some(confirm)) = (token, new_password, confirm) else {
        return Err(AppError::validation("Token e senhas são obrigatórios"));
    };

    if new_password != confirm {
        return Err(AppError::validation("As senhas não conferem"));
    }

    if !is_long_enough(&new_password) {
        return Err(AppError::validation(
            "A senha deve ter pelo menos 6 caracteres",
        ));
    }

    let token_hash = hash_reset_token(&token);
    let password_hash = hash_password(&new_password)?;

    // Check and consume in one statement so a token can only be used once.
    let Some(user_id) = state
        .users
        .reset_password(&token_hash, OffsetDateTime::now_utc(), &password_hash)
        .await?
    else {
        warn!("reset attempted with invalid or expired token");
        return Err(AppError::validation(INVALID_RESET_TOKEN));
    };

    info!(user_id = %user_id, "password reset");
    Ok(Json(MessageResponse::new("Senha resetada com sucesso!")))
}
