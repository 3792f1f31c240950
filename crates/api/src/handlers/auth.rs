//! Handlers for the `/auth` resource (password login, login codes, profile).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use trialsite_core::error::CoreError;
use trialsite_core::validation::normalize_email;
use trialsite_db::models::company::PublicCompany;
use trialsite_db::models::user::{User, UserResponse};
use trialsite_db::{CompanyStore, UserStore};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::login_code::CodeRejection;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_dummy_password, verify_password,
    MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{ApiJson, ApiResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login-code`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginCodeRequest {
    #[validate(email)]
    pub email: String,
}

/// Request body for `POST /auth/login-code/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyLoginCodeRequest {
    pub email: String,
    pub code: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Required when the account already has a password.
    pub current_password: Option<String>,
    pub new_password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Response for `POST /auth/login-code`.
#[derive(Debug, Serialize)]
pub struct LoginCodeIssued {
    pub expires_in: i64,
    /// Present only when `LOGIN_CODE_ECHO` is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Response for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub company: Option<PublicCompany>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password and return an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<ApiJson<AuthResponse>> {
    let email = normalize_email(&input.email);
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = state.store.find_user_by_email(&email).await?;

    // Unknown emails and code-only accounts still pay for one Argon2 check.
    let Some((user, hash)) = user.and_then(|u| {
        let hash = u.password_hash.clone()?;
        Some((u, hash))
    }) else {
        verify_dummy_password(&input.password);
        return Err(invalid());
    };

    let password_valid = verify_password(&input.password, &hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Password login rejected");
        return Err(invalid());
    }

    ensure_can_sign_in(&state, &user).await?;
    let response = sign_in(&state, user).await?;
    Ok(ApiResponse::with_message("Login successful", response))
}

/// POST /api/auth/login-code
///
/// Issue a one-time login code. The answer is identical whether or not the
/// email belongs to an active account.
pub async fn request_login_code(
    State(state): State<AppState>,
    Json(input): Json<LoginCodeRequest>,
) -> AppResult<ApiJson<LoginCodeIssued>> {
    input.validate()?;
    let email = normalize_email(&input.email);

    let user = state.store.find_user_by_email(&email).await?;
    let code = match user {
        Some(user) if user.is_active => match state.login_codes.issue(&email).await {
            Some(code) => {
                tracing::info!(user_id = user.id, "Login code issued");
                tracing::debug!(user_id = user.id, %code, "Login code value");
                Some(code)
            }
            None => {
                tracing::warn!(user_id = user.id, "Login code withheld: attempt budget spent");
                None
            }
        },
        _ => {
            tracing::debug!("Login code requested for unknown or inactive account");
            None
        }
    };

    let issued = LoginCodeIssued {
        expires_in: state.login_codes.ttl_secs(),
        code: code.filter(|_| state.config.login_codes.echo),
    };
    Ok(ApiResponse::with_message(
        "If the account exists, a login code has been sent",
        issued,
    ))
}

/// POST /api/auth/login-code/verify
///
/// Exchange a login code for an access token.
pub async fn verify_login_code(
    State(state): State<AppState>,
    Json(input): Json<VerifyLoginCodeRequest>,
) -> AppResult<ApiJson<AuthResponse>> {
    let email = normalize_email(&input.email);

    state
        .login_codes
        .verify(&email, &input.code)
        .await
        .map_err(|rejection| {
            let msg = match rejection {
                CodeRejection::Mismatch { remaining } => {
                    format!("Invalid login code. {remaining} attempt(s) left")
                }
                CodeRejection::Exhausted => {
                    "Too many invalid attempts. Try again later".to_string()
                }
                CodeRejection::Missing | CodeRejection::Expired => {
                    "Invalid or expired login code".to_string()
                }
            };
            AppError::Core(CoreError::Unauthorized(msg))
        })?;

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired login code".into()))
        })?;

    ensure_can_sign_in(&state, &user).await?;
    let response = sign_in(&state, user).await?;
    Ok(ApiResponse::with_message("Login successful", response))
}

/// GET /api/auth/me
///
/// The caller's profile and company branding.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<ApiJson<MeResponse>> {
    let user = state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let company = match user.company_id {
        Some(id) => state.store.find_company(id).await?.map(PublicCompany::from),
        None => None,
    };

    Ok(ApiResponse::ok(MeResponse {
        user: UserResponse::from(&user),
        company,
    }))
}

/// POST /api/auth/change-password
///
/// Set a new password. Accounts that already have one must supply it.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<ApiJson<()>> {
    let user = state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if let Some(hash) = user.password_hash.as_deref() {
        let current = input.current_password.as_deref().ok_or_else(|| {
            AppError::Core(CoreError::Validation("current_password is required".into()))
        })?;
        let valid = verify_password(current, hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !valid {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Current password is incorrect".into(),
            )));
        }
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    state.store.update_password(user.id, &new_hash).await?;
    tracing::info!(user_id = user.id, "Password changed");

    Ok(ApiResponse::with_message("Password updated", ()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject deactivated accounts and accounts of inactive companies.
async fn ensure_can_sign_in(state: &AppState, user: &User) -> AppResult<()> {
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(company_id) = user.company_id {
        let active = state
            .store
            .find_company(company_id)
            .await?
            .is_some_and(|c| c.is_active);
        if !active {
            return Err(AppError::Core(CoreError::Forbidden(
                "Company is inactive".into(),
            )));
        }
    }
    Ok(())
}

/// Stamp the login and mint a token.
async fn sign_in(state: &AppState, user: User) -> AppResult<AuthResponse> {
    state.store.record_login(user.id).await?;

    let access_token =
        generate_access_token(user.id, user.company_id, &user.role, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User signed in");

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(&user),
    })
}
