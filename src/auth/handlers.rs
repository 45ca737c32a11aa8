use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    adapter::authorize,
    dto::{AuthResponse, Credentials, RefreshRequest, SignupRequest},
    jwt::{AuthUser, JwtKeys},
};
use crate::{
    state::AppState,
    users::{PublicUser, UserError},
};

type Rejection = (StatusCode, String);

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<PublicUser>), Rejection> {
    let email = payload.email.as_deref().unwrap_or_default().trim();
    let password = payload.password.as_deref().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        warn!("signup missing email or password");
        return Err((
            StatusCode::BAD_REQUEST,
            "Email and password are required.".into(),
        ));
    }

    if !is_valid_email(email) {
        warn!(%email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    match state
        .users
        .create_user(email, password, payload.name.as_deref())
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "user registered");
            Ok((StatusCode::CREATED, Json(user)))
        }
        Err(UserError::UserExists) => {
            Err((StatusCode::CONFLICT, "User already exists.".into()))
        }
        Err(UserError::InvalidInput(msg)) => Err((StatusCode::BAD_REQUEST, msg.into())),
        Err(e) => Err(internal(e)),
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<AuthResponse>, Rejection> {
    let user = authorize(&state.users, &payload)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()))?;

    let keys = JwtKeys::from_ref(&state);
    let response = issue_tokens(&keys, user)?;

    info!(user_id = %response.user.id, "user logged in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, Rejection> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let user = load_user(&state, claims.sub).await?;
    Ok(Json(issue_tokens(&keys, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, Rejection> {
    Ok(Json(load_user(&state, user_id).await?))
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<PublicUser, Rejection> {
    state
        .users
        .find_by_id(user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            warn!(%user_id, "user not found");
            (StatusCode::UNAUTHORIZED, "User not found".to_string())
        })
}

fn issue_tokens(keys: &JwtKeys, user: PublicUser) -> Result<AuthResponse, Rejection> {
    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        internal_message()
    })?;
    let refresh_token = keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        internal_message()
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user,
    })
}

fn internal(e: UserError) -> Rejection {
    error!(error = %e, "request failed");
    internal_message()
}

fn internal_message() -> Rejection {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error.".into(),
    )
}
