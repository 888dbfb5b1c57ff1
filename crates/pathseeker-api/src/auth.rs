use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};

use pathseeker_core::CoreError;
use pathseeker_core::advice::AdviceClient;
use pathseeker_db::Database;
use pathseeker_types::api::{AuthResponse, LoginRequest, RegisterRequest};
use pathseeker_types::models::Role;

use crate::error::{ApiError, ApiResult};
use crate::middleware::Claims;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub advice: AdviceClient,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    // Validate input
    if req.name.trim().is_empty() || req.name.len() > 100 {
        return Err(CoreError::InvalidInput("Name must be between 1 and 100 characters").into());
    }
    if !req.email.contains('@') {
        return Err(CoreError::InvalidInput("Email address looks invalid").into());
    }
    if req.password.len() < 8 {
        return Err(CoreError::InvalidInput("Password must be at least 8 characters").into());
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();

    // Skills and bio only make sense on mentor profiles
    let (skills, bio) = match req.role {
        Role::Mentor => (req.skills.as_deref(), req.bio.as_deref()),
        Role::Student => (None, None),
    };
    let education = req.education.as_deref().unwrap_or("Undergraduate");

    let user = state
        .db
        .create_user(
            req.name.trim(),
            req.email.trim(),
            &password_hash,
            req.role.as_str(),
            Some(education),
            skills,
            bio,
        )?
        .ok_or(CoreError::AlreadyExists("Email already registered"))?;

    let token = create_token(&state.jwt_secret, user.id, &user.name, req.role)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user_id: user.id,
            name: user.name,
            role: req.role,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .db
        .get_user_by_email(req.email.trim())?
        .ok_or(ApiError::Unauthorized("Login failed. Please check your email and password"))?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("stored password hash unreadable: {}", e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized("Login failed. Please check your email and password"))?;

    let role = Role::parse(&user.role)
        .ok_or_else(|| anyhow::anyhow!("corrupt role '{}' on user {}", user.role, user.id))?;

    let token = create_token(&state.jwt_secret, user.id, &user.name, role)?;

    Ok(Json(AuthResponse {
        user_id: user.id,
        name: user.name,
        role,
        token,
    }))
}

fn create_token(secret: &str, user_id: i64, name: &str, role: Role) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        name: name.to_string(),
        role,
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
