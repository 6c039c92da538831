//! Authentication service: login and token issuance

use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{LoginInput, Token, UserRole};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::Claims;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    id: Uuid,
    username: String,
    hashed_password: String,
    role: String,
    is_active: bool,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, input: LoginInput) -> AppResult<Token> {
        let user = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, username, hashed_password, role, is_active FROM users WHERE username = $1",
        )
        .bind(&input.username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &user.hashed_password)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::InactiveUser);
        }

        let role = UserRole::parse(&user.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role '{}' in database", user.role)))?;

        let token = self.issue_token(user.id, &user.username, role)?;

        tracing::info!(username = %user.username, "User logged in");
        Ok(token)
    }

    fn issue_token(&self, user_id: Uuid, username: &str, role: UserRole) -> AppResult<Token> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;

        Ok(Token {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}
