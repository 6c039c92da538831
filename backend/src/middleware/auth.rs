//! Authentication middleware
//!
//! JWT bearer-token validation plus a per-request account check; role checks
//! happen in the handlers against the extracted [`AuthUser`].

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use shared::models::UserRole;

use crate::error::{AppError, ErrorDetail, ErrorResponse};
use crate::AppState;

/// Authenticated user information extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub role: UserRole,
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication middleware that validates JWT tokens from the
/// Authorization header and inserts an [`AuthUser`] request extension.
///
/// Tokens are verified against the same configured secret that signed them,
/// and the user row is re-checked on every request so that deactivating or
/// deleting an account revokes access immediately rather than at token
/// expiry.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let claims = match decode_jwt(token, &state.config.jwt.secret) {
        Ok(claims) => claims,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid user ID in token"),
    };

    let role = match UserRole::parse(&claims.role) {
        Some(role) => role,
        None => return unauthorized_response("Invalid role in token"),
    };

    let is_active =
        match sqlx::query_scalar::<_, bool>("SELECT is_active FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await
        {
            Ok(lookup) => lookup,
            Err(e) => return AppError::from(e).into_response(),
        };

    if let Err(e) = screen_account(is_active) {
        return e.into_response();
    }

    let auth_user = AuthUser {
        user_id,
        username: claims.username,
        role,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// Screen the account backing a token against its live row.
///
/// `None` means the user no longer exists; a token for a deleted or
/// deactivated account is rejected no matter how long it has left to live.
fn screen_account(is_active: Option<bool>) -> Result<(), AppError> {
    match is_active {
        Some(true) => Ok(()),
        Some(false) => Err(AppError::InactiveUser),
        None => Err(AppError::InvalidToken),
    }
}

/// Decode and validate a JWT token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, String> {
    use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => "Token has expired".to_string(),
        _ => "Invalid token".to_string(),
    })
}

fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            field: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor wrapper for the authenticated user
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn claims(offset_seconds: i64) -> Claims {
        let now = Utc::now();
        Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            username: "chef".to_string(),
            role: "chef".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(offset_seconds)).timestamp(),
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn token_round_trips_with_the_signing_secret() {
        let claims = claims(3600);
        let token = sign(&claims, "test-secret");

        let decoded = decode_jwt(&token, "test-secret").unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.role, "chef");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign(&claims(3600), "test-secret");
        assert_eq!(
            decode_jwt(&token, "other-secret").unwrap_err(),
            "Invalid token"
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign(&claims(-3600), "test-secret");
        assert_eq!(
            decode_jwt(&token, "test-secret").unwrap_err(),
            "Token has expired"
        );
    }

    #[test]
    fn active_account_passes_the_screen() {
        assert!(screen_account(Some(true)).is_ok());
    }

    #[test]
    fn deactivated_account_is_rejected_immediately() {
        // A valid token must not outlive a deactivation
        assert!(matches!(
            screen_account(Some(false)),
            Err(AppError::InactiveUser)
        ));
    }

    #[test]
    fn deleted_account_is_rejected() {
        assert!(matches!(screen_account(None), Err(AppError::InvalidToken)));
    }
}
