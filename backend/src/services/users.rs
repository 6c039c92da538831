//! User account management (admin only)

use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{CreateUserInput, UpdateUserInput, User, UserRole};
use shared::validation::{validate_password, validate_username};

use crate::error::{AppError, AppResult};

/// User management service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AppResult<User> {
        let role = UserRole::parse(&self.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role '{}' in database", self.role)))?;
        Ok(User {
            id: self.id,
            username: self.username,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, username, role, is_active, created_at";

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a staff account
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        validate_username(&input.username).map_err(|msg| AppError::Validation {
            field: "username".to_string(),
            message: msg.to_string(),
        })?;
        validate_password(&input.password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
        })?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(&input.username)
                .fetch_one(&self.db)
                .await?;
        if exists {
            return Err(AppError::DuplicateName {
                resource: "User".to_string(),
                name: input.username,
            });
        }

        let hashed = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, hashed_password, role)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&input.username)
        .bind(&hashed)
        .bind(input.role.as_str())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(username = %user.username, role = %user.role, "Created user");
        user.into_user()
    }

    /// Get a single user
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?
            .into_user()
    }

    /// List users ordered by username
    pub async fn list_users(&self, skip: i64, limit: i64) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Update username, role, active flag and/or password
    pub async fn update_user(&self, user_id: Uuid, input: UpdateUserInput) -> AppResult<User> {
        let existing = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let username = match input.username {
            Some(username) => {
                validate_username(&username).map_err(|msg| AppError::Validation {
                    field: "username".to_string(),
                    message: msg.to_string(),
                })?;
                let collision = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id <> $2)",
                )
                .bind(&username)
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;
                if collision {
                    return Err(AppError::DuplicateName {
                        resource: "User".to_string(),
                        name: username,
                    });
                }
                username
            }
            None => existing.username,
        };

        let role = input
            .role
            .map(|r| r.as_str().to_string())
            .unwrap_or(existing.role);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let hashed_password = match input.password {
            Some(password) => {
                validate_password(&password).map_err(|msg| AppError::Validation {
                    field: "password".to_string(),
                    message: msg.to_string(),
                })?;
                Some(
                    hash(&password, DEFAULT_COST)
                        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?,
                )
            }
            None => None,
        };

        let user = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET username = $1,
                role = $2,
                is_active = $3,
                hashed_password = COALESCE($4, hashed_password)
            WHERE id = $5
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&username)
        .bind(&role)
        .bind(is_active)
        .bind(&hashed_password)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        user.into_user()
    }

    /// Delete a staff account
    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }
}
