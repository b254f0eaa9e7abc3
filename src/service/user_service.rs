use sqlx::PgPool;
use uuid::Uuid;

use crate::config::crypto::CryptoService;
use crate::errors::ApiError;
use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    crypto: CryptoService,
}

impl UserService {
    pub fn new(pool: PgPool, crypto: CryptoService) -> Self {
        Self { pool, crypto }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, ApiError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Inserts a new user with a freshly hashed password. The plaintext never
    /// reaches the database.
    pub async fn create_profile(&self, new_user: &NewUser) -> Result<User, ApiError> {
        if self.exists_by_email(&new_user.email).await? {
            return Err(ApiError::Conflict("Email Already Exists".into()));
        }

        let password_hash = self.crypto.hash_password(&new_user.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid Email".into()))?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| ApiError::Unauthorized("Wrong Password".into()))?;

        if !self.crypto.verify_password(password, hash)? {
            return Err(ApiError::Unauthorized("Wrong Password".into()));
        }

        Ok(user)
    }
}
