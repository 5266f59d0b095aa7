//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::UserRole;
use shared::validation::{validate_email, validate_name, validate_password};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for registering a new bakery with owner account
#[derive(Debug, Deserialize)]
pub struct RegisterBakeryInput {
    pub bakery_name: String,
    pub owner_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub bakery_id: Uuid,
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Input for logging in
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Input for refreshing tokens
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub bakery_id: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    bakery_id: Uuid,
    password_hash: String,
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
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Register a new bakery with its owner account
    pub async fn register_bakery(&self, input: RegisterBakeryInput) -> AppResult<RegisterResponse> {
        validate_name(&input.bakery_name).map_err(|msg| AppError::Validation {
            field: "bakery_name".to_string(),
            message: msg.to_string(),
        })?;
        validate_email(&input.email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;
        validate_password(&input.password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
        })?;

        // Check if email already exists
        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(&input.email)
                .fetch_one(&self.db)
                .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        // Hash password
        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        // Start transaction
        let mut tx = self.db.begin().await?;

        let bakery_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO bakeries (name, phone, address)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&input.bakery_name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&mut *tx)
        .await?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (bakery_id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, 'owner')
            RETURNING id
            "#,
        )
        .bind(bakery_id)
        .bind(&input.owner_name)
        .bind(&input.email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let tokens = self.generate_tokens(user_id, bakery_id, UserRole::Owner)?;

        Ok(RegisterResponse {
            bakery_id,
            user_id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        })
    }

    /// Log in with email and password
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthTokens> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, bakery_id, password_hash, role, is_active FROM users WHERE email = $1",
        )
        .bind(&input.email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let valid = verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = parse_role(&user.role)?;
        self.generate_tokens(user.id, user.bakery_id, role)
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh(&self, input: RefreshInput) -> AppResult<AuthTokens> {
        let claims = self.decode_token(&input.refresh_token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        // Re-read the user so revoked accounts cannot refresh
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, bakery_id, password_hash, role, is_active FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::InvalidToken);
        }

        let role = parse_role(&user.role)?;
        self.generate_tokens(user.id, user.bakery_id, role)
    }

    /// Generate an access/refresh token pair
    fn generate_tokens(
        &self,
        user_id: Uuid,
        bakery_id: Uuid,
        role: UserRole,
    ) -> AppResult<AuthTokens> {
        let now = Utc::now();

        let access_claims = Claims {
            sub: user_id.to_string(),
            bakery_id: bakery_id.to_string(),
            role: role.as_str().to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let refresh_claims = Claims {
            sub: user_id.to_string(),
            bakery_id: bakery_id.to_string(),
            role: role.as_str().to_string(),
            exp: (now + Duration::seconds(self.refresh_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        let access_token = encode(&Header::default(), &access_claims, &key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn decode_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }
}

fn parse_role(role: &str) -> AppResult<UserRole> {
    match role {
        "owner" => Ok(UserRole::Owner),
        "manager" => Ok(UserRole::Manager),
        "staff" => Ok(UserRole::Staff),
        other => Err(AppError::Internal(format!("Unknown role: {}", other))),
    }
}
