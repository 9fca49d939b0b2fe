use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::JwtConfig;
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::middleware::Claims;
use crate::models::{NewUser, User};

pub struct AuthService {
    store: Arc<dyn Store>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt: JwtConfig) -> Self {
        Self { store, jwt }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(User, String)> {
        let user = self
            .store
            .create_user(NewUser {
                email: email.to_string(),
                hashed_password: hash_password(password)?,
                full_name: full_name.to_string(),
            })
            .await?;

        tracing::info!(user_id = user.id, "user registered");

        let token = self.generate_access_token(&user)?;
        Ok((user, token))
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        verify_password(password, &user.hashed_password)?;

        if !user.is_active {
            return Err(AppError::Forbidden);
        }

        let token = self.generate_access_token(&user)?;
        Ok((user, token))
    }

    pub fn generate_access_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.jwt.expiry_hours as i64);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
    }

    /// Resolve a bearer token to an active user.
    pub async fn resolve_user(&self, token: &str) -> Result<User> {
        let claims = self.decode_token(token)?;
        let user_id: i64 = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;

        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Forbidden);
        }
        Ok(user)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<()> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)
}
