use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{self, password, Claims, JwtError};
use crate::database::manager::DatabaseError;
use crate::database::models::User;
use crate::database::repositories::{NewUser, UserStore};
use crate::services::validation::{FieldErrors, ValidationError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("A user with this email already exists")]
    EmailTaken,
    /// Unknown email and wrong password collapse into this one variant
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Hash(#[from] password::BcryptError),
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub firm_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub firm_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            firm_name: user.firm_name.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Firm-user signup and login. The portal customer flow lives in
/// `PortalService`; both issue tokens through the same claims type.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, AuthError> {
        let mut errors = FieldErrors::new();
        errors.require("email", &request.email);
        if !request.email.trim().is_empty() {
            errors.check_email("email", request.email.trim());
        }
        errors.require("password", &request.password);
        errors.require("first_name", &request.first_name);
        errors.require("last_name", &request.last_name);
        errors.require("firm_name", &request.firm_name);
        errors.finish()?;

        if self.users.email_exists(request.email.trim()).await? {
            return Err(AuthError::EmailTaken);
        }

        let user = self
            .users
            .create(NewUser {
                email: request.email.trim().to_string(),
                password_hash: password::hash(&request.password)?,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                firm_name: request.firm_name.trim().to_string(),
            })
            .await?;

        let token = auth::generate_jwt(Claims::for_firm_user(&user))?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(&user),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let Some(user) = self.users.find_by_email(request.email.trim()).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify(&request.password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = auth::generate_jwt(Claims::for_firm_user(&user))?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(&user),
        })
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserResponse::from(&user))
    }
}
