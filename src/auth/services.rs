use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::{
    dto::RegisterRequest,
    password::hash_password,
    repo::{StoreError, UserStore},
    repo_types::User,
};

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("All fields are required")]
    Validation,
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("user store failed: {0}")]
    Persistence(String),
}

impl RegistrationError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::Hashing(_) | Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client; internal causes stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Validation => "All fields are required",
            Self::DuplicateEmail => "Email already registered",
            Self::Hashing(_) => "Internal server error",
            Self::Persistence(_) => "Error creating user",
        }
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::Backend(e) => Self::Persistence(format!("{e:#}")),
        }
    }
}

#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn UserStore>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Validates, rejects known emails, hashes, then inserts. Stops at the first failure.
    pub async fn register(&self, req: RegisterRequest) -> Result<(), RegistrationError> {
        if !req.has_all_fields() {
            warn!("registration missing fields");
            return Err(RegistrationError::Validation);
        }

        match self.store.email_exists(&req.email).await {
            Ok(true) => {
                warn!(email = %req.email, "email already registered");
                return Err(RegistrationError::DuplicateEmail);
            }
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, "email lookup failed");
                return Err(e.into());
            }
        }

        let RegisterRequest {
            email,
            password,
            username,
        } = req;
        let password_hash =
            match tokio::task::spawn_blocking(move || hash_password(&password)).await {
                Ok(Ok(hash)) => hash,
                Ok(Err(e)) => {
                    error!(error = %e, "hash_password failed");
                    return Err(RegistrationError::Hashing(e.to_string()));
                }
                Err(e) => {
                    error!(error = %e, "hashing task failed");
                    return Err(RegistrationError::Hashing(e.to_string()));
                }
            };

        let user = User {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        };

        if let Err(e) = self.store.insert(&user).await {
            return Err(match e {
                StoreError::DuplicateEmail => {
                    warn!(email = %user.email, "email registered concurrently");
                    RegistrationError::DuplicateEmail
                }
                other => {
                    error!(error = %other, "create user failed");
                    other.into()
                }
            });
        }

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(())
    }
}
