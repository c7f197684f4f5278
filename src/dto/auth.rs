use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::User,
    validation::{ValidationErrors, required_string},
};

pub const EMAIL_MAX_CHARS: usize = 255;
pub const PASSWORD_MIN_CHARS: usize = 8;

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "user@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Register payload after validation. The email is lowercased.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = required_string(&mut errors, "email", self.email.as_deref(), EMAIL_MAX_CHARS)
            .map(|e| e.to_lowercase());
        if let Some(email) = &email {
            let well_formed = email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
            if !well_formed {
                errors.add("email", "The email field must be a valid email address.");
            }
        }

        let password = match self.password {
            Some(p) if p.chars().count() >= PASSWORD_MIN_CHARS => Some(p),
            Some(_) => {
                errors.add(
                    "password",
                    format!("The password field must be at least {PASSWORD_MIN_CHARS} characters."),
                );
                None
            }
            None => {
                errors.add("password", "The password field is required.");
                None
            }
        };

        match (email, password) {
            (Some(email), Some(password)) => errors.into_result(Registration { email, password }),
            _ => Err(errors),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_normalizes_email() {
        let registration = RegisterRequest {
            email: Some(" User@Example.COM ".into()),
            password: Some("correct horse".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(registration.email, "user@example.com");
    }

    #[test]
    fn register_rejects_bad_email_and_short_password() {
        let errors = RegisterRequest {
            email: Some("not-an-email".into()),
            password: Some("short".into()),
        }
        .validate()
        .unwrap_err();
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
    }
}
