use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::{
    error::{AppError, AppResult},
    models::NewUser,
    response::{ApiResponse, Meta},
    state::AppState,
    validation::ValidationErrors,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<UserResponse>> {
    let registration = payload.validate()?;

    if state
        .users
        .find_by_email(&registration.email)
        .await?
        .is_some()
    {
        return Err(AppError::Validation(ValidationErrors::single(
            "email",
            "The email has already been taken.",
        )));
    }

    let password_hash = hash_password(&registration.password)?;
    let user = state
        .users
        .create(NewUser {
            email: registration.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::success(
        "User created",
        UserResponse::from(user),
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let email = email.trim().to_lowercase();

    let user = match state.users.find_by_email(&email).await? {
        Some(u) => u,
        None => return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into())),
    };

    if !verify_password(&password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "login rejected");
        return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
    }

    let issued = state.jwt.issue(user.id)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: issued.token,
            token_type: "Bearer".into(),
            expires_at: issued.expires_at,
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AppError::Internal(_))
        ));
    }
}
