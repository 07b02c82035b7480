use validator::Validate;
use zeroize::Zeroizing;

use crate::auth::{jwt::JwtService, password::verify_password};
use crate::entities::token::{AuthResponse, LoginRequest};
use crate::errors::AuthError;
use crate::settings::AppConfig;

/// Single operator account configured through `admin_email` and
/// `admin_password_hash`.
pub struct AuthHandler {
    admin_email: String,
    admin_password_hash: Zeroizing<String>,
    pub token_service: JwtService,
}

impl AuthHandler {
    pub fn new(config: &AppConfig, token_service: JwtService) -> Self {
        AuthHandler {
            admin_email: config.admin_email.trim().to_lowercase(),
            admin_password_hash: Zeroizing::new(config.admin_password_hash.trim().to_string()),
            token_service,
        }
    }

    /// Checks the operator credentials and issues an access token.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        if self.admin_email.is_empty() || self.admin_password_hash.is_empty() {
            tracing::warn!("Login attempted but no admin account is configured");
            return Err(AuthError::WrongCredentials);
        }

        // Verify the password even on an email mismatch so both paths cost the same
        let password_ok = verify_password(&request.password, &self.admin_password_hash)?;
        let email_ok = request.email.trim().to_lowercase() == self.admin_email;

        if !(password_ok && email_ok) {
            tracing::warn!("Rejected admin login");
            return Err(AuthError::WrongCredentials);
        }

        let access_token = self.token_service.create_jwt(&self.admin_email)?;

        tracing::info!("Admin logged in successfully");
        Ok(AuthResponse::new(access_token, self.token_service.expires_in()))
    }
}
