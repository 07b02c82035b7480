use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};
use crate::entities::token::Claims;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_expiration: Duration::minutes(config.jwt_expiration_minutes),
        }
    }

    /// Lifetime of issued access tokens in seconds.
    pub fn expires_in(&self) -> i64 {
        self.access_expiration.num_seconds()
    }

    /// Issues an access token for the operator account.
    pub fn create_jwt(&self, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.access_expiration).timestamp() as usize;

        let claims = Claims {
            sub: "admin".to_string(),
            email: email.to_string(),
            admin: true,
            exp,
            iat: now.timestamp() as usize,
        };

        self.encode_claims(&claims)
    }

    pub fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(JWT_ALGORITHM), claims, &self.keys.encoding).map_err(|e| {
            tracing::warn!("Failed to encode JWT: {}", e);
            AuthError::TokenCreation
        })
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &self.keys.decoding,
            &validation
        )
        .map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::test_config;

    #[test]
    fn issued_token_round_trips_with_admin_claim() {
        let service = JwtService::new(&test_config());
        let token = service.create_jwt("owner@example.com").unwrap();

        let claims = service.decode_jwt(&token).unwrap().claims;
        assert!(claims.admin);
        assert_eq!(claims.email, "owner@example.com");
        assert_eq!(service.expires_in(), 60 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = JwtService::new(&test_config());
        let past = (Utc::now() - Duration::minutes(5)).timestamp() as usize;
        let token = service
            .encode_claims(&Claims {
                sub: "admin".into(),
                email: "owner@example.com".into(),
                admin: true,
                exp: past,
                iat: past - 60,
            })
            .unwrap();

        assert!(matches!(service.decode_jwt(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let mut other = test_config();
        other.jwt_secret = "another_secret_that_is_also_long_enough_for_hs512".into();
        let token = JwtService::new(&other).create_jwt("owner@example.com").unwrap();

        let service = JwtService::new(&test_config());
        assert!(matches!(service.decode_jwt(&token), Err(AuthError::InvalidToken)));
    }
}
