//! JWT session token implementation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chirp_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";
const DEFAULT_ISSUER: &str = "chirp-api";

/// Session token settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(fallback)
}

impl JwtConfig {
    /// Load configuration from `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    ///
    /// Falling back to the built-in secret is logged, loudly when
    /// `RUST_ENV` names a production deployment.
    pub fn from_env() -> Self {
        let config = Self {
            secret: env_or("JWT_SECRET", DEFAULT_SECRET.to_string()),
            expiration_hours: env_or("JWT_EXPIRATION_HOURS", 24),
            issuer: env_or("JWT_ISSUER", DEFAULT_ISSUER.to_string()),
        };

        if config.secret == DEFAULT_SECRET {
            let deployment: String = env_or("RUST_ENV", String::new());
            if matches!(deployment.as_str(), "production" | "prod") {
                tracing::error!("JWT_SECRET is unset in production; sessions are forgeable");
            } else {
                tracing::warn!("JWT_SECRET is unset; using the development secret");
            }
        }

        config
    }
}

/// Session claims. `sub` is the account id.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Uuid,
    handle: String,
    iat: i64,
    exp: i64,
    iss: String,
}

/// HS256 session tokens scoped to one issuer.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, account_id: Uuid, handle: &str) -> Result<String, AuthError> {
        let issued = Utc::now();
        let claims = SessionClaims {
            sub: account_id,
            handle: handle.to_string(),
            iat: issued.timestamp(),
            exp: (issued + TimeDelta::hours(self.config.expiration_hours)).timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?
            .claims;

        Ok(TokenClaims {
            account_id: claims.sub,
            handle: claims.handle,
            exp: claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(issuer: &str, expiration_hours: i64) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "chirp-test-secret".to_string(),
            expiration_hours,
            issuer: issuer.to_string(),
        })
    }

    #[test]
    fn test_session_names_account_and_handle() {
        let tokens = service("chirp", 1);
        let account_id = Uuid::new_v4();

        let token = tokens.generate_token(account_id, "@ada").unwrap();
        let claims = tokens.validate_token(&token).unwrap();

        assert_eq!(claims.account_id, account_id);
        assert_eq!(claims.handle, "@ada");
        assert_eq!(tokens.expiration_seconds(), 3600);
    }

    #[test]
    fn test_session_from_other_issuer_is_rejected() {
        let token = service("elsewhere", 1)
            .generate_token(Uuid::new_v4(), "@ada")
            .unwrap();

        assert!(matches!(
            service("chirp", 1).validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_lapsed_session_is_expired() {
        let tokens = service("chirp", -2);
        let token = tokens.generate_token(Uuid::new_v4(), "@ada").unwrap();

        assert!(matches!(
            tokens.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }
}
