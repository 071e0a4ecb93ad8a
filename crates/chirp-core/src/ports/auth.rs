//! Authentication ports.

use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub account_id: Uuid,
    pub handle: String,
    pub exp: i64,
}

/// Session token issuing and checking.
pub trait TokenService: Send + Sync {
    /// Generate an access token for an account.
    fn generate_token(&self, account_id: Uuid, handle: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Credential hashing. Plain credentials are never stored.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text credential.
    fn hash(&self, credential: &str) -> Result<String, AuthError>;

    /// Verify a credential against a stored hash.
    fn verify(&self, credential: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
