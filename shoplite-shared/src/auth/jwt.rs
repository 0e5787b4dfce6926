/// Bearer token issue and verification
///
/// Login issues a signed, tamper-evident token carrying the user's identity
/// claims and an absolute expiry one hour out. Verification checks the
/// signature and the expiry; there is no refresh mechanism, so an expired
/// token means the caller must log in again.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC-SHA256)
/// - **Expiration**: fixed 1 hour
/// - **Secret**: process-wide configuration loaded once at startup, at
///   least 32 bytes, passed into this module explicitly
///
/// # Example
///
/// ```
/// use shoplite_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "test-secret-key-at-least-32-bytes-long";
///
/// let claims = Claims::new(user_id, "user@example.com".to_string());
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim embedded in every token
const ISSUER: &str = "shoplite";

/// Fixed token lifetime in seconds (1 hour)
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token signature does not verify against the configured secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Issuer claim does not match
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Token is structurally invalid
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Identity claims carried by a token
///
/// # Claims
///
/// - `sub`: Subject (user ID)
/// - `email`: Email address of the subject
/// - `iss`: Issuer (always "shoplite")
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration time (Unix timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Email address of the subject
    pub email: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring one hour from now
    ///
    /// # Example
    ///
    /// ```
    /// use shoplite_shared::auth::jwt::Claims;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string());
    /// assert!(!claims.is_expired());
    /// ```
    pub fn new(user_id: Uuid, email: String) -> Self {
        Self::with_expiration(user_id, email, Duration::seconds(TOKEN_TTL_SECS))
    }

    /// Creates claims with a custom expiration, mainly for tests
    pub fn with_expiration(user_id: Uuid, email: String, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            email,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, the expiry (`now < exp`), and the issuer.
///
/// # Errors
///
/// - `JwtError::Expired` if the token is past its expiry
/// - `JwtError::InvalidSignature` if the signature does not verify
/// - `JwtError::InvalidIssuer` if the issuer claim is wrong
/// - `JwtError::Malformed` for anything structurally invalid
///
/// # Example
///
/// ```
/// use shoplite_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string());
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.email, "user@example.com");
/// # Ok(())
/// # }
/// ```
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::Malformed(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "user@example.com".to_string());

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.iss, "shoplite");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "user@example.com".to_string());
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.email, "user@example.com");
        assert_eq!(validated.iss, "shoplite");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string());
        let token = create_token(&claims, SECRET).expect("Should create token");

        let result = validate_token(&token, "a-completely-different-secret-key!!");
        assert!(matches!(result.unwrap_err(), JwtError::InvalidSignature));
    }

    #[test]
    fn test_validate_tampered_token() {
        let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string());
        let token = create_token(&claims, SECRET).expect("Should create token");

        // Flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload: Vec<char> = parts[1].chars().collect();
        let mid = payload.len() / 2;
        payload[mid] = if payload[mid] == 'A' { 'B' } else { 'A' };
        parts[1] = payload.into_iter().collect();
        let tampered = parts.join(".");

        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_token_valid_just_before_expiry() {
        // A 1h token checked at issue_time + 59m is modeled by issuing a
        // token that still has a minute of life left.
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "user@example.com".to_string(),
            Duration::minutes(1),
        );
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(validate_token(&token, SECRET).is_ok());
    }

    #[test]
    fn test_token_expired_after_ttl() {
        // A 1h token checked at issue_time + 61m is modeled by issuing a
        // token whose expiry is already a minute in the past. jsonwebtoken
        // applies a default 60s leeway, so push past that too.
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "user@example.com".to_string(),
            Duration::minutes(-2),
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not.a.token", SECRET);
        assert!(result.is_err());
    }
}
