//! Admin token verification.
//!
//! Every invoice operation is gated on an HS256 JWT whose `role` claim is
//! `"admin"`. Anything else (missing header, bad signature, expired token,
//! another role) makes the caller [`Caller::Anonymous`]; the service turns
//! that into `FORBIDDEN` without saying which check failed.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ServiceError;

/// Role value that marks an administrator.
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id), informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Role marker
    #[serde(default)]
    pub role: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Who is calling the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Admin { subject: Option<String> },
    Anonymous,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        matches!(self, Caller::Admin { .. })
    }

    /// Fails with [`ServiceError::Forbidden`] unless this is an admin.
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }
}

/// Verifies admin tokens against the shared HS256 secret.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: String,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        TokenVerifier {
            secret: secret.into(),
        }
    }

    /// Resolves a raw token (with or without the `Bearer ` prefix).
    pub fn identify(&self, token: Option<&str>) -> Caller {
        let Some(raw) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Caller::Anonymous;
        };
        let token = extract_bearer_token(raw).unwrap_or(raw);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) if data.claims.role.as_deref() == Some(ADMIN_ROLE) => Caller::Admin {
                subject: data.claims.sub,
            },
            Ok(data) => {
                debug!(role = ?data.claims.role, "Token is valid but not an admin token");
                Caller::Anonymous
            }
            Err(err) => {
                debug!(error = %err, "Rejected token");
                Caller::Anonymous
            }
        }
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ").map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, role: Option<&str>, exp_offset: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Some("user-1".to_string()),
            role: role.map(str::to_string),
            iat: now,
            exp: now + exp_offset,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_admin_token_accepted() {
        let verifier = TokenVerifier::new("test-secret");
        let caller = verifier.identify(Some(&token("test-secret", Some("admin"), 3600)));
        assert_eq!(
            caller,
            Caller::Admin {
                subject: Some("user-1".to_string())
            }
        );
    }

    #[test]
    fn test_bearer_prefix_accepted() {
        let verifier = TokenVerifier::new("test-secret");
        let header = format!("Bearer {}", token("test-secret", Some("admin"), 3600));
        assert!(verifier.identify(Some(&header)).is_admin());
    }

    #[test]
    fn test_other_role_is_anonymous() {
        let verifier = TokenVerifier::new("test-secret");
        assert_eq!(
            verifier.identify(Some(&token("test-secret", Some("editor"), 3600))),
            Caller::Anonymous
        );
        assert_eq!(
            verifier.identify(Some(&token("test-secret", None, 3600))),
            Caller::Anonymous
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = TokenVerifier::new("test-secret");
        // Past the default 60s leeway.
        let expired = token("test-secret", Some("admin"), -3600);
        assert_eq!(verifier.identify(Some(&expired)), Caller::Anonymous);
    }

    #[test]
    fn test_wrong_secret_and_garbage_rejected() {
        let verifier = TokenVerifier::new("test-secret");
        assert!(!verifier.identify(Some(&token("other", Some("admin"), 3600))).is_admin());
        assert!(!verifier.identify(Some("not.a.jwt")).is_admin());
        assert!(!verifier.identify(Some("")).is_admin());
        assert!(!verifier.identify(None).is_admin());
    }

    #[test]
    fn test_require_admin() {
        assert!(Caller::Admin { subject: None }.require_admin().is_ok());
        assert!(matches!(
            Caller::Anonymous.require_admin(),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
