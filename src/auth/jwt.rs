//! JWT Token Service
//!
//! RS256 access tokens: the issuer signs with the private key, the verifier only
//! ever needs the public key.

use std::path::Path;

use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::users::{UserAccount, UserId};

/// Lifetime of an access token when none is configured.
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::hours(1);

/// How far in the future an `iat` claim may lie before the token is rejected.
const MAX_ISSUED_AT_SKEW_SECS: i64 = 60;

/// Token-related errors.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to parse key material: {0}")]
    Key(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Malformed, forged or expired. Carries no detail.
    #[error("invalid token")]
    Invalid,

    #[error("token expiry out of range")]
    ExpiryOutOfRange,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// RSA key pair used to sign and verify access tokens.
///
/// Loaded once at startup and handed to the issuer and the verifier.
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenKeys {
    /// Parse PEM encoded RSA keys (PKCS#1 or PKCS#8 private key, SPKI or PKCS#1 public key).
    pub fn from_rsa_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, TokenError> {
        Ok(Self {
            encoding_key: EncodingKey::from_rsa_pem(private_pem).map_err(TokenError::Key)?,
            decoding_key: DecodingKey::from_rsa_pem(public_pem).map_err(TokenError::Key)?,
        })
    }

    /// Read both PEM files from disk.
    pub fn load(private_key_path: &Path, public_key_path: &Path) -> anyhow::Result<Self> {
        let private_pem = std::fs::read(private_key_path).with_context(|| {
            format!("Failed to read private key {}", private_key_path.display())
        })?;
        let public_pem = std::fs::read(public_key_path).with_context(|| {
            format!("Failed to read public key {}", public_key_path.display())
        })?;

        Self::from_rsa_pem(&private_pem, &public_pem).context("Failed to parse RSA key pair")
    }
}

/// Signs access tokens for authenticated accounts.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    validity: Duration,
}

impl TokenIssuer {
    /// A non-positive `validity` falls back to [`DEFAULT_TOKEN_VALIDITY`].
    pub fn new(keys: &TokenKeys, validity: Duration) -> Self {
        let validity = if validity <= Duration::zero() {
            DEFAULT_TOKEN_VALIDITY
        } else {
            validity
        };

        Self {
            encoding_key: keys.encoding_key.clone(),
            validity,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign a token whose subject is the account id.
    pub fn issue(&self, account: &UserAccount) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.validity)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: account.id().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }
}

/// Validates access tokens against the public key.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: &TokenKeys) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: keys.decoding_key.clone(),
            validation,
        }
    }

    /// Check signature and timestamps, returning the subject account id.
    ///
    /// Every failure collapses into [`TokenError::Invalid`].
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("token rejected: {}", e);
            TokenError::Invalid
        })?;
        let claims = data.claims;

        if claims.iat > Utc::now().timestamp() + MAX_ISSUED_AT_SKEW_SECS {
            tracing::debug!("token rejected: issued in the future");
            return Err(TokenError::Invalid);
        }

        claims.sub.parse().map_err(|_| {
            tracing::debug!("token rejected: malformed subject");
            TokenError::Invalid
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{other_token_keys, sample_account, token_keys, PRIVATE_KEY_PEM};
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn sign(claims: &Claims) -> String {
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM).unwrap();
        encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
    }

    #[test]
    fn test_jwt_roundtrip() {
        let keys = token_keys();
        let issuer = TokenIssuer::new(&keys, DEFAULT_TOKEN_VALIDITY);
        let verifier = TokenVerifier::new(&keys);
        let account = sample_account();

        let token = issuer.issue(&account).unwrap();
        assert_eq!(verifier.verify(&token).unwrap(), account.id());
    }

    #[test]
    fn test_token_format_is_standard_jwt() {
        let keys = token_keys();
        let token = TokenIssuer::new(&keys, Duration::minutes(5))
            .issue(&sample_account())
            .unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[0]).unwrap()).unwrap();
        assert_eq!(header["alg"], "RS256");

        let claims: Claims =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn test_non_positive_validity_uses_default() {
        let keys = token_keys();
        assert_eq!(
            TokenIssuer::new(&keys, Duration::zero()).validity(),
            DEFAULT_TOKEN_VALIDITY
        );
        assert_eq!(
            TokenIssuer::new(&keys, Duration::seconds(-5)).validity(),
            DEFAULT_TOKEN_VALIDITY
        );
    }

    #[test]
    fn test_validity_beyond_date_range() {
        let issuer = TokenIssuer::new(&token_keys(), Duration::seconds(100_000_000_000_000));
        assert!(matches!(
            issuer.issue(&sample_account()),
            Err(TokenError::ExpiryOutOfRange)
        ));
    }

    #[test]
    fn test_expired_token() {
        let verifier = TokenVerifier::new(&token_keys());
        let now = Utc::now().timestamp();
        let token = sign(&Claims {
            sub: sample_account().id().to_string(),
            iat: now - 7200,
            exp: now - 10,
        });

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_issued_in_future() {
        let verifier = TokenVerifier::new(&token_keys());
        let now = Utc::now().timestamp();
        let token = sign(&Claims {
            sub: sample_account().id().to_string(),
            iat: now + 3600,
            exp: now + 7200,
        });

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_token_with_wrong_key() {
        let forger = TokenIssuer::new(&other_token_keys(), DEFAULT_TOKEN_VALIDITY);
        let verifier = TokenVerifier::new(&token_keys());

        let token = forger.issue(&sample_account()).unwrap();
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_malformed_tokens() {
        let verifier = TokenVerifier::new(&token_keys());
        for token in ["", "invalid token", "a.b.c"] {
            assert!(matches!(verifier.verify(token), Err(TokenError::Invalid)));
        }
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let verifier = TokenVerifier::new(&token_keys());
        let now = Utc::now().timestamp();
        let token = sign(&Claims {
            sub: "jdoe".to_string(),
            iat: now,
            exp: now + 60,
        });

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_hs256_token_rejected() {
        let verifier = TokenVerifier::new(&token_keys());
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: sample_account().id().to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"shared-secret"),
        )
        .unwrap();

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }
}
