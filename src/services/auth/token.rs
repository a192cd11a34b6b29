/*
 * Responsibility
 * - signed bearer token の発行と検証 (HS512 + 共有 secret)
 * - claims は {sub, role, iat, exp} のみ。検証は純粋なインメモリ計算
 *
 * Notes
 * - revocation はない。署名が合い exp が未来なら token は有効
 * - role claim は発行時点の値をそのまま信用する (stateless の代償)
 */
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::v1::extractors::Role;

/// Why a token was rejected. Logged server-side; clients only ever see the
/// generic `Unauthenticated` outcome.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    BadSignature,
    Malformed,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Expired => f.write_str("token expired"),
            TokenError::BadSignature => f.write_str("token signature mismatch"),
            TokenError::Malformed => f.write_str("token malformed"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS512 token codec over a process-wide shared secret.
///
/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issue a token for `subject` expiring `ttl_seconds` from now.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(subject, role, Utc::now().timestamp())
    }

    // Split out so tests can issue tokens at a chosen instant.
    pub(crate) fn issue_at(
        &self,
        subject: &str,
        role: Role,
        issued_at: i64,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims {
            sub: subject.to_string(),
            role,
            iat: issued_at,
            exp: issued_at + self.ttl_seconds as i64,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Malformed)
    }

    /// Verify signature and expiry, then decode the claims.
    ///
    /// Pure function of (token, shared secret, current time); never blocks.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret", 7200)
    }

    #[test]
    fn round_trip_preserves_subject_and_role() {
        let c = codec();
        let token = c.issue("a@x.com", Role::Owner).unwrap();
        let claims = c.verify(&token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.role, Role::Owner);
        assert_eq!(claims.exp - claims.iat, 7200);
    }

    #[test]
    fn token_valid_just_before_expiry() {
        let c = codec();
        // Issued (ttl - 60) seconds ago: still inside the window.
        let issued_at = Utc::now().timestamp() - 7200 + 60;
        let token = c.issue_at("a@x.com", Role::Client, issued_at).unwrap();
        assert!(c.verify(&token).is_ok());
    }

    #[test]
    fn token_rejected_after_expiry() {
        let c = codec();
        let issued_at = Utc::now().timestamp() - 7200 - 60;
        let token = c.issue_at("a@x.com", Role::Client, issued_at).unwrap();
        assert_eq!(c.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_claims_fail_verification() {
        let c = codec();
        let token = c.issue("a@x.com", Role::Client).unwrap();

        // Flip one character inside the claims (second) segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let mut claims = std::mem::take(&mut parts[1]).into_bytes();
        let mid = claims.len() / 2;
        claims[mid] = if claims[mid] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(claims).unwrap();
        let tampered = parts.join(".");

        assert!(c.verify(&tampered).is_err());
    }

    #[test]
    fn tampered_signature_fails_verification() {
        let c = codec();
        let token = c.issue("a@x.com", Role::Client).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut sig = std::mem::take(&mut parts[2]).into_bytes();
        sig[0] = if sig[0] == b'A' { b'B' } else { b'A' };
        parts[2] = String::from_utf8(sig).unwrap();
        let tampered = parts.join(".");

        assert_eq!(c.verify(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let ours = codec();
        let theirs = TokenCodec::new("other-secret", 7200);
        let token = theirs.issue("a@x.com", Role::Admin).unwrap();
        assert_eq!(ours.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let c = codec();
        assert_eq!(c.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(c.verify("a.b"), Err(TokenError::Malformed));
        assert_eq!(c.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn unknown_role_claim_is_malformed() {
        let c = codec();
        // Sign claims with a role outside the closed set using the same key.
        #[derive(Serialize)]
        struct Loose<'a> {
            sub: &'a str,
            role: &'a str,
            iat: i64,
            exp: i64,
        }
        let now = Utc::now().timestamp();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &Loose {
                sub: "a@x.com",
                role: "SUPERUSER",
                iat: now,
                exp: now + 600,
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(c.verify(&token), Err(TokenError::Malformed));
    }
}
