//! Identity token signing and verification.
//!
//! Format: `vt1.<claims>.<signature>` where `claims` is base64url JSON and
//! `signature` is base64url HMAC-SHA256 over `vt1.<claims>`.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as BASE64};
use hmac::{Hmac, Mac};
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroize;

use crate::{
    auth::models::{Identity, IssuedToken},
    domain::users::models::{Role, UserUuid},
};

type HmacSha256 = Hmac<Sha256>;

/// Identity token version prefix.
pub const IDENTITY_TOKEN_PREFIX: &str = "vt1";

/// Shortest accepted signing secret, in bytes.
pub const MIN_TOKEN_SECRET_BYTES: usize = 32;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(24);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityTokenError {
    #[error("identity token format is invalid")]
    InvalidFormat,

    #[error("identity token uses an unsupported version")]
    UnsupportedVersion,

    #[error("identity token signature is invalid")]
    InvalidSignature,

    #[error("identity token has expired")]
    Expired,

    #[error("token secret must be at least {MIN_TOKEN_SECRET_BYTES} bytes")]
    WeakSecret,

    #[error("token lifetime must be positive")]
    InvalidLifetime,

    #[error("identity token claims could not be encoded")]
    Encoding,
}

#[derive(Clone)]
pub struct TokenSecret {
    bytes: Vec<u8>,
}

impl TokenSecret {
    /// # Errors
    ///
    /// Returns [`IdentityTokenError::WeakSecret`] when shorter than
    /// [`MIN_TOKEN_SECRET_BYTES`].
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, IdentityTokenError> {
        let bytes = secret.into();

        if bytes.len() < MIN_TOKEN_SECRET_BYTES {
            let mut bytes = bytes;
            bytes.zeroize();

            return Err(IdentityTokenError::WeakSecret);
        }

        Ok(Self { bytes })
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(**redacted**)")
    }
}

impl Drop for TokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: UserUuid,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Signs and verifies identity tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
    ttl: SignedDuration,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// # Errors
    ///
    /// Returns [`IdentityTokenError::InvalidLifetime`] for a zero or negative
    /// lifetime.
    pub fn new(secret: TokenSecret, ttl: SignedDuration) -> Result<Self, IdentityTokenError> {
        if !ttl.is_positive() {
            return Err(IdentityTokenError::InvalidLifetime);
        }

        let mac = HmacSha256::new_from_slice(&secret.bytes)
            .map_err(|_| IdentityTokenError::WeakSecret)?;

        Ok(Self { mac, ttl })
    }

    #[must_use]
    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }

    /// Issue a token for `identity`, valid from `now` for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityTokenError::Encoding`] if the claims cannot be serialized.
    pub fn issue(&self, identity: Identity, now: Timestamp) -> Result<IssuedToken, IdentityTokenError> {
        let iat = now.as_second();
        let exp = iat.saturating_add(self.ttl.as_secs());

        let claims = Claims {
            sub: identity.user_uuid,
            role: identity.role,
            iat,
            exp,
        };

        let json = serde_json::to_vec(&claims).map_err(|_| IdentityTokenError::Encoding)?;

        let signing_input = format!("{IDENTITY_TOKEN_PREFIX}.{}", BASE64.encode(json));

        let mut mac = self.mac.clone();
        mac.update(signing_input.as_bytes());

        let signature = BASE64.encode(mac.finalize().into_bytes());

        Ok(IssuedToken {
            token: format!("{signing_input}.{signature}"),
            expires_at: Timestamp::from_second(exp).unwrap_or(Timestamp::MAX),
        })
    }

    /// Verify a token's structure, signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityTokenError`] describing the first check that failed.
    pub fn verify(&self, token: &str, now: Timestamp) -> Result<Identity, IdentityTokenError> {
        let (signing_input, signature) = token
            .rsplit_once('.')
            .ok_or(IdentityTokenError::InvalidFormat)?;

        let (version, claims) = signing_input
            .split_once('.')
            .ok_or(IdentityTokenError::InvalidFormat)?;

        if version != IDENTITY_TOKEN_PREFIX {
            return Err(IdentityTokenError::UnsupportedVersion);
        }

        let signature = BASE64
            .decode(signature)
            .map_err(|_| IdentityTokenError::InvalidFormat)?;

        let mut mac = self.mac.clone();
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| IdentityTokenError::InvalidSignature)?;

        let claims = BASE64
            .decode(claims)
            .map_err(|_| IdentityTokenError::InvalidFormat)?;

        let claims: Claims =
            serde_json::from_slice(&claims).map_err(|_| IdentityTokenError::InvalidFormat)?;

        if now.as_second() >= claims.exp {
            return Err(IdentityTokenError::Expired);
        }

        Ok(Identity {
            user_uuid: claims.sub,
            role: claims.role,
        })
    }
}
