//! Share-token codec.
//!
//! A share token packages a [`SalaryForm`] behind a password so a
//! breakdown can be passed around as a URL parameter.  The token is
//! base64 over JSON — reversible encoding, not encryption.  The
//! password gate is an equality check on the encoded password, an
//! access-friction measure rather than a security boundary; anyone
//! determined can decode the payload.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::SalaryForm;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share token is not valid base64")]
    Encoding(#[from] base64::DecodeError),
    #[error("share token payload is malformed")]
    Payload(#[from] serde_json::Error),
    #[error("wrong password")]
    WrongPassword,
}

/// Wire shape of a token: both the password and the form payload are
/// independently base64-encoded JSON/text, plus a creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenPayload {
    password: String,
    data: String,
    timestamp: u64,
}

/// A decoded token whose payload is still gated behind its password.
#[derive(Debug, Clone)]
pub struct LockedShare {
    payload: TokenPayload,
}

impl LockedShare {
    /// Milliseconds since the Unix epoch at encoding time.
    pub fn timestamp_ms(&self) -> u64 {
        self.payload.timestamp
    }

    /// Releases the form if `password` matches the one the token was
    /// created with.
    pub fn unlock(&self, password: &str) -> Result<SalaryForm, ShareError> {
        if STANDARD.encode(password) != self.payload.password {
            return Err(ShareError::WrongPassword);
        }
        let data = STANDARD.decode(&self.payload.data)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

/// Encodes a form and password into a transportable token.
pub fn encode(form: &SalaryForm, password: &str) -> Result<String, ShareError> {
    let payload = TokenPayload {
        password: STANDARD.encode(password),
        data: STANDARD.encode(serde_json::to_vec(form)?),
        timestamp: now_ms(),
    };
    Ok(STANDARD.encode(serde_json::to_vec(&payload)?))
}

/// Decodes the outer layers of a token.  The form itself stays locked
/// until [`LockedShare::unlock`] is given the right password.
pub fn decode(token: &str) -> Result<LockedShare, ShareError> {
    let raw = STANDARD.decode(token.trim())?;
    let payload: TokenPayload = serde_json::from_slice(&raw)?;
    Ok(LockedShare { payload })
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
