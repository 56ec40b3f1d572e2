//! Session identifiers
//!
//! A session identifier is the single-use token that pairs one uploader with
//! one downloader. It is 128 bits of randomness rendered as lowercase hex, so
//! concurrent sessions never collide in practice and links cannot be guessed.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Length of a session identifier (32 hex characters = 128 bits)
pub const SESSION_ID_HEX_LENGTH: usize = 32;

/// Validation error for session identifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionIdError {
    /// No identifier was supplied
    #[error("session id is empty")]
    Empty,
    /// Identifier has the wrong length (must be exactly 32 characters)
    #[error("session id must be 32 characters")]
    InvalidLength,
    /// Identifier contains non-hexadecimal or uppercase characters
    #[error("session id must be lowercase hexadecimal")]
    InvalidCharacters,
}

/// Opaque, unguessable token naming one transfer session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        let bytes: [u8; 16] = rand::random();
        Self(hex::encode(bytes))
    }

    /// Validate and wrap an identifier received from a peer
    ///
    /// # Errors
    ///
    /// Returns a `SessionIdError` variant describing the validation failure.
    pub fn parse(raw: &str) -> Result<Self, SessionIdError> {
        validate_session_id(raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `SessionId` be queried with a plain `&str`.
impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Validate a session identifier string
///
/// Checks:
/// - Not empty
/// - Exactly 32 characters long (128 bits)
/// - Only lowercase hexadecimal characters (0-9, a-f)
///
/// # Errors
///
/// Returns a `SessionIdError` variant describing the validation failure.
pub fn validate_session_id(raw: &str) -> Result<(), SessionIdError> {
    if raw.is_empty() {
        return Err(SessionIdError::Empty);
    }

    if raw.len() != SESSION_ID_HEX_LENGTH {
        return Err(SessionIdError::InvalidLength);
    }

    for ch in raw.chars() {
        if !ch.is_ascii_hexdigit() || ch.is_ascii_uppercase() {
            return Err(SessionIdError::InvalidCharacters);
        }
    }

    Ok(())
}
