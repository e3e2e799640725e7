//! Operator session holding the backend bearer token.
//!
//! A session is acquired once at startup, either from `STOCKROOM_TOKEN` or
//! from the session file written by `stockroom session login`, and passed
//! explicitly to the API client. Logging out removes the session file.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;

use crate::config::ClientConfig;

/// Permissions of the session file on unix.
#[cfg(unix)]
const SESSION_FILE_MODE: u32 = 0o600;

/// Errors that can occur while acquiring or storing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The token is blank.
    #[error("session token cannot be empty")]
    EmptyToken,

    /// Reading or writing the session file failed.
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),
}

/// An authenticated operator session.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Session {
    /// Create a session from a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyToken` if the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Self {
            token: SecretString::from(token),
        })
    }

    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Acquire the session for this configuration, if the operator is signed in.
    ///
    /// `STOCKROOM_TOKEN` wins over the session file. A missing or blank
    /// session file means "signed out".
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the session file exists but cannot be read.
    #[instrument(skip(config), fields(session_file = %config.session_file.display()))]
    pub fn resolve(config: &ClientConfig) -> Result<Option<Self>, SessionError> {
        if let Some(token) = &config.token {
            tracing::debug!("Using token from environment");
            return Ok(Self::new(token.expose_secret()).ok());
        }

        match std::fs::read_to_string(&config.session_file) {
            Ok(contents) => Ok(Self::new(contents).ok()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the token so later invocations are signed in.
    ///
    /// On unix the file is readable by its owner only (`0600`), including
    /// when it already existed with wider permissions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file cannot be written.
    pub fn persist(&self, path: &Path) -> Result<(), SessionError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(SESSION_FILE_MODE);
        }

        let mut file = options.open(path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(SESSION_FILE_MODE))?;
        }
        file.write_all(self.token.expose_secret().as_bytes())?;
        tracing::info!(path = %path.display(), "Session saved");
        Ok(())
    }

    /// Invalidate the persisted session.
    ///
    /// Returns `false` if there was no session to remove.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file exists but cannot be removed.
    pub fn invalidate(path: &Path) -> Result<bool, SessionError> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Session removed");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
