// Desk login gate
use crate::config::AuthConfig;
use crate::error::{DeskError, Result};
use crate::store::{KeyValueStore, Repository};

/// Checks the configured credential pair and tracks the logged-in flag
pub struct AuthManager<'a, S> {
    repo: &'a Repository<S>,
    credentials: &'a AuthConfig,
}

impl<'a, S: KeyValueStore> AuthManager<'a, S> {
    pub fn new(repo: &'a Repository<S>, credentials: &'a AuthConfig) -> Self {
        Self { repo, credentials }
    }

    /// Log in with `username`/`password`; the flag is only set on a match
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        if username.trim() != self.credentials.username || password != self.credentials.password {
            tracing::warn!("Rejected login attempt for '{}'", username);
            return Err(DeskError::InvalidCredentials);
        }

        self.repo.set_logged_in(true)?;
        tracing::info!("Logged in as {}", username.trim());
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.repo.set_logged_in(false)
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        self.repo.is_logged_in()
    }

    /// Fail with `NotLoggedIn` unless a login is recorded
    pub fn require_login(&self) -> Result<()> {
        if self.is_logged_in()? {
            Ok(())
        } else {
            Err(DeskError::NotLoggedIn)
        }
    }
}
