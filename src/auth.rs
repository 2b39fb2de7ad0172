//! Placeholder authentication
//!
//! Login and signup accept any non-empty credentials; nothing is checked
//! or stored apart from a "logged in" flag. Real credential storage is a
//! separate piece of work and must not build on this.

use std::fmt;

use crate::storage::{KeyValueStorage, StorageError};
use crate::store::RecordStore;

/// Stored in the session slot while logged in
const SESSION_ACTIVE: &str = "1";

/// Login/signup failure
#[derive(Debug)]
pub enum AuthError {
    /// Email or password left empty on the form
    MissingCredentials,
    /// The session flag could not be written
    Storage(StorageError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "email and password are required"),
            AuthError::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Storage(e) => Some(e),
            AuthError::MissingCredentials => None,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        AuthError::Storage(e)
    }
}

/// Email/password pair from the login or signup form
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Form-level check: both fields must be filled in
    pub fn new(email: &str, password: &str) -> Result<Self, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Stub: every login succeeds
pub fn login_user(_credentials: &Credentials) -> bool {
    true
}

/// Stub: every registration succeeds; there is no account list to collide with
pub fn register_user(_credentials: &Credentials) -> bool {
    true
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// Validate the form, run the login stub and mark the session active
    pub fn login(&mut self, email: &str, password: &str) -> Result<bool, AuthError> {
        let credentials = Credentials::new(email, password)?;
        if !login_user(&credentials) {
            return Ok(false);
        }
        let key = self.config().session_key.clone();
        self.storage_mut().set_item(&key, SESSION_ACTIVE)?;
        log::info!("Logged in as {}", credentials.email);
        Ok(true)
    }

    /// Validate the form and run the signup stub. Does not log in.
    pub fn register(&mut self, email: &str, password: &str) -> Result<bool, AuthError> {
        let credentials = Credentials::new(email, password)?;
        let ok = register_user(&credentials);
        if ok {
            log::info!("Registered {}", credentials.email);
        }
        Ok(ok)
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        let key = self.config().session_key.clone();
        self.storage_mut().remove_item(&key)?;
        log::info!("Logged out");
        Ok(())
    }

    pub fn is_logged_in(&self) -> Result<bool, AuthError> {
        let value = self.storage().get_item(&self.config().session_key)?;
        Ok(value.as_deref() == Some(SESSION_ACTIVE))
    }
}
