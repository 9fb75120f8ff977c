//! Explicit session context passed to every operation.
//!
//! A session is either anonymous or holds one authenticated [`Identity`].
//! Login validates against a [`CredentialDirectory`]; a login attempted while
//! authenticated returns the current identity without re-validating.

use tourguard_core::{AppError, AppResult, Identity};
use tracing::{info, warn};

use crate::DataMode;

/// Login form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Plaintext demo password.
    pub password: String,
}

impl Credentials {
    /// Creates a credentials payload.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Directory entry matched during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Login email.
    pub email: String,
    /// Plaintext demo password.
    pub password: String,
    /// Identity established on a successful match.
    pub identity: Identity,
}

/// Port for the static demo credential list.
pub trait CredentialDirectory: Send + Sync {
    /// Finds the entry registered for an exact email.
    fn find_by_email(&self, email: &str) -> Option<CredentialRecord>;
}

/// Session state for one portal user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    mock_mode: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an anonymous session in mock mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            identity: None,
            mock_mode: true,
        }
    }

    /// Authenticates against the credential directory.
    pub fn login(
        &mut self,
        directory: &dyn CredentialDirectory,
        credentials: &Credentials,
    ) -> AppResult<Identity> {
        if let Some(identity) = &self.identity {
            return Ok(identity.clone());
        }

        let Some(record) = directory.find_by_email(credentials.email.as_str()) else {
            warn!(email = %credentials.email, "login rejected: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if record.email != credentials.email || record.password != credentials.password {
            warn!(email = %credentials.email, "login rejected: credential mismatch");
            return Err(AppError::InvalidCredentials);
        }

        info!(
            subject = %record.identity.id(),
            role = %record.identity.role(),
            "session authenticated"
        );
        self.identity = Some(record.identity.clone());
        Ok(record.identity)
    }

    /// Clears the identity and returns the one that was logged out.
    pub fn logout(&mut self) -> Option<Identity> {
        let identity = self.identity.take();
        if let Some(identity) = &identity {
            info!(subject = %identity.id(), "session ended");
        }

        identity
    }

    /// Returns the authenticated identity, if any.
    #[must_use]
    pub fn current_identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Returns whether an identity is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Returns the identity or an unauthorized error.
    pub fn require_identity(&self) -> AppResult<&Identity> {
        self.identity
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("no authenticated session".to_owned()))
    }

    /// Toggles simulated data service behaviour. Never affects authorization.
    pub fn set_mock_mode(&mut self, enabled: bool) {
        self.mock_mode = enabled;
    }

    /// Returns whether mock mode is enabled.
    #[must_use]
    pub fn mock_mode(&self) -> bool {
        self.mock_mode
    }

    /// Returns the data mode downstream fetches should use.
    #[must_use]
    pub fn data_mode(&self) -> DataMode {
        if self.mock_mode {
            DataMode::Mock
        } else {
            DataMode::Live
        }
    }
}

#[cfg(test)]
mod tests {
    use tourguard_core::{AppError, Identity, Role};

    use super::{CredentialDirectory, CredentialRecord, Credentials, Session};
    use crate::DataMode;

    struct FakeDirectory;

    impl CredentialDirectory for FakeDirectory {
        fn find_by_email(&self, email: &str) -> Option<CredentialRecord> {
            (email == "police1@demo.local").then(|| CredentialRecord {
                email: email.to_owned(),
                password: "demo123".to_owned(),
                identity: Identity::new("user-2", "Officer Sarah Chen", Role::Police, email),
            })
        }
    }

    #[test]
    fn login_with_exact_credentials_authenticates() {
        let mut session = Session::new();
        let identity = session.login(
            &FakeDirectory,
            &Credentials::new("police1@demo.local", "demo123"),
        );
        assert!(matches!(identity, Ok(ref value) if value.role() == Role::Police));
        assert!(session.is_authenticated());
    }

    #[test]
    fn wrong_password_is_rejected_and_session_stays_anonymous() {
        let mut session = Session::new();
        let result = session.login(
            &FakeDirectory,
            &Credentials::new("police1@demo.local", "Demo123"),
        );
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
        assert!(session.current_identity().is_none());
    }

    #[test]
    fn login_while_authenticated_returns_existing_identity() {
        let mut session = Session::new();
        let first = session.login(
            &FakeDirectory,
            &Credentials::new("police1@demo.local", "demo123"),
        );
        assert!(first.is_ok());

        let second = session.login(&FakeDirectory, &Credentials::new("nobody@demo.local", "x"));
        assert!(matches!(second, Ok(ref value) if value.id() == "user-2"));
    }

    #[test]
    fn logout_is_idempotent() {
        let mut session = Session::new();
        let _ = session.login(
            &FakeDirectory,
            &Credentials::new("police1@demo.local", "demo123"),
        );
        assert!(session.logout().is_some());
        assert!(session.logout().is_none());
        assert!(session.require_identity().is_err());
    }

    #[test]
    fn mock_mode_drives_data_mode() {
        let mut session = Session::new();
        assert_eq!(session.data_mode(), DataMode::Mock);
        session.set_mock_mode(false);
        assert_eq!(session.data_mode(), DataMode::Live);
    }
}
