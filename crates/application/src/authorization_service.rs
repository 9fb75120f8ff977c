use std::collections::BTreeSet;

use tourguard_core::{AppError, AppResult, Identity, Role};
use tourguard_domain::{Capability, Resource, capabilities_for};
use tracing::warn;

use crate::Session;

/// Returns whether an identity holds a capability.
///
/// Absent identities hold nothing, administrators hold everything, and every
/// other role is checked by exact membership in its capability set.
#[must_use]
pub fn has_permission(identity: Option<&Identity>, capability: Capability) -> bool {
    AuthorizationService::new().has_permission(identity, capability)
}

/// Page affordances an identity may be shown for one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleActions {
    /// Show the create button.
    pub can_create: bool,
    /// Show status controls.
    pub can_update: bool,
    /// Show the delete button.
    pub can_delete: bool,
}

/// Application service for capability checks.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationService {
    table: fn(Role) -> BTreeSet<Capability>,
}

impl Default for AuthorizationService {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationService {
    /// Creates a service backed by the built-in role table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: capabilities_for,
        }
    }

    /// Creates a service backed by a custom role table.
    #[must_use]
    pub fn with_table(table: fn(Role) -> BTreeSet<Capability>) -> Self {
        Self { table }
    }

    /// Returns whether the identity currently has the capability.
    #[must_use]
    pub fn has_permission(&self, identity: Option<&Identity>, capability: Capability) -> bool {
        let Some(identity) = identity else {
            return false;
        };

        if identity.role() == Role::Admin {
            return true;
        }

        (self.table)(identity.role()).contains(&capability)
    }

    /// Ensures the session identity holds the capability.
    pub fn require_permission<'a>(
        &self,
        session: &'a Session,
        capability: Capability,
    ) -> AppResult<&'a Identity> {
        let identity = session.require_identity()?;

        if !self.has_permission(Some(identity), capability) {
            warn!(
                subject = %identity.id(),
                role = %identity.role(),
                capability = %capability,
                "permission denied"
            );
            return Err(AppError::Forbidden(capability.as_str().to_owned()));
        }

        Ok(identity)
    }

    /// Ensures the session is authenticated before a protected read.
    pub fn require_authenticated<'a>(&self, session: &'a Session) -> AppResult<&'a Identity> {
        session.require_identity()
    }

    /// Reports which mutation affordances a page may show.
    ///
    /// Hiding controls is cosmetic; every mutation still calls
    /// [`AuthorizationService::require_permission`].
    #[must_use]
    pub fn visible_actions(&self, session: &Session, resource: Resource) -> VisibleActions {
        let allowed = self.has_permission(session.current_identity(), resource.write_capability());
        VisibleActions {
            can_create: allowed,
            can_update: allowed,
            can_delete: allowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use tourguard_core::{AppError, Identity, Role};
    use tourguard_domain::{Capability, Resource, capabilities_for};

    use super::{AuthorizationService, has_permission};
    use crate::{CredentialDirectory, CredentialRecord, Credentials, Session};

    struct SingleUserDirectory(Role);

    impl CredentialDirectory for SingleUserDirectory {
        fn find_by_email(&self, email: &str) -> Option<CredentialRecord> {
            Some(CredentialRecord {
                email: email.to_owned(),
                password: "demo123".to_owned(),
                identity: Identity::new("user-x", "Someone", self.0, email),
            })
        }
    }

    fn session_for(role: Role) -> Session {
        let mut session = Session::new();
        let result = session.login(
            &SingleUserDirectory(role),
            &Credentials::new("someone@demo.local", "demo123"),
        );
        assert!(result.is_ok());
        session
    }

    #[test]
    fn permission_law_holds_for_every_role_and_capability() {
        for role in Role::all() {
            let identity = Identity::new("id", "name", *role, "x@demo.local");
            for capability in Capability::all() {
                let expected =
                    *role == Role::Admin || capabilities_for(*role).contains(capability);
                assert_eq!(has_permission(Some(&identity), *capability), expected);
            }
        }
    }

    #[test]
    fn anonymous_identity_has_no_capability() {
        for capability in Capability::all() {
            assert!(!has_permission(None, *capability));
        }
    }

    #[test]
    fn admin_wildcard_ignores_table_contents() {
        fn empty_table(_: Role) -> BTreeSet<Capability> {
            BTreeSet::new()
        }

        let service = AuthorizationService::with_table(empty_table);
        let admin = Identity::new("id", "Admin", Role::Admin, "admin@demo.local");
        let hotel = Identity::new("id", "Hotel", Role::Hotel, "hotel1@demo.local");
        assert!(service.has_permission(Some(&admin), Capability::AuditManage));
        assert!(!service.has_permission(Some(&hotel), Capability::IncidentsRead));
    }

    #[test]
    fn require_permission_distinguishes_anonymous_from_forbidden() {
        let service = AuthorizationService::new();

        let anonymous_session = Session::new();
        let anonymous = service.require_permission(&anonymous_session, Capability::ZonesWrite);
        assert!(matches!(anonymous, Err(AppError::Unauthorized(_))));

        let police = session_for(Role::Police);
        let forbidden = service.require_permission(&police, Capability::ZonesWrite);
        assert!(matches!(forbidden, Err(AppError::Forbidden(ref value)) if value == "zones.write"));
    }

    #[test]
    fn visible_actions_follow_write_capability() {
        let service = AuthorizationService::new();
        assert!(
            service
                .visible_actions(&session_for(Role::Admin), Resource::Zones)
                .can_create
        );
        assert!(
            !service
                .visible_actions(&session_for(Role::Police), Resource::Zones)
                .can_delete
        );
        assert!(
            service
                .visible_actions(&session_for(Role::Tourism), Resource::Tourists)
                .can_update
        );
    }
}
