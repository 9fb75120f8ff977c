use tourguard_application::{CredentialDirectory, CredentialRecord};
use tourguard_core::{Identity, Role};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "demo123";

/// Static demo accounts, one per role.
#[derive(Debug, Clone)]
pub struct DemoCredentialDirectory {
    entries: Vec<CredentialRecord>,
}

impl Default for DemoCredentialDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoCredentialDirectory {
    /// Creates the built-in demo directory.
    #[must_use]
    pub fn new() -> Self {
        let accounts = [
            ("user-1", "Admin User", Role::Admin, "admin@demo.local", "ADM001", "Central Command", "+91 98765 43210"),
            ("user-2", "Officer Sarah Chen", Role::Police, "police1@demo.local", "POL001", "District 1", "+91 98765 43211"),
            ("user-3", "Tourism Officer Raj Patel", Role::Tourism, "tourism1@demo.local", "TOU001", "Tourism Board", "+91 98765 43212"),
            ("user-4", "112 Operator Maya Singh", Role::Operator112, "operator112@demo.local", "OPR001", "Emergency Response", "+91 98765 43213"),
            ("user-5", "Hotel Manager Kumar", Role::Hotel, "hotel1@demo.local", "HTL001", "Grand Palace Hotel", "+91 98765 43214"),
            ("tourist-demo", "Demo Tourist", Role::Tourist, "tourist_demo@demo.local", "TRV001", "Visitor", "+91 98765 43219"),
        ];

        let entries = accounts
            .into_iter()
            .map(|(id, name, role, email, badge, unit, phone)| CredentialRecord {
                email: email.to_owned(),
                password: DEMO_PASSWORD.to_owned(),
                identity: Identity::new(id, name, role, email)
                    .with_assignment(Some(badge.to_owned()), Some(unit.to_owned()))
                    .with_phone(Some(phone.to_owned())),
            })
            .collect();

        Self { entries }
    }
}

impl CredentialDirectory for DemoCredentialDirectory {
    fn find_by_email(&self, email: &str) -> Option<CredentialRecord> {
        self.entries
            .iter()
            .find(|entry| entry.email == email)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use tourguard_application::{CredentialDirectory, Credentials, Session};
    use tourguard_core::{AppError, Role};

    use super::{DEMO_PASSWORD, DemoCredentialDirectory};

    #[test]
    fn every_role_has_one_demo_account() {
        let directory = DemoCredentialDirectory::new();
        for (email, role) in [
            ("admin@demo.local", Role::Admin),
            ("police1@demo.local", Role::Police),
            ("tourism1@demo.local", Role::Tourism),
            ("operator112@demo.local", Role::Operator112),
            ("hotel1@demo.local", Role::Hotel),
            ("tourist_demo@demo.local", Role::Tourist),
        ] {
            let entry = directory.find_by_email(email);
            assert!(matches!(entry, Some(ref value) if value.identity.role() == role));
        }
    }

    #[test]
    fn email_match_is_exact() {
        let directory = DemoCredentialDirectory::new();
        assert!(directory.find_by_email("Admin@demo.local").is_none());

        let mut session = Session::new();
        let result = session.login(
            &directory,
            &Credentials::new("Admin@demo.local", DEMO_PASSWORD),
        );
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn police_login_carries_badge_and_unit() {
        let directory = DemoCredentialDirectory::new();
        let mut session = Session::new();
        let result = session.login(
            &directory,
            &Credentials::new("police1@demo.local", DEMO_PASSWORD),
        );
        assert!(matches!(result, Ok(ref identity) if identity.badge() == Some("POL001")));
    }
}
