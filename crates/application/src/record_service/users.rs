use tourguard_domain::SystemUser;

use super::*;

impl RecordService<SystemUser> {
    /// Stamps `last_login` on the system user matching the identity email.
    ///
    /// Identities without a matching user record are ignored.
    pub async fn record_login(&self, identity: &Identity) -> AppResult<()> {
        let users = self.store.snapshot().await?;
        let Some(user) = users.iter().find(|user| user.email == identity.email()) else {
            debug!(email = identity.email(), "no system user matches identity");
            return Ok(());
        };

        let id = user.id.clone();
        self.modify_record(&id, |user| user.last_login = Some(Utc::now()))
            .await?;
        Ok(())
    }
}
