//! Email to user-id resolution with on-demand provisioning.

use std::sync::Arc;

use crate::error::CoreError;
use crate::store::UserDirectory;
use crate::types::UserId;
use crate::validation::normalize_email;

#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserDirectory>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Resolve one email to a user id, provisioning an account if needed.
    pub async fn resolve(&self, email: &str) -> Result<UserId, CoreError> {
        let email = normalize_email(email);
        if let Some(user) = self.users.find_by_email(&email).await? {
            return Ok(user.id);
        }

        let id = self.users.provision(&email).await?;
        tracing::info!(user_id = %id, "Provisioned account for new student email");
        Ok(id)
    }

    /// Resolve every email, preserving input order.
    pub async fn resolve_all(&self, emails: &[String]) -> Result<Vec<UserId>, CoreError> {
        let mut ids = Vec::with_capacity(emails.len());
        for email in emails {
            ids.push(self.resolve(email).await?);
        }
        Ok(ids)
    }
}
