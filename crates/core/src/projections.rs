//! Read-only, role-sensitive views over the user directory.

use crate::error::CoreError;
use crate::roles::{COURSE_STAFF, TA_OR_ABOVE};
use crate::store::Stores;
use crate::types::{CourseId, UserId};
use crate::user::{FieldSet, UserView};
use crate::validation::normalize_email;

#[derive(Clone)]
pub struct Projections {
    stores: Stores,
}

impl Projections {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// The caller's own record with every private field.
    pub async fn own_profile(&self, caller: UserId) -> Result<UserView, CoreError> {
        let user = self
            .stores
            .users
            .find_by_id(caller)
            .await?
            .ok_or_else(|| CoreError::not_found("user", caller))?;
        Ok(UserView::project(&user, FieldSet::Private))
    }

    /// Users by id. TAs and above in `course` see protected fields; everyone
    /// else, including anonymous callers, sees public fields.
    pub async fn users_by_ids(
        &self,
        caller: Option<UserId>,
        ids: &[UserId],
        course: CourseId,
    ) -> Result<Vec<UserView>, CoreError> {
        let staff = match caller {
            Some(caller) => self.stores.roles.has_role(caller, TA_OR_ABOVE, course).await?,
            None => false,
        };
        let fields = if staff {
            FieldSet::Protected
        } else {
            FieldSet::Public
        };

        let users = self.stores.users.find_by_ids(ids).await?;
        Ok(users.iter().map(|u| UserView::project(u, fields)).collect())
    }

    /// Users by primary or secondary email, public fields only.
    pub async fn users_by_emails(&self, emails: &[String]) -> Result<Vec<UserView>, CoreError> {
        let emails: Vec<String> = emails.iter().map(|e| normalize_email(e)).collect();
        let users = self.stores.users.find_by_emails(&emails).await?;
        Ok(users
            .iter()
            .map(|u| UserView::project(u, FieldSet::Public))
            .collect())
    }

    /// HTAs and TAs of `course`, protected fields.
    pub async fn staff_by_course(&self, course: CourseId) -> Result<Vec<UserView>, CoreError> {
        let ids = self.stores.roles.users_in_roles(COURSE_STAFF, course).await?;
        let users = self.stores.users.find_by_ids(&ids).await?;
        Ok(users
            .iter()
            .map(|u| UserView::project(u, FieldSet::Protected))
            .collect())
    }

    /// Currently online HTAs and TAs of `course`, protected fields plus
    /// presence.
    pub async fn online_staff_by_course(
        &self,
        course: CourseId,
    ) -> Result<Vec<UserView>, CoreError> {
        let ids = self.stores.roles.users_in_roles(COURSE_STAFF, course).await?;
        let users = self.stores.users.find_by_ids(&ids).await?;
        Ok(users
            .iter()
            .filter(|u| u.presence.online)
            .map(|u| UserView::project(u, FieldSet::Protected).with_presence(u.presence))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;
    use crate::memory::MemoryStore;
    use crate::roles::{Role, RoleScope};
    use crate::types::new_id;
    use crate::user::Presence;

    fn setup() -> (Arc<MemoryStore>, Projections) {
        let store = Arc::new(MemoryStore::new());
        let projections = Projections::new(Stores::from_backend(store.clone()));
        (store, projections)
    }

    #[tokio::test]
    async fn own_profile_is_private() {
        let (store, projections) = setup();
        let ada = store.add_user("ada@example.edu", &[], Some("Ada"));
        let view = projections.own_profile(ada).await.unwrap();
        assert_eq!(view.email.as_deref(), Some("ada@example.edu"));
        assert!(view.created_at.is_some());
    }

    #[tokio::test]
    async fn own_profile_of_unknown_user_is_not_found() {
        let (_store, projections) = setup();
        assert_matches!(
            projections.own_profile(new_id()).await,
            Err(CoreError::NotFound { entity: "user", .. })
        );
    }

    #[tokio::test]
    async fn by_ids_depends_on_caller_role() {
        let (store, projections) = setup();
        let course = new_id();
        let ta = store.add_user("ta@example.edu", &[], None);
        store.grant_role(ta, Role::Ta, RoleScope::Course(course));
        let student = store.add_user("student@example.edu", &[], None);
        let target = store.add_user("target@example.edu", &[], Some("Target"));

        let as_ta = projections
            .users_by_ids(Some(ta), &[target], course)
            .await
            .unwrap();
        assert_eq!(as_ta[0].email.as_deref(), Some("target@example.edu"));
        assert!(as_ta[0].created_at.is_none());

        let as_student = projections
            .users_by_ids(Some(student), &[target], course)
            .await
            .unwrap();
        assert!(as_student[0].email.is_none());

        let anonymous = projections.users_by_ids(None, &[target], course).await.unwrap();
        assert!(anonymous[0].email.is_none());
    }

    #[tokio::test]
    async fn by_emails_is_public_and_matches_secondary() {
        let (store, projections) = setup();
        store.add_user("ada@example.edu", &["ada@alumni.example.edu"], Some("Ada"));
        let views = projections
            .users_by_emails(&["ada@alumni.example.edu".into()])
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].email.is_none());
    }

    #[tokio::test]
    async fn staff_listing_excludes_students_and_other_roles() {
        let (store, projections) = setup();
        let course = new_id();
        let hta = store.add_user("hta@example.edu", &[], None);
        let mta = store.add_user("mta@example.edu", &[], None);
        store.add_user("student@example.edu", &[], None);
        store.grant_role(hta, Role::Hta, RoleScope::Course(course));
        store.grant_role(mta, Role::Mta, RoleScope::Course(course));

        let staff = projections.staff_by_course(course).await.unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].id, hta);
        assert!(staff[0].email.is_some());
    }

    #[tokio::test]
    async fn online_staff_includes_presence_of_online_members_only() {
        let (store, projections) = setup();
        let course = new_id();
        let online = store.add_user("on@example.edu", &[], None);
        let offline = store.add_user("off@example.edu", &[], None);
        store.grant_role(online, Role::Ta, RoleScope::Course(course));
        store.grant_role(offline, Role::Ta, RoleScope::Course(course));
        store.set_presence(
            online,
            Presence {
                online: true,
                idle: true,
            },
        );

        let views = projections.online_staff_by_course(course).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, online);
        assert_eq!(
            views[0].status,
            Some(Presence {
                online: true,
                idle: true
            })
        );
    }
}
