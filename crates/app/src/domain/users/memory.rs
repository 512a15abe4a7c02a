//! In-memory users store.

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use jiff::Timestamp;

use crate::domain::users::{
    UsersService,
    errors::UsersServiceError,
    models::{NewUser, User, UserUuid, normalise_email},
};

/// Users keyed by normalised email.
#[derive(Debug, Default)]
pub struct MemoryUsersService {
    users: DashMap<String, User>,
}

impl MemoryUsersService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsersService for MemoryUsersService {
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError> {
        let email = normalise_email(&user.email);

        match self.users.entry(email.clone()) {
            Entry::Occupied(_) => Err(UsersServiceError::AlreadyExists),
            Entry::Vacant(entry) => {
                let created = User {
                    uuid: user.uuid,
                    email,
                    name: user.name,
                    password_hash: user.password_hash,
                    role: user.role,
                    created_at: Timestamp::now(),
                };

                entry.insert(created.clone());

                Ok(created)
            }
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UsersServiceError> {
        Ok(self
            .users
            .get(&normalise_email(email))
            .map(|user| user.value().clone()))
    }

    async fn get_user(&self, uuid: UserUuid) -> Result<User, UsersServiceError> {
        self.users
            .iter()
            .find(|user| user.uuid == uuid)
            .map(|user| user.value().clone())
            .ok_or(UsersServiceError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::users::models::Role;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            uuid: UserUuid::new(),
            email: email.to_string(),
            name: "Grace".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn created_user_is_found_by_email_and_uuid() -> TestResult {
        let users = MemoryUsersService::new();

        let created = users.create_user(new_user(" Grace@Example.com")).await?;

        let by_email = users.find_user_by_email("grace@example.com").await?;
        let by_uuid = users.get_user(created.uuid).await?;

        assert_eq!(by_email.map(|user| user.uuid), Some(created.uuid));
        assert_eq!(by_uuid.email, "grace@example.com");
        assert_eq!(by_uuid.role, Role::Admin);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let users = MemoryUsersService::new();

        users.create_user(new_user("grace@example.com")).await?;

        let result = users.create_user(new_user("GRACE@example.com")).await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() -> TestResult {
        let users = MemoryUsersService::new();

        assert!(users.find_user_by_email("nobody@example.com").await?.is_none());
        assert!(matches!(
            users.get_user(UserUuid::new()).await,
            Err(UsersServiceError::NotFound)
        ));

        Ok(())
    }
}
