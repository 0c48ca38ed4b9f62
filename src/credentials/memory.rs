//! In-process credential service

use std::cell::RefCell;

use async_trait::async_trait;

use super::{CredentialError, CredentialService, NewUser, UserRecord};

/// Credential store held in memory, with the same matching rules as the
/// mock API. Can be told to fail every call to simulate an outage.
#[derive(Debug, Default)]
pub struct InMemoryCredentialService {
    users: RefCell<Vec<UserRecord>>,
    unavailable: RefCell<bool>,
    calls: RefCell<usize>,
}

impl InMemoryCredentialService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, email: &str, password: &str, full_name: &str) -> Self {
        self.insert(NewUser::new(email, password, full_name));
        self
    }

    fn insert(&self, user: NewUser) -> UserRecord {
        let mut users = self.users.borrow_mut();
        let record = UserRecord {
            id: Some((users.len() + 1).to_string()),
            email: user.email,
            full_name: user.full_name,
            password: Some(user.password),
            token: None,
            created_at: None,
        };
        users.push(record.clone());
        record
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.borrow_mut() = unavailable;
    }

    pub fn user_count(&self) -> usize {
        self.users.borrow().len()
    }

    /// Number of service calls made so far
    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }

    fn begin_call(&self) -> Result<(), CredentialError> {
        *self.calls.borrow_mut() += 1;
        if *self.unavailable.borrow() {
            return Err(CredentialError::Transport("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl CredentialService for InMemoryCredentialService {
    async fn find_users(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Vec<UserRecord>, CredentialError> {
        self.begin_call()?;
        Ok(self
            .users
            .borrow()
            .iter()
            .filter(|u| u.email.eq_ignore_ascii_case(email))
            .filter(|u| u.password.as_deref() == Some(password))
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, CredentialError> {
        self.begin_call()?;
        let exists = self
            .users
            .borrow()
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if exists {
            return Err(CredentialError::Conflict);
        }
        Ok(self.insert(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_authenticate() {
        let service =
            InMemoryCredentialService::new().with_user("john@example.com", "secret1", "John Doe");

        let user = service
            .authenticate("john@example.com", "secret1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.full_name, "John Doe");
        assert_eq!(user.id.as_deref(), Some("1"));

        assert!(service
            .authenticate("john@example.com", "wrong")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service =
            InMemoryCredentialService::new().with_user("john@example.com", "secret1", "John Doe");
        let err = service
            .create_user(&NewUser::new("JOHN@example.com", "x", "Other"))
            .await
            .unwrap_err();
        assert_eq!(err, CredentialError::Conflict);
        assert_eq!(service.user_count(), 1);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let service = InMemoryCredentialService::new();
        service.set_unavailable(true);
        assert!(matches!(
            service.find_users("a@b.co", "x").await,
            Err(CredentialError::Transport(_))
        ));
        assert_eq!(service.calls(), 1);
    }
}
