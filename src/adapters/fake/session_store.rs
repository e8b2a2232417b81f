use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::profile::CompletedProfile;
use crate::ports::{SessionStore, SessionStoreError};

/// Holds at most one session in memory.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: RwLock<Option<CompletedProfile>>,
    force_error: RwLock<Option<SessionStoreError>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(self, error: SessionStoreError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    fn check_error(&self) -> Result<(), SessionStoreError> {
        match self.force_error.read().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: &CompletedProfile) -> Result<(), SessionStoreError> {
        self.check_error()?;
        *self.session.write().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn current(&self) -> Result<Option<CompletedProfile>, SessionStoreError> {
        self.check_error()?;
        Ok(self.session.read().unwrap().clone())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        self.check_error()?;
        *self.session.write().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::profile::UserProfile;

    #[tokio::test]
    async fn save_replaces_previous_session() {
        let store = InMemorySessionStore::new();
        let first = CompletedProfile::new(UserId::new("u1").unwrap(), UserProfile::empty());
        let second = CompletedProfile::new(UserId::new("u2").unwrap(), UserProfile::empty());
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();
        assert_eq!(store.current().await.unwrap(), Some(second));

        store.clear().await.unwrap();
        assert_eq!(store.current().await.unwrap(), None);
    }
}
