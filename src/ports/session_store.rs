//! Session store port - the authenticated session the frozen profile is
//! handed to when onboarding completes.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::profile::CompletedProfile;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores the session, replacing any previous one.
    async fn save(&self, session: &CompletedProfile) -> Result<(), SessionStoreError>;

    /// Returns the active session, if any.
    async fn current(&self) -> Result<Option<CompletedProfile>, SessionStoreError>;

    /// Ends the active session.
    async fn clear(&self) -> Result<(), SessionStoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<SessionStoreError> for DomainError {
    fn from(err: SessionStoreError) -> Self {
        DomainError::collaborator_unavailable("session_store", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_: &dyn SessionStore) {}
    }
}
