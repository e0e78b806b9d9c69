//! Identity providers.
//!
//! Authentication itself lives outside noteboard; controllers only ask who
//! the current user is, and get `None` while the provider has not resolved.

use std::sync::{Arc, PoisonError, RwLock};

pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<String>;
}

/// Fixed identity.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self(Some(user_id.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Identity that resolves or changes after controllers are built.
#[derive(Debug, Clone, Default)]
pub struct SharedIdentity {
    user: Arc<RwLock<Option<String>>>,
}

impl SharedIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: Option<String>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user_id;
    }
}

impl IdentityProvider for SharedIdentity {
    fn current_user(&self) -> Option<String> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|user| !user.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_identity() {
        assert_eq!(StaticIdentity::new("u1").current_user().as_deref(), Some("u1"));
        assert_eq!(StaticIdentity::anonymous().current_user(), None);
    }

    #[test]
    fn shared_identity_tracks_updates() {
        let identity = SharedIdentity::new();
        let observer = identity.clone();
        assert_eq!(observer.current_user(), None);

        identity.set(Some("u1".into()));
        assert_eq!(observer.current_user().as_deref(), Some("u1"));

        identity.set(Some("  ".into()));
        assert_eq!(observer.current_user(), None);
    }
}
