use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::domain::SessionInfo;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("a selector session is already active")]
    Conflict { active: Option<SessionInfo> },

    #[error("session guard unavailable: {message}")]
    Unavailable { message: String },
}

/// Enforces a single active selector session.
pub trait SessionGuard: Send + Sync {
    fn active_session(&self) -> Option<SessionInfo>;

    fn is_active(&self) -> bool {
        self.active_session().is_some()
    }

    fn try_acquire(&self, info: SessionInfo) -> Result<SessionLease, GuardError>;
}

/// Held for the lifetime of a session; dropping it releases the guard.
pub struct SessionLease {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl SessionLease {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for SessionLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLease")
            .field("held", &self.release.is_some())
            .finish()
    }
}

/// In-process guard.
#[derive(Clone, Default)]
pub struct LocalSessionGuard {
    active: Arc<Mutex<Option<SessionInfo>>>,
}

impl LocalSessionGuard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionGuard for LocalSessionGuard {
    fn active_session(&self) -> Option<SessionInfo> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn try_acquire(&self, info: SessionInfo) -> Result<SessionLease, GuardError> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = active.as_ref() {
            return Err(GuardError::Conflict {
                active: Some(existing.clone()),
            });
        }

        *active = Some(info);

        let slot = Arc::clone(&self.active);
        Ok(SessionLease::new(move || {
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_conflicts_while_lease_is_held() {
        let guard = LocalSessionGuard::new();

        let lease = guard.try_acquire(SessionInfo::new(None)).unwrap();
        let second = guard.try_acquire(SessionInfo::new(Some("firefox".to_string())));

        assert!(matches!(
            second,
            Err(GuardError::Conflict { active: Some(ref info) }) if info.scope.is_none()
        ));
        assert!(guard.is_active());
        drop(lease);
    }

    #[test]
    fn dropping_lease_releases_guard() {
        let guard = LocalSessionGuard::new();

        let lease = guard.try_acquire(SessionInfo::new(None)).unwrap();
        drop(lease);

        assert!(!guard.is_active());
        assert!(guard.try_acquire(SessionInfo::new(None)).is_ok());
    }

    #[test]
    fn clones_share_the_same_slot() {
        let guard = LocalSessionGuard::new();
        let clone = guard.clone();

        let _lease = guard.try_acquire(SessionInfo::new(None)).unwrap();

        assert!(clone.is_active());
    }
}
