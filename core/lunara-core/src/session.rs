//! Session status for the running app instance.
//!
//! `SessionContext` is the single owned holder of the tri-state auth
//! condition. It is created by the application root in `Loading`, resolved
//! exactly once by the credential check, and thereafter flips between
//! `Unauthenticated` and `Authenticated` on login/logout/token-expiry.
//! It is never persisted; token storage belongs to the auth collaborator.
//!
//! The context is the only writer of session state. The navigation guard
//! (see `guard`) is a reader, notified by the application root whenever a
//! transition completes.

use crate::error::{LunaraError, Result};
use crate::types::UserRef;

/// The tri-state authentication condition of the running app.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum AuthState {
    /// Credential check has not completed yet. Policy evaluation is gated.
    Loading,
    Unauthenticated,
    Authenticated { user: UserRef },
}

impl AuthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthState::Loading => "loading",
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::Authenticated { .. } => "authenticated",
        }
    }

    pub fn user(&self) -> Option<&UserRef> {
        match self {
            AuthState::Authenticated { user } => Some(user),
            _ => None,
        }
    }
}

/// Whether a transition actually changed the observable session state.
///
/// `Unchanged` covers same-variant writes with the same identity; re-resolving
/// to the same user, for example, must not re-trigger guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Changed,
    Unchanged,
}

/// Owned, injected session state holder.
///
/// Legal transitions: `Loading → Unauthenticated | Authenticated` and
/// `Unauthenticated ⇄ Authenticated`. Nothing transitions back to `Loading`
/// short of a process restart; such a write is rejected.
#[derive(Debug)]
pub struct SessionContext {
    state: AuthState,
}

impl Default for SessionContext {
    fn default() -> Self {
        SessionContext::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        SessionContext {
            state: AuthState::Loading,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Applies a transition, validating it against the session lifecycle.
    ///
    /// Returns `Unchanged` when the write carries the same state (and, for
    /// authenticated states, the same user id) as the current one. An
    /// `Authenticated → Authenticated` write with a different user id is a
    /// change: the account switched without passing through logout.
    pub fn transition(&mut self, next: AuthState) -> Result<SessionChange> {
        if next == AuthState::Loading && self.state != AuthState::Loading {
            return Err(LunaraError::InvalidTransition {
                from: self.state.as_str(),
                to: next.as_str(),
            });
        }

        let changed = match (&self.state, &next) {
            (AuthState::Authenticated { user: current }, AuthState::Authenticated { user }) => {
                current.id != user.id
            }
            (current, next) => std::mem::discriminant(current) != std::mem::discriminant(next),
        };

        self.state = next;
        Ok(if changed {
            SessionChange::Changed
        } else {
            SessionChange::Unchanged
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserRef {
        UserRef::with_id(id)
    }

    #[test]
    fn test_starts_loading() {
        let context = SessionContext::new();
        assert_eq!(*context.state(), AuthState::Loading);
    }

    #[test]
    fn test_loading_resolves_unauthenticated() {
        let mut context = SessionContext::new();
        let change = context.transition(AuthState::Unauthenticated).unwrap();
        assert_eq!(change, SessionChange::Changed);
        assert_eq!(*context.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_loading_resolves_authenticated() {
        let mut context = SessionContext::new();
        let change = context
            .transition(AuthState::Authenticated { user: user("u1") })
            .unwrap();
        assert_eq!(change, SessionChange::Changed);
        assert_eq!(context.state().user().unwrap().id, "u1");
    }

    #[test]
    fn test_login_after_unauthenticated() {
        let mut context = SessionContext::new();
        context.transition(AuthState::Unauthenticated).unwrap();
        let change = context
            .transition(AuthState::Authenticated { user: user("u1") })
            .unwrap();
        assert_eq!(change, SessionChange::Changed);
    }

    #[test]
    fn test_logout_after_authenticated() {
        let mut context = SessionContext::new();
        context
            .transition(AuthState::Authenticated { user: user("u1") })
            .unwrap();
        let change = context.transition(AuthState::Unauthenticated).unwrap();
        assert_eq!(change, SessionChange::Changed);
        assert_eq!(*context.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_back_to_loading_is_rejected() {
        let mut context = SessionContext::new();
        context.transition(AuthState::Unauthenticated).unwrap();
        let err = context.transition(AuthState::Loading).unwrap_err();
        assert!(matches!(err, LunaraError::InvalidTransition { .. }));
        // State is untouched by the rejected write.
        assert_eq!(*context.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_same_state_write_is_unchanged() {
        let mut context = SessionContext::new();
        context.transition(AuthState::Unauthenticated).unwrap();
        let change = context.transition(AuthState::Unauthenticated).unwrap();
        assert_eq!(change, SessionChange::Unchanged);
    }

    #[test]
    fn test_same_user_write_is_unchanged() {
        let mut context = SessionContext::new();
        context
            .transition(AuthState::Authenticated { user: user("u1") })
            .unwrap();
        let change = context
            .transition(AuthState::Authenticated { user: user("u1") })
            .unwrap();
        assert_eq!(change, SessionChange::Unchanged);
    }

    #[test]
    fn test_identity_change_is_a_change() {
        let mut context = SessionContext::new();
        context
            .transition(AuthState::Authenticated { user: user("u1") })
            .unwrap();
        let change = context
            .transition(AuthState::Authenticated { user: user("u2") })
            .unwrap();
        assert_eq!(change, SessionChange::Changed);
        assert_eq!(context.state().user().unwrap().id, "u2");
    }

    #[test]
    fn test_loading_to_loading_is_unchanged() {
        let mut context = SessionContext::new();
        let change = context.transition(AuthState::Loading).unwrap();
        assert_eq!(change, SessionChange::Unchanged);
    }
}
