//! LunaraEngine - the main entry point for Lunara mobile clients.
//!
//! The engine provides a unified, client-agnostic API over the session
//! context and the cycle progress store. It's designed to be:
//! - **Synchronous**: No async runtime required; clients wrap with async.
//! - **Client-agnostic**: Works with Swift and Kotlin shells alike.
//! - **Stable**: Prefer additive API changes to avoid breaking FFI clients.
//!
//! Navigation stays on the client side: the shell owns the router, feeds the
//! engine its current top-level segment, and performs whatever redirect
//! [`LunaraEngine::route_decision`] returns. Rust-side hosts that own a
//! router directly can use [`crate::guard::NavigationGuard`] instead.

use std::sync::{Mutex, PoisonError};

use crate::error::LunaraFfiError;
use crate::guard::{route_decision, RouteDecision, RouteGroup};
use crate::progress::CycleProgressStore;
use crate::session::{AuthState, SessionChange, SessionContext};
use crate::storage::StorageConfig;
use crate::store::FileStore;
use crate::types::{CycleProgress, UserRef};

/// The main engine for Lunara core operations.
///
/// This is the primary FFI interface for Swift/Kotlin clients.
#[derive(uniffi::Object)]
pub struct LunaraEngine {
    storage: StorageConfig,
    session: Mutex<SessionContext>,
    progress: Mutex<CycleProgressStore<FileStore>>,
}

impl LunaraEngine {
    /// Creates an engine with custom storage configuration.
    ///
    /// Used for testing with temp directories or custom storage locations.
    /// Not exposed to FFI - use `new()` for external clients.
    pub fn with_storage(storage: StorageConfig) -> Result<Self, LunaraFfiError> {
        storage
            .ensure_dirs()
            .map_err(|e| LunaraFfiError::from(format!("Failed to create data dir: {}", e)))?;
        let store = FileStore::open(&storage.progress_file())?;

        Ok(Self {
            storage,
            session: Mutex::new(SessionContext::new()),
            progress: Mutex::new(CycleProgressStore::new(store)),
        })
    }

    /// Returns the StorageConfig for this engine.
    /// Useful for accessing path configuration.
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }
}

#[uniffi::export]
impl LunaraEngine {
    /// Creates a new engine with default storage configuration (`~/.lunara/`).
    #[uniffi::constructor]
    pub fn new() -> Result<Self, LunaraFfiError> {
        Self::with_storage(StorageConfig::default())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Session API
    // ─────────────────────────────────────────────────────────────────────────────

    /// Returns the current auth state.
    pub fn auth_state(&self) -> AuthState {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state()
            .clone()
    }

    /// Applies a session transition.
    ///
    /// Returns `true` when the observable state changed (the shell should
    /// re-run the guard), `false` for a same-state write. Transitions back
    /// to `Loading` are rejected.
    pub fn set_auth_state(&self, next: AuthState) -> Result<bool, LunaraFfiError> {
        let change = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .transition(next)?;
        Ok(change == SessionChange::Changed)
    }

    /// Marks the credential check resolved with a signed-in account.
    pub fn session_resolved_authenticated(&self, user: UserRef) -> Result<bool, LunaraFfiError> {
        self.set_auth_state(AuthState::Authenticated { user })
    }

    /// Marks the credential check resolved with no account.
    pub fn session_resolved_unauthenticated(&self) -> Result<bool, LunaraFfiError> {
        self.set_auth_state(AuthState::Unauthenticated)
    }

    /// Records a completed login.
    pub fn logged_in(&self, user: UserRef) -> Result<bool, LunaraFfiError> {
        self.set_auth_state(AuthState::Authenticated { user })
    }

    /// Records a logout or token expiry.
    pub fn logged_out(&self) -> Result<bool, LunaraFfiError> {
        self.set_auth_state(AuthState::Unauthenticated)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Navigation API
    // ─────────────────────────────────────────────────────────────────────────────

    /// Evaluates the navigation policy for the given top-level route segment
    /// (e.g. `"(protected)"`, `"auth"`, or nothing for the welcome route)
    /// against the current auth state. The shell performs the redirect.
    pub fn route_decision(&self, group_segment: Option<String>) -> RouteDecision {
        let group = RouteGroup::from_segment(group_segment.as_deref());
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        route_decision(session.state(), group)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Cycle Progress API
    // ─────────────────────────────────────────────────────────────────────────────

    /// Persists the last completed flow step, and the server-assigned cycle
    /// id when provided.
    pub fn set_cycle_progress(
        &self,
        user_id: String,
        step: u32,
        cycle_id: Option<i64>,
    ) -> Result<(), LunaraFfiError> {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_progress(&user_id, step, cycle_id)
            .map_err(LunaraFfiError::from)
    }

    /// Reads the persisted flow position for a user.
    pub fn get_cycle_progress(&self, user_id: String) -> Result<CycleProgress, LunaraFfiError> {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_progress(&user_id)
            .map_err(LunaraFfiError::from)
    }

    /// Sets the flow-completed flag for a user.
    pub fn set_cycle_completed(&self, user_id: String, completed: bool) -> Result<(), LunaraFfiError> {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_completed(&user_id, completed)
            .map_err(LunaraFfiError::from)
    }

    /// Reads the flow-completed flag for a user (false when unset).
    pub fn get_cycle_completed(&self, user_id: String) -> Result<bool, LunaraFfiError> {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_completed(&user_id)
            .map_err(LunaraFfiError::from)
    }

    /// Removes a user's step, cycle id, and completed flag together.
    pub fn clear_cycle_progress(&self, user_id: String) -> Result<(), LunaraFfiError> {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear_progress(&user_id)
            .map_err(LunaraFfiError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn engine() -> (TempDir, LunaraEngine) {
        let temp = TempDir::new().unwrap();
        let engine = LunaraEngine::with_storage(StorageConfig::with_root(temp.path().join("data")))
            .expect("engine init");
        (temp, engine)
    }

    #[test]
    fn test_engine_starts_loading() {
        let (_temp, engine) = engine();
        assert_eq!(engine.auth_state(), AuthState::Loading);
    }

    #[test]
    fn test_route_decision_holds_while_loading() {
        let (_temp, engine) = engine();
        assert_eq!(
            engine.route_decision(Some("(protected)".to_string())),
            RouteDecision::Hold
        );
    }

    #[test]
    fn test_route_decision_after_resolution() {
        let (_temp, engine) = engine();
        assert!(engine.session_resolved_unauthenticated().unwrap());
        assert_eq!(
            engine.route_decision(Some("(protected)".to_string())),
            RouteDecision::Redirect {
                path: crate::guard::WELCOME_ROUTE.to_string()
            }
        );
        assert_eq!(
            engine.route_decision(Some("tracking".to_string())),
            RouteDecision::Stay
        );
    }

    #[test]
    fn test_progress_api_round_trip() {
        let (_temp, engine) = engine();
        engine
            .set_cycle_progress("u1".to_string(), 2, Some(7))
            .unwrap();

        let read = engine.get_cycle_progress("u1".to_string()).unwrap();
        assert_eq!(read.step, Some(2));
        assert_eq!(read.cycle_id, Some(7));
    }

    #[test]
    fn test_logged_in_after_unauthenticated() {
        let (_temp, engine) = engine();
        engine.session_resolved_unauthenticated().unwrap();

        assert!(engine.logged_in(UserRef::with_id("u1")).unwrap());
        assert_eq!(engine.auth_state().user().unwrap().id, "u1");
    }

    #[test]
    fn test_reload_to_loading_is_rejected() {
        let (_temp, engine) = engine();
        engine.session_resolved_unauthenticated().unwrap();
        assert!(engine.set_auth_state(AuthState::Loading).is_err());
    }
}
