//! Integration tests for the session → guard → progress flow across
//! engine restarts, using only the public API.

use lunara_core::{
    AuthState, LunaraEngine, NavigationGuard, RouteDecision, RouteGroup, Router, StorageConfig,
    UserRef, HOME_ROUTE,
};

fn storage_in(temp: &tempfile::TempDir) -> StorageConfig {
    StorageConfig::with_root(temp.path().join("lunara"))
}

#[test]
fn test_progress_survives_engine_restart() {
    let temp = tempfile::TempDir::new().unwrap();

    {
        let engine = LunaraEngine::with_storage(storage_in(&temp)).unwrap();
        engine
            .set_cycle_progress("u1".to_string(), 4, Some(99))
            .unwrap();
        engine.set_cycle_completed("u1".to_string(), true).unwrap();
    }

    let engine = LunaraEngine::with_storage(storage_in(&temp)).unwrap();
    let progress = engine.get_cycle_progress("u1".to_string()).unwrap();
    assert_eq!(progress.step, Some(4));
    assert_eq!(progress.cycle_id, Some(99));
    assert!(engine.get_cycle_completed("u1".to_string()).unwrap());
}

#[test]
fn test_clear_survives_engine_restart() {
    let temp = tempfile::TempDir::new().unwrap();

    {
        let engine = LunaraEngine::with_storage(storage_in(&temp)).unwrap();
        engine
            .set_cycle_progress("u1".to_string(), 4, Some(99))
            .unwrap();
        engine
            .set_cycle_progress("u2".to_string(), 1, None)
            .unwrap();
        engine.clear_cycle_progress("u1".to_string()).unwrap();
    }

    let engine = LunaraEngine::with_storage(storage_in(&temp)).unwrap();
    let cleared = engine.get_cycle_progress("u1".to_string()).unwrap();
    assert_eq!(cleared.step, None);
    assert_eq!(cleared.cycle_id, None);
    assert!(!engine.get_cycle_completed("u1".to_string()).unwrap());

    let other = engine.get_cycle_progress("u2".to_string()).unwrap();
    assert_eq!(other.step, Some(1));
}

#[test]
fn test_session_is_not_persisted() {
    let temp = tempfile::TempDir::new().unwrap();

    {
        let engine = LunaraEngine::with_storage(storage_in(&temp)).unwrap();
        engine
            .session_resolved_authenticated(UserRef::with_id("u1"))
            .unwrap();
    }

    // A fresh process starts loading again regardless of prior session.
    let engine = LunaraEngine::with_storage(storage_in(&temp)).unwrap();
    assert_eq!(engine.auth_state(), AuthState::Loading);
}

#[test]
fn test_engine_decisions_track_session_lifecycle() {
    let temp = tempfile::TempDir::new().unwrap();
    let engine = LunaraEngine::with_storage(storage_in(&temp)).unwrap();

    // Loading gate.
    assert_eq!(engine.route_decision(None), RouteDecision::Hold);

    // Sign-in bounces the welcome route to home.
    engine
        .session_resolved_authenticated(UserRef::with_id("u1"))
        .unwrap();
    assert_eq!(
        engine.route_decision(None),
        RouteDecision::Redirect {
            path: HOME_ROUTE.to_string()
        }
    );

    // Logout: protected area is enforced, tracking flow is left alone.
    engine.logged_out().unwrap();
    assert!(matches!(
        engine.route_decision(Some("(protected)".to_string())),
        RouteDecision::Redirect { .. }
    ));
    assert_eq!(
        engine.route_decision(Some("tracking".to_string())),
        RouteDecision::Stay
    );
}

/// Router that applies redirects back into the guard the way a mobile
/// shell's navigation stack would: a successful redirect lands the user on
/// the destination, which shows up as the next route notification.
#[derive(Default)]
struct NavStack {
    current: Vec<String>,
}

impl Router for NavStack {
    fn redirect(&mut self, path: &str) -> lunara_core::Result<()> {
        self.current.push(path.to_string());
        Ok(())
    }
}

#[test]
fn test_guard_settles_after_redirect_lands() {
    let mut guard = NavigationGuard::new(NavStack::default());

    guard.session_changed(AuthState::Authenticated {
        user: UserRef::with_id("u1"),
    });
    assert_eq!(guard.router().current, vec![HOME_ROUTE.to_string()]);

    // The shell applies the redirect and reports the new group; the guard
    // settles without issuing anything further.
    guard.route_changed(RouteGroup::Protected);
    guard.route_changed(RouteGroup::Protected);
    assert_eq!(guard.router().current.len(), 1);
}
