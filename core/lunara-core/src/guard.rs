//! Authentication-gated navigation policy.
//!
//! A single authority decides, on every session or route change, whether the
//! current screen is consistent with the session status, and if not, issues
//! exactly one redirect. The policy itself is a pure function
//! ([`route_decision`]); [`NavigationGuard`] wraps it with the reactive
//! plumbing: change notifications in, at most one redirect side effect out.
//!
//! Policy rules:
//!
//! - While the session is `Loading`, no decision is made, however long the
//!   resolution takes. Callers guarantee loading eventually resolves.
//! - An unauthenticated user inside the protected area is sent to the
//!   welcome route. Nothing else moves them: a background validation that
//!   fails mid auth/dashboard/tracking/onboarding flow must not interrupt it.
//! - An authenticated user sitting on the welcome route is sent to the
//!   protected home screen. One already inside an auth-flow screen is
//!   allowed to finish it.

use tracing::{debug, warn};

use crate::error::Result;
use crate::session::AuthState;

/// Where unauthenticated users land.
pub const WELCOME_ROUTE: &str = "/";

/// Default screen inside the protected area.
pub const HOME_ROUTE: &str = "/(protected)/home";

/// The top-level route segment the user currently occupies.
///
/// `Welcome` means no group resolved (the root/welcome route).
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum RouteGroup {
    Protected,
    Auth,
    Dashboard,
    Tracking,
    Onboarding,
    Welcome,
}

impl RouteGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteGroup::Protected => "protected",
            RouteGroup::Auth => "auth",
            RouteGroup::Dashboard => "dashboard",
            RouteGroup::Tracking => "tracking",
            RouteGroup::Onboarding => "onboarding",
            RouteGroup::Welcome => "welcome",
        }
    }

    /// Maps a router-supplied top-level segment to a group.
    /// Unknown or absent segments resolve to `Welcome`.
    pub fn from_segment(segment: Option<&str>) -> RouteGroup {
        match segment.map(|s| s.trim_matches(|c| c == '(' || c == ')')) {
            Some("protected") => RouteGroup::Protected,
            Some("auth") => RouteGroup::Auth,
            Some("dashboard") => RouteGroup::Dashboard,
            Some("tracking") => RouteGroup::Tracking,
            Some("onboarding") => RouteGroup::Onboarding,
            _ => RouteGroup::Welcome,
        }
    }
}

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum RouteDecision {
    /// Session still loading: render a placeholder, decide nothing.
    Hold,
    /// Current screen is consistent with the session status.
    Stay,
    Redirect { path: String },
}

/// Pure policy over (auth status × route group).
pub fn route_decision(auth: &AuthState, group: RouteGroup) -> RouteDecision {
    match auth {
        AuthState::Loading => RouteDecision::Hold,
        AuthState::Unauthenticated => match group {
            RouteGroup::Protected => RouteDecision::Redirect {
                path: WELCOME_ROUTE.to_string(),
            },
            // A failed background validation must not interrupt an
            // in-progress flow; only the protected area is enforced.
            RouteGroup::Auth
            | RouteGroup::Dashboard
            | RouteGroup::Tracking
            | RouteGroup::Onboarding
            | RouteGroup::Welcome => RouteDecision::Stay,
        },
        AuthState::Authenticated { .. } => match group {
            RouteGroup::Welcome => RouteDecision::Redirect {
                path: HOME_ROUTE.to_string(),
            },
            _ => RouteDecision::Stay,
        },
    }
}

/// Navigation side-effect collaborator.
///
/// Implementors must tolerate redundant redirects (same destination twice)
/// and may fail when the destination is not mounted yet; the guard treats
/// such failures as retryable on the next change notification.
pub trait Router {
    fn redirect(&mut self, path: &str) -> Result<()>;
}

/// Identity of one evaluation: which auth condition (including the
/// authenticated user's id) was weighed against which route group.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EvaluationKey {
    auth: AuthKey,
    group: RouteGroup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AuthKey {
    Loading,
    Unauthenticated,
    Authenticated(String),
}

impl EvaluationKey {
    fn of(auth: &AuthState, group: RouteGroup) -> Self {
        let auth = match auth {
            AuthState::Loading => AuthKey::Loading,
            AuthState::Unauthenticated => AuthKey::Unauthenticated,
            AuthState::Authenticated { user } => AuthKey::Authenticated(user.id.clone()),
        };
        EvaluationKey { auth, group }
    }
}

/// Reactive wrapper around [`route_decision`].
///
/// The application root notifies the guard whenever session state or the
/// current route group changes; the guard re-evaluates synchronously on each
/// notification. Evaluation is inherently serialized through `&mut self`, so
/// two evaluations never interleave.
///
/// Idempotence: once an evaluation completes for a given
/// (auth, user id, group) key, repeat notifications with the same key issue
/// nothing. A failed redirect does not complete the evaluation; the next
/// notification attempts it again.
pub struct NavigationGuard<R: Router> {
    router: R,
    auth: AuthState,
    group: RouteGroup,
    applied: Option<EvaluationKey>,
}

impl<R: Router> NavigationGuard<R> {
    pub fn new(router: R) -> Self {
        NavigationGuard {
            router,
            auth: AuthState::Loading,
            group: RouteGroup::Welcome,
            applied: None,
        }
    }

    pub fn session_changed(&mut self, auth: AuthState) {
        self.auth = auth;
        self.evaluate();
    }

    pub fn route_changed(&mut self, group: RouteGroup) {
        self.group = group;
        self.evaluate();
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    fn evaluate(&mut self) {
        let key = EvaluationKey::of(&self.auth, self.group);
        if self.applied.as_ref() == Some(&key) {
            return;
        }

        match route_decision(&self.auth, self.group) {
            // The loading gate completes no evaluation; nothing is recorded
            // and nothing is issued until the session resolves.
            RouteDecision::Hold => {}
            RouteDecision::Stay => {
                self.applied = Some(key);
            }
            RouteDecision::Redirect { path } => match self.router.redirect(&path) {
                Ok(()) => {
                    debug!(path = %path, group = %self.group.as_str(), "guard redirect");
                    self.applied = Some(key);
                }
                Err(err) => {
                    // Swallowed: a missed redirect self-heals on the next
                    // change notification.
                    warn!(path = %path, error = %err, "redirect failed, will retry on next change");
                }
            },
        }
    }
}
