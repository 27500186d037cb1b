//! Core types shared across all Lunara clients.
//!
//! These types are the "lingua franca" of the Lunara ecosystem. All clients
//! (iOS, Android) use these exact same types, ensuring consistency.
//!
//! **FFI Support:** All types are annotated with UniFFI macros for Swift/Kotlin bindings.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// Session Types
// ═══════════════════════════════════════════════════════════════════════════════

/// A reference to the authenticated account.
///
/// The `id` is the stable identifier issued by the backend; it scopes every
/// per-user key in local storage and must never be shared across accounts.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, uniffi::Record)]
pub struct UserRef {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl UserRef {
    pub fn with_id(id: impl Into<String>) -> Self {
        UserRef {
            id: id.into(),
            email: None,
            display_name: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Cycle Tracking Types
// ═══════════════════════════════════════════════════════════════════════════════

/// A user's position within the guided cycle-tracking flow.
///
/// `step` is the last completed step index; `cycle_id` is the server-assigned
/// identifier for the in-progress cycle record once one exists. Both are
/// independently absent: a step can be recorded before the backend has
/// allocated a cycle id. `None` means "never recorded", which is distinct
/// from `step = 0`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct CycleProgress {
    pub step: Option<u32>,
    pub cycle_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_progress_default_is_empty() {
        let progress = CycleProgress::default();
        assert!(progress.step.is_none());
        assert!(progress.cycle_id.is_none());
    }

    #[test]
    fn test_cycle_progress_serialization() {
        let progress = CycleProgress {
            step: Some(3),
            cycle_id: Some(42),
        };

        let json = serde_json::to_string(&progress).unwrap();
        let deserialized: CycleProgress = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, progress);
    }

    #[test]
    fn test_user_ref_with_id() {
        let user = UserRef::with_id("user-1");
        assert_eq!(user.id, "user-1");
        assert!(user.email.is_none());
        assert!(user.display_name.is_none());
    }
}
