//! # lunara-core
//!
//! Core library for Lunara, providing shared session and cycle-tracking
//! logic for all mobile clients (Swift, Kotlin).
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Clients can wrap with async if needed.
//! - **Not thread-safe beyond the engine**: Lower-level types expect the
//!   caller to provide synchronization; `LunaraEngine` locks internally.
//! - **Graceful degradation**: Missing or corrupt store files load as empty,
//!   not errors. Storage malfunctions fail loud; redirect failures fail silent.
//! - **Single source of truth**: All clients share these types and logic.
//! - **FFI-ready**: UniFFI annotations enable Swift and Kotlin bindings.
//!   Prefer additive public API changes; removing or renaming breaks FFI clients.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lunara_core::LunaraEngine;
//!
//! let engine = LunaraEngine::new()?;
//! engine.session_resolved_unauthenticated()?;
//! let decision = engine.route_decision(Some("(protected)".to_string()));
//! ```

// UniFFI scaffolding for Swift/Kotlin bindings
uniffi::setup_scaffolding!();

// Public modules
pub mod engine;
pub mod error;
pub mod guard;
pub mod progress;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used items at crate root
pub use engine::LunaraEngine;
pub use error::{LunaraError, LunaraFfiError, Result};
pub use guard::{
    route_decision, NavigationGuard, RouteDecision, RouteGroup, Router, HOME_ROUTE, WELCOME_ROUTE,
};
pub use progress::CycleProgressStore;
pub use session::{AuthState, SessionChange, SessionContext};
pub use storage::StorageConfig;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::{CycleProgress, UserRef};
