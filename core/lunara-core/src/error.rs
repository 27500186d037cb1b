//! Error types for lunara-core operations.
//! Keep LunaraFfiError minimal and stable to avoid breaking FFI clients.

// ═══════════════════════════════════════════════════════════════════════════════
// FFI-Compatible Error (for Swift/Kotlin)
// ═══════════════════════════════════════════════════════════════════════════════

/// FFI-safe error type for use across language boundaries.
///
/// This simplified error type contains just an error message string,
/// making it compatible with UniFFI's error handling.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum LunaraFfiError {
    #[error("{message}")]
    General { message: String },
}

impl From<String> for LunaraFfiError {
    fn from(message: String) -> Self {
        LunaraFfiError::General { message }
    }
}

impl From<&str> for LunaraFfiError {
    fn from(message: &str) -> Self {
        LunaraFfiError::General {
            message: message.to_string(),
        }
    }
}

impl From<LunaraError> for LunaraFfiError {
    fn from(err: LunaraError) -> Self {
        LunaraFfiError::General {
            message: err.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Internal Error (for Rust-only use)
// ═══════════════════════════════════════════════════════════════════════════════

/// All errors that can occur in lunara-core operations.
///
/// This is the rich error type used internally in Rust code.
/// For FFI boundaries, use `LunaraFfiError` instead.
#[derive(Debug, thiserror::Error)]
pub enum LunaraError {
    // ─────────────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("storage read failed: {context}: {source}")]
    StorageRead {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage write failed: {context}: {source}")]
    StorageWrite {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file serialization failed: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value came back from the key-value store but could not be decoded
    /// into its typed form (e.g. non-numeric text under a step key).
    #[error("stored value malformed: {key}: {value:?}: {details}")]
    Decode {
        key: String,
        value: String,
        details: String,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Navigation Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("redirect failed: {path}: {details}")]
    Redirect { path: String, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Session Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Convenience type alias for Results using LunaraError.
pub type Result<T> = std::result::Result<T, LunaraError>;

// Conversion for string error compatibility
impl From<LunaraError> for String {
    fn from(err: LunaraError) -> String {
        err.to_string()
    }
}
