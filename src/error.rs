//! Unified error handling for poyobot.
//!
//! Three families: configuration failures that abort startup, match-rule
//! validation failures at registration, and per-command execution
//! failures that stay contained inside one dispatch candidate.

use thiserror::Error;

// ============================================================================
// Rule Errors (registration-time validation)
// ============================================================================

/// Match-rule validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("unknown match mode: {0:?}")]
    UnknownMode(String),
}

// ============================================================================
// Command Errors (execution)
// ============================================================================

/// Errors raised by a command handler body.
///
/// The dispatch engine catches these at the per-candidate boundary; a
/// failing handler never prevents sibling candidates from running. The
/// classification decides logging severity: expected bad input is
/// routine, an unavailable collaborator is degraded service, anything
/// else is a fault.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The user supplied malformed arguments (e.g. bad dice syntax).
    /// The handler has already sent its own friendly reply.
    #[error("bad input: {0}")]
    BadInput(String),

    /// An external collaborator could not be reached. The handler has
    /// already translated this into a user-visible message.
    #[error("{what} unavailable: {source}")]
    Unavailable {
        what: String,
        #[source]
        source: anyhow::Error,
    },

    /// Unexpected internal fault (chat API failure, missing state).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CommandError {
    /// Static error code for log labelling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadInput(_) => "bad_input",
            Self::Unavailable { .. } => "unavailable",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for command and member-event handlers.
pub type CommandResult = Result<(), CommandError>;
