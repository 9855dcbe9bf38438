//! Lifecycle transition errors.

/// Kinds of lifecycle failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum LifecycleErrorKind {
    /// The entity's current state does not admit the requested transition
    #[display("Cannot {} {} while {}", action, entity, state)]
    InvalidTransition {
        /// Entity description, e.g. `chapter 3 of book <id>`
        entity: String,
        /// Current state rendered as text
        state: String,
        /// Attempted action
        action: String,
    },
}

/// Lifecycle error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Lifecycle Error: {} at line {} in {}", kind, line, file)]
pub struct LifecycleError {
    /// The specific error condition
    pub kind: LifecycleErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl LifecycleError {
    /// Create a new LifecycleError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LifecycleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an invalid transition.
    #[track_caller]
    pub fn invalid(
        entity: impl Into<String>,
        state: impl std::fmt::Display,
        action: impl Into<String>,
    ) -> Self {
        Self::new(LifecycleErrorKind::InvalidTransition {
            entity: entity.into(),
            state: state.to_string(),
            action: action.into(),
        })
    }
}
