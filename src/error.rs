use crate::config::ConfigError;
use crate::permissions::types::SurveyId;

/// Unified error type for the authorization core.
///
/// A denied check is not an error: [`PermissionManager::authorize`] returns
/// `false` for it. `Forbidden` exists for callers that prefer to propagate a
/// denial with `?`, and deliberately says nothing about which permission was
/// missing.
///
/// [`PermissionManager::authorize`]: crate::permissions::PermissionManager::authorize
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// An operation name outside the closed set of operations. This signals a
    /// defect in the caller, not an access attempt.
    #[error("Unrecognized operation: {0}")]
    UnrecognizedOperation(String),

    #[error("Access denied")]
    Forbidden,

    #[error("Survey not found: {0}")]
    SurveyNotFound(SurveyId),

    /// The identity layer did not supply a required claim
    #[error("Missing claim: {0}")]
    MissingClaim(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AuthzError {
    /// Check if this error is a plain denial rather than a failure
    pub fn is_denial(&self) -> bool {
        matches!(self, AuthzError::Forbidden)
    }
}

/// Result type alias for operations that can result in an AuthzError
pub type AuthzResult<T> = Result<T, AuthzError>;
