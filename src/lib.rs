//! Tenant-aware authorization for survey management.
//!
//! Decides whether a principal may create, read, update, delete, publish or
//! unpublish a survey. Role grants (admin, creator, reader) apply only inside
//! the principal's own tenant; ownership and contributor grants come from the
//! survey itself, and contributor grants cross tenant boundaries.
//!
//! ```
//! use survey_authz::{authorize, Operation, Principal, Role, Survey, TenantId, UserId};
//!
//! let survey = Survey::new(TenantId::from("t1"), UserId::from("u1"), "Pulse")
//!     .with_contributor(UserId::from("u2"));
//!
//! let owner = Principal::new("u1", "t1").with_role(Role::Creator);
//! let guest = Principal::new("u2", "t2");
//!
//! assert!(authorize(&owner, &survey, Operation::Delete));
//! assert!(authorize(&guest, &survey, Operation::Update));
//! assert!(!authorize(&guest, &survey, Operation::Delete));
//! ```

pub mod audit_logger;
pub mod claims;
pub mod config;
pub mod error;
pub mod logging;
pub mod permissions;
pub mod store;

pub use claims::{Claim, ClaimsPrincipal, ClaimsReader};
pub use config::{AuthzConfig, ClaimTypes, ConfigError, RoleNames};
pub use error::{AuthzError, AuthzResult};
pub use logging::{LoggingError, LoggingSystem};
pub use permissions::types::{Principal, Role, RoleSet, Survey, SurveyId, TenantId, UserId};
pub use permissions::{
    is_allowed, Operation, Permission, PermissionManager, PermissionSet, PermissionWrapper,
    SurveyPermissionResult,
};
pub use store::{InMemorySurveyStore, SurveyStore};

/// Decides whether `principal` may perform `operation` on `survey`.
///
/// Shorthand for [`PermissionManager::authorize`].
pub fn authorize(principal: &Principal, survey: &Survey, operation: Operation) -> bool {
    PermissionManager::new().authorize(principal, survey, operation)
}
