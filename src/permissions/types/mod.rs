pub mod policy;
pub mod principal;
pub mod survey;

pub use policy::{is_allowed, Operation, Permission, PermissionSet};
pub use principal::{Principal, Role, RoleSet, TenantId, UserId};
pub use survey::{Survey, SurveyId};
