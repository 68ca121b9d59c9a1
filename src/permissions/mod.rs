// permissions module

pub mod permission_manager;
pub mod permission_wrapper;
pub mod types;
pub use permission_manager::PermissionManager;
pub use permission_wrapper::{PermissionWrapper, SurveyPermissionResult};
pub use types::policy::{is_allowed, Operation, Permission, PermissionSet};
