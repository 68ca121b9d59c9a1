use crate::error::AuthzResult;
use crate::permissions::types::{
    is_allowed, Operation, Permission, PermissionSet, Principal, Role, Survey,
};
use crate::{log_permissions_debug, log_permissions_error};

/// Computes permissions and makes authorization decisions for surveys.
///
/// The PermissionManager combines two sources of access:
/// - Role based grants, only inside the survey's own tenant
/// - Resource based grants from ownership and contributor lists
///
/// Contributor grants ignore tenant boundaries, so a survey can be shared
/// with users from other tenants. Every other grant requires the principal
/// and the survey to belong to the same tenant.
///
/// The manager holds no state. Every call recomputes the permission set from
/// its inputs, so one instance can be shared across threads freely.
#[derive(Debug, Default, Clone)]
pub struct PermissionManager {}

impl PermissionManager {
    /// Creates a new PermissionManager instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the permissions `principal` holds on `survey`.
    ///
    /// The computation follows this sequence:
    /// 1. Inside the survey's tenant, an `Admin` role returns the full set
    ///    immediately
    /// 2. Inside the tenant, `Creator` is granted for the creator role and
    ///    `Reader` otherwise, never both
    /// 3. Inside the tenant, the survey owner is granted `Owner`
    /// 4. In any tenant, a listed contributor is granted `Contributor`
    ///
    /// An empty set means the principal may do nothing with the survey.
    #[must_use]
    pub fn compute_permissions(&self, principal: &Principal, survey: &Survey) -> PermissionSet {
        let mut permissions = PermissionSet::empty();

        if principal.tenant_id == *survey.tenant_id() {
            if principal.has_role(Role::Admin) {
                return PermissionSet::all();
            }

            if principal.has_role(Role::Creator) {
                permissions.insert(Permission::Creator);
            } else {
                permissions.insert(Permission::Reader);
            }

            if principal.user_id == *survey.owner_id() {
                permissions.insert(Permission::Owner);
            }
        }

        if survey.is_contributor(&principal.user_id) {
            permissions.insert(Permission::Contributor);
        }

        permissions
    }

    /// Decides whether `principal` may perform `operation` on `survey`.
    ///
    /// A tenant admin is allowed every operation without consulting the
    /// policy table. Everyone else is checked against
    /// [`Operation::required_permissions`].
    #[must_use]
    pub fn authorize(&self, principal: &Principal, survey: &Survey, operation: Operation) -> bool {
        let permissions = self.compute_permissions(principal, survey);

        let allowed = if permissions.contains(Permission::Admin) {
            true
        } else {
            is_allowed(operation, &permissions)
        };

        log_permissions_debug!(
            "{operation} on survey {} by {}@{}: permissions={permissions:?} allowed={allowed}",
            survey.id(),
            principal.user_id,
            principal.tenant_id
        );

        allowed
    }

    /// Same as [`authorize`](Self::authorize) for an operation given by name.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedOperation` if `operation` does not name one of
    /// [`Operation::ALL`]. Such a name is never treated as a denial.
    pub fn authorize_named(
        &self,
        principal: &Principal,
        survey: &Survey,
        operation: &str,
    ) -> AuthzResult<bool> {
        let operation = operation.parse::<Operation>().map_err(|e| {
            log_permissions_error!("Rejected authorization request: {e}");
            e
        })?;
        Ok(self.authorize(principal, survey, operation))
    }

    /// Lists every operation `principal` may perform on `survey`, in
    /// [`Operation::ALL`] order.
    #[must_use]
    pub fn permitted_operations(&self, principal: &Principal, survey: &Survey) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.authorize(principal, survey, *op))
            .collect()
    }
}
