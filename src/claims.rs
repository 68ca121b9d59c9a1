//! Claims read from an authenticated identity.
//!
//! Token validation and claim extraction belong to the identity layer. This
//! module only defines how the authorization core reads the three facts it
//! needs: the tenant id, the user id, and role membership.

use serde::{Deserialize, Serialize};

use crate::config::ClaimTypes;
use crate::log_claims_debug;

/// Read access to an authenticated principal's claims.
pub trait ClaimsReader {
    fn tenant_id(&self) -> Option<&str>;

    fn user_id(&self) -> Option<&str>;

    fn has_role(&self, role_name: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// An ordered list of claims as issued by the identity layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsPrincipal {
    claims: Vec<Claim>,
}

impl ClaimsPrincipal {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }

    #[must_use]
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(Claim::new(claim_type, value));
        self
    }

    /// First value of the given claim type.
    pub fn find_first(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims
            .iter()
            .any(|c| c.claim_type == claim_type && c.value == value)
    }

    /// Reads this principal using the given claim type names.
    pub fn reader<'a>(&'a self, claim_types: &'a ClaimTypes) -> ClaimsView<'a> {
        ClaimsView {
            principal: self,
            claim_types,
        }
    }
}

/// A [`ClaimsPrincipal`] paired with the claim type names to read it by.
#[derive(Debug, Clone, Copy)]
pub struct ClaimsView<'a> {
    principal: &'a ClaimsPrincipal,
    claim_types: &'a ClaimTypes,
}

impl ClaimsReader for ClaimsView<'_> {
    fn tenant_id(&self) -> Option<&str> {
        let tenant_id = self.principal.find_first(&self.claim_types.tenant_id);
        if tenant_id.is_none() {
            log_claims_debug!("No '{}' claim present", self.claim_types.tenant_id);
        }
        tenant_id
    }

    fn user_id(&self) -> Option<&str> {
        let user_id = self.principal.find_first(&self.claim_types.user_id);
        if user_id.is_none() {
            log_claims_debug!("No '{}' claim present", self.claim_types.user_id);
        }
        user_id
    }

    fn has_role(&self, role_name: &str) -> bool {
        self.principal.has_claim(&self.claim_types.role, role_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoleNames;
    use crate::error::AuthzError;
    use crate::permissions::types::{Principal, Role};

    fn claims(types: &ClaimTypes) -> ClaimsPrincipal {
        ClaimsPrincipal::default()
            .with_claim(types.tenant_id.clone(), "t1")
            .with_claim(types.user_id.clone(), "u1")
            .with_claim(types.role.clone(), "SurveyCreator")
            .with_claim(types.role.clone(), "SomethingElse")
    }

    #[test]
    fn principal_from_claims() {
        let types = ClaimTypes::default();
        let claims = claims(&types);
        let principal = Principal::from_claims(&claims.reader(&types), &RoleNames::default()).unwrap();

        assert_eq!(principal.tenant_id.as_str(), "t1");
        assert_eq!(principal.user_id.as_str(), "u1");
        assert!(principal.has_role(Role::Creator));
        assert!(!principal.has_role(Role::Admin));
        assert!(!principal.has_role(Role::Reader));
    }

    #[test]
    fn missing_tenant_claim_is_an_error() {
        let types = ClaimTypes::default();
        let claims = ClaimsPrincipal::default().with_claim(types.user_id.clone(), "u1");
        let result = Principal::from_claims(&claims.reader(&types), &RoleNames::default());
        assert!(matches!(result, Err(AuthzError::MissingClaim(_))));
    }

    #[test]
    fn role_names_are_configurable() {
        let types = ClaimTypes::default();
        let roles = RoleNames {
            admin: "tenant-admin".to_string(),
            ..RoleNames::default()
        };
        let claims = ClaimsPrincipal::default()
            .with_claim(types.tenant_id.clone(), "t1")
            .with_claim(types.user_id.clone(), "u1")
            .with_claim(types.role.clone(), "tenant-admin");
        let principal = Principal::from_claims(&claims.reader(&types), &roles).unwrap();
        assert!(principal.has_role(Role::Admin));
    }
}
