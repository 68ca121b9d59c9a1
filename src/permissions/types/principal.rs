use serde::{Deserialize, Serialize};
use std::fmt;

use crate::claims::ClaimsReader;
use crate::config::RoleNames;
use crate::error::{AuthzError, AuthzResult};
use crate::log_claims_warn;

/// Identifier of an isolated customer organization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roles recognized by the survey application.
///
/// Roles are identity attributes held across the whole application, unlike
/// [`Permission`](super::Permission)s which are derived per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Creator,
    Reader,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Creator, Role::Reader];

    const fn bit(self) -> u8 {
        match self {
            Role::Admin => 1 << 0,
            Role::Creator => 1 << 1,
            Role::Reader => 1 << 2,
        }
    }
}

/// Compact set of [`Role`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    #[must_use]
    pub fn with(mut self, role: Role) -> Self {
        self.insert(role);
        self
    }

    pub const fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|role| self.contains(*role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), RoleSet::with)
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for RoleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let roles = Vec::<Role>::deserialize(deserializer)?;
        Ok(roles.into_iter().collect())
    }
}

/// The authenticated actor making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub tenant_id: TenantId,
    #[serde(default)]
    pub roles: RoleSet,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(user_id),
            tenant_id: TenantId::new(tenant_id),
            roles: RoleSet::empty(),
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    /// Builds a principal from an identity layer's claims.
    ///
    /// Role claims that do not match one of the configured role names are
    /// ignored. A missing tenant or user identifier is an error.
    pub fn from_claims<R: ClaimsReader + ?Sized>(
        claims: &R,
        role_names: &RoleNames,
    ) -> AuthzResult<Self> {
        let (Some(tenant_id), Some(user_id)) = (claims.tenant_id(), claims.user_id()) else {
            let missing = if claims.tenant_id().is_none() {
                "tenant id"
            } else {
                "user id"
            };
            log_claims_warn!("Principal is missing the {missing} claim");
            return Err(AuthzError::MissingClaim(missing.to_string()));
        };

        let roles = Role::ALL
            .into_iter()
            .filter(|role| claims.has_role(role_names.name_for(*role)))
            .collect();

        Ok(Self {
            user_id: UserId::new(user_id),
            tenant_id: TenantId::new(tenant_id),
            roles,
        })
    }
}
