use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthzError;

/// A grant derived from a principal and a survey for a single check.
///
/// Permissions are never stored; they are recomputed on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Admin,
    Creator,
    Reader,
    Owner,
    Contributor,
}

impl Permission {
    pub const ALL: [Permission; 5] = [
        Permission::Admin,
        Permission::Creator,
        Permission::Reader,
        Permission::Owner,
        Permission::Contributor,
    ];

    const fn bit(self) -> u8 {
        match self {
            Permission::Admin => 1 << 0,
            Permission::Creator => 1 << 1,
            Permission::Reader => 1 << 2,
            Permission::Owner => 1 << 3,
            Permission::Contributor => 1 << 4,
        }
    }
}

/// Compact set of [`Permission`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet(u8);

impl PermissionSet {
    const ALL_BITS: u8 = 0b1_1111;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every permission, including `Admin`.
    pub const fn all() -> Self {
        Self(Self::ALL_BITS)
    }

    pub fn insert(&mut self, permission: Permission) {
        self.0 |= permission.bit();
    }

    #[must_use]
    pub fn with(mut self, permission: Permission) -> Self {
        self.insert(permission);
        self
    }

    pub const fn contains(&self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    pub fn contains_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.contains(*p))
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(|p| self.contains(*p))
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), PermissionSet::with)
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// An action a principal may request against a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Publish,
    Unpublish,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
        Operation::Publish,
        Operation::Unpublish,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Publish => "publish",
            Operation::Unpublish => "unpublish",
        }
    }

    /// The operation policy table: holding any one of the returned
    /// permissions allows the operation.
    pub const fn required_permissions(&self) -> &'static [Permission] {
        match self {
            Operation::Create => &[Permission::Creator],
            Operation::Read => &[
                Permission::Creator,
                Permission::Reader,
                Permission::Contributor,
                Permission::Owner,
            ],
            Operation::Update => &[Permission::Contributor, Permission::Owner],
            Operation::Delete | Operation::Publish | Operation::Unpublish => &[Permission::Owner],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AuthzError::UnrecognizedOperation(s.to_string()))
    }
}

/// Looks up `operation` in the policy table and tests it against `permissions`.
///
/// `Admin` is not listed for any operation; the decision engine grants it
/// before consulting this table.
pub fn is_allowed(operation: Operation, permissions: &PermissionSet) -> bool {
    permissions.contains_any(operation.required_permissions())
}
