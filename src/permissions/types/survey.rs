use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use super::principal::{TenantId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyId(Uuid);

impl SurveyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SurveyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurveyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A survey owned by a single tenant.
///
/// The owning tenant is fixed when the survey is created; there is no way to
/// move a survey to another tenant. Contributors are plain user ids and may
/// belong to any tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    id: SurveyId,
    tenant_id: TenantId,
    owner_id: UserId,
    #[serde(default)]
    contributor_ids: BTreeSet<UserId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    published: bool,
}

impl Survey {
    /// Creates an unpublished survey with a fresh id and no contributors.
    pub fn new(tenant_id: TenantId, owner_id: UserId, title: impl Into<String>) -> Self {
        Self::with_id(SurveyId::new(), tenant_id, owner_id, title)
    }

    pub fn with_id(
        id: SurveyId,
        tenant_id: TenantId,
        owner_id: UserId,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            tenant_id,
            owner_id,
            contributor_ids: BTreeSet::new(),
            title: title.into(),
            published: false,
        }
    }

    #[must_use]
    pub fn with_contributor(mut self, user_id: UserId) -> Self {
        self.contributor_ids.insert(user_id);
        self
    }

    pub fn id(&self) -> SurveyId {
        self.id
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn contributor_ids(&self) -> &BTreeSet<UserId> {
        &self.contributor_ids
    }

    pub fn is_contributor(&self, user_id: &UserId) -> bool {
        self.contributor_ids.contains(user_id)
    }

    /// Returns true if the contributor was newly added.
    pub fn add_contributor(&mut self, user_id: UserId) -> bool {
        self.contributor_ids.insert(user_id)
    }

    /// Returns true if the contributor was present.
    pub fn remove_contributor(&mut self, user_id: &UserId) -> bool {
        self.contributor_ids.remove(user_id)
    }

    pub fn set_published(&mut self, published: bool) {
        self.published = published;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_survey_starts_unpublished_without_contributors() {
        let survey = Survey::new(TenantId::from("t1"), UserId::from("u1"), "Onboarding");
        assert!(!survey.is_published());
        assert!(survey.contributor_ids().is_empty());
        assert_eq!(survey.title(), "Onboarding");
        assert_eq!(survey.owner_id().as_str(), "u1");
    }

    #[test]
    fn contributors_are_a_set() {
        let mut survey = Survey::new(TenantId::from("t1"), UserId::from("u1"), "");
        assert!(survey.add_contributor(UserId::from("u2")));
        assert!(!survey.add_contributor(UserId::from("u2")));
        assert!(survey.is_contributor(&UserId::from("u2")));
        assert!(survey.remove_contributor(&UserId::from("u2")));
        assert!(!survey.is_contributor(&UserId::from("u2")));
    }

    #[test]
    fn survey_round_trips_through_json() {
        let survey = Survey::new(TenantId::from("t1"), UserId::from("u1"), "Exit poll")
            .with_contributor(UserId::from("u9"));
        let json = serde_json::to_string(&survey).unwrap();
        let parsed: Survey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, survey);
    }
}
