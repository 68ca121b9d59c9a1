use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{AuthzError, AuthzResult};
use crate::permissions::types::{Survey, SurveyId, UserId};
use crate::{log_store_debug, log_store_info};

/// Source of survey snapshots for authorization checks.
///
/// Implementations return an owned copy so that a check never observes a
/// survey changing underneath it.
pub trait SurveyStore {
    fn get_survey(&self, id: &SurveyId) -> AuthzResult<Option<Survey>>;
}

impl<T: SurveyStore + ?Sized> SurveyStore for &T {
    fn get_survey(&self, id: &SurveyId) -> AuthzResult<Option<Survey>> {
        (**self).get_survey(id)
    }
}

impl<T: SurveyStore + ?Sized> SurveyStore for std::sync::Arc<T> {
    fn get_survey(&self, id: &SurveyId) -> AuthzResult<Option<Survey>> {
        (**self).get_survey(id)
    }
}

/// Thread-safe in-memory survey store.
#[derive(Debug, Default)]
pub struct InMemorySurveyStore {
    surveys: RwLock<HashMap<SurveyId, Survey>>,
}

impl InMemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AuthzResult<RwLockReadGuard<'_, HashMap<SurveyId, Survey>>> {
        self.surveys
            .read()
            .map_err(|e| AuthzError::Store(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> AuthzResult<RwLockWriteGuard<'_, HashMap<SurveyId, Survey>>> {
        self.surveys
            .write()
            .map_err(|e| AuthzError::Store(format!("Failed to acquire write lock: {}", e)))
    }

    /// Stores a survey, replacing any survey with the same id.
    ///
    /// A replacement must keep the tenant of the survey it replaces.
    pub fn insert(&self, survey: Survey) -> AuthzResult<()> {
        let mut surveys = self.write()?;
        if let Some(existing) = surveys.get(&survey.id()) {
            if existing.tenant_id() != survey.tenant_id() {
                return Err(AuthzError::Store(format!(
                    "Survey {} cannot move from tenant {} to {}",
                    survey.id(),
                    existing.tenant_id(),
                    survey.tenant_id()
                )));
            }
        }
        log_store_debug!("Storing survey {} for tenant {}", survey.id(), survey.tenant_id());
        surveys.insert(survey.id(), survey);
        Ok(())
    }

    pub fn remove(&self, id: &SurveyId) -> AuthzResult<Option<Survey>> {
        Ok(self.write()?.remove(id))
    }

    pub fn add_contributor(&self, id: &SurveyId, user_id: UserId) -> AuthzResult<bool> {
        let mut surveys = self.write()?;
        let survey = surveys
            .get_mut(id)
            .ok_or(AuthzError::SurveyNotFound(*id))?;
        log_store_info!("Adding contributor {user_id} to survey {id}");
        Ok(survey.add_contributor(user_id))
    }

    pub fn remove_contributor(&self, id: &SurveyId, user_id: &UserId) -> AuthzResult<bool> {
        let mut surveys = self.write()?;
        let survey = surveys
            .get_mut(id)
            .ok_or(AuthzError::SurveyNotFound(*id))?;
        log_store_info!("Removing contributor {user_id} from survey {id}");
        Ok(survey.remove_contributor(user_id))
    }

    pub fn set_published(&self, id: &SurveyId, published: bool) -> AuthzResult<()> {
        let mut surveys = self.write()?;
        let survey = surveys
            .get_mut(id)
            .ok_or(AuthzError::SurveyNotFound(*id))?;
        survey.set_published(published);
        Ok(())
    }

    pub fn len(&self) -> AuthzResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> AuthzResult<bool> {
        Ok(self.read()?.is_empty())
    }
}

impl SurveyStore for InMemorySurveyStore {
    fn get_survey(&self, id: &SurveyId) -> AuthzResult<Option<Survey>> {
        Ok(self.read()?.get(id).cloned())
    }
}
