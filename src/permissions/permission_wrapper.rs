use serde::Serialize;

use crate::error::{AuthzError, AuthzResult};
use crate::permissions::permission_manager::PermissionManager;
use crate::permissions::types::{Operation, Principal, Survey, SurveyId};
use crate::store::SurveyStore;
use crate::{log_permissions_info, log_permissions_warn};

/// Runs permission checks against surveys loaded from a [`SurveyStore`].
///
/// The survey is read and checked in one call, but the store may change
/// between this check and whatever the caller does next. Callers that need a
/// consistent view must hold it themselves.
pub struct PermissionWrapper<S> {
    permission_manager: PermissionManager,
    store: S,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyPermissionResult {
    pub survey_id: SurveyId,
    pub operation: Operation,
    pub allowed: bool,
    pub error: Option<String>,
}

impl<S: SurveyStore> PermissionWrapper<S> {
    pub fn new(store: S) -> Self {
        Self {
            permission_manager: PermissionManager::new(),
            store,
        }
    }

    fn load(&self, survey_id: &SurveyId) -> AuthzResult<Survey> {
        self.store
            .get_survey(survey_id)?
            .ok_or(AuthzError::SurveyNotFound(*survey_id))
    }

    pub fn check_survey_permission(
        &self,
        principal: &Principal,
        survey_id: &SurveyId,
        operation: Operation,
    ) -> AuthzResult<bool> {
        let survey = self.load(survey_id)?;
        Ok(self.permission_manager.authorize(principal, &survey, operation))
    }

    /// Loads the survey and returns it only if `operation` is allowed.
    ///
    /// A denial becomes [`AuthzError::Forbidden`], which carries no detail.
    /// The reason is logged on the permissions target instead.
    pub fn require(
        &self,
        principal: &Principal,
        survey_id: &SurveyId,
        operation: Operation,
    ) -> AuthzResult<Survey> {
        let survey = self.load(survey_id)?;
        if self.permission_manager.authorize(principal, &survey, operation) {
            return Ok(survey);
        }

        let permissions = self.permission_manager.compute_permissions(principal, &survey);
        log_permissions_info!(
            "Denied {operation} on survey {survey_id} for {}@{} (held {permissions:?}, needs any of {:?})",
            principal.user_id,
            principal.tenant_id,
            operation.required_permissions()
        );
        Err(AuthzError::Forbidden)
    }

    /// Checks whether `principal` may create a new survey.
    ///
    /// The check runs against a draft survey in the principal's own tenant
    /// with the principal as owner, which is what the created survey would be.
    pub fn check_create_permission(&self, principal: &Principal) -> bool {
        let draft = Survey::new(
            principal.tenant_id.clone(),
            principal.user_id.clone(),
            String::new(),
        );
        self.permission_manager
            .authorize(principal, &draft, Operation::Create)
    }

    pub fn permitted_operations(
        &self,
        principal: &Principal,
        survey_id: &SurveyId,
    ) -> AuthzResult<Vec<Operation>> {
        let survey = self.load(survey_id)?;
        Ok(self.permission_manager.permitted_operations(principal, &survey))
    }

    /// Checks several (survey, operation) pairs, one result per pair.
    pub fn check_batch(
        &self,
        principal: &Principal,
        requests: &[(SurveyId, Operation)],
    ) -> Vec<SurveyPermissionResult> {
        requests
            .iter()
            .map(|(survey_id, operation)| {
                match self.check_survey_permission(principal, survey_id, *operation) {
                    Ok(allowed) => SurveyPermissionResult {
                        survey_id: *survey_id,
                        operation: *operation,
                        allowed,
                        error: if allowed {
                            None
                        } else {
                            Some(AuthzError::Forbidden.to_string())
                        },
                    },
                    Err(e) => {
                        log_permissions_warn!("Batch check for survey {survey_id} failed: {e}");
                        SurveyPermissionResult {
                            survey_id: *survey_id,
                            operation: *operation,
                            allowed: false,
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect()
    }
}
