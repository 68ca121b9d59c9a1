use std::sync::Arc;
use std::thread;

use survey_authz::{
    authorize, Operation, Permission, PermissionManager, PermissionSet, Principal, Role, Survey,
    TenantId, UserId,
};

fn survey_r() -> Survey {
    Survey::new(TenantId::from("T1"), UserId::from("U1"), "Team survey")
        .with_contributor(UserId::from("U2"))
}

/// Principals covering every combination of tenant, role and relationship
/// to `survey_r`.
fn principals() -> Vec<Principal> {
    let mut principals = Vec::new();
    for user in ["U1", "U2", "U3"] {
        for tenant in ["T1", "T2"] {
            principals.push(Principal::new(user, tenant));
            principals.push(Principal::new(user, tenant).with_role(Role::Creator));
            principals.push(Principal::new(user, tenant).with_role(Role::Reader));
            principals.push(Principal::new(user, tenant).with_role(Role::Admin));
            principals.push(
                Principal::new(user, tenant)
                    .with_role(Role::Admin)
                    .with_role(Role::Creator),
            );
        }
    }
    principals
}

#[test]
fn test_scenario_from_tenant_t1() {
    let manager = PermissionManager::new();
    let survey = survey_r();

    let u1 = Principal::new("U1", "T1").with_role(Role::Creator);
    assert!(manager.authorize(&u1, &survey, Operation::Delete));

    let u2 = Principal::new("U2", "T2");
    assert!(manager.authorize(&u2, &survey, Operation::Read));
    assert!(!manager.authorize(&u2, &survey, Operation::Delete));

    let u3 = Principal::new("U3", "T1");
    assert_eq!(
        manager.compute_permissions(&u3, &survey),
        PermissionSet::empty().with(Permission::Reader)
    );
    assert!(manager.authorize(&u3, &survey, Operation::Read));
    assert!(!manager.authorize(&u3, &survey, Operation::Update));

    let u4 = Principal::new("U4", "T1").with_role(Role::Admin);
    assert!(manager.authorize(&u4, &survey, Operation::Delete));
}

#[test]
fn test_foreign_non_contributor_gets_nothing() {
    let manager = PermissionManager::new();
    let survey = survey_r();

    for principal in principals() {
        if principal.tenant_id == *survey.tenant_id() || survey.is_contributor(&principal.user_id) {
            continue;
        }
        assert!(
            manager.compute_permissions(&principal, &survey).is_empty(),
            "{principal:?}"
        );
        for operation in Operation::ALL {
            assert!(
                !manager.authorize(&principal, &survey, operation),
                "{principal:?} {operation}"
            );
        }
    }
}

#[test]
fn test_tenant_admin_is_allowed_everything() {
    let survey = survey_r();
    for principal in principals() {
        if !principal.has_role(Role::Admin) || principal.tenant_id != *survey.tenant_id() {
            continue;
        }
        for operation in Operation::ALL {
            assert!(authorize(&principal, &survey, operation), "{principal:?} {operation}");
        }
    }
}

#[test]
fn test_owner_permissions() {
    let survey = survey_r();
    for principal in principals() {
        if principal.user_id != *survey.owner_id() || principal.tenant_id != *survey.tenant_id() {
            continue;
        }
        for operation in [
            Operation::Read,
            Operation::Update,
            Operation::Delete,
            Operation::Publish,
            Operation::Unpublish,
        ] {
            assert!(authorize(&principal, &survey, operation), "{principal:?} {operation}");
        }
        let can_create = principal.has_role(Role::Creator) || principal.has_role(Role::Admin);
        assert_eq!(
            authorize(&principal, &survey, Operation::Create),
            can_create,
            "{principal:?}"
        );
    }
}

#[test]
fn test_contributor_permissions_in_any_tenant() {
    let survey = survey_r();
    for principal in principals() {
        if !survey.is_contributor(&principal.user_id) {
            continue;
        }
        assert!(authorize(&principal, &survey, Operation::Read), "{principal:?}");
        assert!(authorize(&principal, &survey, Operation::Update), "{principal:?}");

        let tenant_admin =
            principal.has_role(Role::Admin) && principal.tenant_id == *survey.tenant_id();
        if !tenant_admin {
            assert!(!authorize(&principal, &survey, Operation::Delete), "{principal:?}");
        }
    }
}

#[test]
fn test_contributor_who_owns_can_delete() {
    let survey = survey_r().with_contributor(UserId::from("U1"));
    let owner = Principal::new("U1", "T1");
    assert!(authorize(&owner, &survey, Operation::Delete));
}

#[test]
fn test_tenant_members_read_by_default() {
    let survey = survey_r();
    let outsider_in_tenant = Principal::new("U7", "T1");
    assert!(authorize(&outsider_in_tenant, &survey, Operation::Read));
    for operation in [
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Publish,
        Operation::Unpublish,
    ] {
        assert!(!authorize(&outsider_in_tenant, &survey, operation), "{operation}");
    }
}

#[test]
fn test_decisions_are_repeatable() {
    let manager = PermissionManager::new();
    let survey = survey_r();
    for principal in principals() {
        for operation in Operation::ALL {
            let first = manager.authorize(&principal, &survey, operation);
            let second = manager.authorize(&principal, &survey, operation);
            assert_eq!(first, second);
        }
        assert_eq!(
            manager.compute_permissions(&principal, &survey),
            manager.compute_permissions(&principal, &survey)
        );
    }
}

#[test]
fn test_concurrent_checks_agree() {
    let manager = Arc::new(PermissionManager::new());
    let survey = Arc::new(survey_r());
    let expected: Vec<Vec<bool>> = principals()
        .iter()
        .map(|p| {
            Operation::ALL
                .iter()
                .map(|op| manager.authorize(p, &survey, *op))
                .collect()
        })
        .collect();

    thread::scope(|scope| {
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            let survey = Arc::clone(&survey);
            let expected = &expected;
            scope.spawn(move || {
                for (principal, expected_row) in principals().iter().zip(expected) {
                    for (operation, allowed) in Operation::ALL.iter().zip(expected_row) {
                        assert_eq!(manager.authorize(principal, &survey, *operation), *allowed);
                    }
                }
            });
        }
    });
}

#[test]
fn test_permitted_operations_follow_policy_table() {
    let manager = PermissionManager::new();
    let survey = survey_r();

    let creator_owner = Principal::new("U1", "T1").with_role(Role::Creator);
    assert_eq!(
        manager.permitted_operations(&creator_owner, &survey),
        Operation::ALL.to_vec()
    );

    let reader = Principal::new("U3", "T1");
    assert_eq!(manager.permitted_operations(&reader, &survey), vec![Operation::Read]);

    let stranger = Principal::new("U3", "T2");
    assert!(manager.permitted_operations(&stranger, &survey).is_empty());
}

#[test]
fn test_named_operations() {
    let manager = PermissionManager::new();
    let survey = survey_r();
    let owner = Principal::new("U1", "T1");

    for name in ["read", "Update", "DELETE", "publish", "Unpublish"] {
        assert!(manager.authorize_named(&owner, &survey, name).unwrap(), "{name}");
    }
    assert!(!manager.authorize_named(&owner, &survey, "create").unwrap());
    assert!(manager.authorize_named(&owner, &survey, "share").is_err());
}
