use survey_authz::{
    AuthzConfig, ClaimsPrincipal, ConfigError, Operation, PermissionManager, Principal, Survey,
    TenantId, UserId,
};
use tempfile::tempdir;

const CONFIG: &str = r#"
[claim_types]
tenant_id = "tid"
user_id = "oid"
role = "roles"

[role_names]
admin = "Surveys.Admin"
creator = "Surveys.Create"
reader = "Surveys.Read"

[logging.general]
default_level = "WARN"

[logging.audit]
enabled = true
level = "INFO"
buffer_size = 50
structured = true

[logging.features]
permissions = "DEBUG"
"#;

#[test]
fn test_load_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("authz.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let config = AuthzConfig::from_file(&path).unwrap();
    assert_eq!(config.claim_types.tenant_id, "tid");
    assert_eq!(config.role_names.creator, "Surveys.Create");
    assert_eq!(config.logging.audit.buffer_size, 50);
    assert!(config.logging.audit.structured);
    assert_eq!(config.logging.features.get("permissions").map(String::as_str), Some("DEBUG"));
}

#[test]
fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("authz.toml");

    let original = AuthzConfig::from_toml_str(CONFIG).unwrap();
    original.save_to_file(&path).unwrap();

    let reloaded = AuthzConfig::from_toml_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reloaded, original);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let result = AuthzConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let result = AuthzConfig::from_toml_str("[role_names\nadmin = ");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let result = AuthzConfig::from_toml_str(
        r#"
        [logging.console]
        level = "VERBOSE"
        "#,
    );
    assert!(matches!(result, Err(ConfigError::InvalidLevel(level)) if level == "VERBOSE"));
}

#[test]
fn test_configured_claims_drive_decisions() {
    let config = AuthzConfig::from_toml_str(CONFIG).unwrap();
    let claims = ClaimsPrincipal::default()
        .with_claim("tid", "contoso")
        .with_claim("oid", "u-42")
        .with_claim("roles", "Surveys.Create");

    let principal = Principal::from_claims(&claims.reader(&config.claim_types), &config.role_names)
        .unwrap();
    let survey = Survey::new(TenantId::from("contoso"), UserId::from("u-42"), "Draft");

    let manager = PermissionManager::new();
    assert!(manager.authorize(&principal, &survey, Operation::Create));
    assert!(manager.authorize(&principal, &survey, Operation::Publish));

    // The default claim type names do not match this token's claims
    let defaults = AuthzConfig::default();
    assert!(Principal::from_claims(&claims.reader(&defaults.claim_types), &defaults.role_names)
        .is_err());
}
