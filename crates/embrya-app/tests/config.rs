use embrya_app::config::{migrate, EmbryaConfig};

#[test]
fn v0_config_gains_clinic_name_and_version() {
    let v0 = serde_json::json!({
        "api_base_url": "http://localhost:8000",
        "created_at": "2025-09-14T08:00:00Z"
    });

    let migrated = migrate(v0, 0).unwrap();
    assert_eq!(migrated["config_version"], 1);
    assert_eq!(migrated["clinic_name"], "");

    let config: EmbryaConfig = serde_json::from_value(migrated).unwrap();
    assert_eq!(config.api_base_url, "http://localhost:8000");
    assert_eq!(config.clinic_name, "");
}

#[test]
fn current_version_passes_through_unchanged() {
    let v1 = serde_json::json!({
        "config_version": 1,
        "api_base_url": "https://backend.example",
        "clinic_name": "Lakeside Fertility",
        "created_at": "2026-01-05T12:00:00Z"
    });
    let migrated = migrate(v1.clone(), 1).unwrap();
    assert_eq!(migrated, v1);
}

#[test]
fn future_versions_are_rejected() {
    let v9 = serde_json::json!({ "config_version": 9, "api_base_url": "x" });
    assert!(migrate(v9, 9).is_err());
}

#[test]
fn non_object_documents_are_rejected() {
    assert!(migrate(serde_json::json!([1, 2, 3]), 0).is_err());
}
