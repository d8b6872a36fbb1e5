// ============================================================================
// HRM Infrastructure - Permission Catalog Loader
// File: crates/hrm-infrastructure/src/catalog/mod.rs
// ============================================================================
//! Reads the permission catalog from a JSON file, or falls back to the
//! built-in HR catalog when no path is configured.

use tracing::{error, info};

use hrm_core::domain::PermissionCatalog;
use hrm_core::error::DomainError;

pub async fn load_catalog(path: Option<&str>) -> Result<PermissionCatalog, DomainError> {
    let Some(path) = path else {
        info!("Using built-in permission catalog");
        return Ok(PermissionCatalog::builtin());
    };

    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        error!("Failed to read permission catalog {}: {}", path, e);
        DomainError::InvalidCatalog(format!("cannot read {}: {}", path, e))
    })?;

    let catalog = PermissionCatalog::from_json(&json)?;
    info!(
        path,
        modules = catalog.template.modules.len(),
        "Loaded permission catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_temp(contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("hrm-catalog-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, contents).await.unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_no_path_uses_builtin() {
        let catalog = load_catalog(None).await.unwrap();
        assert_eq!(catalog, PermissionCatalog::builtin());
    }

    #[tokio::test]
    async fn test_loads_catalog_file() {
        let path = write_temp(
            r#"{
                "modules": [
                    { "module_name": "Payroll", "direct_actions": ["read", "approval"] }
                ],
                "implied_reads": []
            }"#,
        )
        .await;

        let catalog = load_catalog(Some(&path)).await.unwrap();
        assert_eq!(catalog.template.modules.len(), 1);
        assert!(catalog.template.module("payroll").is_some());
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_example_catalog_loads() {
        let catalog = load_catalog(Some("../../config/catalog.example.json")).await.unwrap();
        let payroll = catalog.template.module("Payroll").unwrap();
        assert!(payroll.sub_module("tax").is_some());
        assert!(catalog.implied_read_rule("payroll").is_some());
    }

    #[tokio::test]
    async fn test_missing_file_is_invalid_catalog() {
        let result = load_catalog(Some("/nonexistent/hrm-catalog.json")).await;
        assert!(matches!(result, Err(DomainError::InvalidCatalog(_))));
    }

    #[tokio::test]
    async fn test_invalid_catalog_rejected() {
        let path = write_temp(r#"{ "modules": [ { "module_name": "Home" }, { "module_name": "home" } ] }"#).await;

        let result = load_catalog(Some(&path)).await;
        assert!(matches!(result, Err(DomainError::InvalidCatalog(_))));
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
