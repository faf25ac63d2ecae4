/// Start-up seed data
///
/// A seed file is a JSON array of creators in the same camelCase shape the
/// registry serializes, e.g.
///
/// ```json
/// [{ "fullName": "Maya Chen", "email": "maya@example.com",
///    "creatorType": "Real Person", "validFrom": "2026-01-01",
///    "validThrough": "2027-01-01" }]
/// ```
use crate::{
    creator::NewCreator,
    error::{RegistryError, RegistryResult},
    registry::CreatorRegistry,
};
use std::path::Path;
use tracing::{info, warn};

/// Read creators from a JSON seed file
pub async fn load_seed_file(path: &Path) -> RegistryResult<Vec<NewCreator>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let creators: Vec<NewCreator> = serde_json::from_str(&raw)?;
    Ok(creators)
}

/// Create each seeded creator; rejected entries are logged and skipped.
/// Returns the number created.
pub async fn apply_seed(registry: &CreatorRegistry, creators: Vec<NewCreator>) -> usize {
    let mut created = 0;
    for new in creators {
        let email = new.email.clone();
        match registry.create_creator(new).await {
            Ok(_) => created += 1,
            Err(e @ RegistryError::Conflict(_)) | Err(e @ RegistryError::Validation(_)) => {
                warn!("Skipping seed creator {}: {}", email, e);
            }
            Err(e) => warn!("Failed to seed creator {}: {}", email, e),
        }
    }
    info!("Seeded {} creators", created);
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistrySettings;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SEED: &str = r#"[
        {"fullName": "Maya Chen", "email": "maya@example.com", "creatorType": "Real Person",
         "validFrom": "2026-01-01", "validThrough": "2099-01-01"},
        {"fullName": "Captain Crunchy", "email": "mascot@brand.example.com",
         "creatorType": "Brand Mascot", "validFrom": "2026-01-01", "validThrough": "2099-06-30",
         "notes": "Licensed through agency"},
        {"fullName": "Maya Again", "email": "MAYA@example.com",
         "validFrom": "2026-01-01", "validThrough": "2099-01-01"}
    ]"#;

    #[tokio::test]
    async fn test_load_and_apply_seed() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let creators = load_seed_file(file.path()).await.unwrap();
        assert_eq!(creators.len(), 3);
        assert_eq!(creators[2].creator_type, Default::default());

        let registry = CreatorRegistry::new(RegistrySettings::default());
        let created = apply_seed(&registry, creators).await;

        // Third entry collides with the first
        assert_eq!(created, 2);
        assert_eq!(registry.creator_count().await, 2);
    }

    #[tokio::test]
    async fn test_malformed_seed_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = load_seed_file(file.path()).await.unwrap_err();
        assert!(matches!(err, RegistryError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_missing_seed_file() {
        let err = load_seed_file(Path::new("/nonexistent/seed.json")).await.unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
    }
}
