use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::CatalogFormat;
use crate::error::{Result, LocsyncError};

/// Persisted key -> translated-text mapping for one locale.
///
/// Catalogs are transient: loaded, mutated and rewritten whole within a
/// single call. Keys are kept in a BTreeMap so every rewrite serializes in
/// ascending key order. There is no locking; concurrent runs against the
/// same catalog race on the read-merge-rewrite and the last writer wins.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    pub locale: String,
    pub entries: BTreeMap<String, String>,
}

impl LocaleCatalog {
    /// Path of the catalog file for a locale in the given format
    pub fn file_path(root: &Path, locale: &str, format: CatalogFormat) -> PathBuf {
        match format {
            CatalogFormat::Flat => root.join(format!("{}.json", locale)),
            CatalogFormat::Scoped => root.join(locale).join("messages.json"),
        }
    }

    /// Load the catalog for a locale; a missing file is an empty catalog
    pub async fn load(root: &Path, locale: &str, format: CatalogFormat) -> Result<Self> {
        let path = Self::file_path(root, locale, format);

        let entries = if path.exists() {
            let content = fs::read_to_string(&path).await?;
            serde_json::from_str(&content).map_err(|e| {
                LocsyncError::Catalog(format!(
                    "Malformed catalog file {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            locale: locale.to_string(),
            entries,
        })
    }

    /// Resolved value for a key in this locale: the stored translation, or
    /// the key itself when none is registered. A key resolving to itself is
    /// what missing-key detection treats as untranslated.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Rewrite the whole catalog file, keys ascending, non-ASCII unescaped
    pub async fn save(&self, root: &Path, format: CatalogFormat) -> Result<()> {
        let path = Self::file_path(root, &self.locale, format);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&path, content).await?;

        Ok(())
    }
}

/// Insert or overwrite one entry and rewrite the locale's catalog file.
/// Idempotent: repeating the call with identical arguments leaves the file
/// byte-identical. Existing entries are always preserved.
pub async fn upsert(
    root: &Path,
    locale: &str,
    key: &str,
    value: &str,
    format: CatalogFormat,
) -> Result<()> {
    let mut catalog = LocaleCatalog::load(root, locale, format).await?;
    catalog.entries.insert(key.to_string(), value.to_string());
    catalog.save(root, format).await
}

/// Create an empty catalog file for a locale. Returns true when the file
/// was created, false when an existing file was left alone.
pub async fn init_locale(
    root: &Path,
    locale: &str,
    format: CatalogFormat,
    force: bool,
) -> Result<bool> {
    let path = LocaleCatalog::file_path(root, locale, format);

    if path.exists() && !force {
        return Ok(false);
    }

    let catalog = LocaleCatalog {
        locale: locale.to_string(),
        entries: BTreeMap::new(),
    };
    catalog.save(root, format).await?;

    info!("Initialized catalog: {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let catalog = LocaleCatalog::load(dir.path(), "es", CatalogFormat::Flat)
            .await
            .unwrap();
        assert!(catalog.entries.is_empty());
        assert_eq!(catalog.resolve("Save"), "Save");
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = LocaleCatalog::file_path(dir.path(), "es", CatalogFormat::Flat);

        upsert(dir.path(), "es", "Save", "Guardar", CatalogFormat::Flat)
            .await
            .unwrap();
        let first = fs::read(&path).await.unwrap();

        upsert(dir.path(), "es", "Save", "Guardar", CatalogFormat::Flat)
            .await
            .unwrap();
        let second = fs::read(&path).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_keys_sorted_regardless_of_insertion_order() {
        let dir = TempDir::new().unwrap();
        for (key, value) in [("Zebra", "Cebra"), ("Apple", "Manzana"), ("Mango", "Mango")] {
            upsert(dir.path(), "es", key, value, CatalogFormat::Flat)
                .await
                .unwrap();
        }

        let path = LocaleCatalog::file_path(dir.path(), "es", CatalogFormat::Flat);
        let content = fs::read_to_string(&path).await.unwrap();
        let apple = content.find("Apple").unwrap();
        let mango = content.find("Mango").unwrap();
        let zebra = content.find("Zebra").unwrap();
        assert!(apple < mango && mango < zebra);
    }

    #[tokio::test]
    async fn test_upsert_preserves_existing_entries() {
        let dir = TempDir::new().unwrap();
        upsert(dir.path(), "fr", "Hello", "Bonjour", CatalogFormat::Flat)
            .await
            .unwrap();
        upsert(dir.path(), "fr", "Goodbye", "Au revoir", CatalogFormat::Flat)
            .await
            .unwrap();

        let catalog = LocaleCatalog::load(dir.path(), "fr", CatalogFormat::Flat)
            .await
            .unwrap();
        assert_eq!(catalog.entries.get("Hello").unwrap(), "Bonjour");
        assert_eq!(catalog.entries.get("Goodbye").unwrap(), "Au revoir");
    }

    #[tokio::test]
    async fn test_scoped_format_uses_locale_directory() {
        let dir = TempDir::new().unwrap();
        upsert(dir.path(), "ja", "Hello", "こんにちは", CatalogFormat::Scoped)
            .await
            .unwrap();

        let path = dir.path().join("ja").join("messages.json");
        assert!(path.exists());

        // Non-ASCII stays unescaped on disk
        let content = fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("こんにちは"));
    }

    #[tokio::test]
    async fn test_formats_hold_identical_content() {
        let dir = TempDir::new().unwrap();
        upsert(dir.path(), "es", "Hello", "Hola", CatalogFormat::Flat)
            .await
            .unwrap();
        upsert(dir.path(), "es", "Hello", "Hola", CatalogFormat::Scoped)
            .await
            .unwrap();

        let flat = LocaleCatalog::load(dir.path(), "es", CatalogFormat::Flat)
            .await
            .unwrap();
        let scoped = LocaleCatalog::load(dir.path(), "es", CatalogFormat::Scoped)
            .await
            .unwrap();
        assert_eq!(flat.entries, scoped.entries);
    }

    #[tokio::test]
    async fn test_init_skips_existing_unless_forced() {
        let dir = TempDir::new().unwrap();
        assert!(init_locale(dir.path(), "es", CatalogFormat::Flat, false)
            .await
            .unwrap());

        upsert(dir.path(), "es", "Hello", "Hola", CatalogFormat::Flat)
            .await
            .unwrap();

        // Plain init leaves the populated file alone
        assert!(!init_locale(dir.path(), "es", CatalogFormat::Flat, false)
            .await
            .unwrap());
        let catalog = LocaleCatalog::load(dir.path(), "es", CatalogFormat::Flat)
            .await
            .unwrap();
        assert_eq!(catalog.entries.len(), 1);

        // Force overwrites with an empty mapping
        assert!(init_locale(dir.path(), "es", CatalogFormat::Flat, true)
            .await
            .unwrap());
        let catalog = LocaleCatalog::load(dir.path(), "es", CatalogFormat::Flat)
            .await
            .unwrap();
        assert!(catalog.entries.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_catalog_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = LocaleCatalog::file_path(dir.path(), "es", CatalogFormat::Flat);
        fs::write(&path, "not json").await.unwrap();

        let result = LocaleCatalog::load(dir.path(), "es", CatalogFormat::Flat).await;
        assert!(matches!(result, Err(LocsyncError::Catalog(_))));
    }
}
