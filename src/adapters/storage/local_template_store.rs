//! Local Filesystem Template Store - Implementation of TemplateStore and TestDataStore.
//!
//! Stores each template as a directory of variation files, with shared
//! partials as files directly under the templates root.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::foundation::{validate_segment, TemplateName, Variation, DEFAULT_VARIATION};
use crate::ports::{StoreError, TemplateStore, TestDataStore};

/// Maximum template size allowed (10 MB).
pub const MAX_TEMPLATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

const TEMPLATE_EXTENSION: &str = "hbs";
const TEMP_SUFFIX: &str = ".tmp";

/// Local filesystem storage for templates.
///
/// # Directory Structure
///
/// ```text
/// {root}/templates/
/// ├── footer.hbs                 (partial)
/// └── vedtak/
///     ├── template.hbs           (default variation)
///     ├── template_02.hbs
///     ├── schema.json
///     └── testdata/
///         └── default.json
/// ```
///
/// # Atomic Writes
///
/// Writes go to `<variation>.hbs.tmp`, are synced, then renamed over the
/// target. Writers hold a mutex; readers never lock.
#[derive(Debug, Clone)]
pub struct LocalTemplateStore {
    templates_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LocalTemplateStore {
    /// Creates a store rooted at `content_root`; templates live in `content_root/templates`.
    pub fn new(content_root: impl AsRef<Path>) -> Self {
        Self {
            templates_dir: content_root.as_ref().join("templates"),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    fn template_dir(&self, name: &TemplateName) -> PathBuf {
        name.segments()
            .fold(self.templates_dir.clone(), |path, segment| path.join(segment))
    }

    fn variation_path(&self, name: &TemplateName, variation: &Variation) -> PathBuf {
        self.template_dir(name)
            .join(format!("{}.{}", variation.as_str(), TEMPLATE_EXTENSION))
    }

    fn partial_path(&self, name: &TemplateName) -> PathBuf {
        let mut path = self.template_dir(name).into_os_string();
        path.push(".");
        path.push(TEMPLATE_EXTENSION);
        PathBuf::from(path)
    }

    fn display_name(name: &TemplateName, variation: &Variation) -> String {
        if variation.as_str() == DEFAULT_VARIATION {
            name.to_string()
        } else {
            format!("{} (variation {})", name, variation)
        }
    }

    async fn read_json(path: &Path, not_found: StoreError) -> Result<Value, StoreError> {
        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found),
            Err(e) => {
                return Err(StoreError::io(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        serde_json::from_str(&text)
            .map_err(|e| StoreError::invalid_content(path.display().to_string(), e.to_string()))
    }

    /// Writes `content` to `temp_path`, syncs it, then renames it over `final_path`.
    async fn write_and_rename(
        temp_path: &Path,
        final_path: &Path,
        content: &str,
    ) -> Result<(), StoreError> {
        let mut file = fs::File::create(temp_path).await.map_err(|e| {
            StoreError::io(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(content.as_bytes()).await.map_err(|e| {
            StoreError::io(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StoreError::io(format!(
                "Failed to sync temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        fs::rename(temp_path, final_path).await.map_err(|e| {
            StoreError::io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;
        Ok(())
    }

    async fn ensure_template_exists(&self, name: &TemplateName) -> Result<PathBuf, StoreError> {
        let dir = self.template_dir(name);
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(StoreError::template_not_found(name.as_str())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::template_not_found(name.as_str()))
            }
            Err(e) => Err(StoreError::io(format!(
                "Failed to inspect {}: {}",
                dir.display(),
                e
            ))),
        }
    }
}

/// Sorted file stems with the given extension, skipping hidden and temp files.
async fn list_file_stems(dir: &Path, extension: &str) -> Result<Vec<String>, StoreError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(StoreError::io(format!(
                "Failed to read directory {}: {}",
                dir.display(),
                e
            )))
        }
    };

    let mut stems = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StoreError::io(format!("Failed to read directory entry: {}", e)))?
    {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') || file_name.ends_with(TEMP_SUFFIX) {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    Ok(stems)
}

#[async_trait]
impl TemplateStore for LocalTemplateStore {
    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match fs::read_dir(&self.templates_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::io(format!(
                    "Failed to read templates directory {}: {}",
                    self.templates_dir.display(),
                    e
                )))
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(format!("Failed to read directory entry: {}", e)))?
        {
            let file_name = entry.file_name().to_string_lossy().to_string();
            if file_name.starts_with('.') || file_name.ends_with(TEMP_SUFFIX) {
                continue;
            }
            let file_type = entry.file_type().await.map_err(|e| {
                StoreError::io(format!("Failed to inspect {}: {}", file_name, e))
            })?;
            // Partials are plain files next to the template directories.
            if file_type.is_dir() {
                names.push(file_name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn read(&self, name: &TemplateName, variation: &Variation) -> Result<String, StoreError> {
        let path = self.variation_path(name, variation);
        fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::template_not_found(Self::display_name(name, variation)),
            _ => StoreError::io(format!("Failed to read {}: {}", path.display(), e)),
        })
    }

    async fn write(
        &self,
        name: &TemplateName,
        variation: &Variation,
        content: &str,
    ) -> Result<(), StoreError> {
        let size = content.len() as u64;
        if size > MAX_TEMPLATE_SIZE_BYTES {
            return Err(StoreError::too_large(size, MAX_TEMPLATE_SIZE_BYTES));
        }

        let _guard = self.write_lock.lock().await;

        let dir = self.template_dir(name);
        fs::create_dir_all(&dir).await.map_err(|e| {
            StoreError::io(format!(
                "Failed to create template directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let final_path = self.variation_path(name, variation);
        let temp_path = dir.join(format!(
            "{}.{}{}",
            variation.as_str(),
            TEMPLATE_EXTENSION,
            TEMP_SUFFIX
        ));

        if let Err(err) = Self::write_and_rename(&temp_path, &final_path, content).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(err);
        }

        tracing::debug!(template = %name, variation = %variation, bytes = size, "Template written");
        Ok(())
    }

    async fn read_partial(&self, name: &TemplateName) -> Result<String, StoreError> {
        let path = self.partial_path(name);
        fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::partial_not_found(name.as_str()),
            _ => StoreError::io(format!("Failed to read {}: {}", path.display(), e)),
        })
    }
}

#[async_trait]
impl TestDataStore for LocalTemplateStore {
    async fn list_test_sets(&self, name: &TemplateName) -> Result<Vec<String>, StoreError> {
        let dir = self.ensure_template_exists(name).await?;
        list_file_stems(&dir.join("testdata"), "json").await
    }

    async fn read_test_set(&self, name: &TemplateName, set: &str) -> Result<Value, StoreError> {
        let not_found = StoreError::test_set_not_found(format!("{}/{}", name, set));
        if validate_segment("test_set", set).is_err() {
            return Err(not_found);
        }
        let dir = self.ensure_template_exists(name).await?;
        let path = dir.join("testdata").join(format!("{}.json", set));
        Self::read_json(&path, not_found).await
    }

    async fn read_schema(&self, name: &TemplateName) -> Result<Value, StoreError> {
        let dir = self.ensure_template_exists(name).await?;
        Self::read_json(
            &dir.join("schema.json"),
            StoreError::schema_not_found(name.as_str()),
        )
        .await
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    // ───────────────────────────────────────────────────────────────
    // Test helpers
    // ───────────────────────────────────────────────────────────────

    fn create_store() -> (LocalTemplateStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalTemplateStore::new(temp_dir.path());
        (store, temp_dir)
    }

    fn name(raw: &str) -> TemplateName {
        TemplateName::new(raw).unwrap()
    }

    // ───────────────────────────────────────────────────────────────
    // Write / read tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn write_then_read_returns_content() {
        let (store, _temp) = create_store();
        let content = "# Hei, {{name}}\n";

        store
            .write(&name("vedtak"), &Variation::default(), content)
            .await
            .unwrap();

        let read = store.read(&name("vedtak"), &Variation::default()).await.unwrap();
        assert_eq!(read, content);
    }

    #[tokio::test]
    async fn write_lays_out_template_directory() {
        let (store, temp) = create_store();

        store
            .write(&name("vedtak"), &Variation::default(), "x")
            .await
            .unwrap();

        let file = temp.path().join("templates/vedtak/template.hbs");
        assert!(file.is_file());
        assert!(!temp.path().join("templates/vedtak/template.hbs.tmp").exists());
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let (store, temp) = create_store();
        // A non-empty directory where the variation file belongs blocks the rename.
        let blocker = temp.path().join("templates/vedtak/template.hbs");
        std::fs::create_dir_all(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), "x").unwrap();

        let result = store.write(&name("vedtak"), &Variation::default(), "# Hei").await;

        assert!(matches!(result, Err(StoreError::Io { .. })), "{:?}", result);
        assert!(!temp.path().join("templates/vedtak/template.hbs.tmp").exists());
    }

    #[tokio::test]
    async fn shorter_rewrite_fully_replaces_content() {
        let (store, _temp) = create_store();
        let n = name("brev");

        store
            .write(&n, &Variation::default(), "A much longer original body")
            .await
            .unwrap();
        store.write(&n, &Variation::default(), "Short").await.unwrap();

        assert_eq!(store.read(&n, &Variation::default()).await.unwrap(), "Short");
    }

    #[tokio::test]
    async fn variations_are_stored_independently() {
        let (store, _temp) = create_store();
        let n = name("brev");
        let alt = Variation::new("template_02").unwrap();

        store.write(&n, &Variation::default(), "default").await.unwrap();
        store.write(&n, &alt, "alternative").await.unwrap();

        assert_eq!(store.read(&n, &Variation::default()).await.unwrap(), "default");
        assert_eq!(store.read(&n, &alt).await.unwrap(), "alternative");
    }

    #[tokio::test]
    async fn write_rejects_oversized_content() {
        let (store, _temp) = create_store();
        let large = "x".repeat((MAX_TEMPLATE_SIZE_BYTES + 1) as usize);

        let result = store.write(&name("big"), &Variation::default(), &large).await;

        assert!(matches!(result, Err(StoreError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn read_missing_template_names_it() {
        let (store, _temp) = create_store();

        let err = store
            .read(&name("nonexistent"), &Variation::default())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Cannot find template named nonexistent");
    }

    #[tokio::test]
    async fn concurrent_writes_leave_one_complete_version() {
        let (store, _temp) = create_store();
        let n = name("race");
        let bodies: Vec<String> = (0..8).map(|i| format!("body-{}", i).repeat(100)).collect();

        let tasks: Vec<_> = bodies
            .iter()
            .cloned()
            .map(|body| {
                let store = store.clone();
                let n = n.clone();
                tokio::spawn(async move { store.write(&n, &Variation::default(), &body).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let read = store.read(&n, &Variation::default()).await.unwrap();
        assert!(bodies.contains(&read));
    }

    // ───────────────────────────────────────────────────────────────
    // List tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn list_is_empty_without_templates_directory() {
        let (store, _temp) = create_store();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_includes_empty_template_directory() {
        let (store, _temp) = create_store();
        std::fs::create_dir_all(store.templates_dir().join("empty")).unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["empty".to_string()]);
    }

    #[tokio::test]
    async fn list_is_sorted_and_skips_partials_and_hidden_entries() {
        let (store, _temp) = create_store();
        let dir = store.templates_dir().to_path_buf();
        std::fs::create_dir_all(dir.join("zeta")).unwrap();
        std::fs::create_dir_all(dir.join("alpha")).unwrap();
        std::fs::create_dir_all(dir.join(".git")).unwrap();
        std::fs::write(dir.join("footer.hbs"), "footer").unwrap();
        std::fs::write(dir.join("notes.hbs.tmp"), "partial write").unwrap();

        assert_eq!(
            store.list().await.unwrap(),
            vec!["alpha".to_string(), "zeta".to_string()]
        );
    }

    // ───────────────────────────────────────────────────────────────
    // Partial tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn read_partial_reads_root_level_file() {
        let (store, _temp) = create_store();
        std::fs::create_dir_all(store.templates_dir()).unwrap();
        std::fs::write(store.templates_dir().join("footer.hbs"), "Hilsen {{sender}}").unwrap();

        let partial = store.read_partial(&name("footer")).await.unwrap();
        assert_eq!(partial, "Hilsen {{sender}}");
    }

    #[tokio::test]
    async fn read_partial_missing_is_not_found() {
        let (store, _temp) = create_store();
        let err = store.read_partial(&name("footer")).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot find partial named footer");
    }

    // ───────────────────────────────────────────────────────────────
    // Test data tests
    // ───────────────────────────────────────────────────────────────

    fn seed_test_data(store: &LocalTemplateStore) {
        let dir = store.templates_dir().join("vedtak");
        std::fs::create_dir_all(dir.join("testdata")).unwrap();
        std::fs::write(dir.join("testdata/default.json"), r#"{"name": "Peter"}"#).unwrap();
        std::fs::write(dir.join("testdata/utland.json"), r#"{"name": "Kari"}"#).unwrap();
        std::fs::write(dir.join("testdata/broken.json"), "{not json").unwrap();
        std::fs::write(dir.join("testdata/readme.txt"), "ignored").unwrap();
        std::fs::write(dir.join("schema.json"), r#"{"type": "object"}"#).unwrap();
    }

    #[tokio::test]
    async fn list_test_sets_returns_sorted_json_stems() {
        let (store, _temp) = create_store();
        seed_test_data(&store);

        let sets = store.list_test_sets(&name("vedtak")).await.unwrap();
        assert_eq!(sets, vec!["broken", "default", "utland"]);
    }

    #[tokio::test]
    async fn list_test_sets_for_missing_template_is_not_found() {
        let (store, _temp) = create_store();
        let err = store.list_test_sets(&name("missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn read_test_set_parses_json() {
        let (store, _temp) = create_store();
        seed_test_data(&store);

        let data = store.read_test_set(&name("vedtak"), "default").await.unwrap();
        assert_eq!(data, json!({"name": "Peter"}));
    }

    #[tokio::test]
    async fn read_test_set_reports_invalid_json() {
        let (store, _temp) = create_store();
        seed_test_data(&store);

        let err = store.read_test_set(&name("vedtak"), "broken").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidContent { .. }));
    }

    #[tokio::test]
    async fn read_test_set_rejects_traversal() {
        let (store, _temp) = create_store();
        seed_test_data(&store);

        let err = store.read_test_set(&name("vedtak"), "../schema").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn read_schema_returns_json() {
        let (store, _temp) = create_store();
        seed_test_data(&store);

        let schema = store.read_schema(&name("vedtak")).await.unwrap();
        assert_eq!(schema, json!({"type": "object"}));
    }

    // ───────────────────────────────────────────────────────────────
    // Properties
    // ───────────────────────────────────────────────────────────────

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn read_returns_what_was_written(
            raw_name in "[a-z][a-z0-9_-]{0,15}",
            content in "\\PC{0,200}",
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let read = runtime.block_on(async {
                let (store, _temp) = create_store();
                let n = name(&raw_name);
                store.write(&n, &Variation::default(), &content).await.unwrap();
                store.read(&n, &Variation::default()).await.unwrap()
            });
            prop_assert_eq!(read, content);
        }
    }
}
