use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::draft::{DraftId, DraftSession, DraftTemplate, TemplateId};
use crate::error::AppError;

/// JSON files under a data directory: `drafts/{id}.json` and `templates/{id}.json`.
pub struct DraftStore {
    root: PathBuf,
}

impl DraftStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DraftStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn drafts_dir(&self) -> PathBuf {
        self.root.join("drafts")
    }

    fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    /// Allocate the next draft id and persist the session `build` makes for it.
    ///
    /// Allocation and the first save happen under a store-wide lock, so concurrent callers
    /// never share an id.
    pub fn create_draft(
        &self,
        build: impl FnOnce(DraftId) -> Result<DraftSession, AppError>,
    ) -> Result<DraftSession, AppError> {
        let _lock = FileLock::acquire(&self.drafts_dir().join(".next_id.lock"))?;
        let id = self.next_draft_id()?;
        let session = build(id)?;
        if session.id() != id {
            return Err(AppError::InvalidInput(format!(
                "draft built with id {} instead of {}",
                session.id(),
                id
            )));
        }
        self.save_draft(&session)?;
        Ok(session)
    }

    /// Load, change and save one draft while holding its lock file.
    ///
    /// The draft is only written back when `update` succeeds.
    pub fn update_draft<T>(
        &self,
        id: DraftId,
        update: impl FnOnce(&mut DraftSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let _lock = FileLock::acquire(&self.drafts_dir().join(format!("{}.lock", id)))?;
        let mut session = self.load_draft(id)?;
        let outcome = update(&mut session)?;
        self.save_draft(&session)?;
        Ok(outcome)
    }

    pub fn save_draft(&self, session: &DraftSession) -> Result<(), AppError> {
        write_json(&self.drafts_dir(), session.id(), session)
    }

    pub fn load_draft(&self, id: DraftId) -> Result<DraftSession, AppError> {
        read_json(&self.drafts_dir(), id)?.ok_or_else(|| AppError::NotFound(format!("draft {}", id)))
    }

    /// All drafts, most recently updated first.
    pub fn list_drafts(&self) -> Result<Vec<DraftSession>, AppError> {
        let mut drafts: Vec<DraftSession> = read_all(&self.drafts_dir())?;
        drafts.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(drafts)
    }

    pub fn next_draft_id(&self) -> Result<DraftId, AppError> {
        Ok(max_id(&self.drafts_dir())? + 1)
    }

    /// Allocate the next template id and persist the template `build` makes for it.
    pub fn create_template(
        &self,
        build: impl FnOnce(TemplateId) -> DraftTemplate,
    ) -> Result<DraftTemplate, AppError> {
        let _lock = FileLock::acquire(&self.templates_dir().join(".next_id.lock"))?;
        let template = build(self.next_template_id()?);
        self.save_template(&template)?;
        Ok(template)
    }

    pub fn save_template(&self, template: &DraftTemplate) -> Result<(), AppError> {
        write_json(&self.templates_dir(), template.id, template)
    }

    pub fn load_template(&self, id: TemplateId) -> Result<DraftTemplate, AppError> {
        read_json(&self.templates_dir(), id)?
            .ok_or_else(|| AppError::NotFound(format!("template {}", id)))
    }

    /// Public templates, newest first.
    pub fn list_public_templates(&self) -> Result<Vec<DraftTemplate>, AppError> {
        let mut templates: Vec<DraftTemplate> = read_all(&self.templates_dir())?;
        templates.retain(|t| t.is_public);
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }

    pub fn next_template_id(&self) -> Result<TemplateId, AppError> {
        Ok(max_id(&self.templates_dir())? + 1)
    }
}

/// Exclusive advisory lock on a file, held until dropped.
struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::StorageError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|e| AppError::StorageError(format!("Failed to open {}: {}", path.display(), e)))?;
        FileExt::lock_exclusive(&file)
            .map_err(|e| AppError::StorageError(format!("Failed to lock {}: {}", path.display(), e)))?;

        tracing::trace!(path = %path.display(), "lock acquired");
        Ok(FileLock {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release lock");
        }
    }
}

fn record_path(dir: &Path, id: u64) -> PathBuf {
    dir.join(format!("{}.json", id))
}

fn write_json<T: Serialize>(dir: &Path, id: u64, value: &T) -> Result<(), AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::StorageError(format!("Failed to create {}: {}", dir.display(), e)))?;

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::JsonError(format!("Failed to serialize record {}: {}", id, e)))?;

    // Write then rename so readers never see a half-written record.
    let path = record_path(dir, id);
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .map_err(|e| AppError::StorageError(format!("Failed to write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, &path)
        .map_err(|e| AppError::StorageError(format!("Failed to replace {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), "record saved");
    Ok(())
}

fn read_json<T: DeserializeOwned>(dir: &Path, id: u64) -> Result<Option<T>, AppError> {
    let path = record_path(dir, id);
    match fs::read_to_string(&path) {
        Ok(content) => serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| AppError::JsonError(format!("Failed to parse {}: {}", path.display(), e))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::StorageError(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Ids of the `{id}.json` records in `dir`; a missing directory has none.
fn record_ids(dir: &Path) -> Result<Vec<u64>, AppError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(AppError::StorageError(format!(
                "Failed to list {}: {}",
                dir.display(),
                e
            )))
        }
    };

    Ok(entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension()? != "json" {
                return None;
            }
            path.file_stem()?.to_str()?.parse::<u64>().ok()
        })
        .collect())
}

fn max_id(dir: &Path) -> Result<u64, AppError> {
    Ok(record_ids(dir)?.into_iter().max().unwrap_or(0))
}

fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, AppError> {
    let mut records = Vec::new();
    for id in record_ids(dir)? {
        if let Some(record) = read_json(dir, id)? {
            records.push(record);
        }
    }
    Ok(records)
}
