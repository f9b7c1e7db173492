//! Deferred image uploads for freshly created equipment.
//!
//! Files are staged in memory with a preview URL and only leave the process
//! when the wizard is finalized. Staging is either global (one image for
//! every record) or individual (one image per record); switching modes with
//! files staged requires confirmation and discards everything staged.
//! Every preview URL handed out by [`PreviewStore`] must be revoked exactly
//! once, which the staging area does on restage, mode switch, and release.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::error::CoreError;
use crate::models::Equipment;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Preview URLs
// ---------------------------------------------------------------------------

/// An in-memory preview handle (the `blob:` URL shown next to a staged file).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewUrl(String);

impl PreviewUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Issues and revokes preview URLs. Cloning shares the same registry.
#[derive(Debug, Clone, Default)]
pub struct PreviewStore {
    live: Arc<Mutex<HashSet<String>>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> PreviewUrl {
        let url = format!("blob:medinv/{}", uuid::Uuid::new_v4());
        self.lock().insert(url.clone());
        PreviewUrl(url)
    }

    /// Release a preview. Returns `false` if it was already revoked.
    pub fn revoke(&self, url: &PreviewUrl) -> bool {
        self.lock().remove(&url.0)
    }

    pub fn is_live(&self, url: &PreviewUrl) -> bool {
        self.lock().contains(&url.0)
    }

    /// Number of previews not yet revoked.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A poisoned set is still a valid set of strings.
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Staged files
// ---------------------------------------------------------------------------

/// A file picked by the user, held in memory until finalize.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Only `image/*` files may be staged.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.content_type.starts_with("image/") {
            return Err(CoreError::Validation(format!(
                "'{}' is not an image ({})",
                self.file_name, self.content_type
            )));
        }
        if self.bytes.is_empty() {
            return Err(CoreError::Validation(format!(
                "'{}' is empty",
                self.file_name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedImage {
    pub file: ImageFile,
    pub preview: PreviewUrl,
}

// ---------------------------------------------------------------------------
// Modes and outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    /// One image applied to every created record.
    Global,
    /// One image per record.
    Individual,
}

/// Result of asking to change the upload mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSwitch {
    /// Already in the requested mode.
    Unchanged,
    /// Nothing was staged, the new mode is active.
    Applied,
    /// Files are staged; call [`UploadStaging::confirm_mode`] to discard them.
    NeedsConfirmation,
}

/// Per-record upload state shown in the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUpload {
    Pending,
    Uploaded,
    Failed(String),
}

/// One request to issue on finalize.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub equipment_id: EntityId,
    pub file: ImageFile,
}

/// Aggregate of an all-settled finalize.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl UploadReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

// ---------------------------------------------------------------------------
// Staging area
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct UploadStaging {
    records: Vec<Equipment>,
    mode: UploadMode,
    global: Option<StagedImage>,
    items: BTreeMap<EntityId, StagedImage>,
    outcomes: BTreeMap<EntityId, ItemUpload>,
    previews: PreviewStore,
}

impl UploadStaging {
    /// Staging for the records created in step one. Starts in global mode.
    pub fn new(records: Vec<Equipment>, previews: PreviewStore) -> Self {
        Self {
            records,
            mode: UploadMode::Global,
            global: None,
            items: BTreeMap::new(),
            outcomes: BTreeMap::new(),
            previews,
        }
    }

    pub fn records(&self) -> &[Equipment] {
        &self.records
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn global_image(&self) -> Option<&StagedImage> {
        self.global.as_ref()
    }

    pub fn item_image(&self, equipment_id: &str) -> Option<&StagedImage> {
        self.items.get(equipment_id)
    }

    pub fn outcome(&self, equipment_id: &str) -> Option<&ItemUpload> {
        self.outcomes.get(equipment_id)
    }

    pub fn has_pending(&self) -> bool {
        self.global.is_some() || !self.items.is_empty()
    }

    /// Stage the shared image (global mode only), replacing any previous one.
    pub fn stage_global(&mut self, file: ImageFile) -> Result<&StagedImage, CoreError> {
        self.expect_mode(UploadMode::Global)?;
        file.validate()?;
        if let Some(previous) = self.global.take() {
            self.previews.revoke(&previous.preview);
        }
        let preview = self.previews.create();
        Ok(self.global.insert(StagedImage { file, preview }))
    }

    /// Stage the image for one record (individual mode only).
    pub fn stage_item(
        &mut self,
        equipment_id: &str,
        file: ImageFile,
    ) -> Result<&StagedImage, CoreError> {
        self.expect_mode(UploadMode::Individual)?;
        file.validate()?;
        if !self.records.iter().any(|r| r.id == equipment_id) {
            return Err(CoreError::NotFound {
                entity: "Equipment",
                id: equipment_id.to_string(),
            });
        }
        if let Some(previous) = self.items.remove(equipment_id) {
            self.previews.revoke(&previous.preview);
        }
        let preview = self.previews.create();
        self.outcomes
            .insert(equipment_id.to_string(), ItemUpload::Pending);
        Ok(self
            .items
            .entry(equipment_id.to_string())
            .or_insert(StagedImage { file, preview }))
    }

    /// Unstage one record's image.
    pub fn clear_item(&mut self, equipment_id: &str) {
        if let Some(previous) = self.items.remove(equipment_id) {
            self.previews.revoke(&previous.preview);
            self.outcomes.remove(equipment_id);
        }
    }

    /// Ask to switch modes; staged files make this a two-step operation.
    pub fn request_mode(&mut self, mode: UploadMode) -> ModeSwitch {
        if mode == self.mode {
            return ModeSwitch::Unchanged;
        }
        if self.has_pending() {
            return ModeSwitch::NeedsConfirmation;
        }
        self.mode = mode;
        ModeSwitch::Applied
    }

    /// Confirmed switch: discard every staged file, revoke the previews, then
    /// apply `mode`.
    pub fn confirm_mode(&mut self, mode: UploadMode) {
        let discarded = self.release_all();
        self.outcomes.clear();
        self.mode = mode;
        tracing::debug!(discarded, mode = ?mode, "Upload mode switched");
    }

    /// The requests finalize must issue: one per record in global mode, one
    /// per staged item in individual mode.
    pub fn plan(&self) -> Vec<UploadJob> {
        match self.mode {
            UploadMode::Global => match &self.global {
                Some(staged) => self
                    .records
                    .iter()
                    .map(|record| UploadJob {
                        equipment_id: record.id.clone(),
                        file: staged.file.clone(),
                    })
                    .collect(),
                None => Vec::new(),
            },
            UploadMode::Individual => self
                .records
                .iter()
                .filter_map(|record| {
                    self.items.get(&record.id).map(|staged| UploadJob {
                        equipment_id: record.id.clone(),
                        file: staged.file.clone(),
                    })
                })
                .collect(),
        }
    }

    /// Record each settled upload and tally the report.
    pub fn apply_results<E: std::fmt::Display>(
        &mut self,
        results: Vec<(EntityId, Result<Equipment, E>)>,
    ) -> UploadReport {
        let mut report = UploadReport::default();
        for (equipment_id, result) in results {
            match result {
                Ok(updated) => {
                    report.succeeded += 1;
                    if let Some(record) = self.records.iter_mut().find(|r| r.id == equipment_id) {
                        *record = updated;
                    }
                    self.outcomes.insert(equipment_id, ItemUpload::Uploaded);
                }
                Err(err) => {
                    report.failed += 1;
                    self.outcomes
                        .insert(equipment_id, ItemUpload::Failed(err.to_string()));
                }
            }
        }
        report
    }

    /// Revoke every outstanding preview and drop the staged files. Returns
    /// how many previews were released.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        if let Some(staged) = self.global.take() {
            released += usize::from(self.previews.revoke(&staged.preview));
        }
        for (_, staged) in std::mem::take(&mut self.items) {
            released += usize::from(self.previews.revoke(&staged.preview));
        }
        released
    }

    fn expect_mode(&self, expected: UploadMode) -> Result<(), CoreError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Upload mode is {:?}, expected {expected:?}",
                self.mode
            )))
        }
    }
}

impl Drop for UploadStaging {
    fn drop(&mut self) {
        self.release_all();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
