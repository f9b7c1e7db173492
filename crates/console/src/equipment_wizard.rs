//! Two-step equipment creation wizard.
//!
//! Step one creates `quantity` records in a single call. Step two stages
//! images (one shared image, or one per record) and uploads them only when
//! the wizard is finalized. Finalize fires every upload at once and waits
//! for all of them to settle; failures are counted, never retried, and the
//! wizard closes either way.

use std::sync::Arc;

use futures::future::join_all;
use medinv_core::error::CoreError;
use medinv_core::models::{CreateEquipmentBatch, Equipment};
use medinv_core::upload::{
    ImageFile, ModeSwitch, PreviewStore, PreviewUrl, UploadMode, UploadReport, UploadStaging,
};
use validator::Validate;

use crate::api::ConsoleApi;
use crate::error::{ConsoleError, ConsoleResult};
use crate::notify::{Notifier, Toast};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Collecting name, description, model, and quantity.
    Details,
    /// Records exist; images may be staged.
    Images,
    Closed,
}

pub struct EquipmentWizard<A, N> {
    api: Arc<A>,
    notifier: Arc<N>,
    previews: PreviewStore,
    step: WizardStep,
    staging: Option<UploadStaging>,
    created: Vec<Equipment>,
}

impl<A: ConsoleApi, N: Notifier> EquipmentWizard<A, N> {
    pub fn new(api: Arc<A>, notifier: Arc<N>, previews: PreviewStore) -> Self {
        Self {
            api,
            notifier,
            previews,
            step: WizardStep::Details,
            staging: None,
            created: Vec::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Records created in step one, with image URLs once uploaded.
    pub fn created(&self) -> &[Equipment] {
        &self.created
    }

    pub fn staging(&self) -> Option<&UploadStaging> {
        self.staging.as_ref()
    }

    // ---- step one ----

    pub async fn create_records(&mut self, input: CreateEquipmentBatch) -> ConsoleResult<&[Equipment]> {
        self.expect_step(WizardStep::Details)?;
        input
            .validate()
            .map_err(|e| self.toast_error(CoreError::from(e).into()))?;

        let records = self
            .api
            .create_equipment_batch(&input)
            .await
            .map_err(|e| self.toast_error(e))?;
        tracing::info!(count = records.len(), name = %input.name, "Equipment batch created");
        self.notifier.notify(Toast::success(format!(
            "{} equipos creados correctamente",
            records.len()
        )));

        self.created = records.clone();
        self.staging = Some(UploadStaging::new(records, self.previews.clone()));
        self.step = WizardStep::Images;
        Ok(&self.created)
    }

    // ---- step two ----

    pub fn stage_global(&mut self, file: ImageFile) -> ConsoleResult<PreviewUrl> {
        let result = self
            .staging_mut()?
            .stage_global(file)
            .map(|staged| staged.preview.clone());
        result.map_err(|e| self.toast_error(e.into()))
    }

    pub fn stage_item(&mut self, equipment_id: &str, file: ImageFile) -> ConsoleResult<PreviewUrl> {
        let result = self
            .staging_mut()?
            .stage_item(equipment_id, file)
            .map(|staged| staged.preview.clone());
        result.map_err(|e| self.toast_error(e.into()))
    }

    pub fn clear_item(&mut self, equipment_id: &str) -> ConsoleResult<()> {
        self.staging_mut()?.clear_item(equipment_id);
        Ok(())
    }

    /// Ask to switch between global and individual images. With files
    /// staged the answer is [`ModeSwitch::NeedsConfirmation`].
    pub fn request_mode(&mut self, mode: UploadMode) -> ConsoleResult<ModeSwitch> {
        Ok(self.staging_mut()?.request_mode(mode))
    }

    /// Confirmed switch: staged files are discarded and their previews
    /// revoked before the new mode applies.
    pub fn confirm_mode(&mut self, mode: UploadMode) -> ConsoleResult<()> {
        self.staging_mut()?.confirm_mode(mode);
        Ok(())
    }

    /// Upload everything staged, then close.
    ///
    /// With nothing staged no request is made.
    pub async fn finalize(&mut self) -> ConsoleResult<UploadReport> {
        let jobs = self.staging_mut()?.plan();
        if jobs.is_empty() {
            self.close();
            return Ok(UploadReport::default());
        }

        tracing::info!(uploads = jobs.len(), "Uploading equipment images");
        let api = &self.api;
        let results = join_all(jobs.iter().map(|job| async move {
            let result = api.upload_equipment_image(&job.equipment_id, &job.file).await;
            (job.equipment_id.clone(), result)
        }))
        .await;

        let report = match self.staging.as_mut() {
            Some(staging) => {
                let report = staging.apply_results(results);
                self.created = staging.records().to_vec();
                report
            }
            None => UploadReport::default(),
        };

        if report.failed == 0 {
            self.notifier.notify(Toast::success(format!(
                "{} imágenes subidas correctamente",
                report.succeeded
            )));
        } else {
            tracing::warn!(
                succeeded = report.succeeded,
                failed = report.failed,
                "Some equipment images failed to upload"
            );
            self.notifier.notify(Toast::error(format!(
                "{} de {} imágenes no se pudieron subir",
                report.failed,
                report.total()
            )));
        }

        self.close();
        Ok(report)
    }

    /// Close the wizard, releasing every preview.
    pub fn close(&mut self) {
        if let Some(mut staging) = self.staging.take() {
            let released = staging.release_all();
            tracing::debug!(released, "Equipment wizard closed");
        }
        self.step = WizardStep::Closed;
    }

    // ---- private helpers ----

    fn staging_mut(&mut self) -> ConsoleResult<&mut UploadStaging> {
        match self.step {
            WizardStep::Images => self.staging.as_mut().ok_or_else(|| {
                CoreError::Internal("Image step without staging".into()).into()
            }),
            step => Err(wrong_step(step, WizardStep::Images)),
        }
    }

    fn expect_step(&self, expected: WizardStep) -> ConsoleResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(wrong_step(self.step, expected))
        }
    }

    fn toast_error(&self, err: ConsoleError) -> ConsoleError {
        tracing::warn!(error = %err, "Equipment wizard action failed");
        self.notifier.notify(Toast::error(err.toast_message()));
        err
    }
}

fn wrong_step(current: WizardStep, expected: WizardStep) -> ConsoleError {
    CoreError::Conflict(format!("Wizard is at {current:?}, expected {expected:?}")).into()
}
