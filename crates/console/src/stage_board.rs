//! Stage list with drag-and-drop reordering.
//!
//! Wraps [`ReorderSession`] with the persist call and toasts. A failed save
//! keeps the user in reordering mode with the reordered list intact so the
//! save can be attempted again.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use medinv_core::error::CoreError;
use medinv_core::models::{Stage, StageInput};
use medinv_core::stage_reorder::{ExitRequest, ReorderMode, ReorderSession};
use medinv_core::types::EntityId;
use validator::Validate;

use crate::api::ConsoleApi;
use crate::busy::BusyGuard;
use crate::error::{ConsoleError, ConsoleResult};
use crate::notify::{Notifier, Toast};

#[derive(Debug)]
struct BoardState {
    session: ReorderSession,
    pending_delete: Option<EntityId>,
}

pub struct StageBoard<A, N> {
    api: Arc<A>,
    notifier: Arc<N>,
    state: Mutex<BoardState>,
    busy: AtomicBool,
}

impl<A: ConsoleApi, N: Notifier> StageBoard<A, N> {
    pub fn new(api: Arc<A>, notifier: Arc<N>, stages: Vec<Stage>) -> Self {
        Self {
            api,
            notifier,
            state: Mutex::new(BoardState {
                session: ReorderSession::new(stages),
                pending_delete: None,
            }),
            busy: AtomicBool::new(false),
        }
    }

    /// Page loader: fetch the stages and build the board.
    pub async fn load(api: Arc<A>, notifier: Arc<N>) -> ConsoleResult<Self> {
        let stages = api.list::<Stage>().await?;
        Ok(Self::new(api, notifier, stages))
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.lock().session.stages().to_vec()
    }

    pub fn mode(&self) -> ReorderMode {
        self.lock().session.mode()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.lock().session.has_unsaved_changes()
    }

    pub fn is_draggable(&self) -> bool {
        self.lock().session.is_draggable()
    }

    // ---- reorder flow ----

    /// Start dragging. Rejected as busy while a stage create, update, or
    /// delete is still in flight.
    pub fn enter_reorder(&self) -> ConsoleResult<()> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        Ok(self.lock().session.enter_reorder()?)
    }

    /// A drop of the stage at `from` onto the slot `to`.
    pub fn move_stage(&self, from: usize, to: usize) -> ConsoleResult<()> {
        Ok(self.lock().session.move_stage(from, to)?)
    }

    /// The "cancel" button. With unsaved changes the caller must show the
    /// discard dialog and then call [`StageBoard::discard`].
    pub fn request_exit(&self) -> ConsoleResult<ExitRequest> {
        Ok(self.lock().session.request_exit()?)
    }

    pub fn discard(&self) -> ConsoleResult<()> {
        Ok(self.lock().session.discard()?)
    }

    /// Persist the current order.
    ///
    /// Returns `false` when there was nothing to save (the board simply
    /// leaves reordering mode).
    pub async fn save(&self) -> ConsoleResult<bool> {
        let Some(payload) = self.lock().session.begin_save()? else {
            return Ok(false);
        };
        tracing::debug!(stages = payload.stages.len(), "Saving stage order");

        match self.api.reorder_stages(&payload).await {
            Ok(()) => {
                self.lock().session.complete_save()?;
                self.notifier
                    .notify(Toast::success("Orden de etapas guardado"));
                Ok(true)
            }
            Err(err) => {
                self.lock().session.fail_save()?;
                Err(self.toast_error(err))
            }
        }
    }

    // ---- stage CRUD (viewing mode) ----

    pub async fn create(&self, input: StageInput) -> ConsoleResult<Stage> {
        self.validate(&input)?;
        let _guard = BusyGuard::acquire(&self.busy)?;
        self.ensure_viewing()?;

        let created = self
            .api
            .create::<Stage>(&input)
            .await
            .map_err(|e| self.toast_error(e))?;
        self.lock().session.append(created.clone())?;
        self.notifier.notify(Toast::success("Etapa creada correctamente"));

        let appended = self.lock().session.stages().last().cloned();
        Ok(appended.unwrap_or(created))
    }

    pub async fn update(&self, id: &str, input: StageInput) -> ConsoleResult<Stage> {
        self.validate(&input)?;
        let _guard = BusyGuard::acquire(&self.busy)?;
        self.ensure_viewing()?;

        let updated = self
            .api
            .update::<Stage>(id, &input)
            .await
            .map_err(|e| self.toast_error(e))?;
        self.lock().session.replace(updated.clone())?;
        self.notifier
            .notify(Toast::success("Etapa actualizada correctamente"));
        Ok(updated)
    }

    pub fn request_delete(&self, id: &str) -> ConsoleResult<()> {
        let mut state = self.lock();
        if state.session.mode() != ReorderMode::Viewing {
            return Err(CoreError::Conflict("Cannot delete a stage while reordering".into()).into());
        }
        if !state.session.stages().iter().any(|s| s.id == id) {
            return Err(CoreError::NotFound {
                entity: "Stage",
                id: id.to_string(),
            }
            .into());
        }
        state.pending_delete = Some(id.to_string());
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<EntityId> {
        self.lock().pending_delete.clone()
    }

    pub fn cancel_delete(&self) {
        self.lock().pending_delete = None;
    }

    pub async fn confirm_delete(&self) -> ConsoleResult<Option<Stage>> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        self.ensure_viewing()?;
        let Some(id) = self.lock().pending_delete.take() else {
            return Ok(None);
        };

        self.api
            .delete::<Stage>(&id)
            .await
            .map_err(|e| self.toast_error(e))?;
        let removed = self.lock().session.remove(&id)?;
        self.notifier.notify(Toast::success("Etapa eliminada correctamente"));
        Ok(Some(removed))
    }

    // ---- private helpers ----

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_viewing(&self) -> ConsoleResult<()> {
        match self.mode() {
            ReorderMode::Viewing => Ok(()),
            mode => Err(CoreError::Conflict(format!(
                "Cannot edit stages while {}",
                mode.as_str()
            ))
            .into()),
        }
    }

    fn validate(&self, input: &StageInput) -> ConsoleResult<()> {
        input
            .validate()
            .map_err(|e| self.toast_error(CoreError::from(e).into()))
    }

    fn toast_error(&self, err: ConsoleError) -> ConsoleError {
        tracing::warn!(error = %err, "Stage action failed");
        self.notifier.notify(Toast::error(err.toast_message()));
        err
    }
}
