//! Drag-and-drop reordering of workflow stages.
//!
//! The board is either viewing (static list), reordering (drag enabled, with
//! a snapshot of the list taken on entry), or saving (persist call in
//! flight). Discarding restores the snapshot; a successful save renumbers
//! the list 1..N and returns to viewing; a failed save leaves the reordered
//! list and the unsaved-changes flag in place.

use crate::error::CoreError;
use crate::models::{ReorderStages, Stage, StageOrder};

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderMode {
    Viewing,
    Reordering,
    Saving,
}

impl ReorderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewing => "viewing",
            Self::Reordering => "reordering",
            Self::Saving => "saving",
        }
    }
}

/// Outcome of asking to leave reordering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequest {
    /// No pending changes; the board is back in viewing mode.
    Exited,
    /// Pending changes exist; call [`ReorderSession::discard`] once the user
    /// confirms, or keep reordering.
    ConfirmDiscard,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReorderSession {
    stages: Vec<Stage>,
    snapshot: Option<Vec<Stage>>,
    mode: ReorderMode,
    dirty: bool,
}

impl ReorderSession {
    /// Start in viewing mode with `stages` ordered by their `order_number`.
    pub fn new(mut stages: Vec<Stage>) -> Self {
        stages.sort_by_key(|s| s.order_number);
        Self {
            stages,
            snapshot: None,
            mode: ReorderMode::Viewing,
            dirty: false,
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn mode(&self) -> ReorderMode {
        self.mode
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn is_draggable(&self) -> bool {
        self.mode == ReorderMode::Reordering
    }

    /// Enable dragging and capture the rollback snapshot.
    pub fn enter_reorder(&mut self) -> Result<(), CoreError> {
        self.expect_mode(ReorderMode::Viewing, "enter reordering")?;
        self.snapshot = Some(self.stages.clone());
        self.dirty = false;
        self.mode = ReorderMode::Reordering;
        tracing::debug!(stages = self.stages.len(), "Entered stage reordering");
        Ok(())
    }

    /// Apply a drop: swap the stages at `from` and `to`.
    ///
    /// Dropping a stage on its own slot changes nothing.
    pub fn move_stage(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        self.expect_mode(ReorderMode::Reordering, "move a stage")?;
        let len = self.stages.len();
        if from >= len || to >= len {
            return Err(CoreError::Validation(format!(
                "Stage position out of range: {from} -> {to} (len {len})"
            )));
        }
        if from == to {
            return Ok(());
        }
        self.stages.swap(from, to);
        self.dirty = true;
        Ok(())
    }

    /// Ask to leave reordering mode.
    pub fn request_exit(&mut self) -> Result<ExitRequest, CoreError> {
        self.expect_mode(ReorderMode::Reordering, "leave reordering")?;
        if self.dirty {
            return Ok(ExitRequest::ConfirmDiscard);
        }
        self.snapshot = None;
        self.mode = ReorderMode::Viewing;
        Ok(ExitRequest::Exited)
    }

    /// Restore the snapshot taken on entry and return to viewing mode.
    pub fn discard(&mut self) -> Result<(), CoreError> {
        self.expect_mode(ReorderMode::Reordering, "discard changes")?;
        if let Some(snapshot) = self.snapshot.take() {
            self.stages = snapshot;
        }
        self.dirty = false;
        self.mode = ReorderMode::Viewing;
        tracing::debug!("Discarded stage reordering");
        Ok(())
    }

    /// Start persisting the current order.
    ///
    /// Returns the payload to send, with order numbers 1..N in list order.
    /// When nothing changed the board simply returns to viewing and `None`
    /// is returned.
    pub fn begin_save(&mut self) -> Result<Option<ReorderStages>, CoreError> {
        self.expect_mode(ReorderMode::Reordering, "save the order")?;
        if !self.dirty {
            self.snapshot = None;
            self.mode = ReorderMode::Viewing;
            return Ok(None);
        }
        self.mode = ReorderMode::Saving;
        Ok(Some(ReorderStages {
            stages: self
                .stages
                .iter()
                .enumerate()
                .map(|(index, stage)| StageOrder {
                    id: stage.id.clone(),
                    order_number: position_number(index),
                })
                .collect(),
        }))
    }

    /// The persist call succeeded: adopt the new numbering and stop reordering.
    pub fn complete_save(&mut self) -> Result<(), CoreError> {
        self.expect_mode(ReorderMode::Saving, "complete a save")?;
        renumber(&mut self.stages);
        self.snapshot = None;
        self.dirty = false;
        self.mode = ReorderMode::Viewing;
        Ok(())
    }

    /// The persist call failed: keep the reordered list and the pending flag.
    pub fn fail_save(&mut self) -> Result<(), CoreError> {
        self.expect_mode(ReorderMode::Saving, "fail a save")?;
        self.mode = ReorderMode::Reordering;
        Ok(())
    }

    // ---- list reconciliation (viewing mode only) ----

    /// Append a newly created stage at the end of the list.
    pub fn append(&mut self, mut stage: Stage) -> Result<(), CoreError> {
        self.expect_mode(ReorderMode::Viewing, "add a stage")?;
        if stage.order_number == 0 {
            stage.order_number = position_number(self.stages.len());
        }
        self.stages.push(stage);
        Ok(())
    }

    /// Replace the stage with the same id, keeping its position.
    pub fn replace(&mut self, stage: Stage) -> Result<(), CoreError> {
        self.expect_mode(ReorderMode::Viewing, "edit a stage")?;
        let slot = self
            .stages
            .iter_mut()
            .find(|s| s.id == stage.id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Stage",
                id: stage.id.clone(),
            })?;
        let order_number = slot.order_number;
        *slot = Stage {
            order_number,
            ..stage
        };
        Ok(())
    }

    /// Remove a stage and close the gap in the numbering.
    pub fn remove(&mut self, id: &str) -> Result<Stage, CoreError> {
        self.expect_mode(ReorderMode::Viewing, "remove a stage")?;
        let index = self
            .stages
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Stage",
                id: id.to_string(),
            })?;
        let removed = self.stages.remove(index);
        renumber(&mut self.stages);
        Ok(removed)
    }

    fn expect_mode(&self, expected: ReorderMode, action: &str) -> Result<(), CoreError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Cannot {action} while {}",
                self.mode.as_str()
            )))
        }
    }
}

fn position_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

fn renumber(stages: &mut [Stage]) {
    for (index, stage) in stages.iter_mut().enumerate() {
        stage.order_number = position_number(index);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
