//! Local list reconciliation for CRUD managers.
//!
//! After a successful mutation the manager patches its list in place
//! (append, replace by id, remove by id) instead of refetching.

use crate::error::CoreError;
use crate::resource::Resource;
use crate::types::EntityId;

#[derive(Debug, Clone)]
pub struct ListState<R: Resource> {
    items: Vec<R>,
    pending_delete: Option<EntityId>,
}

impl<R: Resource> ListState<R> {
    /// Seed from the initial server payload.
    pub fn new(items: Vec<R>) -> Self {
        Self {
            items,
            pending_delete: None,
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn replace_all(&mut self, items: Vec<R>) {
        self.items = items;
    }

    pub fn append(&mut self, item: R) {
        self.items.push(item);
    }

    /// Replace the item sharing `item`'s id, in place.
    pub fn replace(&mut self, item: R) -> Result<(), CoreError> {
        let slot = self
            .items
            .iter_mut()
            .find(|existing| existing.id() == item.id())
            .ok_or_else(|| CoreError::NotFound {
                entity: R::ENTITY,
                id: item.id().to_string(),
            })?;
        *slot = item;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<R, CoreError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: R::ENTITY,
                id: id.to_string(),
            })?;
        Ok(self.items.remove(index))
    }

    // ---- two-step delete ----

    /// Open the confirm dialog for `id`.
    pub fn request_delete(&mut self, id: &str) -> Result<(), CoreError> {
        if self.get(id).is_none() {
            return Err(CoreError::NotFound {
                entity: R::ENTITY,
                id: id.to_string(),
            });
        }
        self.pending_delete = Some(id.to_string());
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Consume the confirmed intent.
    pub fn take_delete(&mut self) -> Option<EntityId> {
        self.pending_delete.take()
    }
}
