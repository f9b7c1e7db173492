//! Paged, searchable equipment table.
//!
//! Unlike the flat managers, the equipment list is always refetched when
//! the page, the page size, or the (debounced) search term changes.
//! Changing the search term or the page size goes back to page 1. Only the
//! newest fetch may update the table, so a slow stale response cannot
//! overwrite a newer one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use medinv_core::error::CoreError;
use medinv_core::models::{Equipment, EquipmentUpdate};
use medinv_core::pagination::{EquipmentPage, EquipmentQuery};
use medinv_core::resource::Resource;
use medinv_core::types::EntityId;
use validator::Validate;

use crate::api::ConsoleApi;
use crate::busy::BusyGuard;
use crate::config::ConsoleConfig;
use crate::debounce::Debouncer;
use crate::error::{ConsoleError, ConsoleResult};
use crate::notify::{Notifier, Toast};

#[derive(Debug)]
struct BrowserState {
    query: EquipmentQuery,
    page: Option<EquipmentPage>,
    pending_delete: Option<EntityId>,
}

pub struct EquipmentBrowser<A, N> {
    api: Arc<A>,
    notifier: Arc<N>,
    debouncer: Debouncer,
    state: Mutex<BrowserState>,
    latest_fetch: AtomicU64,
    busy: AtomicBool,
}

impl<A: ConsoleApi, N: Notifier> EquipmentBrowser<A, N> {
    pub fn new(api: Arc<A>, notifier: Arc<N>, config: &ConsoleConfig) -> Self {
        Self {
            api,
            notifier,
            debouncer: Debouncer::new(config.search_debounce()),
            state: Mutex::new(BrowserState {
                query: EquipmentQuery {
                    limit: config.page_size,
                    ..EquipmentQuery::default()
                },
                page: None,
                pending_delete: None,
            }),
            latest_fetch: AtomicU64::new(0),
            busy: AtomicBool::new(false),
        }
    }

    pub fn query(&self) -> EquipmentQuery {
        self.lock().query.clone()
    }

    pub fn page(&self) -> Option<EquipmentPage> {
        self.lock().page.clone()
    }

    pub fn items(&self) -> Vec<Equipment> {
        self.lock()
            .page
            .as_ref()
            .map(|p| p.data.clone())
            .unwrap_or_default()
    }

    pub fn total_pages(&self) -> u64 {
        self.lock().page.as_ref().map_or(0, EquipmentPage::total_pages)
    }

    /// Fetch the current query.
    pub async fn load(&self) -> ConsoleResult<EquipmentPage> {
        let query = self.query();
        self.fetch(query).await
    }

    pub async fn set_page(&self, page: u32) -> ConsoleResult<EquipmentPage> {
        let query = {
            let mut state = self.lock();
            state.query.page = page.max(1);
            state.query.clone()
        };
        self.fetch(query).await
    }

    /// Change the page size; goes back to page 1.
    pub async fn set_limit(&self, limit: u32) -> ConsoleResult<EquipmentPage> {
        let query = {
            let mut state = self.lock();
            state.query.limit = limit;
            state.query.page = 1;
            state.query = state.query.normalized();
            state.query.clone()
        };
        self.fetch(query).await
    }

    /// Register a keystroke in the search box.
    ///
    /// Resolves to `None` when a later keystroke superseded this one within
    /// the debounce window; otherwise the search is applied (back to page 1)
    /// and the resulting page returned.
    pub async fn set_search(&self, term: impl Into<String>) -> ConsoleResult<Option<EquipmentPage>> {
        let term = term.into();
        if !self.debouncer.settle().await {
            return Ok(None);
        }
        let query = {
            let mut state = self.lock();
            state.query.search = Some(term);
            state.query.page = 1;
            state.query = state.query.normalized();
            state.query.clone()
        };
        tracing::debug!(search = ?query.search, "Search settled");
        self.fetch(query).await.map(Some)
    }

    pub async fn refresh(&self) -> ConsoleResult<EquipmentPage> {
        self.load().await
    }

    // ---- mutations ----

    /// Update one record and replace it in the visible page.
    pub async fn update(&self, id: &str, input: EquipmentUpdate) -> ConsoleResult<Equipment> {
        input
            .validate()
            .map_err(|e| self.toast_error(CoreError::from(e).into()))?;
        let _guard = BusyGuard::acquire(&self.busy)?;

        let updated = self
            .api
            .update::<Equipment>(id, &input)
            .await
            .map_err(|e| self.toast_error(e))?;
        self.notifier
            .notify(Toast::success("Equipo actualizado correctamente"));

        if let Some(page) = self.lock().page.as_mut() {
            if let Some(slot) = page.data.iter_mut().find(|e| e.id == updated.id) {
                *slot = updated.clone();
            }
        }
        Ok(updated)
    }

    pub fn request_delete(&self, id: &str) -> ConsoleResult<()> {
        let mut state = self.lock();
        let visible = state
            .page
            .as_ref()
            .is_some_and(|p| p.data.iter().any(|e| e.id == id));
        if !visible {
            return Err(CoreError::NotFound {
                entity: Equipment::ENTITY,
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

    /// Delete the pending record and drop it from the visible page.
    pub async fn confirm_delete(&self) -> ConsoleResult<Option<EntityId>> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let Some(id) = self.lock().pending_delete.take() else {
            return Ok(None);
        };

        self.api
            .delete::<Equipment>(&id)
            .await
            .map_err(|e| self.toast_error(e))?;
        self.notifier
            .notify(Toast::success("Equipo eliminado correctamente"));

        if let Some(page) = self.lock().page.as_mut() {
            let before = page.data.len();
            page.data.retain(|e| e.id != id);
            if page.data.len() < before {
                page.total = page.total.saturating_sub(1);
            }
        }
        Ok(Some(id))
    }

    // ---- private helpers ----

    async fn fetch(&self, query: EquipmentQuery) -> ConsoleResult<EquipmentPage> {
        let ticket = self.latest_fetch.fetch_add(1, Ordering::AcqRel) + 1;
        let page = self
            .api
            .search_equipments(&query)
            .await
            .map_err(|e| self.toast_error(e))?;

        if self.latest_fetch.load(Ordering::Acquire) == ticket {
            self.lock().page = Some(page.clone());
        } else {
            tracing::debug!(page = query.page, "Discarding stale equipment page");
        }
        Ok(page)
    }

    fn lock(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn toast_error(&self, err: ConsoleError) -> ConsoleError {
        tracing::warn!(error = %err, "Equipment action failed");
        self.notifier.notify(Toast::error(err.toast_message()));
        err
    }
}
