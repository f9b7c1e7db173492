//! CRUD managers for the flat collections (categories, roles).
//!
//! A manager is seeded with the page's initial list and reconciles it
//! locally after each mutation: append on create, replace by id on update,
//! remove by id on delete. Deletes are two-step (request, then confirm).
//! Only one mutation may be in flight; a second is rejected as busy.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use medinv_core::error::CoreError;
use medinv_core::list_state::ListState;
use medinv_core::models::{Category, Role};
use medinv_core::resource::Resource;
use medinv_core::types::EntityId;
use validator::Validate;

use crate::api::ConsoleApi;
use crate::busy::BusyGuard;
use crate::error::{ConsoleError, ConsoleResult};
use crate::notify::{Notifier, Toast};

pub type CategoryManager<A, N> = CrudManager<Category, A, N>;
pub type RoleManager<A, N> = CrudManager<Role, A, N>;

pub struct CrudManager<R: Resource, A, N> {
    api: Arc<A>,
    notifier: Arc<N>,
    list: Mutex<ListState<R>>,
    busy: AtomicBool,
}

impl<R, A, N> CrudManager<R, A, N>
where
    R: Resource,
    A: ConsoleApi,
    N: Notifier,
{
    pub fn new(api: Arc<A>, notifier: Arc<N>, initial: Vec<R>) -> Self {
        Self {
            api,
            notifier,
            list: Mutex::new(ListState::new(initial)),
            busy: AtomicBool::new(false),
        }
    }

    /// Page loader: fetch the initial list and build the manager.
    pub async fn load(api: Arc<A>, notifier: Arc<N>) -> ConsoleResult<Self> {
        let initial = api.list::<R>().await?;
        tracing::debug!(collection = R::COLLECTION, count = initial.len(), "Loaded list");
        Ok(Self::new(api, notifier, initial))
    }

    pub fn items(&self) -> Vec<R> {
        self.lock().items().to_vec()
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.lock().get(id).cloned()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(std::sync::atomic::Ordering::Acquire)
    }

    /// Replace the list with a fresh server copy.
    pub async fn refresh(&self) -> ConsoleResult<()> {
        let items = self.report(self.api.list::<R>().await, None)?;
        self.lock().replace_all(items);
        Ok(())
    }

    pub async fn create(&self, input: R::Create) -> ConsoleResult<R> {
        self.validate(&input)?;
        let _guard = BusyGuard::acquire(&self.busy)?;

        let created = self.report(
            self.api.create::<R>(&input).await,
            Some("Registro creado correctamente"),
        )?;
        tracing::debug!(collection = R::COLLECTION, id = created.id(), "Created");
        self.lock().append(created.clone());
        Ok(created)
    }

    pub async fn update(&self, id: &str, input: R::Update) -> ConsoleResult<R> {
        self.validate(&input)?;
        let _guard = BusyGuard::acquire(&self.busy)?;

        let updated = self.report(
            self.api.update::<R>(id, &input).await,
            Some("Registro actualizado correctamente"),
        )?;
        let mut list = self.lock();
        if list.get(updated.id()).is_some() {
            list.replace(updated.clone())?;
        } else {
            list.append(updated.clone());
        }
        Ok(updated)
    }

    // ---- two-step delete ----

    /// Open the confirmation for deleting `id`.
    pub fn request_delete(&self, id: &str) -> ConsoleResult<()> {
        self.lock().request_delete(id)?;
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<EntityId> {
        self.lock().pending_delete().map(str::to_string)
    }

    pub fn cancel_delete(&self) {
        self.lock().cancel_delete();
    }

    /// Delete the pending item. Returns `None` if nothing was pending.
    pub async fn confirm_delete(&self) -> ConsoleResult<Option<R>> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let Some(id) = self.lock().take_delete() else {
            return Ok(None);
        };

        self.report(
            self.api.delete::<R>(&id).await,
            Some("Registro eliminado correctamente"),
        )?;
        let removed = self.lock().remove(&id).ok();
        Ok(removed)
    }

    // ---- private helpers ----

    fn lock(&self) -> MutexGuard<'_, ListState<R>> {
        self.list.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn validate<T: Validate>(&self, input: &T) -> ConsoleResult<()> {
        input
            .validate()
            .map_err(|e| ConsoleError::from(CoreError::from(e)))
            .map_err(|e| self.toast_error(e))
    }

    /// Toast the outcome of a remote call.
    fn report<T>(&self, result: ConsoleResult<T>, success: Option<&str>) -> ConsoleResult<T> {
        match result {
            Ok(value) => {
                if let Some(message) = success {
                    self.notifier.notify(Toast::success(message));
                }
                Ok(value)
            }
            Err(err) => Err(self.toast_error(err)),
        }
    }

    fn toast_error(&self, err: ConsoleError) -> ConsoleError {
        tracing::warn!(collection = R::COLLECTION, error = %err, "Console action failed");
        self.notifier.notify(Toast::error(err.toast_message()));
        err
    }
}
