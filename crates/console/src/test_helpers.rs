//! In-memory [`ConsoleApi`] and fixtures for workflow tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use medinv_core::error::CoreError;
use medinv_core::models::{
    Category, CreateEquipmentBatch, Equipment, Permission, PermissionGroup, ReorderStages, Stage,
};
use medinv_core::pagination::{EquipmentPage, EquipmentQuery};
use medinv_core::resource::Resource;
use medinv_core::upload::ImageFile;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::api::ConsoleApi;
use crate::error::{ConsoleError, ConsoleResult};

#[derive(Default)]
struct FakeState {
    collections: HashMap<&'static str, Vec<Value>>,
    permissions: Vec<PermissionGroup>,
    next_id: u64,
    calls: Vec<String>,
    failures: HashMap<String, (StatusCode, String)>,
    failing_uploads: HashSet<String>,
    searches: Vec<EquipmentQuery>,
    reorders: Vec<ReorderStages>,
    delay: Option<Duration>,
}

/// Backend stand-in keyed by collection name.
///
/// Every call is recorded as `"METHOD path"` (e.g. `"PATCH categories/1"`);
/// [`FakeApi::fail`] makes a given call answer with an upstream error.
#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn seed<R: Resource>(&self, items: &[R]) {
        let values = items
            .iter()
            .map(|item| serde_json::to_value(item).unwrap())
            .collect();
        self.lock().collections.insert(R::COLLECTION, values);
    }

    pub(crate) fn seed_permissions(&self, catalog: Vec<PermissionGroup>) {
        self.lock().permissions = catalog;
    }

    pub(crate) fn items<R: Resource>(&self) -> Vec<R> {
        self.lock()
            .collections
            .get(R::COLLECTION)
            .map(|values| {
                values
                    .iter()
                    .map(|v| serde_json::from_value(v.clone()).unwrap())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn fail(&self, call: &str, status: StatusCode, message: &str) {
        self.lock()
            .failures
            .insert(call.to_string(), (status, message.to_string()));
    }

    pub(crate) fn fail_upload(&self, equipment_id: &str) {
        self.lock().failing_uploads.insert(equipment_id.to_string());
    }

    /// Make every call wait `delay` before answering.
    pub(crate) fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub(crate) fn count_calls(&self, prefix: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub(crate) fn searches(&self) -> Vec<EquipmentQuery> {
        self.lock().searches.clone()
    }

    pub(crate) fn reorders(&self) -> Vec<ReorderStages> {
        self.lock().reorders.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Record the call, honour the configured delay, then apply any
    /// scripted failure.
    async fn begin(&self, call: String) -> ConsoleResult<()> {
        let delay = {
            let mut state = self.lock();
            state.calls.push(call.clone());
            state.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.lock().failures.get(&call) {
            Some((status, message)) => Err(upstream(*status, message)),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        format!("new-{}", state.next_id)
    }
}

fn upstream(status: StatusCode, message: &str) -> ConsoleError {
    ConsoleError::Upstream {
        status,
        message: message.to_string(),
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> ConsoleResult<T> {
    serde_json::from_value(value).map_err(|e| ConsoleError::Core(CoreError::Internal(e.to_string())))
}

impl ConsoleApi for FakeApi {
    async fn list<R: Resource>(&self) -> ConsoleResult<Vec<R>> {
        self.begin(format!("GET {}", R::COLLECTION)).await?;
        Ok(self.items())
    }

    async fn create<R: Resource>(&self, input: &R::Create) -> ConsoleResult<R> {
        self.begin(format!("POST {}", R::COLLECTION)).await?;
        let mut value = serde_json::to_value(input).unwrap();
        value["id"] = json!(self.next_id());
        self.lock()
            .collections
            .entry(R::COLLECTION)
            .or_default()
            .push(value.clone());
        decode(value)
    }

    async fn update<R: Resource>(&self, id: &str, input: &R::Update) -> ConsoleResult<R> {
        self.begin(format!("PATCH {}/{id}", R::COLLECTION)).await?;
        let patch = serde_json::to_value(input).unwrap();
        let mut state = self.lock();
        let existing = state
            .collections
            .get_mut(R::COLLECTION)
            .and_then(|values| values.iter_mut().find(|v| v["id"] == json!(id)))
            .ok_or_else(|| upstream(StatusCode::NOT_FOUND, "No encontrado"))?;
        if let (Some(target), Some(fields)) = (existing.as_object_mut(), patch.as_object()) {
            for (key, field) in fields {
                if !field.is_null() {
                    target.insert(key.clone(), field.clone());
                }
            }
        }
        decode(existing.clone())
    }

    async fn delete<R: Resource>(&self, id: &str) -> ConsoleResult<()> {
        self.begin(format!("DELETE {}/{id}", R::COLLECTION)).await?;
        let mut state = self.lock();
        let values = state.collections.entry(R::COLLECTION).or_default();
        let before = values.len();
        values.retain(|v| v["id"] != json!(id));
        if values.len() == before {
            return Err(upstream(StatusCode::NOT_FOUND, "No encontrado"));
        }
        Ok(())
    }

    async fn search_equipments(&self, query: &EquipmentQuery) -> ConsoleResult<EquipmentPage> {
        self.begin("GET equipments".to_string()).await?;
        self.lock().searches.push(query.clone());

        let term = query.search.as_deref().unwrap_or_default().to_lowercase();
        let matching: Vec<Equipment> = self
            .items::<Equipment>()
            .into_iter()
            .filter(|e| e.name.to_lowercase().contains(&term))
            .collect();
        let skip = (query.page.saturating_sub(1) * query.limit) as usize;
        Ok(EquipmentPage {
            total: matching.len() as u64,
            data: matching
                .into_iter()
                .skip(skip)
                .take(query.limit as usize)
                .collect(),
            page: query.page,
            limit: query.limit,
        })
    }

    async fn create_equipment_batch(
        &self,
        input: &CreateEquipmentBatch,
    ) -> ConsoleResult<Vec<Equipment>> {
        self.begin("POST equipments".to_string()).await?;
        let records: Vec<Value> = (0..input.quantity)
            .map(|_| {
                let id = self.next_id();
                json!({
                    "id": id,
                    "serial": format!("SN-{id}"),
                    "name": input.name,
                    "description": input.description,
                    "model": input.model,
                })
            })
            .collect();
        self.lock()
            .collections
            .entry(Equipment::COLLECTION)
            .or_default()
            .extend(records.iter().cloned());
        decode(Value::Array(records))
    }

    async fn upload_equipment_image(&self, id: &str, image: &ImageFile) -> ConsoleResult<Equipment> {
        self.begin(format!("POST equipments/{id}/image")).await?;
        let mut state = self.lock();
        if state.failing_uploads.contains(id) {
            return Err(upstream(StatusCode::INTERNAL_SERVER_ERROR, "Upload failed"));
        }
        let record = state
            .collections
            .get_mut(Equipment::COLLECTION)
            .and_then(|values| values.iter_mut().find(|v| v["id"] == json!(id)))
            .ok_or_else(|| upstream(StatusCode::NOT_FOUND, "No encontrado"))?;
        record["imageURL"] = json!(format!("http://files.test/{id}/{}", image.file_name));
        decode(record.clone())
    }

    async fn reorder_stages(&self, payload: &ReorderStages) -> ConsoleResult<()> {
        self.begin("PUT stages/reorder".to_string()).await?;
        let mut state = self.lock();
        state.reorders.push(payload.clone());
        if let Some(stages) = state.collections.get_mut(Stage::COLLECTION) {
            for entry in &payload.stages {
                if let Some(stage) = stages.iter_mut().find(|v| v["id"] == json!(entry.id)) {
                    stage["orderNumber"] = json!(entry.order_number);
                }
            }
        }
        Ok(())
    }

    async fn list_permissions(&self) -> ConsoleResult<Vec<PermissionGroup>> {
        self.begin("GET permissions".to_string()).await?;
        Ok(self.lock().permissions.clone())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub(crate) fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn stage(id: &str, name: &str, order_number: u32) -> Stage {
    Stage {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        color: None,
        order_number,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn equipment(id: &str, name: &str) -> Equipment {
    Equipment {
        id: id.to_string(),
        serial: None,
        name: name.to_string(),
        description: None,
        model: None,
        image_url: None,
        qrs: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn png(name: &str) -> ImageFile {
    ImageFile {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

pub(crate) fn catalog() -> Vec<PermissionGroup> {
    let permission = |code: &str, name: &str| Permission {
        code: code.to_string(),
        name: name.to_string(),
    };
    vec![
        PermissionGroup {
            group: "Equipos".to_string(),
            permissions: vec![
                permission("equipment.read", "Ver equipos"),
                permission("equipment.write", "Editar equipos"),
            ],
        },
        PermissionGroup {
            group: "Etapas".to_string(),
            permissions: vec![
                permission("stage.read", "Ver etapas"),
                permission("stage.reorder", "Reordenar etapas"),
            ],
        },
    ]
}
