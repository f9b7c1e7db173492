//! The seam between console workflows and the proxy API.

use std::future::Future;

use medinv_core::models::{CreateEquipmentBatch, Equipment, PermissionGroup, ReorderStages};
use medinv_core::pagination::{EquipmentPage, EquipmentQuery};
use medinv_core::resource::Resource;
use medinv_core::upload::ImageFile;

use crate::error::ConsoleResult;

/// Calls the console makes against `/api/*`.
///
/// [`crate::client::ProxyClient`] is the HTTP implementation; managers are
/// generic over this trait so workflows can be driven without a server.
pub trait ConsoleApi: Send + Sync {
    /// `GET /api/{collection}`
    fn list<R: Resource>(&self) -> impl Future<Output = ConsoleResult<Vec<R>>> + Send;

    /// `POST /api/{collection}`
    fn create<R: Resource>(
        &self,
        input: &R::Create,
    ) -> impl Future<Output = ConsoleResult<R>> + Send;

    /// `PATCH /api/{collection}/{id}`
    fn update<R: Resource>(
        &self,
        id: &str,
        input: &R::Update,
    ) -> impl Future<Output = ConsoleResult<R>> + Send;

    /// `DELETE /api/{collection}/{id}`
    fn delete<R: Resource>(&self, id: &str) -> impl Future<Output = ConsoleResult<()>> + Send;

    /// `GET /api/equipments?page=&limit=&search=`
    fn search_equipments(
        &self,
        query: &EquipmentQuery,
    ) -> impl Future<Output = ConsoleResult<EquipmentPage>> + Send;

    /// `POST /api/equipments`, creating `quantity` records at once.
    fn create_equipment_batch(
        &self,
        input: &CreateEquipmentBatch,
    ) -> impl Future<Output = ConsoleResult<Vec<Equipment>>> + Send;

    /// `POST /api/equipments/{id}/image` (multipart field `image`).
    fn upload_equipment_image(
        &self,
        id: &str,
        image: &ImageFile,
    ) -> impl Future<Output = ConsoleResult<Equipment>> + Send;

    /// `PUT /api/stages/reorder`
    fn reorder_stages(
        &self,
        payload: &ReorderStages,
    ) -> impl Future<Output = ConsoleResult<()>> + Send;

    /// `GET /api/permissions`
    fn list_permissions(&self) -> impl Future<Output = ConsoleResult<Vec<PermissionGroup>>> + Send;
}
