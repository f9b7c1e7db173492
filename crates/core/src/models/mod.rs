//! Entity records exchanged verbatim with the backend, plus their
//! create/update payloads.
//!
//! JSON field names follow the backend's camelCase contract.

pub mod category;
pub mod equipment;
pub mod role;
pub mod stage;

pub use category::{Category, CategoryInput};
pub use equipment::{CreateEquipmentBatch, Equipment, EquipmentUpdate, Qr};
pub use role::{Permission, PermissionGroup, Role, RoleInput};
pub use stage::{ReorderStages, Stage, StageInput, StageOrder};
