//! Equipment list paging and search parameters.

use serde::{Deserialize, Serialize};

use crate::models::Equipment;

/// Default page size for the equipment table.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size the console will request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query string for `GET /api/equipments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for EquipmentQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl EquipmentQuery {
    /// Clamp page and limit into range and drop a blank search term.
    pub fn normalized(&self) -> Self {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
            search,
        }
    }
}

/// One page of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPage {
    pub data: Vec<Equipment>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn first_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl EquipmentPage {
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

/// The list endpoint answers with a page envelope, or with a bare array
/// (including the `[]` substituted for an upstream 404).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EquipmentListBody {
    Paged(EquipmentPage),
    Bare(Vec<Equipment>),
}

impl EquipmentListBody {
    pub fn into_page(self, query: &EquipmentQuery) -> EquipmentPage {
        match self {
            Self::Paged(page) => page,
            Self::Bare(data) => EquipmentPage {
                total: data.len() as u64,
                data,
                page: query.page,
                limit: query.limit,
            },
        }
    }
}
