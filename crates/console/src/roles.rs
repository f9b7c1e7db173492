//! Role form state: permission checkboxes over the catalog.

use std::collections::BTreeSet;

use medinv_core::error::CoreError;
use medinv_core::models::{PermissionGroup, Role, RoleInput};
use medinv_core::permissions;

use crate::api::ConsoleApi;
use crate::error::ConsoleResult;

/// Tri-state of a group-level checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCheck {
    All,
    Partial,
    None,
}

#[derive(Debug, Clone)]
pub struct RoleForm {
    catalog: Vec<PermissionGroup>,
    pub name: String,
    pub description: Option<String>,
    selected: BTreeSet<String>,
}

impl RoleForm {
    /// Empty form for a new role.
    pub fn new(catalog: Vec<PermissionGroup>) -> Self {
        Self {
            catalog,
            name: String::new(),
            description: None,
            selected: BTreeSet::new(),
        }
    }

    /// Form for a new role, with the catalog fetched from the proxy.
    pub async fn load<A: ConsoleApi>(api: &A) -> ConsoleResult<Self> {
        Ok(Self::new(api.list_permissions().await?))
    }

    /// Form pre-filled from an existing role.
    pub fn edit(catalog: Vec<PermissionGroup>, role: &Role) -> Self {
        Self {
            catalog,
            name: role.name.clone(),
            description: role.description.clone(),
            selected: permissions::selected_codes(&role.permissions_groups),
        }
    }

    pub fn catalog(&self) -> &[PermissionGroup] {
        &self.catalog
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.contains(code)
    }

    /// Flip one permission checkbox.
    pub fn toggle(&mut self, code: &str) -> ConsoleResult<()> {
        let known = self
            .catalog
            .iter()
            .any(|g| g.permissions.iter().any(|p| p.code == code));
        if !known {
            return Err(CoreError::Validation(format!("Unknown permission code: {code}")).into());
        }
        if !self.selected.remove(code) {
            self.selected.insert(code.to_string());
        }
        Ok(())
    }

    /// Flip a whole group: select all unless all are already selected.
    pub fn toggle_group(&mut self, group: &str) -> ConsoleResult<()> {
        let group = self.find_group(group)?.clone();
        permissions::toggle_group(&mut self.selected, &group);
        Ok(())
    }

    pub fn group_check(&self, group: &str) -> ConsoleResult<GroupCheck> {
        let group = self.find_group(group)?;
        let count = group
            .permissions
            .iter()
            .filter(|p| self.selected.contains(&p.code))
            .count();
        Ok(match count {
            0 => GroupCheck::None,
            n if n == group.permissions.len() => GroupCheck::All,
            _ => GroupCheck::Partial,
        })
    }

    /// The create/update payload, with permissions grouped in catalog order.
    pub fn to_input(&self) -> ConsoleResult<RoleInput> {
        Ok(RoleInput {
            name: self.name.trim().to_string(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            permissions_groups: permissions::group_selected(&self.selected, &self.catalog)?,
        })
    }

    fn find_group(&self, group: &str) -> ConsoleResult<&PermissionGroup> {
        self.catalog
            .iter()
            .find(|g| g.group == group)
            .ok_or_else(|| CoreError::Validation(format!("Unknown permission group: {group}")).into())
    }
}
