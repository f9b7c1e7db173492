//! Derivation of a role's `permissionsGroups` from a flat set of selected
//! permission codes.
//!
//! The role form tracks a set of checked codes; the backend stores the
//! grouped shape. The catalog (from `GET /api/permissions`) defines both the
//! grouping and the order.

use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::models::PermissionGroup;

/// Build the grouped representation of `selected` against `catalog`.
///
/// Catalog order is preserved, groups with no selected permission are
/// dropped, and any selected code missing from the catalog is rejected.
pub fn group_selected(
    selected: &BTreeSet<String>,
    catalog: &[PermissionGroup],
) -> Result<Vec<PermissionGroup>, CoreError> {
    let known: BTreeSet<&str> = catalog
        .iter()
        .flat_map(|g| g.permissions.iter().map(|p| p.code.as_str()))
        .collect();

    let unknown: Vec<&str> = selected
        .iter()
        .map(String::as_str)
        .filter(|code| !known.contains(code))
        .collect();
    if !unknown.is_empty() {
        return Err(CoreError::Validation(format!(
            "Unknown permission codes: {}",
            unknown.join(", ")
        )));
    }

    Ok(catalog
        .iter()
        .filter_map(|group| {
            let permissions: Vec<_> = group
                .permissions
                .iter()
                .filter(|p| selected.contains(&p.code))
                .cloned()
                .collect();
            (!permissions.is_empty()).then(|| PermissionGroup {
                group: group.group.clone(),
                permissions,
            })
        })
        .collect())
}

/// Flatten grouped permissions back into the set of codes (for edit forms).
pub fn selected_codes(groups: &[PermissionGroup]) -> BTreeSet<String> {
    groups
        .iter()
        .flat_map(|g| g.permissions.iter().map(|p| p.code.clone()))
        .collect()
}

/// Group-level checkbox: select every code of `group` unless all are
/// already selected, in which case deselect them all.
pub fn toggle_group(selected: &mut BTreeSet<String>, group: &PermissionGroup) {
    let all_selected = group
        .permissions
        .iter()
        .all(|p| selected.contains(&p.code));

    for permission in &group.permissions {
        if all_selected {
            selected.remove(&permission.code);
        } else {
            selected.insert(permission.code.clone());
        }
    }
}
