use wayfare_domain::{PermissionId, Role, RoleGrant, RoleKind};

/// Role with its grants and denials.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDetails {
    /// Role record.
    pub role: Role,
    /// Grants and explicit denials attached to the role.
    pub grants: Vec<RoleGrant>,
}

/// Input payload for creating custom roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Role audience.
    pub kind: RoleKind,
    /// Catalog permissions granted to the new role.
    pub permission_ids: Vec<PermissionId>,
}

/// Input payload for editing a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New unique name.
    pub name: String,
    /// New description.
    pub description: String,
    /// Replacement grant list. `None` keeps current grants.
    pub permission_ids: Option<Vec<PermissionId>>,
}
