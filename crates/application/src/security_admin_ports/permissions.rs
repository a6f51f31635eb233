use serde_json::Value;
use wayfare_domain::PermissionId;

/// Input payload for adding a catalog permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// Protected resource name.
    pub resource: String,
    /// Action verb.
    pub action: String,
    /// Human-readable description.
    pub description: String,
    /// UI grouping category.
    pub category: String,
}

/// Input payload for attaching a grant or denial to a role.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantPermissionInput {
    /// Catalog permission.
    pub permission_id: PermissionId,
    /// `false` records an explicit denial.
    pub granted: bool,
    /// Opaque condition metadata.
    pub conditions: Option<Value>,
}
