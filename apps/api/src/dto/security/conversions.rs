use wayfare_application::RoleDetails;
use wayfare_domain::{Permission, Role, RoleGrant};

use super::{PermissionResponse, RoleDetailsResponse, RoleGrantResponse, RoleResponse};

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            description: value.description().to_owned(),
            is_system: value.is_system(),
            kind: value.kind().as_str().to_owned(),
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            permission_id: value.id().to_string(),
            name: value.name(),
            resource: value.key().resource().as_str().to_owned(),
            action: value.key().action().as_str().to_owned(),
            description: value.description().to_owned(),
            category: value.category().to_owned(),
        }
    }
}

impl From<RoleGrant> for RoleGrantResponse {
    fn from(value: RoleGrant) -> Self {
        Self {
            permission: PermissionResponse::from(value.permission),
            granted: value.granted,
            conditions: value.conditions,
        }
    }
}

impl From<RoleDetails> for RoleDetailsResponse {
    fn from(value: RoleDetails) -> Self {
        Self {
            role: RoleResponse::from(value.role),
            grants: value
                .grants
                .into_iter()
                .map(RoleGrantResponse::from)
                .collect(),
        }
    }
}
