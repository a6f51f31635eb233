mod permissions;
mod repositories;
mod roles;

pub use permissions::{CreatePermissionInput, GrantPermissionInput};
pub use repositories::SecurityAdminRepository;
pub use roles::{CreateRoleInput, RoleDetails, UpdateRoleInput};
