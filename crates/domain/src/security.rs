use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use wayfare_core::{AppError, AppResult, NonEmptyString};

/// Unique identifier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for a catalog permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionId(Uuid);

impl PermissionId {
    /// Creates a random permission identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a permission identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lowercase token used for resource and action names.
fn validate_token(kind: &str, value: &str) -> AppResult<()> {
    if value.is_empty() || value.len() > 64 {
        return Err(AppError::Validation(format!(
            "{kind} must contain between 1 and 64 characters"
        )));
    }

    let valid = value.chars().all(|character| {
        character.is_ascii_lowercase()
            || character.is_ascii_digit()
            || matches!(character, '_' | '-')
    });
    if !valid {
        return Err(AppError::Validation(format!(
            "{kind} '{value}' may only contain lowercase letters, digits, '_' and '-'"
        )));
    }

    Ok(())
}

/// Name of a protected resource such as `users` or `bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Creates a validated resource name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_lowercase();
        validate_token("resource", value.as_str())?;
        Ok(Self(value))
    }

    /// Returns the resource name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ResourceName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceName> for String {
    fn from(value: ResourceName) -> Self {
        value.0
    }
}

impl Display for ResourceName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Verb performed on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    /// Create new instances of the resource.
    Create,
    /// Read instances of the resource.
    Read,
    /// Modify existing instances.
    Update,
    /// Remove instances.
    Delete,
    /// Every action on the resource.
    Manage,
    /// Any other verb, such as `access` or `export`.
    Custom(String),
}

impl Action {
    /// The standard verbs subsumed by [`Action::Manage`].
    pub const CRUD: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Manage => "manage",
            Self::Custom(value) => value.as_str(),
        }
    }

    /// Returns whether this is the `manage` wildcard.
    #[must_use]
    pub fn is_manage(&self) -> bool {
        matches!(self, Self::Manage)
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "manage" => Ok(Self::Manage),
            other => {
                validate_token("action", other)?;
                Ok(Self::Custom(normalized))
            }
        }
    }
}

impl TryFrom<String> for Action {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<Action> for String {
    fn from(value: Action) -> Self {
        value.as_str().to_owned()
    }
}

impl Display for Action {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Canonical permission key: one action on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionKey {
    resource: ResourceName,
    action: Action,
}

impl PermissionKey {
    /// Creates a key from validated parts.
    #[must_use]
    pub fn new(resource: ResourceName, action: Action) -> Self {
        Self { resource, action }
    }

    /// Parses and validates both parts.
    pub fn parse(resource: &str, action: &str) -> AppResult<Self> {
        Ok(Self::new(ResourceName::new(resource)?, Action::from_str(action)?))
    }

    /// Returns the resource part.
    #[must_use]
    pub fn resource(&self) -> &ResourceName {
        &self.resource
    }

    /// Returns the action part.
    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }
}

impl Display for PermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.resource, self.action)
    }
}

impl FromStr for PermissionKey {
    type Err = AppError;

    /// Parses the `resource:action` label form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (resource, action) = value.split_once(':').ok_or_else(|| {
            AppError::Validation(format!(
                "permission '{value}' must use the 'resource:action' form"
            ))
        })?;
        Self::parse(resource, action)
    }
}

/// Catalog permission with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    key: PermissionKey,
    description: String,
    category: String,
}

impl Permission {
    /// Creates a catalog permission.
    #[must_use]
    pub fn new(
        id: PermissionId,
        key: PermissionKey,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            key,
            description: description.into(),
            category: category.into(),
        }
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the canonical key.
    #[must_use]
    pub fn key(&self) -> &PermissionKey {
        &self.key
    }

    /// Returns the `resource:action` label.
    #[must_use]
    pub fn name(&self) -> String {
        self.key.to_string()
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the UI grouping category.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }
}

/// Audience a role is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Staff and back-office roles.
    Administrative,
    /// Customer-facing and supplier roles.
    External,
}

impl RoleKind {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrative => "administrative",
            Self::External => "external",
        }
    }
}

impl FromStr for RoleKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "administrative" => Ok(Self::Administrative),
            "external" => Ok(Self::External),
            _ => Err(AppError::Validation(format!("unknown role kind '{value}'"))),
        }
    }
}

/// Named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: String,
    is_system: bool,
    kind: RoleKind,
}

impl Role {
    /// Creates a role with a validated name.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
        is_system: bool,
        kind: RoleKind,
    ) -> AppResult<Self> {
        let name = name.into();
        Ok(Self {
            id,
            name: NonEmptyString::new(name.trim())?,
            description: description.into(),
            is_system,
            kind,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the role description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// System roles may be cloned but never deleted or renamed.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// Returns the role audience.
    #[must_use]
    pub fn kind(&self) -> RoleKind {
        self.kind
    }
}

/// Grant linking a role to a permission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Role holding the grant.
    pub role_id: RoleId,
    /// Granted (or denied) permission.
    pub permission: Permission,
    /// `false` marks an explicit denial.
    pub granted: bool,
    /// Opaque condition metadata. Stored, never evaluated.
    pub conditions: Option<Value>,
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A role was created.
    RoleCreated,
    /// A role was cloned from another role.
    RoleCloned,
    /// A role was renamed or its permission set replaced.
    RoleUpdated,
    /// A role was deleted with its grants and assignments.
    RoleDeleted,
    /// A catalog permission was created.
    PermissionCreated,
    /// A catalog permission was deleted.
    PermissionDeleted,
    /// A grant or denial was attached to a role.
    RolePermissionGranted,
    /// A grant was removed from a role.
    RolePermissionRevoked,
    /// A role was assigned to a user.
    UserRoleAssigned,
    /// A role assignment was revoked.
    UserRoleRevoked,
    /// A user account status changed.
    UserStatusChanged,
    /// A new account registered.
    UserRegistered,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleCreated => "security.role.created",
            Self::RoleCloned => "security.role.cloned",
            Self::RoleUpdated => "security.role.updated",
            Self::RoleDeleted => "security.role.deleted",
            Self::PermissionCreated => "security.permission.created",
            Self::PermissionDeleted => "security.permission.deleted",
            Self::RolePermissionGranted => "security.role_permission.granted",
            Self::RolePermissionRevoked => "security.role_permission.revoked",
            Self::UserRoleAssigned => "security.user_role.assigned",
            Self::UserRoleRevoked => "security.user_role.revoked",
            Self::UserStatusChanged => "identity.user.status_changed",
            Self::UserRegistered => "identity.user.registered",
        }
    }
}
