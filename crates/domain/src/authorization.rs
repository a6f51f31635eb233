//! Permission aggregation and the authorization decision procedure.
//!
//! Both are pure functions of their inputs. Callers rebuild the
//! [`PermissionSet`] from the store on every request so role and grant edits
//! apply to the next check.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::security::{Action, PermissionKey, ResourceName, Role, RoleGrant};

/// Role names that bypass permission checks unless configured otherwise.
pub const DEFAULT_SUPERUSER_ROLES: [&str; 2] = ["Admin", "super-admin"];

/// Effective permissions of one subject, keyed by (resource, action).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    keys: BTreeSet<PermissionKey>,
}

impl PermissionSet {
    /// Returns an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Unions the grants of every held role.
    ///
    /// A key denied by any grant is excluded even when another grant allows
    /// it. Duplicate grants collapse to one key and input order is irrelevant.
    pub fn aggregate<'a>(grants: impl IntoIterator<Item = &'a RoleGrant>) -> Self {
        let mut allowed = BTreeSet::new();
        let mut denied = BTreeSet::new();

        for grant in grants {
            let key = grant.permission.key().clone();
            if grant.granted {
                allowed.insert(key);
            } else {
                denied.insert(key);
            }
        }

        Self {
            keys: allowed.difference(&denied).cloned().collect(),
        }
    }

    /// Returns whether the exact key is present.
    #[must_use]
    pub fn contains(&self, key: &PermissionKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns whether the set allows `action` on `resource`, directly or
    /// through `manage` on the same resource.
    #[must_use]
    pub fn allows(&self, resource: &ResourceName, action: &Action) -> bool {
        self.grant_basis(resource, action).is_some()
    }

    fn grant_basis(&self, resource: &ResourceName, action: &Action) -> Option<AllowBasis> {
        if self
            .keys
            .contains(&PermissionKey::new(resource.clone(), action.clone()))
        {
            return Some(AllowBasis::Grant);
        }

        self.keys
            .contains(&PermissionKey::new(resource.clone(), Action::Manage))
            .then_some(AllowBasis::Manage)
    }

    /// Iterates keys in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionKey> {
        self.keys.iter()
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<PermissionKey> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = PermissionKey>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Why a request was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowBasis {
    /// Subject holds a superuser role.
    Superuser,
    /// Exact (resource, action) grant.
    Grant,
    /// `manage` grant on the resource.
    Manage,
}

impl AllowBasis {
    /// Returns a stable label for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superuser => "superuser",
            Self::Grant => "grant",
            Self::Manage => "manage",
        }
    }
}

/// Outcome of one authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// The request may proceed.
    Allow(AllowBasis),
    /// The request must be rejected.
    Deny,
}

impl AuthorizationDecision {
    /// Returns whether the decision allows the request.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Decides allow or deny for a subject's roles and permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionEngine {
    superuser_roles: BTreeSet<String>,
}

impl DecisionEngine {
    /// Creates an engine whose superuser override matches the given role
    /// names exactly. Blank names are ignored.
    #[must_use]
    pub fn new<I, S>(superuser_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            superuser_roles: superuser_roles
                .into_iter()
                .map(Into::into)
                .map(|name| name.trim().to_owned())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// Returns the configured superuser role names.
    pub fn superuser_roles(&self) -> impl Iterator<Item = &str> {
        self.superuser_roles.iter().map(String::as_str)
    }

    /// Returns whether any held role is a superuser role.
    ///
    /// Matching is exact and case-sensitive: `Administrator` does not match
    /// `Admin`.
    #[must_use]
    pub fn is_superuser(&self, roles: &[Role]) -> bool {
        roles
            .iter()
            .any(|role| self.superuser_roles.contains(role.name().as_str()))
    }

    /// Runs the decision procedure.
    ///
    /// The superuser check runs first and is the only bypass. Without it the
    /// request is allowed only by an exact grant or a `manage` grant on the
    /// same resource.
    #[must_use]
    pub fn authorize(
        &self,
        roles: &[Role],
        permissions: &PermissionSet,
        resource: &ResourceName,
        action: &Action,
    ) -> AuthorizationDecision {
        if self.is_superuser(roles) {
            return AuthorizationDecision::Allow(AllowBasis::Superuser);
        }

        permissions
            .grant_basis(resource, action)
            .map(AuthorizationDecision::Allow)
            .unwrap_or(AuthorizationDecision::Deny)
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SUPERUSER_ROLES)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::security::{Permission, PermissionId, RoleId, RoleKind};

    fn key(resource: &str, action: &str) -> PermissionKey {
        PermissionKey::parse(resource, action).unwrap_or_else(|_| panic!("test key"))
    }

    fn grant(role_id: RoleId, resource: &str, action: &str, granted: bool) -> RoleGrant {
        RoleGrant {
            role_id,
            permission: Permission::new(PermissionId::new(), key(resource, action), "", "test"),
            granted,
            conditions: None,
        }
    }

    fn role(name: &str) -> Role {
        Role::new(RoleId::new(), name, "", false, RoleKind::Administrative)
            .unwrap_or_else(|_| panic!("test role"))
    }

    fn resource(value: &str) -> ResourceName {
        ResourceName::new(value).unwrap_or_else(|_| panic!("test resource"))
    }

    #[test]
    fn no_roles_means_empty_set_and_deny() {
        let engine = DecisionEngine::default();
        let permissions = PermissionSet::aggregate(&Vec::<RoleGrant>::new());

        assert!(permissions.is_empty());
        for action in Action::CRUD {
            assert_eq!(
                engine.authorize(&[], &permissions, &resource("bookings"), &action),
                AuthorizationDecision::Deny
            );
        }
    }

    #[test]
    fn manage_implies_crud_on_same_resource_only() {
        let engine = DecisionEngine::default();
        let permissions =
            PermissionSet::aggregate(&[grant(RoleId::new(), "users", "manage", true)]);

        for action in Action::CRUD {
            assert_eq!(
                engine.authorize(&[], &permissions, &resource("users"), &action),
                AuthorizationDecision::Allow(AllowBasis::Manage)
            );
        }
        assert!(!permissions.allows(&resource("roles"), &Action::Read));
    }

    #[test]
    fn editor_cannot_delete_posts() {
        let editor = RoleId::new();
        let permissions = PermissionSet::aggregate(&[
            grant(editor, "posts", "create", true),
            grant(editor, "posts", "read", true),
            grant(editor, "posts", "update", true),
        ]);
        let engine = DecisionEngine::default();

        let decision = engine.authorize(
            &[role("Editor")],
            &permissions,
            &resource("posts"),
            &Action::Delete,
        );
        assert_eq!(decision, AuthorizationDecision::Deny);
        let update = engine.authorize(
            &[role("Editor")],
            &permissions,
            &resource("posts"),
            &Action::Update,
        );
        assert!(update.is_allowed());
    }

    #[test]
    fn admin_role_short_circuits_without_grants() {
        let engine = DecisionEngine::default();

        let decision = engine.authorize(
            &[role("Admin")],
            &PermissionSet::empty(),
            &resource("roles"),
            &Action::Delete,
        );
        assert_eq!(decision, AuthorizationDecision::Allow(AllowBasis::Superuser));
    }

    #[test]
    fn superuser_match_is_exact() {
        let engine = DecisionEngine::default();

        for name in ["Administrator", "admin", "super-admin-lite", "sub-Admin"] {
            assert!(!engine.is_superuser(&[role(name)]), "role name {name:?}");
        }
        assert!(engine.is_superuser(&[role("Customer"), role("super-admin")]));
    }

    #[test]
    fn explicit_denial_overrides_grant_from_other_role() {
        let permissions = PermissionSet::aggregate(&[
            grant(RoleId::new(), "payments", "read", true),
            grant(RoleId::new(), "payments", "read", false),
            grant(RoleId::new(), "payments", "create", true),
        ]);

        assert!(!permissions.contains(&key("payments", "read")));
        assert!(permissions.contains(&key("payments", "create")));
    }

    #[test]
    fn denied_manage_does_not_remove_exact_grants() {
        let permissions = PermissionSet::aggregate(&[
            grant(RoleId::new(), "reports", "manage", false),
            grant(RoleId::new(), "reports", "read", true),
        ]);

        assert!(permissions.allows(&resource("reports"), &Action::Read));
        assert!(!permissions.allows(&resource("reports"), &Action::Delete));
    }

    #[test]
    fn custom_superuser_roles_replace_defaults() {
        let engine = DecisionEngine::new(["root", " "]);

        assert_eq!(engine.superuser_roles().collect::<Vec<_>>(), vec!["root"]);
        assert!(!engine.is_superuser(&[role("Admin")]));
        assert!(engine.is_superuser(&[role("root")]));
    }

    const RESOURCES: [&str; 4] = ["users", "roles", "bookings", "payments"];
    const ACTIONS: [&str; 5] = ["create", "read", "update", "delete", "manage"];

    fn arbitrary_grants() -> impl Strategy<Value = Vec<(usize, usize, usize, bool)>> {
        proptest::collection::vec((0usize..3, 0usize..4, 0usize..5, any::<bool>()), 0..24)
    }

    fn build_grants(spec: &[(usize, usize, usize, bool)], roles: &[RoleId]) -> Vec<RoleGrant> {
        spec.iter()
            .map(|(role_index, resource_index, action_index, granted)| {
                grant(
                    roles[*role_index],
                    RESOURCES[*resource_index],
                    ACTIONS[*action_index],
                    *granted,
                )
            })
            .collect()
    }

    proptest! {
        #[test]
        fn aggregation_is_order_independent(spec in arbitrary_grants()) {
            let roles = [RoleId::new(), RoleId::new(), RoleId::new()];
            let grants = build_grants(&spec, &roles);
            let mut reversed = grants.clone();
            reversed.reverse();

            prop_assert_eq!(PermissionSet::aggregate(&grants), PermissionSet::aggregate(&reversed));
        }

        #[test]
        fn aggregation_contains_every_undenied_grant(spec in arbitrary_grants()) {
            let roles = [RoleId::new(), RoleId::new(), RoleId::new()];
            let grants = build_grants(&spec, &roles);
            let permissions = PermissionSet::aggregate(&grants);

            for grant in &grants {
                let denied = grants.iter().any(|other| {
                    !other.granted && other.permission.key() == grant.permission.key()
                });
                prop_assert_eq!(
                    permissions.contains(grant.permission.key()),
                    grant.granted && !denied
                );
            }
        }

        #[test]
        fn duplicated_grants_do_not_grow_the_set(spec in arbitrary_grants()) {
            let roles = [RoleId::new(), RoleId::new(), RoleId::new()];
            let grants = build_grants(&spec, &roles);
            let mut doubled = grants.clone();
            doubled.extend(grants.iter().cloned());

            prop_assert_eq!(
                PermissionSet::aggregate(&doubled).len(),
                PermissionSet::aggregate(&grants).len()
            );
        }
    }
}
