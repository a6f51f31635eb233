use std::sync::Arc;

use wayfare_core::AppError;
use wayfare_domain::{AuditAction, DecisionEngine, RoleKind, UserId, UserStatus};

use crate::security_admin_ports::{
    CreatePermissionInput, CreateRoleInput, GrantPermissionInput, UpdateRoleInput,
};
use crate::test_support::{FakeAccessStore, FakeAuditRepository, FakeCredentials, token_for};
use crate::{AccessRepository, AuthContext, AuthorizationService};

use super::SecurityAdminService;

struct Harness {
    store: Arc<FakeAccessStore>,
    audit: Arc<FakeAuditRepository>,
    authorization: AuthorizationService,
    service: SecurityAdminService,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(FakeAccessStore::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let authorization = AuthorizationService::new(
            Arc::new(FakeCredentials),
            store.clone(),
            DecisionEngine::default(),
        );
        let service = SecurityAdminService::new(
            authorization.clone(),
            store.clone(),
            store.clone(),
            audit.clone(),
        );

        Self {
            store,
            audit,
            authorization,
            service,
        }
    }

    async fn actor_with_role(&self, role_name: &str) -> (UserId, AuthContext) {
        let user_id = self
            .store
            .add_user(&format!("{}@example.com", role_name.to_lowercase()), UserStatus::Active)
            .await;
        self.store.assign(user_id, role_name).await;
        (user_id, self.context(user_id).await)
    }

    async fn context(&self, user_id: UserId) -> AuthContext {
        self.authorization
            .authenticate(&token_for(user_id))
            .await
            .unwrap_or_else(|_| panic!("test"))
    }

    async fn audit_actions(&self) -> Vec<AuditAction> {
        self.audit
            .events
            .lock()
            .await
            .iter()
            .map(|event| event.action)
            .collect()
    }
}

#[tokio::test]
async fn admin_creates_role_with_grants_and_audits() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    let read = harness.store.add_permission("bookings:read").await;

    let role = harness
        .service
        .create_role(
            &admin,
            CreateRoleInput {
                name: "  Trip Planner ".to_owned(),
                description: "Plans itineraries".to_owned(),
                kind: RoleKind::External,
                permission_ids: vec![read.id()],
            },
        )
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(role.name().as_str(), "Trip Planner");
    let details = harness
        .service
        .get_role(&admin, role.id())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(details.grants.len(), 1);
    assert_eq!(harness.audit_actions().await, vec![AuditAction::RoleCreated]);
}

#[tokio::test]
async fn reader_cannot_create_roles() {
    let harness = Harness::new();
    harness.store.grant("Auditor", "roles:read", true).await;
    let (_, auditor) = harness.actor_with_role("Auditor").await;

    assert!(harness.service.list_roles(&auditor).await.is_ok());
    let result = harness
        .service
        .create_role(
            &auditor,
            CreateRoleInput {
                name: "Shadow".to_owned(),
                description: String::new(),
                kind: RoleKind::Administrative,
                permission_ids: Vec::new(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(harness.audit_actions().await.is_empty());
}

#[tokio::test]
async fn system_roles_cannot_be_deleted() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    let customer = harness.store.add_system_role("Customer").await;

    let result = harness.service.delete_role(&admin, customer).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn deleting_role_removes_grants_and_assignments() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    harness.store.grant("Seasonal", "activities:read", true).await;
    let member = harness
        .store
        .add_user("temp@example.com", UserStatus::Active)
        .await;
    harness.store.assign(member, "Seasonal").await;
    let seasonal = harness.store.role_id("Seasonal").await;
    let grants_before = harness.store.grant_count().await;
    let assignments_before = harness.store.assignment_count().await;

    harness
        .service
        .delete_role(&admin, seasonal)
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(harness.store.grant_count().await, grants_before - 1);
    assert_eq!(harness.store.assignment_count().await, assignments_before - 1);
    let roles = harness
        .store
        .list_roles_for_user(member)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(roles.is_empty());
    assert_eq!(harness.audit_actions().await, vec![AuditAction::RoleDeleted]);
}

#[tokio::test]
async fn cloned_role_copies_grants() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    harness.store.grant("Editor", "content:manage", true).await;
    harness.store.grant("Editor", "users:read", true).await;
    let editor = harness.store.role_id("Editor").await;

    let copy = harness
        .service
        .clone_role(&admin, editor, "Senior Editor")
        .await
        .unwrap_or_else(|_| panic!("test"));

    let grants = harness
        .service
        .list_role_permissions(&admin, copy.id())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(grants.len(), 2);
    assert!(!copy.is_system());
}

#[tokio::test]
async fn update_replaces_grants_when_ids_given() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    harness.store.grant("Author", "content:create", true).await;
    let author = harness.store.role_id("Author").await;
    let read = harness.store.add_permission("content:read").await;

    let role = harness
        .service
        .update_role(
            &admin,
            author,
            UpdateRoleInput {
                name: "Writer".to_owned(),
                description: "Writes articles".to_owned(),
                permission_ids: Some(vec![read.id()]),
            },
        )
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(role.name().as_str(), "Writer");
    let grants = harness
        .service
        .list_role_permissions(&admin, author)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].permission.id(), read.id());
}

#[tokio::test]
async fn explicit_denial_takes_effect_for_members() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    harness.store.grant("Support", "bookings:read", true).await;
    let (member, _) = harness.actor_with_role("Support").await;
    let restricted = harness.store.role_id("Restricted").await;
    let bookings_read = harness.store.add_permission("bookings:read").await;
    harness.store.assign(member, "Restricted").await;

    harness
        .service
        .grant_permission(
            &admin,
            restricted,
            GrantPermissionInput {
                permission_id: bookings_read.id(),
                granted: false,
                conditions: None,
            },
        )
        .await
        .unwrap_or_else(|_| panic!("test"));

    let context = harness.context(member).await;
    let key = "bookings:read".parse().unwrap_or_else(|_| panic!("test"));
    assert!(!context.permissions().contains(&key));
    assert_eq!(
        harness.audit_actions().await,
        vec![AuditAction::RolePermissionGranted]
    );
}

#[tokio::test]
async fn duplicate_permission_conflicts() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    let input = CreatePermissionInput {
        resource: "reports".to_owned(),
        action: "export".to_owned(),
        description: "Export reports".to_owned(),
        category: "finance".to_owned(),
    };

    let created = harness
        .service
        .create_permission(&admin, input.clone())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(created.name(), "reports:export");

    let result = harness.service.create_permission(&admin, input).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn invalid_permission_parts_are_rejected() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;

    let result = harness
        .service
        .create_permission(
            &admin,
            CreatePermissionInput {
                resource: "*".to_owned(),
                action: "*".to_owned(),
                description: String::new(),
                category: String::new(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn assignment_requires_existing_user_and_role() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    let editor = harness.store.role_id("Editor").await;

    let missing_user = harness
        .service
        .assign_role(&admin, UserId::new(), editor)
        .await;
    assert!(matches!(missing_user, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn assign_and_revoke_round_trip() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    let member = harness
        .store
        .add_user("guide@example.com", UserStatus::Active)
        .await;
    let expert = harness.store.role_id("Local Expert").await;

    harness
        .service
        .assign_role(&admin, member, expert)
        .await
        .unwrap_or_else(|_| panic!("test"));
    harness
        .service
        .assign_role(&admin, member, expert)
        .await
        .unwrap_or_else(|_| panic!("test"));
    let roles = harness
        .service
        .list_user_roles(&admin, member)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(roles.len(), 1);

    harness
        .service
        .revoke_role(&admin, member, expert)
        .await
        .unwrap_or_else(|_| panic!("test"));
    let roles = harness
        .service
        .list_user_roles(&admin, member)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(roles.is_empty());
    assert_eq!(
        harness.audit_actions().await,
        vec![
            AuditAction::UserRoleAssigned,
            AuditAction::UserRoleAssigned,
            AuditAction::UserRoleRevoked,
        ]
    );
}

#[tokio::test]
async fn system_roles_cannot_be_renamed() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    let customer = harness.store.add_system_role("Customer").await;

    let renamed = harness
        .service
        .update_role(
            &admin,
            customer,
            UpdateRoleInput {
                name: "Guest".to_owned(),
                description: String::new(),
                permission_ids: None,
            },
        )
        .await;
    assert!(matches!(renamed, Err(AppError::Conflict(_))));

    let described = harness
        .service
        .update_role(
            &admin,
            customer,
            UpdateRoleInput {
                name: " Customer ".to_owned(),
                description: "Books trips".to_owned(),
                permission_ids: None,
            },
        )
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(described.description(), "Books trips");
}

#[tokio::test]
async fn role_manager_cannot_rename_own_role_to_superuser_name() {
    let harness = Harness::new();
    harness.store.grant("Role Manager", "roles:update", true).await;
    let (manager_id, manager) = harness.actor_with_role("Role Manager").await;
    let own_role = harness.store.role_id("Role Manager").await;

    let result = harness
        .service
        .update_role(
            &manager,
            own_role,
            UpdateRoleInput {
                name: "super-admin".to_owned(),
                description: String::new(),
                permission_ids: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    let refreshed = harness.context(manager_id).await;
    assert!(!harness.authorization.is_superuser(&refreshed));
    assert!(harness.audit_actions().await.is_empty());
}

#[tokio::test]
async fn role_manager_cannot_create_or_clone_superuser_names() {
    let harness = Harness::new();
    harness.store.grant("Role Manager", "roles:create", true).await;
    let (_, manager) = harness.actor_with_role("Role Manager").await;
    let own_role = harness.store.role_id("Role Manager").await;

    let created = harness
        .service
        .create_role(
            &manager,
            CreateRoleInput {
                name: " Admin ".to_owned(),
                description: String::new(),
                kind: RoleKind::Administrative,
                permission_ids: Vec::new(),
            },
        )
        .await;
    assert!(matches!(created, Err(AppError::Forbidden(_))));

    let cloned = harness
        .service
        .clone_role(&manager, own_role, "super-admin")
        .await;
    assert!(matches!(cloned, Err(AppError::Forbidden(_))));

    let ordinary = harness
        .service
        .clone_role(&manager, own_role, "Admin Assistant")
        .await;
    assert!(ordinary.is_ok());
}

#[tokio::test]
async fn user_manager_cannot_assign_superuser_role_to_self() {
    let harness = Harness::new();
    harness.store.grant("User Manager", "users:update", true).await;
    let (manager_id, manager) = harness.actor_with_role("User Manager").await;
    let admin_role = harness.store.add_system_role("Admin").await;

    let result = harness
        .service
        .assign_role(&manager, manager_id, admin_role)
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    let roles = harness
        .store
        .list_roles_for_user(manager_id)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(roles.len(), 1);
    assert!(harness.audit_actions().await.is_empty());
}

#[tokio::test]
async fn superuser_may_assign_and_revoke_superuser_roles() {
    let harness = Harness::new();
    let (_, admin) = harness.actor_with_role("Admin").await;
    let admin_role = harness.store.role_id("Admin").await;
    let member = harness
        .store
        .add_user("ops@example.com", UserStatus::Active)
        .await;

    harness
        .service
        .assign_role(&admin, member, admin_role)
        .await
        .unwrap_or_else(|_| panic!("test"));
    let promoted = harness.context(member).await;
    assert!(harness.authorization.is_superuser(&promoted));

    harness
        .service
        .revoke_role(&admin, member, admin_role)
        .await
        .unwrap_or_else(|_| panic!("test"));
    let demoted = harness.context(member).await;
    assert!(!harness.authorization.is_superuser(&demoted));
}
