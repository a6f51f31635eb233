//! Built-in roles and permissions.
//!
//! Mirrors the seed migration so the in-memory store starts from the same
//! catalog as a fresh database.

use wayfare_domain::RoleKind;

/// Protected resources with their UI category.
pub(crate) const SEED_RESOURCES: [(&str, &str); 10] = [
    ("users", "security"),
    ("roles", "security"),
    ("permissions", "security"),
    ("content", "content"),
    ("activities", "catalog"),
    ("accommodations", "catalog"),
    ("bookings", "operations"),
    ("payments", "finance"),
    ("reports", "finance"),
    ("support", "support"),
];

/// Actions seeded for every resource.
pub(crate) const SEED_ACTIONS: [&str; 5] = ["create", "read", "update", "delete", "manage"];

/// System roles. `Admin` relies on the superuser override and holds no grants.
pub(crate) const SEED_ROLES: [(&str, &str, RoleKind); 9] = [
    ("Admin", "Full platform access", RoleKind::Administrative),
    ("Editor", "Manages editorial content", RoleKind::Administrative),
    ("Author", "Writes editorial content", RoleKind::Administrative),
    (
        "Accountant",
        "Handles payments and financial reports",
        RoleKind::Administrative,
    ),
    (
        "Customer Support",
        "Assists customers with bookings",
        RoleKind::Administrative,
    ),
    (
        "Local Expert",
        "Curates local activities and stays",
        RoleKind::External,
    ),
    ("Activity Supplier", "Publishes activities", RoleKind::External),
    (
        "Accommodation Supplier",
        "Publishes accommodations",
        RoleKind::External,
    ),
    ("Customer", "Books trips", RoleKind::External),
];

/// Role grants as (role, resource, action).
pub(crate) const SEED_GRANTS: [(&str, &str, &str); 22] = [
    ("Editor", "content", "manage"),
    ("Editor", "users", "read"),
    ("Editor", "roles", "read"),
    ("Author", "content", "create"),
    ("Author", "content", "read"),
    ("Author", "content", "update"),
    ("Accountant", "payments", "manage"),
    ("Accountant", "reports", "manage"),
    ("Accountant", "bookings", "read"),
    ("Customer Support", "support", "manage"),
    ("Customer Support", "users", "read"),
    ("Customer Support", "bookings", "read"),
    ("Customer Support", "activities", "read"),
    ("Customer Support", "accommodations", "read"),
    ("Local Expert", "activities", "read"),
    ("Local Expert", "accommodations", "read"),
    ("Local Expert", "content", "read"),
    ("Activity Supplier", "activities", "manage"),
    ("Accommodation Supplier", "accommodations", "manage"),
    ("Customer", "activities", "read"),
    ("Customer", "accommodations", "read"),
    ("Customer", "bookings", "create"),
];

/// Builds the `Create users` style description used by the seed.
pub(crate) fn seed_description(resource: &str, action: &str) -> String {
    let mut characters = action.chars();
    let capitalized = characters
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + characters.as_str())
        .unwrap_or_default();

    format!("{capitalized} {resource}")
}
