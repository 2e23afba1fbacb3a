use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::{Capability, Permission, Profile, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: no access to '{0}'")]
    Forbidden(String),
}

/// The rule of the whitelist cascade that granted access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRule {
    SuperAdmin,
    MenuPermission,
    ManagerRole,
    DefaultDashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "rule")]
pub enum AccessDecision {
    Allowed(AccessRule),
    Denied,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed(_))
    }
}

/// Evaluate the whitelist cascade and report which rule decided.
///
/// First match wins; falling through every rule is an implicit deny:
/// 1. super-admin role
/// 2. explicit `MENU.<KEY>` permission
/// 3. manager role (everything except `ADMIN`)
/// 4. dashboard only
pub fn explain_access(
    capability: &Capability,
    roles: &BTreeSet<Role>,
    permissions: Option<&BTreeSet<Permission>>,
) -> AccessDecision {
    if roles.contains(&Role::SuperAdmin) {
        return AccessDecision::Allowed(AccessRule::SuperAdmin);
    }

    if let Some(perms) = permissions {
        if perms.contains(&Permission::menu(capability)) {
            return AccessDecision::Allowed(AccessRule::MenuPermission);
        }
    }

    if roles.contains(&Role::Manager) {
        return if *capability == Capability::Admin {
            AccessDecision::Denied
        } else {
            AccessDecision::Allowed(AccessRule::ManagerRole)
        };
    }

    if *capability == Capability::Dashboard {
        AccessDecision::Allowed(AccessRule::DefaultDashboard)
    } else {
        AccessDecision::Denied
    }
}

/// Pure gate used for both menu filtering and route protection.
pub fn can_access(
    capability: &Capability,
    roles: &BTreeSet<Role>,
    permissions: Option<&BTreeSet<Permission>>,
) -> bool {
    explain_access(capability, roles, permissions).is_allowed()
}

/// Authorize a signed-in profile for a capability.
///
/// - No IO
/// - No panics
pub fn authorize(profile: &Profile, capability: &Capability) -> Result<AccessRule, AuthzError> {
    match explain_access(capability, &profile.roles, profile.permissions.as_ref()) {
        AccessDecision::Allowed(rule) => Ok(rule),
        AccessDecision::Denied => {
            tracing::debug!(
                employee_id = %profile.employee_id,
                capability = %capability,
                "access denied"
            );
            Err(AuthzError::Forbidden(capability.key().to_string()))
        }
    }
}
