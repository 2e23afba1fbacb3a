use serde::{Deserialize, Serialize};

/// Role marker attached to a profile.
///
/// The account service has emitted both `ROLE_SUPER_ADMIN` and `SUPER_ADMIN`
/// over time. Every spelling is resolved here, once, so call sites only ever
/// compare enum variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    SuperAdmin,
    Manager,
    /// Any role without special meaning to the portal (kept verbatim).
    Other(String),
}

impl Role {
    /// Resolve a role string from the wire. Never fails: unknown roles are kept.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let upper = trimmed.to_ascii_uppercase();
        let bare = upper.strip_prefix("ROLE_").unwrap_or(&upper);

        match bare {
            "SUPER_ADMIN" => Role::SuperAdmin,
            "MANAGER" => Role::Manager,
            _ => Role::Other(trimmed.to_string()),
        }
    }

    /// Canonical wire spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Role::SuperAdmin => "ROLE_SUPER_ADMIN",
            Role::Manager => "ROLE_MANAGER",
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::parse(value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Other(name) => name,
            marker => marker.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_super_admin_spellings_resolve() {
        assert_eq!(Role::parse("ROLE_SUPER_ADMIN"), Role::SuperAdmin);
        assert_eq!(Role::parse("SUPER_ADMIN"), Role::SuperAdmin);
        assert_eq!(Role::parse(" role_super_admin "), Role::SuperAdmin);
    }

    #[test]
    fn manager_spellings_resolve() {
        assert_eq!(Role::parse("ROLE_MANAGER"), Role::Manager);
        assert_eq!(Role::parse("MANAGER"), Role::Manager);
    }

    #[test]
    fn unknown_roles_are_kept_verbatim() {
        let role = Role::parse("ROLE_EMPLOYEE");
        assert_eq!(role, Role::Other("ROLE_EMPLOYEE".to_string()));
        assert_eq!(role.as_str(), "ROLE_EMPLOYEE");
    }

    #[test]
    fn serde_uses_canonical_spelling() {
        let roles: Vec<Role> = serde_json::from_str(r#"["SUPER_ADMIN","ROLE_MANAGER","HR"]"#).unwrap();
        assert_eq!(
            roles,
            vec![Role::SuperAdmin, Role::Manager, Role::Other("HR".to_string())]
        );
        let json = serde_json::to_string(&roles).unwrap();
        assert_eq!(json, r#"["ROLE_SUPER_ADMIN","ROLE_MANAGER","HR"]"#);
    }
}
