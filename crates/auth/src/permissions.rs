use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Capability;

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "ACCOUNT.READ"). Menu
/// grants follow the `MENU.<CAPABILITY>` convention.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const MENU_PREFIX: &'static str = "MENU.";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The permission that grants a menu entry directly.
    pub fn menu(capability: &Capability) -> Self {
        Self(Cow::Owned(format!("{}{}", Self::MENU_PREFIX, capability.key())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_menu(&self) -> bool {
        self.0.starts_with(Self::MENU_PREFIX)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
