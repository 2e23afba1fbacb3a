//! Capability keys: identifiers for protected views and menu entries.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Capability {
    /// Role and staff administration.
    Admin,
    Docs,
    Attendance,
    Facility,
    /// The default view every signed-in employee may open.
    Dashboard,
    /// A key the portal has no built-in entry for (stored upper-cased).
    Other(String),
}

impl Capability {
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().to_ascii_uppercase();
        match key.as_str() {
            "ADMIN" => Capability::Admin,
            "DOCS" => Capability::Docs,
            "ATTENDANCE" => Capability::Attendance,
            "FACILITY" => Capability::Facility,
            "DASHBOARD" => Capability::Dashboard,
            _ => Capability::Other(key),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Capability::Admin => "ADMIN",
            Capability::Docs => "DOCS",
            Capability::Attendance => "ATTENDANCE",
            Capability::Facility => "FACILITY",
            Capability::Dashboard => "DASHBOARD",
            Capability::Other(key) => key,
        }
    }
}

impl FromStr for Capability {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Capability::parse(s))
    }
}

impl From<String> for Capability {
    fn from(value: String) -> Self {
        Capability::parse(&value)
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        match value {
            Capability::Other(key) => key,
            known => known.key().to_string(),
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}
