//! The signed-in employee's descriptive and authorization attributes.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use wework_core::{DepartmentId, DomainError, EmployeeId};

use crate::{Capability, Permission, Role, can_access};

/// Sex as recorded on the account (`M`, `F`, `O` on the wire).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "O")]
    Unspecified,
}

impl Sex {
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Unspecified => "Unspecified",
        }
    }

    /// Lenient decoding used for server data: anything unknown is unspecified.
    pub fn from_code_lenient(code: Option<&str>) -> Self {
        code.and_then(|c| c.parse().ok()).unwrap_or_default()
    }
}

impl core::str::FromStr for Sex {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" | "m" => Ok(Sex::Male),
            "F" | "f" => Ok(Sex::Female),
            "O" | "o" => Ok(Sex::Unspecified),
            other => Err(DomainError::unknown_code(format!("sex code '{other}'"))),
        }
    }
}

impl core::fmt::Display for Sex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Profile returned by `GET /api/account/me`.
///
/// Every fetch yields a complete replacement; nothing is merged field-wise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "empId")]
    pub employee_id: EmployeeId,
    pub name: String,
    #[serde(rename = "deptName", default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    pub login_id: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_sex")]
    pub sex: Sex,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    #[serde(default)]
    pub permissions: Option<BTreeSet<Permission>>,
}

impl Profile {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn can_access(&self, capability: &Capability) -> bool {
        can_access(capability, &self.roles, self.permissions.as_ref())
    }

    /// `"<department> | <position>"`, with `-` for whichever is missing.
    pub fn affiliation(&self) -> String {
        format!(
            "{} | {}",
            self.department.as_deref().unwrap_or("-"),
            self.position.as_deref().unwrap_or("-")
        )
    }
}

/// Roles, permissions and department scopes from `GET /api/account/me/auth`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyAuthorities {
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    #[serde(rename = "permission", default)]
    pub permissions: BTreeSet<Permission>,
    #[serde(default)]
    pub scope_dept_ids: Vec<DepartmentId>,
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn lenient_sex<'de, D>(deserializer: D) -> Result<Sex, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(Sex::from_code_lenient(raw.as_deref()))
}
