//! Static navigation catalog, filtered per render by the authorization gate.

use crate::{Capability, Profile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub target_view: &'static str,
    pub capability: Capability,
}

pub static MENU_CATALOG: [MenuItem; 5] = [
    MenuItem {
        label: "Roles & Staff",
        target_view: "/admin",
        capability: Capability::Admin,
    },
    MenuItem {
        label: "Documents & Approvals",
        target_view: "/docs",
        capability: Capability::Docs,
    },
    MenuItem {
        label: "Attendance",
        target_view: "/attendance",
        capability: Capability::Attendance,
    },
    MenuItem {
        label: "Facility Booking",
        target_view: "/facility",
        capability: Capability::Facility,
    },
    MenuItem {
        label: "Statistics & Dashboard",
        target_view: "/dashboard",
        capability: Capability::Dashboard,
    },
];

/// Menu entries visible to `profile`, in catalog order.
pub fn visible_menu(profile: &Profile) -> Vec<&'static MenuItem> {
    MENU_CATALOG
        .iter()
        .filter(|item| profile.can_access(&item.capability))
        .collect()
}

pub fn menu_item_for(target_view: &str) -> Option<&'static MenuItem> {
    let path = target_view.trim_end_matches('/');
    MENU_CATALOG.iter().find(|item| item.target_view == path)
}
