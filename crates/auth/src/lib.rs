//! `wework-auth` — pure authorization boundary for the portal.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows the
//! role/permission vocabulary, the signed-in [`Profile`], and how a profile
//! maps onto the capabilities (views and menu entries) it may reach.

pub mod authorize;
pub mod capability;
pub mod menu;
pub mod permissions;
pub mod profile;
pub mod roles;

pub use authorize::{AccessDecision, AccessRule, AuthzError, authorize, can_access, explain_access};
pub use capability::Capability;
pub use menu::{MENU_CATALOG, MenuItem, menu_item_for, visible_menu};
pub use permissions::Permission;
pub use profile::{MyAuthorities, Profile, Sex};
pub use roles::Role;
