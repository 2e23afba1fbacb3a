//! `wework-portal`
//!
//! **Responsibility:** client side of the employee portal.
//!
//! This crate provides:
//! - Session bootstrap, login and logout over the account service
//! - A persisted token slot (SQLite, or memory for tests)
//! - Route guarding and menu/header view models driven by `wework-auth`
//! - The "my account" edit flow with separate notification dispatch
//!
//! The account service stays the authority; this crate never decides who a
//! user is, only what the UI may show them.

pub mod config;
pub mod controller;
pub mod gateway;
pub mod notify;
pub mod profile_edit;
pub mod routes;
pub mod session_store;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::PortalConfig;
pub use controller::{AuthController, AuthError, AuthPhase, AuthSnapshot};
pub use gateway::{AccountGateway, GatewayError, HttpGateway};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier, TracingNotifier};
pub use profile_edit::{DraftError, EditMode, PasswordChange, ProfileDraft, ProfileEditor, SaveError};
pub use routes::{HeaderView, LoginView, Route, RouteDecision, guard, login_view};
pub use session_store::{MemorySessionStore, SessionStore, SqliteSessionStore};
