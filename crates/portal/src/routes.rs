//! Route table, access guard and the view models the shell renders.

use std::time::Duration;

use serde::Serialize;

use wework_auth::{Capability, MENU_CATALOG, MenuItem, authorize, visible_menu};

use crate::controller::AuthSnapshot;
use crate::types::Profile;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const ACCOUNT_PATH: &str = "/account/me";

/// Shown for any failed login, whatever the cause.
pub const LOGIN_ERROR_MESSAGE: &str = "Check your login ID or password.";

/// How long the "already signed in" notice stays before redirecting home.
pub const ALREADY_SIGNED_IN_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Capability(Capability),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub access: Access,
}

impl Route {
    /// Resolve a path. Unknown paths fall back to home.
    pub fn resolve(path: &str) -> Route {
        let trimmed = match path.trim_end_matches('/') {
            "" => HOME_PATH,
            p => p,
        };
        match trimmed {
            LOGIN_PATH => Route {
                path: LOGIN_PATH,
                access: Access::Public,
            },
            ACCOUNT_PATH => Route {
                path: ACCOUNT_PATH,
                access: Access::Authenticated,
            },
            _ => match wework_auth::menu_item_for(trimmed) {
                Some(item) => Route::for_menu(item),
                None => Route::home(),
            },
        }
    }

    pub fn home() -> Route {
        Route {
            path: HOME_PATH,
            access: Access::Authenticated,
        }
    }

    fn for_menu(item: &'static MenuItem) -> Route {
        Route {
            path: item.target_view,
            access: Access::Capability(item.capability.clone()),
        }
    }

    /// Every routable path.
    pub fn table() -> Vec<Route> {
        let mut routes = vec![
            Route {
                path: LOGIN_PATH,
                access: Access::Public,
            },
            Route::home(),
            Route {
                path: ACCOUNT_PATH,
                access: Access::Authenticated,
            },
        ];
        routes.extend(MENU_CATALOG.iter().map(Route::for_menu));
        routes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session state is still settling; render nothing yet.
    Pending,
    Redirect(&'static str),
    Render,
}

pub fn guard(snapshot: &AuthSnapshot, route: &Route) -> RouteDecision {
    if route.access == Access::Public {
        return RouteDecision::Render;
    }

    let Some(profile) = snapshot.profile.as_deref() else {
        return if snapshot.is_pending() {
            RouteDecision::Pending
        } else {
            RouteDecision::Redirect(LOGIN_PATH)
        };
    };

    match &route.access {
        Access::Capability(capability) => match authorize(profile, capability) {
            Ok(_) => RouteDecision::Render,
            Err(_) => RouteDecision::Redirect(HOME_PATH),
        },
        _ => RouteDecision::Render,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginView {
    Pending,
    Form,
    AlreadySignedIn {
        redirect_to: &'static str,
        after: Duration,
    },
}

pub fn login_view(snapshot: &AuthSnapshot) -> LoginView {
    if snapshot.is_loading() {
        LoginView::Pending
    } else if snapshot.is_authenticated() {
        LoginView::AlreadySignedIn {
            redirect_to: HOME_PATH,
            after: ALREADY_SIGNED_IN_DELAY,
        }
    } else {
        LoginView::Form
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub label: &'static str,
    pub path: &'static str,
}

/// Header bar: who is signed in and where they may go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub display_name: String,
    pub affiliation: String,
    pub menu: Vec<MenuEntry>,
}

impl HeaderView {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            display_name: profile.name.clone(),
            affiliation: profile.affiliation(),
            menu: visible_menu(profile)
                .into_iter()
                .map(|item| MenuEntry {
                    label: item.label,
                    path: item.target_view,
                })
                .collect(),
        }
    }
}
