//! Navigation Shell
//!
//! One sidebar/header description shared by every protected page, plus the
//! plain accept/cancel confirmation used for logout. The web templates and
//! the CLI header both render from these.

use crate::preferences::Theme;

/// Protected pages reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Users,
    Analytics,
    Products,
}

impl Route {
    /// Sidebar order
    pub const ALL: [Route; 4] = [Route::Dashboard, Route::Users, Route::Analytics, Route::Products];

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::Users => "/users",
            Route::Analytics => "/analytics",
            Route::Products => "/products",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Users => "Users",
            Route::Analytics => "Analytics",
            Route::Products => "Products",
        }
    }

    /// Route owning a request path (`/products/7` belongs to Products)
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        Route::ALL.into_iter().find(|route| {
            path == route.path()
                || path
                    .strip_prefix(route.path())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Page heading
    pub fn title(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard Overview",
            Route::Users => "Users Management",
            Route::Analytics => "Analytics Reports",
            Route::Products => "Products Catalog",
        }
    }
}

/// One sidebar link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

/// Everything the page chrome needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavShell {
    pub title: String,
    pub active: Route,
    pub entries: Vec<NavEntry>,
    pub user_email: String,
    pub theme_class: &'static str,
    pub dark: bool,
}

impl NavShell {
    pub fn new(active: Route, title: impl Into<String>) -> Self {
        let entries = Route::ALL
            .iter()
            .map(|route| NavEntry {
                label: route.label(),
                path: route.path(),
                active: *route == active,
            })
            .collect();

        Self {
            title: title.into(),
            active,
            entries,
            user_email: String::new(),
            theme_class: Theme::Light.css_class(),
            dark: false,
        }
    }

    /// Shell for a route with its default title
    pub fn for_route(active: Route) -> Self {
        Self::new(active, active.title())
    }

    pub fn with_user(mut self, email: impl Into<String>) -> Self {
        self.user_email = email.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme_class = theme.css_class();
        self.dark = theme.is_dark();
        self
    }

    /// Path of the active page (used as the return target of forms)
    pub fn current_path(&self) -> &'static str {
        self.active.path()
    }

    /// One-line text header for terminals
    pub fn text_header(&self) -> String {
        let links: Vec<String> = self
            .entries
            .iter()
            .map(|e| {
                if e.active {
                    format!("[{}]", e.label)
                } else {
                    e.label.to_string()
                }
            })
            .collect();

        if self.user_email.is_empty() {
            format!("{}  |  {}", self.title, links.join("  "))
        } else {
            format!("{}  |  {}  |  {}", self.title, links.join("  "), self.user_email)
        }
    }
}

/// Plain confirmation dialog with explicit accept and cancel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub message: &'static str,
    pub accept_label: &'static str,
    /// Form target that performs the action
    pub accept_action: &'static str,
    pub cancel_label: &'static str,
    /// Where cancelling returns to
    pub cancel_href: String,
}

impl Confirmation {
    pub fn logout(cancel_href: impl Into<String>) -> Self {
        Self {
            message: "Are you sure you want to logout?",
            accept_label: "Yes, Logout",
            accept_action: "/logout",
            cancel_label: "Cancel",
            cancel_href: cancel_href.into(),
        }
    }
}

/// Keep a user-supplied return path on this site
///
/// The result is always a valid `Location` value. Whitespace and control
/// characters are refused because browsers strip them, which can turn
/// `/\t/host` into `//host`.
pub fn safe_return_path(candidate: Option<&str>, fallback: Route) -> String {
    match candidate {
        Some(path) if is_local_path(path) => path.to_string(),
        _ => fallback.path().to_string(),
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && path
            .chars()
            .all(|c| c != '\\' && !c.is_control() && !c.is_whitespace())
}
