//! Named views and which of them require a session.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Saved,
    Profile,
    Settings,
    BuyCredits,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Saved,
        Route::Profile,
        Route::Settings,
        Route::BuyCredits,
    ];

    /// Resolves a path such as `/saved`. The root path is the dashboard.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Some(Route::Dashboard);
        }
        Self::ALL
            .into_iter()
            .find(|route| route.path()[1..].eq_ignore_ascii_case(trimmed))
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Saved => "/saved",
            Route::Profile => "/profile",
            Route::Settings => "/settings",
            Route::BuyCredits => "/buy-credits",
        }
    }

    /// Everything except the sign-in screens needs a session.
    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    /// Views that exist in navigation but have no content yet.
    pub fn is_placeholder(self) -> bool {
        matches!(self, Route::Settings | Route::BuyCredits)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Route::parse(s) {
            Some(route) => Ok(route),
            None => bail!("Unknown route '{s}'"),
        }
    }
}
