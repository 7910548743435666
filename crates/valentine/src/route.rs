//! Views and the session guard in front of them.

use std::fmt;

use valentine_session::SessionStore;

/// A view of the app, addressed by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    /// The prompt. The username is optional; without one the flow still
    /// runs and completes with an empty name.
    Interactive { username: Option<String> },
    Celebration { username: String },
}

impl Route {
    /// Resolves a path. The root goes to login; anything unrecognised
    /// lands on the prompt without a username.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] | ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["interactive", name] => Self::Interactive {
                username: Some(decode(name)),
            },
            ["celebration", name] => Self::Celebration {
                username: decode(name),
            },
            _ => Self::Interactive { username: None },
        }
    }

    /// The canonical path for this view.
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Interactive { username: None } => "/interactive".to_string(),
            Self::Interactive {
                username: Some(name),
            } => format!("/interactive/{}", urlencoding::encode(name)),
            Self::Celebration { username } => {
                format!("/celebration/{}", urlencoding::encode(username))
            }
        }
    }

    /// Whether this view needs an active session.
    pub fn requires_session(&self) -> bool {
        matches!(self, Self::Interactive { .. } | Self::Celebration { .. })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Where navigating to `route` actually ends up: the route itself, or
/// [`Route::Login`] when it needs a session and none is held.
pub fn guard(route: Route, session: &SessionStore) -> Route {
    if route.requires_session() && !session.is_logged_in() {
        tracing::debug!(%route, "no session, redirecting to login");
        Route::Login
    } else {
        route
    }
}
