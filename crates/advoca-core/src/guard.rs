//! Access gating for protected views.

use crate::session::Session;

/// Default landing location after a successful login.
pub const DEFAULT_AUTHENTICATED_LOCATION: &str = "/dashboard";

/// Location of the login surface.
pub const LOGIN_LOCATION: &str = "/login";

/// What the view layer should do with a request for a protected location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session not yet resolved; render a neutral loading placeholder.
    Loading,
    /// Render the requested protected content.
    Render,
    /// Send the user to the login surface, remembering where they were
    /// headed so a successful login can return them there.
    RedirectToLogin { return_to: String },
}

/// Pure gating decision over the current session state.
///
/// Never mutates session state and issues no navigation itself; the caller
/// turns a `RedirectToLogin` into an explicit navigation command.
pub fn decide(session: &Session, requested: &str) -> RouteDecision {
    match session {
        Session::Verifying => RouteDecision::Loading,
        Session::Unauthenticated => RouteDecision::RedirectToLogin {
            return_to: requested.to_string(),
        },
        Session::Authenticated { .. } => RouteDecision::Render,
    }
}

/// Where a successful login should navigate: the remembered location when
/// present, the default authenticated landing otherwise.
pub fn post_login_target(remembered: Option<&str>) -> &str {
    remembered
        .filter(|location| !location.is_empty())
        .unwrap_or(DEFAULT_AUTHENTICATED_LOCATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserProfile;

    fn authenticated() -> Session {
        Session::Authenticated {
            token: "T".to_string(),
            user: UserProfile {
                id: 1,
                email: "a@b.com".to_string(),
                name: "A".to_string(),
            },
        }
    }

    #[test]
    fn test_verifying_renders_placeholder() {
        assert_eq!(decide(&Session::Verifying, "/dashboard"), RouteDecision::Loading);
    }

    #[test]
    fn test_unauthenticated_redirects_with_return_to() {
        assert_eq!(
            decide(&Session::Unauthenticated, "/dashboard"),
            RouteDecision::RedirectToLogin {
                return_to: "/dashboard".to_string()
            }
        );
    }

    #[test]
    fn test_authenticated_renders() {
        assert_eq!(decide(&authenticated(), "/dashboard"), RouteDecision::Render);
    }

    #[test]
    fn test_decide_is_idempotent() {
        let session = Session::Unauthenticated;
        let first = decide(&session, "/files");
        let second = decide(&session, "/files");
        assert_eq!(first, second);
    }

    #[test]
    fn test_post_login_target() {
        assert_eq!(post_login_target(Some("/files")), "/files");
        assert_eq!(post_login_target(Some("")), DEFAULT_AUTHENTICATED_LOCATION);
        assert_eq!(post_login_target(None), DEFAULT_AUTHENTICATED_LOCATION);
    }
}
