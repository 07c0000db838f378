//! Session state: token persistence, login, identity bootstrap, route guard.
//!
//! The client owns no durable state beyond the one persisted bearer token.
//! The token is written only by login and logout; the HTTP adapter reads it
//! at call time for every request.

use crate::environment::ClientEnvironment;
use crate::types::{Registration, Role, User};
use concierge_core::effect::Effect;
use concierge_core::reducer::Reducer;
use concierge_core::{SmallVec, smallvec};
use std::path::PathBuf;

/// Persistence of the one bearer token.
///
/// `load` returning `None` means "logged out"; read failures of the backing
/// file are treated the same way.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    fn load(&self) -> Option<String>;

    /// Persist a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; callers log and continue, since a
    /// failed save only costs the user a re-login next run.
    fn save(&self, token: &str) -> std::io::Result<()>;

    /// Remove the persisted token. Removing an absent token is a no-op.
    fn clear(&self);
}

/// Token store backed by a single file holding the raw token string.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store at the given path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, token)
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to clear token");
            }
        }
    }
}

/// Session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// The resolved identity, when logged in
    pub user: Option<User>,
    /// An identity resolution (bootstrap or login) is in flight
    pub is_loading: bool,
    /// Last auth failure message for display
    pub last_error: Option<String>,
    /// Last success notice for display
    pub last_notice: Option<String>,
}

impl SessionState {
    /// True once an identity is resolved.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True for an admin identity.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }

    /// Pure route guard.
    ///
    /// While a bootstrap is in flight, dependent views show loading instead
    /// of redirecting, so a stored-token user is not bounced to login during
    /// startup.
    #[must_use]
    pub fn decide(&self, request: RouteRequest) -> RouteDecision {
        match request {
            RouteRequest::Public => RouteDecision::Allow,
            RouteRequest::Protected => {
                if self.is_loading {
                    RouteDecision::ShowLoading
                } else if self.is_authenticated() {
                    RouteDecision::Allow
                } else {
                    RouteDecision::RedirectToLogin
                }
            },
            RouteRequest::AdminOnly => {
                if self.is_loading {
                    RouteDecision::ShowLoading
                } else if !self.is_authenticated() {
                    RouteDecision::RedirectToLogin
                } else if self.is_admin() {
                    RouteDecision::Allow
                } else {
                    RouteDecision::RedirectHome
                }
            },
        }
    }
}

/// Access level a view requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequest {
    /// No authentication required
    Public,
    /// Any authenticated user
    Protected,
    /// Admin only
    AdminOnly,
}

/// Outcome of the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the view
    Allow,
    /// Identity resolution in flight; render a loading placeholder
    ShowLoading,
    /// Send the visitor to the login view
    RedirectToLogin,
    /// Authenticated but not authorized; send home
    RedirectHome,
}

/// Session actions: user intents plus effect completions.
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Resolve identity from a persisted token at startup
    Bootstrap,
    /// Identity resolved (bootstrap or post-login)
    IdentityLoaded(User),
    /// Stored token was rejected; token cleared, nothing surfaced
    BootstrapFailed,
    /// Exchange credentials for a token
    Login {
        /// Login email
        email: String,
        /// Password
        password: String,
    },
    /// Token received; persist it and resolve identity
    TokenExchanged {
        /// The bearer token
        access_token: String,
    },
    /// Login or post-login identity fetch failed
    LoginFailed {
        /// Message for display
        message: String,
    },
    /// Create an account
    Register(Registration),
    /// Registration succeeded
    Registered,
    /// Registration failed
    RegistrationFailed {
        /// Message for display
        message: String,
    },
    /// Drop the session
    Logout,
}

/// Session reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionReducer;

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = ClientEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SessionAction::Bootstrap => {
                // At most one bootstrap resolution in flight.
                if state.is_loading {
                    return smallvec![Effect::None];
                }
                if env.tokens.load().is_none() {
                    state.is_loading = false;
                    return smallvec![Effect::None];
                }

                state.is_loading = true;
                let api = env.api.clone();
                let tokens = env.tokens.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.me().await {
                        Ok(user) => Some(SessionAction::IdentityLoaded(user)),
                        Err(e) => {
                            // Invalid stored token means logged out; the one
                            // failure that is swallowed rather than surfaced.
                            // A transient network error keeps the token for
                            // the next attempt.
                            tracing::debug!(error = %e, "bootstrap identity fetch failed");
                            if e.is_unauthorized() {
                                tokens.clear();
                            }
                            Some(SessionAction::BootstrapFailed)
                        },
                    }
                }))]
            },

            SessionAction::BootstrapFailed => {
                state.is_loading = false;
                smallvec![Effect::None]
            },

            SessionAction::Login { email, password } => {
                if email.trim().is_empty() || password.is_empty() {
                    state.last_error = Some("Please enter email and password".to_string());
                    return smallvec![Effect::None];
                }

                state.is_loading = true;
                state.last_error = None;
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.login(email, password).await {
                        Ok(auth) => Some(SessionAction::TokenExchanged {
                            access_token: auth.access_token,
                        }),
                        Err(e) => Some(SessionAction::LoginFailed {
                            message: e
                                .user_message("Login failed. Please check your credentials."),
                        }),
                    }
                }))]
            },

            SessionAction::TokenExchanged { access_token } => {
                let api = env.api.clone();
                let tokens = env.tokens.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    if let Err(e) = tokens.save(&access_token) {
                        tracing::warn!(error = %e, "failed to persist token");
                    }
                    match api.me().await {
                        Ok(user) => Some(SessionAction::IdentityLoaded(user)),
                        Err(e) => {
                            // No partial session: a token without an identity
                            // is cleared before failing.
                            tokens.clear();
                            Some(SessionAction::LoginFailed {
                                message: e.user_message(
                                    "Login failed. Please check your credentials.",
                                ),
                            })
                        },
                    }
                }))]
            },

            SessionAction::IdentityLoaded(user) => {
                tracing::info!(user_id = user.id, "session established");
                state.user = Some(user);
                state.is_loading = false;
                state.last_error = None;
                smallvec![Effect::None]
            },

            SessionAction::LoginFailed { message } => {
                state.is_loading = false;
                state.last_error = Some(message);
                smallvec![Effect::None]
            },

            SessionAction::Register(registration) => {
                if registration.email.trim().is_empty()
                    || registration.password.is_empty()
                    || registration.full_name.trim().is_empty()
                    || registration.contact_number.trim().is_empty()
                {
                    state.last_error = Some("Please fill in all fields".to_string());
                    return smallvec![Effect::None];
                }

                state.last_error = None;
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.register(registration).await {
                        Ok(()) => Some(SessionAction::Registered),
                        Err(e) => Some(SessionAction::RegistrationFailed {
                            message: e.user_message("Registration failed. Please try again."),
                        }),
                    }
                }))]
            },

            SessionAction::Registered => {
                state.last_notice = Some("Registration successful! Please login.".to_string());
                smallvec![Effect::None]
            },

            SessionAction::RegistrationFailed { message } => {
                state.last_error = Some(message);
                smallvec![Effect::None]
            },

            SessionAction::Logout => {
                state.user = None;
                state.is_loading = false;
                state.last_error = None;
                let tokens = env.tokens.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    tokens.clear();
                    None
                }))]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::{MockApiClient, test_user};
    use concierge_testing::assertions;
    use concierge_testing::{ReducerTest, test_clock};

    fn env() -> ClientEnvironment {
        MockApiClient::new().into_environment(std::sync::Arc::new(test_clock()))
    }

    #[test]
    fn bootstrap_without_token_ends_loading_immediately() {
        ReducerTest::new(SessionReducer)
            .with_env(env())
            .given_state(SessionState::default())
            .when_action(SessionAction::Bootstrap)
            .then_state(|state| assert!(!state.is_loading))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn bootstrap_with_token_resolves_identity() {
        let environment = env();
        environment.tokens.save("stored-token").unwrap();

        ReducerTest::new(SessionReducer)
            .with_env(environment)
            .given_state(SessionState::default())
            .when_action(SessionAction::Bootstrap)
            .then_state(|state| assert!(state.is_loading))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn second_bootstrap_while_loading_is_a_no_op() {
        let environment = env();
        environment.tokens.save("stored-token").unwrap();

        ReducerTest::new(SessionReducer)
            .with_env(environment)
            .given_state(SessionState {
                is_loading: true,
                ..SessionState::default()
            })
            .when_action(SessionAction::Bootstrap)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn login_rejects_empty_credentials() {
        ReducerTest::new(SessionReducer)
            .with_env(env())
            .given_state(SessionState::default())
            .when_action(SessionAction::Login {
                email: "  ".to_string(),
                password: String::new(),
            })
            .then_state(|state| {
                assert_eq!(
                    state.last_error.as_deref(),
                    Some("Please enter email and password")
                );
                assert!(!state.is_loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn identity_loaded_establishes_the_session() {
        ReducerTest::new(SessionReducer)
            .with_env(env())
            .given_state(SessionState {
                is_loading: true,
                last_error: Some("old".to_string()),
                ..SessionState::default()
            })
            .when_action(SessionAction::IdentityLoaded(test_user(Role::User)))
            .then_state(|state| {
                assert!(state.is_authenticated());
                assert!(!state.is_loading);
                assert!(state.last_error.is_none());
            })
            .run();
    }

    #[test]
    fn logout_drops_user_synchronously() {
        ReducerTest::new(SessionReducer)
            .with_env(env())
            .given_state(SessionState {
                user: Some(test_user(Role::User)),
                ..SessionState::default()
            })
            .when_action(SessionAction::Logout)
            .then_state(|state| assert!(state.user.is_none()))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn route_guard_redirects_and_loads_correctly() {
        let logged_out = SessionState::default();
        assert_eq!(logged_out.decide(RouteRequest::Public), RouteDecision::Allow);
        assert_eq!(
            logged_out.decide(RouteRequest::Protected),
            RouteDecision::RedirectToLogin
        );

        let loading = SessionState {
            is_loading: true,
            ..SessionState::default()
        };
        assert_eq!(
            loading.decide(RouteRequest::Protected),
            RouteDecision::ShowLoading
        );
        assert_eq!(
            loading.decide(RouteRequest::AdminOnly),
            RouteDecision::ShowLoading
        );

        let guest = SessionState {
            user: Some(test_user(Role::User)),
            ..SessionState::default()
        };
        assert_eq!(guest.decide(RouteRequest::Protected), RouteDecision::Allow);
        assert_eq!(
            guest.decide(RouteRequest::AdminOnly),
            RouteDecision::RedirectHome
        );

        let admin = SessionState {
            user: Some(test_user(Role::Admin)),
            ..SessionState::default()
        };
        assert_eq!(admin.decide(RouteRequest::AdminOnly), RouteDecision::Allow);
    }

    #[test]
    fn file_token_store_round_trips() {
        let dir = std::env::temp_dir().join(format!("concierge-test-{}", uuid::Uuid::new_v4()));
        let store = FileTokenStore::new(dir.join("token"));

        assert!(store.load().is_none());
        store.save("abc123").unwrap();
        assert_eq!(store.load().as_deref(), Some("abc123"));
        store.clear();
        assert!(store.load().is_none());
        store.clear(); // clearing again is a no-op

        let _ = std::fs::remove_dir_all(dir);
    }
}
