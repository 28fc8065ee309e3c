//src/session.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::auth::{seeded_primary_user, AuthError, AuthService};
use crate::models::{User, UserPatch};
use crate::token::{TokenError, TokenStore};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No user logged in")]
    NoActiveSession,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Authentication state as the rest of the application sees it.
///
/// `error` is an overlay flag, not a separate state: it may be set while
/// unauthenticated (failed login) or authenticated (failed profile
/// update). Invariant: `is_authenticated` implies `user.is_some()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        // Bootstrapping until init() settles the token check.
        Self {
            user: None,
            is_authenticated: false,
            loading: true,
            error: None,
        }
    }
}

/// Everything that can happen to a session, as a tagged union. The
/// reducer has exactly one arm per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Login or registration succeeded with this user.
    AuthSucceeded(User),
    /// Login, registration or profile update failed with this message.
    AuthFailed(String),
    LoggedOut,
    /// Profile update succeeded; adopt the merged record.
    UserUpdated(User),
    ErrorCleared,
    /// Bootstrap found no token; settle as unauthenticated.
    BootstrapFinished,
}

/// Pure transition function: applies one action to a session value and
/// returns the successor. Never mutates in place, so a transition is
/// atomic from any reader's perspective.
pub fn reduce(state: &Session, action: SessionAction) -> Session {
    match action {
        SessionAction::AuthSucceeded(user) => Session {
            user: Some(user),
            is_authenticated: true,
            loading: false,
            error: None,
        },
        SessionAction::AuthFailed(message) => Session {
            error: Some(message),
            loading: false,
            ..state.clone()
        },
        SessionAction::LoggedOut => Session {
            user: None,
            is_authenticated: false,
            loading: false,
            error: state.error.clone(),
        },
        SessionAction::UserUpdated(user) => Session {
            user: Some(user),
            ..state.clone()
        },
        SessionAction::ErrorCleared => Session {
            error: None,
            ..state.clone()
        },
        SessionAction::BootstrapFinished => Session {
            loading: false,
            ..state.clone()
        },
    }
}

/// The session state machine, composing the token slot and the auth
/// service.
///
/// Operations hold the state mutex across their awaited external call,
/// so dispatches are applied one at a time and `snapshot()` never sees a
/// half-updated session. After `dispose()`, late-resolving results are
/// dropped instead of applied.
pub struct SessionStore {
    tokens: Arc<dyn TokenStore>,
    auth: Arc<dyn AuthService>,
    state: Mutex<Session>,
    disposed: AtomicBool,
}

impl SessionStore {
    pub fn new(tokens: Arc<dyn TokenStore>, auth: Arc<dyn AuthService>) -> Self {
        Self {
            tokens,
            auth,
            state: Mutex::new(Session::default()),
            disposed: AtomicBool::new(false),
        }
    }

    /// Bootstrap: a persisted token grants access directly with the
    /// rehydrated stub identity; no token verification against the auth
    /// service happens here (preserved behavior of the original client).
    ///
    /// # Errors
    /// Returns `SessionError::Token` if the token slot cannot be read.
    pub async fn init(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let token = self.tokens.get().await?;
        let action = if token.is_some() {
            info!("session bootstrap: token found, rehydrating user");
            SessionAction::AuthSucceeded(seeded_primary_user())
        } else {
            info!("session bootstrap: no token, starting unauthenticated");
            SessionAction::BootstrapFinished
        };
        self.commit(&mut state, action);
        Ok(())
    }

    /// # Errors
    /// `SessionError::Auth` on bad credentials (also captured into
    /// `Session::error`), `SessionError::Token` if persisting the token
    /// fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        match self.auth.login(email, password).await {
            Ok(outcome) => {
                if self.is_disposed() {
                    warn!("discarding login result after dispose");
                    return Ok(());
                }
                self.tokens.set(&outcome.token).await?;
                info!(user = %outcome.user.id, "login succeeded");
                self.commit(&mut state, SessionAction::AuthSucceeded(outcome.user));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                self.commit(&mut state, SessionAction::AuthFailed(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// # Errors
    /// `SessionError::Auth` if the email is taken (also captured into
    /// `Session::error`), `SessionError::Token` if persisting the token
    /// fails.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        match self.auth.register(name, email, password).await {
            Ok(outcome) => {
                if self.is_disposed() {
                    warn!("discarding registration result after dispose");
                    return Ok(());
                }
                self.tokens.set(&outcome.token).await?;
                info!(user = %outcome.user.id, "registration succeeded");
                self.commit(&mut state, SessionAction::AuthSucceeded(outcome.user));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "registration failed");
                self.commit(&mut state, SessionAction::AuthFailed(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Clears the token slot and unconditionally drops to
    /// unauthenticated. Never sets an error.
    ///
    /// # Errors
    /// Returns `SessionError::Token` if clearing the slot fails; the
    /// session state is left untouched in that case.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        self.tokens.remove().await?;
        info!("logged out");
        self.commit(&mut state, SessionAction::LoggedOut);
        Ok(())
    }

    /// Applies a partial profile update through the auth service and
    /// adopts the merged user. A failed update sets `Session::error` and
    /// leaves the current user (and authentication state) unchanged.
    ///
    /// # Errors
    /// `SessionError::NoActiveSession` with no authenticated user,
    /// `SessionError::Auth` if the auth service rejects the update.
    pub async fn update_profile(&self, patch: UserPatch) -> Result<User, SessionError> {
        let mut state = self.state.lock().await;
        let current = state.user.clone().ok_or(SessionError::NoActiveSession)?;
        match self.auth.update_profile(&current.id, patch).await {
            Ok(updated) => {
                self.commit(&mut state, SessionAction::UserUpdated(updated.clone()));
                Ok(updated)
            }
            Err(e) => {
                warn!(error = %e, "profile update failed");
                self.commit(&mut state, SessionAction::AuthFailed(e.to_string()));
                Err(e.into())
            }
        }
    }

    pub async fn clear_error(&self) {
        let mut state = self.state.lock().await;
        self.commit(&mut state, SessionAction::ErrorCleared);
    }

    /// Returns a copy of the current session state.
    pub async fn snapshot(&self) -> Session {
        self.state.lock().await.clone()
    }

    /// Marks the store as gone-away: any operation result arriving after
    /// this point is discarded as a no-op instead of applied.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn commit(&self, state: &mut Session, action: SessionAction) {
        if self.is_disposed() {
            warn!(?action, "discarding session action after dispose");
            return;
        }
        *state = reduce(state, action);
    }
}
