//src/auth.rs
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{User, UserPatch};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User with this email already exists")]
    EmailAlreadyExists,
    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Successful login/registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub user: User,
    pub token: String,
}

/// The user-directory boundary. Credential checks and profile storage
/// live behind this seam; the session store never sees passwords beyond
/// passing them through.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// # Errors
    /// `AuthError::InvalidCredentials` if no user matches the pair.
    async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError>;

    /// # Errors
    /// `AuthError::EmailAlreadyExists` if the email is already registered.
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, AuthError>;

    /// Applies a field-level patch to the stored profile and returns the
    /// updated record.
    ///
    /// # Errors
    /// `AuthError::UserNotFound` if `user_id` is unknown.
    async fn update_profile(&self, user_id: &str, patch: UserPatch) -> Result<User, AuthError>;
}

struct DirectoryEntry {
    user: User,
    password: String,
}

/// In-memory user directory with seeded accounts, standing in for a real
/// auth backend.
pub struct DirectoryAuthService {
    users: Mutex<Vec<DirectoryEntry>>,
}

/// Identity granted on bootstrap when a persisted token is found. Matches
/// the directory's primary seeded account.
pub fn seeded_primary_user() -> User {
    User {
        id: "user-123".to_string(),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        profile_picture: Some("https://randomuser.me/api/portraits/men/32.jpg".to_string()),
    }
}

fn generate_token(user_id: &str) -> String {
    // Opaque bearer token; nothing in the core inspects its contents.
    format!("token-{user_id}-{}", Uuid::new_v4())
}

impl Default for DirectoryAuthService {
    fn default() -> Self {
        Self::with_seeded_users()
    }
}

impl DirectoryAuthService {
    pub fn with_seeded_users() -> Self {
        let seeded = vec![
            DirectoryEntry {
                user: seeded_primary_user(),
                password: "password123".to_string(),
            },
            DirectoryEntry {
                user: User {
                    id: "user-456".to_string(),
                    name: "Jane Smith".to_string(),
                    email: "jane@example.com".to_string(),
                    profile_picture: Some(
                        "https://randomuser.me/api/portraits/women/44.jpg".to_string(),
                    ),
                },
                password: "password456".to_string(),
            },
        ];
        Self {
            users: Mutex::new(seeded),
        }
    }

    pub fn empty() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AuthService for DirectoryAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let users = self.users.lock().await;
        let entry = users
            .iter()
            .find(|e| e.user.email == email && e.password == password)
            .ok_or(AuthError::InvalidCredentials)?;
        Ok(AuthOutcome {
            user: entry.user.clone(),
            token: generate_token(&entry.user.id),
        })
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, AuthError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|e| e.user.email == email) {
            return Err(AuthError::EmailAlreadyExists);
        }
        let user = User {
            id: format!("user-{}", Uuid::new_v4()),
            name: name.to_string(),
            email: email.to_string(),
            profile_picture: None,
        };
        users.push(DirectoryEntry {
            user: user.clone(),
            password: password.to_string(),
        });
        let token = generate_token(&user.id);
        Ok(AuthOutcome { user, token })
    }

    async fn update_profile(&self, user_id: &str, patch: UserPatch) -> Result<User, AuthError> {
        let mut users = self.users.lock().await;
        let entry = users
            .iter_mut()
            .find(|e| e.user.id == user_id)
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))?;
        if let Some(name) = patch.name {
            entry.user.name = name;
        }
        if let Some(email) = patch.email {
            entry.user.email = email;
        }
        if let Some(picture) = patch.profile_picture {
            entry.user.profile_picture = picture;
        }
        Ok(entry.user.clone())
    }
}
