// src/lib.rs
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// --- Declare modules ---
pub mod analytics;
pub mod auth;
mod config;
pub mod filter;
pub mod models;
pub mod parser;
pub mod repository;
pub mod session;
pub mod token;

// --- Expose public types ---
pub use analytics::{ChartPoint, DailyStats};
pub use auth::{AuthError, AuthOutcome, AuthService, DirectoryAuthService};
pub use config::{
    get_config_path as get_config_path_util,
    load_config as load_config_util,
    save_config as save_config_util,
    Config,
    Error as ConfigError,
};
pub use models::{parse_workout_date, KnownActivity, User, UserPatch, Workout, WorkoutDraft};
pub use parser::{parse_notes, ParsedWorkout};
pub use repository::{InMemoryWorkoutRepository, RepoError, WorkoutRepository};
pub use session::{Session, SessionAction, SessionError, SessionStore};
pub use token::{
    get_token_path as get_token_path_util,
    FileTokenStore,
    MemoryTokenStore,
    TokenError,
    TokenStore,
};

/// Application service tying the session store, the workout repository
/// and the configuration together behind one entry point.
pub struct FitnessService {
    pub config: Config,
    pub config_path: PathBuf,
    pub session: SessionStore,
    workouts: Arc<dyn WorkoutRepository>,
}

impl FitnessService {
    /// Initializes the application service with the bundled component
    /// implementations and runs the session bootstrap.
    ///
    /// # Errors
    /// Returns `anyhow::Error` if config or token-store setup fails.
    pub async fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load_config(&config_path)
            .context(format!("Failed to load config from {config_path:?}"))?;

        let tokens: Arc<dyn TokenStore> = Arc::new(
            FileTokenStore::at_default_location().context("Failed to open token store")?,
        );
        let auth: Arc<dyn AuthService> = Arc::new(DirectoryAuthService::with_seeded_users());
        let workouts: Arc<dyn WorkoutRepository> = Arc::new(InMemoryWorkoutRepository::new());

        let session = SessionStore::new(tokens, auth);
        session
            .init()
            .await
            .context("Failed to bootstrap session from token store")?;

        Ok(Self {
            config,
            config_path,
            session,
            workouts,
        })
    }

    /// Builds a service from explicit components, leaving bootstrap to
    /// the caller. Used by tests and embedders with their own backends.
    pub fn with_components(
        config: Config,
        config_path: PathBuf,
        tokens: Arc<dyn TokenStore>,
        auth: Arc<dyn AuthService>,
        workouts: Arc<dyn WorkoutRepository>,
    ) -> Self {
        Self {
            config,
            config_path,
            session: SessionStore::new(tokens, auth),
            workouts,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save_config(&self.config_path, &self.config)
    }

    /// Sets how many points the recent-calories series holds.
    /// # Errors
    /// - `ConfigError::InvalidSeriesLength` if `points` is 0.
    /// - `ConfigError` variants if saving fails.
    pub fn set_recent_series_points(&mut self, points: usize) -> Result<(), ConfigError> {
        if points == 0 {
            return Err(ConfigError::InvalidSeriesLength(points));
        }
        self.config.recent_series_points = points;
        self.save_config()
    }

    // --- Workout CRUD (delegates to the repository) ---

    /// # Errors
    /// Returns `anyhow::Error` wrapping repository errors.
    pub async fn list_workouts(&self) -> Result<Vec<Workout>> {
        self.workouts
            .list()
            .await
            .context("Failed to list workouts")
            .map_err(Into::into)
    }

    /// # Errors
    /// Returns `anyhow::Error` wrapping `RepoError::NotFound`.
    pub async fn get_workout(&self, id: &str) -> Result<Workout> {
        self.workouts
            .get(id)
            .await
            .with_context(|| format!("Failed to fetch workout '{id}'"))
            .map_err(Into::into)
    }

    /// Creates a workout for the authenticated user.
    /// # Errors
    /// `SessionError::NoActiveSession` without a user; `anyhow::Error`
    /// wrapping repository errors otherwise.
    pub async fn create_workout(&self, draft: WorkoutDraft) -> Result<Workout> {
        let user = self.require_user().await?;
        self.workouts
            .create(&user.id, draft)
            .await
            .context("Failed to create workout")
            .map_err(Into::into)
    }

    /// # Errors
    /// Returns `anyhow::Error` wrapping `RepoError::NotFound`.
    pub async fn update_workout(&self, id: &str, draft: WorkoutDraft) -> Result<Workout> {
        self.workouts
            .update(id, draft)
            .await
            .with_context(|| format!("Failed to update workout '{id}'"))
            .map_err(Into::into)
    }

    /// # Errors
    /// Returns `anyhow::Error` wrapping `RepoError::NotFound`.
    pub async fn delete_workout(&self, id: &str) -> Result<()> {
        self.workouts
            .delete(id)
            .await
            .with_context(|| format!("Failed to delete workout '{id}'"))
            .map_err(Into::into)
    }

    // --- Derived views (recomputed from the collection on every call) ---

    /// Dashboard statistics for the calendar day of `reference`.
    /// # Errors
    /// Returns `anyhow::Error` wrapping repository errors.
    pub async fn dashboard_stats<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Result<DailyStats> {
        let workouts = self.list_workouts().await?;
        Ok(analytics::compute_daily_stats(&workouts, reference))
    }

    /// Bounded recent-calories chart series, ascending chronological.
    /// # Errors
    /// Returns `anyhow::Error` wrapping repository errors.
    pub async fn recent_calories_series(&self) -> Result<Vec<ChartPoint>> {
        let workouts = self.list_workouts().await?;
        Ok(analytics::compute_recent_series(
            &workouts,
            self.config.recent_series_points,
            &self.config.day_label_format,
        ))
    }

    /// Activity-distribution chart series, first-seen order.
    /// # Errors
    /// Returns `anyhow::Error` wrapping repository errors.
    pub async fn type_distribution(&self) -> Result<Vec<ChartPoint>> {
        let workouts = self.list_workouts().await?;
        Ok(analytics::compute_type_distribution(&workouts))
    }

    /// The browsable list view: filtered, searched, newest first.
    /// # Errors
    /// Returns `anyhow::Error` wrapping repository errors.
    pub async fn filtered_workouts(
        &self,
        type_filter: &str,
        search_term: &str,
    ) -> Result<Vec<Workout>> {
        let workouts = self.list_workouts().await?;
        Ok(filter::apply(&workouts, type_filter, search_term))
    }

    /// Distinct activity names for the filter control.
    /// # Errors
    /// Returns `anyhow::Error` wrapping repository errors.
    pub async fn distinct_types(&self) -> Result<Vec<String>> {
        let workouts = self.list_workouts().await?;
        Ok(filter::distinct_types(&workouts))
    }

    // --- Quick add ---

    /// The quick-add flow: heuristically parses free text into a draft,
    /// dates it now, keeps the original text as notes and creates the
    /// workout for the authenticated user.
    ///
    /// # Errors
    /// `SessionError::NoActiveSession` without a user; `anyhow::Error`
    /// wrapping repository errors otherwise.
    pub async fn quick_add(&self, free_text: &str) -> Result<Workout> {
        let parsed = parser::parse_notes(free_text);
        let draft = WorkoutDraft {
            activity: parsed.activity,
            duration_minutes: parsed.duration_minutes,
            calories: parsed.calories,
            date: Utc::now(),
            notes: Some(free_text.to_string()),
        };
        self.create_workout(draft).await
    }

    async fn require_user(&self) -> Result<User, SessionError> {
        self.session
            .snapshot()
            .await
            .user
            .ok_or(SessionError::NoActiveSession)
    }
}
