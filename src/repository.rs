//src/repository.rs
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::{Workout, WorkoutDraft};

// Custom Error type for repository operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("Workout entry not found: ID {0}")]
    NotFound(String),
    #[error("Invalid workout data: {0}")]
    Validation(String),
}

/// CRUD boundary over workout entities. The core treats workouts as
/// immutable snapshots; the only mutation path is a full-record update
/// through this trait, and a failed mutation leaves prior state intact.
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Workout>, RepoError>;
    async fn get(&self, id: &str) -> Result<Workout, RepoError>;
    async fn create(&self, user_id: &str, draft: WorkoutDraft) -> Result<Workout, RepoError>;
    async fn update(&self, id: &str, draft: WorkoutDraft) -> Result<Workout, RepoError>;
    async fn delete(&self, id: &str) -> Result<(), RepoError>;
}

/// In-memory workout collection, insertion order preserved. Stands in
/// for the external workout backend.
#[derive(Default)]
pub struct InMemoryWorkoutRepository {
    workouts: RwLock<Vec<Workout>>,
}

impl InMemoryWorkoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the repository with an existing collection, e.g. fixtures.
    pub fn with_workouts(workouts: Vec<Workout>) -> Self {
        Self {
            workouts: RwLock::new(workouts),
        }
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryWorkoutRepository {
    async fn list(&self) -> Result<Vec<Workout>, RepoError> {
        Ok(self.workouts.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Workout, RepoError> {
        self.workouts
            .read()
            .await
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    async fn create(&self, user_id: &str, draft: WorkoutDraft) -> Result<Workout, RepoError> {
        let workout = Workout {
            id: format!("workout-{}", Uuid::new_v4()),
            user_id: user_id.to_string(),
            activity: draft.activity,
            duration_minutes: draft.duration_minutes,
            calories: draft.calories,
            date: draft.date,
            notes: draft.notes,
        };
        self.workouts.write().await.push(workout.clone());
        info!(id = %workout.id, activity = %workout.activity, "workout created");
        Ok(workout)
    }

    async fn update(&self, id: &str, draft: WorkoutDraft) -> Result<Workout, RepoError> {
        let mut workouts = self.workouts.write().await;
        let existing = workouts
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        existing.activity = draft.activity;
        existing.duration_minutes = draft.duration_minutes;
        existing.calories = draft.calories;
        existing.date = draft.date;
        existing.notes = draft.notes;
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let mut workouts = self.workouts.write().await;
        let before = workouts.len();
        workouts.retain(|w| w.id != id);
        if workouts.len() == before {
            return Err(RepoError::NotFound(id.to_string()));
        }
        info!(id, "workout deleted");
        Ok(())
    }
}
