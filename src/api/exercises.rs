use anyhow::Result;

use super::{ApiClient, ApiError};
use crate::models::{Exercise, ExerciseListResponse};

impl ApiClient {
    /// `GET /api/exercises/?limit=N`
    pub async fn list_exercises(&self, limit: usize) -> Result<Vec<Exercise>> {
        let path = format!("/api/exercises/?limit={}", limit);
        let response: ExerciseListResponse = self.get_json(&path).await?;

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "Exercise catalog could not be loaded".to_string());
            return Err(ApiError::Rejected(message).into());
        }

        tracing::debug!("Loaded {} exercises", response.exercises.len());
        Ok(response.exercises)
    }
}
