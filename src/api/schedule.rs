use anyhow::Result;
use reqwest::Method;

use super::{ActionResponse, ApiClient, ApiError};
use crate::models::{ScheduleResponse, WeeklySchedule};

impl ApiClient {
    /// Saved weekly schedule, `None` if the user never saved one
    pub async fn get_schedule(&self) -> Result<Option<WeeklySchedule>> {
        let response: ScheduleResponse = self.get_json("/api/auth/schedule/get/").await?;

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "Schedule could not be loaded".to_string());
            return Err(ApiError::Rejected(message).into());
        }

        Ok(response.schedule)
    }

    /// Save the whole schedule as given
    pub async fn save_schedule(&self, schedule: &WeeklySchedule) -> Result<ActionResponse> {
        self.action(Method::POST, "/api/auth/schedule/save/", Some(schedule))
            .await
    }
}
