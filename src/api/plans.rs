use anyhow::Result;
use reqwest::Method;
use serde::Deserialize;

use super::{ActionResponse, ApiClient, ApiError};
use crate::models::wire;
use crate::models::{
    CustomPlanPayload, ExerciseParamsUpdate, Plan, PlanKind, PlanResponse, ReplaceExerciseRequest,
    StandardPlanUpdate, WirePlan,
};

/// Base path of a plan for its endpoint family, with a trailing slash
pub fn plan_path(kind: PlanKind, id: &str) -> String {
    match kind {
        PlanKind::Custom => format!("/api/recommendations/custom-plans/{}/", id),
        PlanKind::Standard => format!("/api/recommendations/plans/{}/", id),
    }
}

fn exercise_path(plan_id: &str, entry_id: &str) -> String {
    format!(
        "{}exercises/{}/",
        plan_path(PlanKind::Standard, plan_id),
        entry_id
    )
}

#[derive(Debug, Deserialize)]
struct PlanListResponse {
    #[serde(default = "default_true")]
    success: bool,

    #[serde(default)]
    plans: Vec<WirePlan>,

    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatePlanResponse {
    #[serde(default = "default_true")]
    success: bool,

    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    plan_id: Option<String>,

    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    id: Option<String>,

    #[serde(default)]
    plan: Option<WirePlan>,

    #[serde(default)]
    error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ApiClient {
    /// Fetch one plan and normalize it
    pub async fn fetch_plan(&self, kind: PlanKind, id: &str) -> Result<Plan> {
        let response: PlanResponse = self.get_json(&plan_path(kind, id)).await?;

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| format!("Plan {} could not be loaded", id));
            return Err(ApiError::Rejected(message).into());
        }

        let plan = response
            .into_wire_plan()
            .ok_or_else(|| ApiError::NotFound(format!("Plan {}", id)))?;

        tracing::debug!(plan = id, ?kind, "Fetched plan");
        Ok(plan.into_plan(kind))
    }

    /// List the user's plans of one family
    pub async fn list_plans(&self, kind: PlanKind) -> Result<Vec<Plan>> {
        let path = match kind {
            PlanKind::Custom => "/api/recommendations/custom-plans/",
            PlanKind::Standard => "/api/recommendations/plans/",
        };

        let response: PlanListResponse = self.get_json(path).await?;
        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "Plans could not be loaded".to_string());
            return Err(ApiError::Rejected(message).into());
        }

        Ok(response
            .plans
            .into_iter()
            .map(|plan| plan.into_plan(kind))
            .collect())
    }

    /// `POST /api/recommendations/custom-plans/create/`; returns the new id
    pub async fn create_custom_plan(&self, payload: &CustomPlanPayload) -> Result<String> {
        let response: CreatePlanResponse = self
            .send_json(
                Method::POST,
                "/api/recommendations/custom-plans/create/",
                Some(payload),
            )
            .await?;

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "Plan could not be created".to_string());
            return Err(ApiError::Rejected(message).into());
        }

        let id = response
            .plan_id
            .or(response.id)
            .or_else(|| response.plan.and_then(|p| p.id))
            .ok_or_else(|| ApiError::Unknown("Create response carried no plan id".to_string()))?;

        tracing::info!(plan = %id, "Created custom plan");
        Ok(id)
    }

    /// Full replace of a custom plan's days
    pub async fn update_custom_plan(
        &self,
        id: &str,
        payload: &CustomPlanPayload,
    ) -> Result<ActionResponse> {
        let path = format!("{}update/", plan_path(PlanKind::Custom, id));
        self.action(Method::PUT, &path, Some(payload)).await
    }

    /// Name and description of a standard plan
    pub async fn update_standard_plan(
        &self,
        id: &str,
        update: &StandardPlanUpdate,
    ) -> Result<ActionResponse> {
        self.action(Method::PUT, &plan_path(PlanKind::Standard, id), Some(update))
            .await
    }

    pub async fn update_plan_exercise(
        &self,
        plan_id: &str,
        entry_id: &str,
        update: &ExerciseParamsUpdate,
    ) -> Result<ActionResponse> {
        self.action(Method::PUT, &exercise_path(plan_id, entry_id), Some(update))
            .await
    }

    pub async fn replace_plan_exercise(
        &self,
        plan_id: &str,
        entry_id: &str,
        new_exercise_id: &str,
    ) -> Result<ActionResponse> {
        let path = format!("{}replace/", exercise_path(plan_id, entry_id));
        let body = ReplaceExerciseRequest {
            new_exercise_id: wire::id_value(new_exercise_id),
        };
        self.action(Method::POST, &path, Some(&body)).await
    }

    pub async fn delete_plan_exercise(
        &self,
        plan_id: &str,
        entry_id: &str,
    ) -> Result<ActionResponse> {
        let path = format!("{}delete/", exercise_path(plan_id, entry_id));
        self.action::<()>(Method::DELETE, &path, None).await
    }

    /// Make the plan the user's active plan
    pub async fn activate_plan(&self, kind: PlanKind, id: &str) -> Result<ActionResponse> {
        let path = format!("{}activate/", plan_path(kind, id));
        self.action::<()>(Method::POST, &path, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            plan_path(PlanKind::Custom, "4"),
            "/api/recommendations/custom-plans/4/"
        );
        assert_eq!(
            exercise_path("4", "17"),
            "/api/recommendations/plans/4/exercises/17/"
        );
    }
}
