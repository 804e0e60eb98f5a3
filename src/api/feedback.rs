use anyhow::Result;
use reqwest::Method;

use super::{plan_path, ActionResponse, ApiClient};
use crate::models::{PlanFeedback, PlanKind};

impl ApiClient {
    /// Post a star rating for a plan
    pub async fn submit_plan_feedback(
        &self,
        kind: PlanKind,
        plan_id: &str,
        feedback: &PlanFeedback,
    ) -> Result<ActionResponse> {
        let path = format!("{}feedback/", plan_path(kind, plan_id));
        self.action(Method::POST, &path, Some(feedback)).await
    }
}
