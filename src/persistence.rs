//! Saving plan edits.
//!
//! Custom plans are written back as one full replace of their day tree.
//! Standard plans have no such endpoint: replace and delete go out as
//! discrete calls the moment they happen, and `save` sends the name and
//! description followed by one update per modified exercise.

use anyhow::Result;
use std::future::Future;

use crate::api::ApiClient;
use crate::editor::{copy_for_edit, ExerciseField, PlanEditor};
use crate::error::{EditError, SaveError};
use crate::models::{Exercise, ExerciseParamsUpdate, Plan, PlanDetails, PlanKind};
use crate::notify::Notifier;

/// Apply a local mutation, then run the request that mirrors it on the
/// server. If the request fails the draft goes back to how it was.
pub async fn optimistic<T, M, R, Fut>(
    editor: &mut PlanEditor,
    mutate: M,
    request: R,
) -> Result<(), SaveError>
where
    M: FnOnce(&mut PlanEditor) -> Result<T, EditError>,
    R: FnOnce(T) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let snapshot = editor.snapshot().ok_or(EditError::NotEditing)?;
    let outcome = mutate(editor)?;

    if let Err(e) = request(outcome).await {
        tracing::warn!("Request failed, restoring draft: {:#}", e);
        editor.restore(snapshot);
        return Err(SaveError::Request(e));
    }

    Ok(())
}

/// A plan opened for viewing and editing, wired to the API and notifier
pub struct PlanSession {
    editor: PlanEditor,
    api: ApiClient,
    notifier: Notifier,
    /// Discrete standard-plan calls went through since the last load
    server_changed: bool,
}

impl PlanSession {
    pub fn new(api: ApiClient, notifier: Notifier, plan: Plan) -> Self {
        Self {
            editor: PlanEditor::new(plan),
            api,
            notifier,
            server_changed: false,
        }
    }

    /// Session for a plan being authored; the draft is open from the start
    pub fn for_new_plan(api: ApiClient, notifier: Notifier, plan: Plan) -> Self {
        Self {
            editor: PlanEditor::for_new_plan(plan),
            api,
            notifier,
            server_changed: false,
        }
    }

    /// Load a plan from the server
    pub async fn open(
        api: ApiClient,
        notifier: Notifier,
        kind: PlanKind,
        id: &str,
    ) -> Result<Self> {
        match api.fetch_plan(kind, id).await {
            Ok(plan) => Ok(Self::new(api, notifier, plan)),
            Err(e) => {
                notifier.error(format!("Failed to load plan: {}", e));
                Err(e)
            }
        }
    }

    pub fn editor(&self) -> &PlanEditor {
        &self.editor
    }

    pub fn plan(&self) -> &Plan {
        self.editor.current()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Open a draft. System templates get a warning and no draft.
    pub fn begin_edit(&mut self) -> bool {
        match self.editor.begin_edit() {
            Ok(_) => true,
            Err(e) => {
                self.notifier.warning(e.to_string());
                false
            }
        }
    }

    /// Pre-filled template for the "copy and edit" flow
    pub fn copy_template(&self) -> Plan {
        copy_for_edit(self.editor.saved())
    }

    pub fn add_exercise(&mut self, day: usize, exercise: &Exercise) -> Result<bool, EditError> {
        let added = self.editor.add_exercise(day, exercise)?;
        if !added {
            self.notifier
                .info(format!("{} is already in this day", exercise.name));
        }
        Ok(added)
    }

    pub fn update_exercise_field(
        &mut self,
        day: usize,
        index: usize,
        field: ExerciseField,
        value: &str,
    ) -> Result<(), EditError> {
        self.editor.update_exercise_field(day, index, field, value)
    }

    pub fn add_day(&mut self, title: &str) -> Result<usize, EditError> {
        self.editor.add_day(title)
    }

    pub fn remove_day(&mut self, index: usize) -> Result<(), EditError> {
        self.editor.remove_day(index).map(|_| ())
    }

    pub fn rename_day(&mut self, index: usize, title: &str) -> Result<(), EditError> {
        self.editor.rename_day(index, title)
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), EditError> {
        self.editor.set_name(name)
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), EditError> {
        self.editor.set_description(description)
    }

    /// Ids needed for a discrete call on one slot of a standard plan
    fn standard_target(&self, day: usize, index: usize) -> Result<(String, String), SaveError> {
        let plan_id = self
            .editor
            .saved()
            .id()
            .ok_or(SaveError::MissingPlanId)?
            .to_string();
        let entry_id = self
            .editor
            .exercise(day, index)?
            .entry_id
            .clone()
            .ok_or(EditError::MissingEntryId)?;
        Ok((plan_id, entry_id))
    }

    /// Swap the exercise in a slot, keeping its training parameters
    pub async fn replace_exercise(
        &mut self,
        day: usize,
        index: usize,
        replacement: &Exercise,
    ) -> Result<(), SaveError> {
        if !self.editor.is_editing() {
            return Err(EditError::NotEditing.into());
        }

        let result = match self.editor.kind() {
            PlanKind::Custom => self
                .editor
                .replace_exercise(day, index, replacement)
                .map(|_| ())
                .map_err(SaveError::from),
            PlanKind::Standard => {
                let (plan_id, entry_id) = match self.standard_target(day, index) {
                    Ok(target) => target,
                    Err(e) => return self.report(Err(e), ""),
                };
                let api = &self.api;
                let new_id = replacement.id.clone();

                let result = optimistic(
                    &mut self.editor,
                    |editor| editor.replace_exercise(day, index, replacement),
                    |_previous| async move {
                        api.replace_plan_exercise(&plan_id, &entry_id, &new_id)
                            .await
                            .map(|_| ())
                    },
                )
                .await;

                if result.is_ok() {
                    self.server_changed = true;
                }
                result
            }
        };

        self.report(result, &format!("Exercise replaced with {}", replacement.name))
    }

    /// Remove a slot; the rest of the day is renumbered
    pub async fn remove_exercise(&mut self, day: usize, index: usize) -> Result<(), SaveError> {
        if !self.editor.is_editing() {
            return Err(EditError::NotEditing.into());
        }

        let result = match self.editor.kind() {
            PlanKind::Custom => self
                .editor
                .remove_exercise(day, index)
                .map(|_| ())
                .map_err(SaveError::from),
            PlanKind::Standard => {
                let (plan_id, entry_id) = match self.standard_target(day, index) {
                    Ok(target) => target,
                    Err(e) => return self.report(Err(e), ""),
                };
                let api = &self.api;

                let result = optimistic(
                    &mut self.editor,
                    |editor| editor.remove_exercise(day, index),
                    |_removed| async move {
                        api.delete_plan_exercise(&plan_id, &entry_id)
                            .await
                            .map(|_| ())
                    },
                )
                .await;

                if result.is_ok() {
                    self.server_changed = true;
                }
                result
            }
        };

        self.report(result, "Exercise removed")
    }

    /// Persist the draft through the path its plan kind requires. The draft
    /// is kept on any failure so the user can retry.
    pub async fn save(&mut self) -> Result<(), SaveError> {
        let draft = self.editor.draft().cloned().ok_or(EditError::NotEditing)?;

        let saved = match &draft {
            Plan::Custom(details) => self.save_custom(details).await,
            Plan::Standard(details) => self.save_standard(details).await,
        };

        let result = saved.map(|plan| {
            self.editor.commit(plan);
            self.server_changed = false;
        });

        self.report(result, "Plan saved")
    }

    async fn save_custom(&self, details: &PlanDetails) -> Result<Plan, SaveError> {
        let id = match &details.id {
            Some(id) => {
                let payload = details.to_custom_payload(false);
                tracing::info!(plan = %id, days = payload.days.len(), "Saving custom plan");
                self.api
                    .update_custom_plan(id, &payload)
                    .await
                    .map_err(SaveError::Request)?;
                id.clone()
            }
            None => {
                let payload = details.to_custom_payload(true);
                tracing::info!(days = payload.days.len(), "Creating custom plan");
                self.api
                    .create_custom_plan(&payload)
                    .await
                    .map_err(SaveError::Request)?
            }
        };

        Ok(self.reload_or_keep(PlanKind::Custom, &id, details).await)
    }

    async fn save_standard(&self, details: &PlanDetails) -> Result<Plan, SaveError> {
        let id = details.id.as_deref().ok_or(SaveError::MissingPlanId)?;

        let modified: Vec<(&str, ExerciseParamsUpdate)> = details
            .days
            .iter()
            .flat_map(|day| day.exercises.iter())
            .filter(|e| e.modified)
            .filter_map(|e| match &e.entry_id {
                Some(entry_id) => Some((entry_id.as_str(), ExerciseParamsUpdate::from(e))),
                None => {
                    tracing::warn!(exercise = %e.exercise_id, "Modified exercise has no server id");
                    None
                }
            })
            .collect();

        let total = 1 + modified.len();
        let mut completed = 0;

        let fail = |completed: usize, source: anyhow::Error| {
            if completed == 0 {
                SaveError::Request(source)
            } else {
                tracing::warn!(plan = id, completed, total, "Standard plan saved partially");
                SaveError::Partial {
                    completed,
                    total,
                    source,
                }
            }
        };

        tracing::info!(plan = id, updates = modified.len(), "Saving standard plan");

        self.api
            .update_standard_plan(id, &details.standard_update())
            .await
            .map_err(|e| fail(completed, e))?;
        completed += 1;

        for (entry_id, update) in &modified {
            self.api
                .update_plan_exercise(id, entry_id, update)
                .await
                .map_err(|e| fail(completed, e))?;
            completed += 1;
        }

        Ok(self.reload_or_keep(PlanKind::Standard, id, details).await)
    }

    /// The server may normalize what it stored, so read it back. If only the
    /// read fails, the draft stands in for the saved copy.
    async fn reload_or_keep(&self, kind: PlanKind, id: &str, details: &PlanDetails) -> Plan {
        match self.api.fetch_plan(kind, id).await {
            Ok(plan) => plan,
            Err(e) => {
                self.notifier
                    .warning(format!("Plan saved, but reloading it failed: {}", e));

                let mut fallback = details.clone();
                fallback.id = Some(id.to_string());
                for exercise in fallback.days.iter_mut().flat_map(|d| d.exercises.iter_mut()) {
                    exercise.modified = false;
                }
                Plan::new(kind, fallback)
            }
        }
    }

    /// Close the draft without saving. Standard plans that already had
    /// discrete calls applied are reloaded so the view matches the server.
    pub async fn cancel(&mut self) -> Result<()> {
        self.editor.cancel();

        if self.server_changed {
            if let Some(id) = self.editor.saved().id().map(str::to_string) {
                let plan = self.api.fetch_plan(self.editor.kind(), &id).await?;
                self.editor.commit(plan);
            }
            self.server_changed = false;
        }

        Ok(())
    }

    /// Make this plan the user's active plan
    pub async fn activate(&mut self) -> Result<(), SaveError> {
        let kind = self.editor.kind();
        let result = match self.editor.saved().id().map(str::to_string) {
            None => Err(SaveError::MissingPlanId),
            Some(id) => self
                .api
                .activate_plan(kind, &id)
                .await
                .map(|_| {
                    let mut saved = self.editor.saved().clone();
                    saved.details_mut().is_active = true;
                    self.editor.set_saved(saved);
                })
                .map_err(SaveError::Request),
        };

        self.report(result, "Plan activated")
    }

    fn report(&self, result: Result<(), SaveError>, success: &str) -> Result<(), SaveError> {
        match &result {
            Ok(()) => {
                self.notifier.success(success);
            }
            Err(e) => {
                self.notifier.error(e.to_string());
            }
        }
        result
    }
}
