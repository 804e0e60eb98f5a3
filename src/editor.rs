//! Local plan editing.
//!
//! [`PlanEditor`] keeps the last saved plan and, while editing, a separate
//! draft. Every mutation touches the draft only; the saved copy changes when
//! the caller commits the server's version after a successful save.

use std::str::FromStr;

use crate::error::EditError;
use crate::models::{Day, Exercise, Plan, PlanExercise, PlanKind};

/// Editable training parameters of a plan slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseField {
    TargetSets,
    TargetReps,
    RestSeconds,
}

impl FromStr for ExerciseField {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "target_sets" | "targetSets" | "sets" => Ok(ExerciseField::TargetSets),
            "target_reps" | "targetReps" | "reps" => Ok(ExerciseField::TargetReps),
            "rest_seconds" | "restSeconds" | "rest" => Ok(ExerciseField::RestSeconds),
            other => Err(EditError::UnknownField(other.to_string())),
        }
    }
}

/// Digits only, parsed as seconds. Empty input is 0, overflow saturates.
pub fn sanitize_rest_seconds(value: &str) -> u32 {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }

    digits.parse().unwrap_or(u32::MAX)
}

/// Keep digits and '-' so "8-12" survives while letters are dropped
pub fn sanitize_range(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Build the "copy and edit" starting point for a template: an unsaved
/// custom plan with no owner and no server ids.
pub fn copy_for_edit(plan: &Plan) -> Plan {
    let mut details = plan.details().clone();
    details.id = None;
    details.owner_id = None;
    details.is_active = false;
    details.name = format!("{} (copy)", details.name);

    for day in &mut details.days {
        day.id = None;
        for exercise in &mut day.exercises {
            exercise.entry_id = None;
            exercise.modified = false;
        }
    }

    Plan::new(PlanKind::Custom, details)
}

#[derive(Debug, Clone)]
pub struct PlanEditor {
    saved: Plan,
    draft: Option<Plan>,
}

impl PlanEditor {
    pub fn new(plan: Plan) -> Self {
        Self {
            saved: plan,
            draft: None,
        }
    }

    /// Editor for a plan that has never been saved; the draft starts open
    pub fn for_new_plan(plan: Plan) -> Self {
        Self {
            saved: plan.clone(),
            draft: Some(plan),
        }
    }

    pub fn saved(&self) -> &Plan {
        &self.saved
    }

    pub fn draft(&self) -> Option<&Plan> {
        self.draft.as_ref()
    }

    /// The draft while editing, otherwise the saved plan
    pub fn current(&self) -> &Plan {
        self.draft.as_ref().unwrap_or(&self.saved)
    }

    pub fn kind(&self) -> PlanKind {
        self.saved.kind()
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.as_ref().is_some_and(|draft| *draft != self.saved)
    }

    /// Open a draft. System templates are refused and no draft is created.
    pub fn begin_edit(&mut self) -> Result<&Plan, EditError> {
        if self.saved.is_system() {
            tracing::warn!(plan = ?self.saved.id(), "Refusing to edit a system plan");
            return Err(EditError::SystemPlan);
        }

        let saved = &self.saved;
        Ok(self.draft.get_or_insert_with(|| saved.clone()))
    }

    /// Throw the draft away
    pub fn cancel(&mut self) {
        if self.draft.take().is_some() {
            tracing::debug!(plan = ?self.saved.id(), "Discarded draft");
        }
    }

    /// Accept the server's copy as the new saved state and close the draft
    pub fn commit(&mut self, plan: Plan) {
        self.saved = plan;
        self.draft = None;
    }

    /// Replace the saved copy while keeping the draft open
    pub fn set_saved(&mut self, plan: Plan) {
        self.saved = plan;
    }

    /// Copy of the draft for rollback
    pub fn snapshot(&self) -> Option<Plan> {
        self.draft.clone()
    }

    pub fn restore(&mut self, snapshot: Plan) {
        self.draft = Some(snapshot);
    }

    fn draft_mut(&mut self) -> Result<&mut Plan, EditError> {
        self.draft.as_mut().ok_or(EditError::NotEditing)
    }

    fn day_mut(&mut self, day: usize) -> Result<&mut Day, EditError> {
        self.draft_mut()?
            .details_mut()
            .days
            .get_mut(day)
            .ok_or(EditError::DayOutOfRange(day))
    }

    fn exercise_mut(&mut self, day: usize, index: usize) -> Result<&mut PlanExercise, EditError> {
        self.day_mut(day)?
            .exercises
            .get_mut(index)
            .ok_or(EditError::ExerciseOutOfRange { day, exercise: index })
    }

    pub fn exercise(&self, day: usize, index: usize) -> Result<&PlanExercise, EditError> {
        self.current()
            .days()
            .get(day)
            .ok_or(EditError::DayOutOfRange(day))?
            .exercises
            .get(index)
            .ok_or(EditError::ExerciseOutOfRange { day, exercise: index })
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), EditError> {
        self.draft_mut()?.details_mut().name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), EditError> {
        self.draft_mut()?.details_mut().description = description.into();
        Ok(())
    }

    /// Append a catalog exercise with default parameters. Returns `false`
    /// and leaves the day untouched when the exercise is already there.
    pub fn add_exercise(&mut self, day: usize, exercise: &Exercise) -> Result<bool, EditError> {
        if self.kind() == PlanKind::Standard {
            return Err(EditError::Unsupported("adding exercises"));
        }

        let target = self.day_mut(day)?;
        if target.contains_exercise(&exercise.id) {
            tracing::debug!(day, exercise = %exercise.id, "Exercise already in day");
            return Ok(false);
        }

        let order = target.exercises.len() as u32 + 1;
        target
            .exercises
            .push(PlanExercise::from_catalog(exercise, order));
        Ok(true)
    }

    /// Remove a slot and renumber the rest of the day
    pub fn remove_exercise(&mut self, day: usize, index: usize) -> Result<PlanExercise, EditError> {
        let target = self.day_mut(day)?;
        if index >= target.exercises.len() {
            return Err(EditError::ExerciseOutOfRange { day, exercise: index });
        }

        let removed = target.exercises.remove(index);
        target.renumber();
        Ok(removed)
    }

    pub fn update_exercise_field(
        &mut self,
        day: usize,
        index: usize,
        field: ExerciseField,
        value: &str,
    ) -> Result<(), EditError> {
        let exercise = self.exercise_mut(day, index)?;

        match field {
            ExerciseField::RestSeconds => exercise.rest_seconds = sanitize_rest_seconds(value),
            ExerciseField::TargetSets => exercise.target_sets = sanitize_range(value),
            ExerciseField::TargetReps => exercise.target_reps = sanitize_range(value),
        }
        exercise.modified = true;

        Ok(())
    }

    /// Swap the exercise in a slot, keeping sets, reps and rest. Returns the
    /// slot as it was before the swap.
    pub fn replace_exercise(
        &mut self,
        day: usize,
        index: usize,
        replacement: &Exercise,
    ) -> Result<PlanExercise, EditError> {
        let slot = self.exercise_mut(day, index)?;
        let previous = slot.clone();

        slot.exercise_id = replacement.id.clone();
        slot.name = replacement.name.clone();
        slot.muscle_group = replacement.muscle_group.clone();

        Ok(previous)
    }

    /// Append an empty day; returns its index
    pub fn add_day(&mut self, title: impl Into<String>) -> Result<usize, EditError> {
        if self.kind() == PlanKind::Standard {
            return Err(EditError::Unsupported("adding days"));
        }

        let days = &mut self.draft_mut()?.details_mut().days;
        let order = days.len() as u32 + 1;
        days.push(Day::new(title, order));
        Ok(days.len() - 1)
    }

    /// Remove a day and renumber the remaining days
    pub fn remove_day(&mut self, index: usize) -> Result<Day, EditError> {
        if self.kind() == PlanKind::Standard {
            return Err(EditError::Unsupported("removing days"));
        }

        let days = &mut self.draft_mut()?.details_mut().days;
        if index >= days.len() {
            return Err(EditError::DayOutOfRange(index));
        }

        let removed = days.remove(index);
        for (i, day) in days.iter_mut().enumerate() {
            day.order = i as u32 + 1;
        }
        Ok(removed)
    }

    pub fn rename_day(&mut self, index: usize, title: impl Into<String>) -> Result<(), EditError> {
        if self.kind() == PlanKind::Standard {
            return Err(EditError::Unsupported("renaming days"));
        }

        self.day_mut(index)?.title = title.into();
        Ok(())
    }
}
