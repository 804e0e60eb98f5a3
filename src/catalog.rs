//! Client-side filtering of the exercise catalog.

use std::time::{Duration, Instant};

use crate::models::Exercise;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Catalog filter. Blank fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseQuery {
    pub muscle_group: Option<String>,
    pub exercise_type: Option<String>,
    pub search: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn equals_ignore_case(field: &Option<String>, wanted: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|value| value.trim().to_lowercase() == wanted)
}

impl ExerciseQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        non_blank(&self.muscle_group).is_none()
            && non_blank(&self.exercise_type).is_none()
            && non_blank(&self.search).is_none()
    }

    /// Muscle group and type match exactly, ignoring case; search text is a
    /// case-insensitive substring of the name or the description.
    pub fn matches(&self, exercise: &Exercise) -> bool {
        if let Some(group) = non_blank(&self.muscle_group) {
            if !equals_ignore_case(&exercise.muscle_group, &group) {
                return false;
            }
        }

        if let Some(kind) = non_blank(&self.exercise_type) {
            if !equals_ignore_case(&exercise.exercise_type, &kind) {
                return false;
            }
        }

        if let Some(text) = non_blank(&self.search) {
            let in_name = exercise.name.to_lowercase().contains(&text);
            let in_description = exercise
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&text));
            if !in_name && !in_description {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, exercises: &'a [Exercise]) -> Vec<&'a Exercise> {
        exercises.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Distinct muscle groups in catalog order, for filter pickers
pub fn muscle_groups(exercises: &[Exercise]) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for group in exercises.iter().filter_map(|e| e.muscle_group.as_ref()) {
        if !groups.iter().any(|g| g.eq_ignore_ascii_case(group)) {
            groups.push(group.clone());
        }
    }
    groups
}

/// Single cancel-and-reschedule timer. Each `push` replaces the pending
/// value and restarts the delay; `poll` hands the value out once the delay
/// has passed without another push.
#[derive(Debug)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if !ready {
            return None;
        }

        self.pending.take().map(|(value, _)| value)
    }

    /// Hand out the pending value now, without waiting for the deadline
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}
