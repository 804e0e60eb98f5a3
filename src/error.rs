use thiserror::Error;

/// Errors raised by local plan edits before anything reaches the server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("System plans can't be edited directly. Copy the plan first, then edit your copy.")]
    SystemPlan,

    #[error("No draft in progress; start editing first")]
    NotEditing,

    #[error("Day {0} does not exist")]
    DayOutOfRange(usize),

    #[error("Exercise {exercise} does not exist in day {day}")]
    ExerciseOutOfRange { day: usize, exercise: usize },

    #[error("Unknown exercise field: {0}")]
    UnknownField(String),

    #[error("Not supported for standard plans: {0}")]
    Unsupported(&'static str),

    #[error("Exercise has no server id; save the plan first")]
    MissingEntryId,
}

/// Errors raised while persisting a draft
#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("Plan has no id; create it before saving")]
    MissingPlanId,

    #[error("Save failed: {0:#}")]
    Request(anyhow::Error),

    /// Some of the discrete standard-plan calls already went through when a
    /// later one failed. Those changes stay on the server.
    #[error("Save stopped after {completed} of {total} requests: {source:#}")]
    Partial {
        completed: usize,
        total: usize,
        source: anyhow::Error,
    },
}

/// Validation errors for rating submissions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}
