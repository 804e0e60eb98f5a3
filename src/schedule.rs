//! Weekday assignment for the active plan.

use std::collections::BTreeSet;

use crate::models::{WeeklySchedule, Weekday};

/// Fixed weekday layout for 1..=7 training days. Counts outside the range
/// are clamped.
pub fn default_schedule(training_days_per_week: u32) -> BTreeSet<Weekday> {
    use Weekday::*;

    let days: &[Weekday] = match training_days_per_week.clamp(1, 7) {
        1 => &[Monday],
        2 => &[Monday, Thursday],
        3 => &[Monday, Wednesday, Friday],
        4 => &[Monday, Tuesday, Thursday, Friday],
        5 => &[Monday, Tuesday, Wednesday, Thursday, Friday],
        6 => &[Monday, Tuesday, Wednesday, Thursday, Friday, Saturday],
        _ => &Weekday::ALL,
    };

    days.iter().copied().collect()
}

/// Result of clicking a weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// The cap is reached; nothing changed
    Rejected,
}

/// Editable weekday set capped at the plan's training days per week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleAssigner {
    capacity: usize,
    days: BTreeSet<Weekday>,
    notifications_enabled: bool,
}

impl ScheduleAssigner {
    /// Start from the default layout for the plan
    pub fn seeded(training_days_per_week: u32) -> Self {
        Self {
            capacity: training_days_per_week.clamp(1, 7) as usize,
            days: default_schedule(training_days_per_week),
            notifications_enabled: true,
        }
    }

    /// Start from a saved schedule. Extra days beyond the cap are dropped
    /// from the end of the week.
    pub fn from_saved(training_days_per_week: u32, saved: WeeklySchedule) -> Self {
        let capacity = training_days_per_week.clamp(1, 7) as usize;
        let days = saved.training_days.into_iter().take(capacity).collect();

        Self {
            capacity,
            days,
            notifications_enabled: saved.notifications_enabled,
        }
    }

    /// Start with nothing selected
    pub fn empty(training_days_per_week: u32) -> Self {
        Self {
            capacity: training_days_per_week.clamp(1, 7) as usize,
            days: BTreeSet::new(),
            notifications_enabled: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn days(&self) -> &BTreeSet<Weekday> {
        &self.days
    }

    pub fn is_full(&self) -> bool {
        self.days.len() >= self.capacity
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn set_notifications(&mut self, enabled: bool) {
        self.notifications_enabled = enabled;
    }

    /// Selected days are always removed; new days are added only below the cap
    pub fn toggle(&mut self, day: Weekday) -> Toggle {
        if self.days.remove(&day) {
            return Toggle::Removed;
        }

        if self.is_full() {
            tracing::warn!(%day, capacity = self.capacity, "Schedule is full");
            return Toggle::Rejected;
        }

        self.days.insert(day);
        Toggle::Added
    }

    pub fn to_request(&self) -> WeeklySchedule {
        WeeklySchedule {
            training_days: self.days.clone(),
            notifications_enabled: self.notifications_enabled,
        }
    }
}
