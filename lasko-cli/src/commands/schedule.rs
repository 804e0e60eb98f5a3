use anyhow::{anyhow, Result};
use clap::Args;
use lasko::models::{WeeklySchedule, Weekday};
use lasko::schedule::{default_schedule, Toggle};
use lasko::{ApiClient, Notifier, Plan, PlanKind, ScheduleAssigner};
use std::collections::BTreeSet;

use super::plans::with_spinner;
use super::AppContext;

#[derive(Args)]
pub struct ScheduleSetCommand {
    /// Training days, comma separated (e.g. Monday,Wed,Fri)
    #[arg(short, long, value_delimiter = ',')]
    days: Vec<Weekday>,

    /// Training days per week; defaults to the active plan's
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=7))]
    per_week: Option<u32>,

    /// Send training-day reminders
    #[arg(long, conflicts_with = "no_notify")]
    notify: bool,

    /// Turn training-day reminders off
    #[arg(long)]
    no_notify: bool,
}

/// The plan currently marked active, custom plans first
async fn active_plan(api: &ApiClient) -> Result<Option<Plan>> {
    for kind in [PlanKind::Custom, PlanKind::Standard] {
        let plans = api.list_plans(kind).await?;
        if let Some(plan) = plans.into_iter().find(|p| p.details().is_active) {
            return Ok(Some(plan));
        }
    }
    Ok(None)
}

fn format_days(days: impl IntoIterator<Item = Weekday>) -> String {
    let names: Vec<&str> = days.into_iter().map(|d| d.name()).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Toggle each requested day on an empty schedule, warning once per day
/// that does not fit
pub fn assign_days(
    per_week: u32,
    days: &[Weekday],
    notifications_enabled: bool,
    notifier: &Notifier,
) -> ScheduleAssigner {
    let mut assigner = ScheduleAssigner::empty(per_week);
    assigner.set_notifications(notifications_enabled);

    for day in days {
        if assigner.days().contains(day) {
            continue;
        }
        if assigner.toggle(*day) == Toggle::Rejected {
            notifier.warning(format!(
                "You can only pick {} training days; {} was left out",
                assigner.capacity(),
                day
            ));
        }
    }

    assigner
}

fn today_line(training_days: &BTreeSet<Weekday>, today: Weekday) -> String {
    if training_days.contains(&today) {
        format!("{} (training day)", today)
    } else {
        format!("{} (rest day)", today)
    }
}

pub async fn show_schedule(ctx: &mut AppContext) -> Result<()> {
    let saved = with_spinner("Loading schedule...", ctx.api.get_schedule()).await?;

    println!("Weekly Schedule");
    println!("────────────────────────────────");

    match saved {
        Some(schedule) => {
            println!(
                "  Training days: {}",
                format_days(schedule.training_days.iter().copied())
            );
            println!(
                "  Reminders:     {}",
                if schedule.notifications_enabled { "on" } else { "off" }
            );
            println!(
                "  Today:         {}",
                today_line(&schedule.training_days, Weekday::today())
            );
        }
        None => {
            println!("  No schedule saved yet.");
            if let Some(plan) = active_plan(&ctx.api).await? {
                let per_week = plan.details().training_days_per_week;
                println!(
                    "  Suggested for {} ({} days/week): {}",
                    plan.details().name,
                    per_week,
                    format_days(default_schedule(per_week))
                );
            }
        }
    }

    Ok(())
}

impl ScheduleSetCommand {
    fn notifications(&self) -> Option<bool> {
        match (self.notify, self.no_notify) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    pub async fn execute(self, ctx: &mut AppContext) -> Result<()> {
        let per_week = match self.per_week {
            Some(n) => n,
            None => with_spinner("Looking up the active plan...", active_plan(&ctx.api))
                .await?
                .map(|plan| plan.details().training_days_per_week)
                .ok_or_else(|| anyhow!("No active plan; pass --per-week"))?,
        };

        let saved: Option<WeeklySchedule> = ctx.api.get_schedule().await?;
        let notifications = self
            .notifications()
            .or(saved.as_ref().map(|s| s.notifications_enabled))
            .unwrap_or(ctx.config.schedule.notifications_enabled);

        let assigner = if !self.days.is_empty() {
            assign_days(per_week, &self.days, notifications, &ctx.notifier)
        } else {
            let mut assigner = match saved {
                Some(schedule) => ScheduleAssigner::from_saved(per_week, schedule),
                None => ScheduleAssigner::seeded(per_week),
            };
            assigner.set_notifications(notifications);
            assigner
        };
        ctx.flush();

        match ctx.api.save_schedule(&assigner.to_request()).await {
            Ok(_) => {
                ctx.notifier.success(format!(
                    "Schedule saved: {}",
                    format_days(assigner.days().iter().copied())
                ));
                Ok(())
            }
            Err(e) => {
                ctx.notifier.error(format!("Failed to save schedule: {}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lasko::Severity;

    #[test]
    fn test_extra_days_are_rejected_with_warning() {
        let notifier = Notifier::new();
        let days = [
            Weekday::Monday,
            Weekday::Wednesday,
            Weekday::Friday,
            Weekday::Sunday,
        ];

        let assigner = assign_days(3, &days, true, &notifier);

        assert_eq!(format_days(assigner.days().iter().copied()), "Monday, Wednesday, Friday");
        let warnings = notifier.active();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
        assert!(warnings[0].message.contains("Sunday"));
    }

    #[test]
    fn test_today_line_marks_rest_days() {
        let days: BTreeSet<Weekday> = [Weekday::Monday, Weekday::Thursday].into_iter().collect();
        assert_eq!(today_line(&days, Weekday::Thursday), "Thursday (training day)");
        assert_eq!(today_line(&days, Weekday::Friday), "Friday (rest day)");
    }

    #[test]
    fn test_repeated_day_is_not_toggled_off() {
        let notifier = Notifier::new();
        let assigner = assign_days(2, &[Weekday::Tuesday, Weekday::Tuesday], false, &notifier);

        assert_eq!(assigner.days().len(), 1);
        assert!(!assigner.notifications_enabled());
        assert!(notifier.active().is_empty());
    }
}
