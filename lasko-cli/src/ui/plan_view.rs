use colored::Colorize;
use lasko::{Plan, PlanExercise};
use std::fmt::Write;

/// "Squat (Legs)  4 x 8, rest 90s"
pub fn exercise_line(exercise: &PlanExercise) -> String {
    let name = match &exercise.muscle_group {
        Some(group) => format!("{} ({})", exercise.name, group),
        None => exercise.name.clone(),
    };

    let marker = if exercise.modified { " *" } else { "" };
    format!(
        "{}  {} x {}, rest {}s{}",
        name, exercise.target_sets, exercise.target_reps, exercise.rest_seconds, marker
    )
}

fn badges(plan: &Plan) -> String {
    let mut badges = vec![if plan.is_custom() { "custom" } else { "standard" }];
    if plan.is_system() {
        badges.push("system");
    }
    if plan.details().is_active {
        badges.push("active");
    }
    format!("[{}]", badges.join(", "))
}

/// Full plan with every day and slot
pub fn render_plan(plan: &Plan) -> String {
    let details = plan.details();
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", details.name.bold(), badges(plan).dimmed());
    if let Some(id) = plan.id() {
        let _ = writeln!(out, "  ID: {}", id);
    }
    if !details.description.is_empty() {
        let _ = writeln!(out, "  {}", details.description);
    }

    let mut meta = vec![format!("{} days/week", details.training_days_per_week)];
    meta.extend(details.goal_type.clone());
    meta.extend(details.difficulty_level.clone());
    let _ = writeln!(out, "  {}", meta.join(" · "));
    let _ = writeln!(out, "────────────────────────────────");

    if details.days.is_empty() {
        let _ = writeln!(out, "  No days yet");
    }

    for day in &details.days {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", format!("Day {}: {}", day.order, day.title).cyan());
        if day.exercises.is_empty() {
            let _ = writeln!(out, "  (no exercises)");
        }
        for exercise in &day.exercises {
            let _ = writeln!(out, "  {}. {}", exercise.order, exercise_line(exercise));
        }
    }

    out
}

/// One line per plan
pub fn render_plan_list(plans: &[Plan]) -> String {
    let mut out = String::new();
    for plan in plans {
        let active = if plan.details().is_active {
            "●".green().to_string()
        } else {
            " ".to_string()
        };
        let _ = writeln!(
            out,
            "{} {:>6}  {}  {}",
            active,
            plan.id().unwrap_or("-"),
            plan.details().name,
            badges(plan).dimmed()
        );
    }
    out
}
