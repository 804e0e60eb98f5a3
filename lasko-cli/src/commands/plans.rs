use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use lasko::editor::ExerciseField;
use lasko::models::{Day, PlanFeedback};
use lasko::{Exercise, Plan, PlanDetails, PlanKind, PlanSession};
use std::future::Future;
use std::time::Duration;

use super::{AppContext, PlanRef};
use crate::ui::{exercise_line, pick_exercise, render_plan, render_plan_list};

/// Run a request behind a spinner
pub(crate) async fn with_spinner<T, F>(message: &str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = future.await;
    spinner.finish_and_clear();
    result
}

pub async fn list_plans(
    ctx: &mut AppContext,
    custom_only: bool,
    standard_only: bool,
) -> Result<()> {
    let mut kinds = Vec::new();
    if !standard_only {
        kinds.push(PlanKind::Custom);
    }
    if !custom_only {
        kinds.push(PlanKind::Standard);
    }

    for kind in kinds {
        let plans = with_spinner("Loading plans...", ctx.api.list_plans(kind)).await?;

        let heading = match kind {
            PlanKind::Custom => "Custom Plans",
            PlanKind::Standard => "Standard Plans",
        };
        println!("{}", heading);
        println!("────────────────────────────────");
        if plans.is_empty() {
            println!("  None");
        } else {
            print!("{}", render_plan_list(&plans));
        }
        println!();
    }

    Ok(())
}

async fn open_session(ctx: &mut AppContext, plan: &PlanRef) -> Result<PlanSession> {
    let session = with_spinner(
        "Loading plan...",
        PlanSession::open(ctx.api.clone(), ctx.notifier.clone(), plan.kind(), &plan.id),
    )
    .await;
    ctx.flush();
    session
}

pub async fn show_plan(ctx: &mut AppContext, plan: &PlanRef) -> Result<()> {
    let session = open_session(ctx, plan).await?;
    print!("{}", render_plan(session.plan()));
    Ok(())
}

pub async fn edit_plan(ctx: &mut AppContext, plan: &PlanRef) -> Result<()> {
    let mut session = open_session(ctx, plan).await?;

    if !session.begin_edit() {
        ctx.flush();
        println!();
        println!("Use 'lasko plans copy {}' to make an editable copy.", plan.id);
        return Ok(());
    }

    run_editor(ctx, &mut session).await
}

/// Blank custom plan with `days` empty days
pub fn blank_plan(name: &str, days: u32) -> Plan {
    Plan::Custom(PlanDetails {
        name: name.to_string(),
        training_days_per_week: days,
        days: (1..=days).map(|n| Day::new(format!("Day {}", n), n)).collect(),
        ..Default::default()
    })
}

pub async fn new_plan(ctx: &mut AppContext, name: &str, days: u32) -> Result<()> {
    let mut session =
        PlanSession::for_new_plan(ctx.api.clone(), ctx.notifier.clone(), blank_plan(name, days));
    run_editor(ctx, &mut session).await
}

pub async fn copy_plan(
    ctx: &mut AppContext,
    plan: &PlanRef,
    name: Option<String>,
    edit: bool,
) -> Result<()> {
    let source = open_session(ctx, plan).await?;

    let mut copy = source.copy_template();
    if let Some(name) = name {
        copy.details_mut().name = name;
    }

    let mut session = PlanSession::for_new_plan(ctx.api.clone(), ctx.notifier.clone(), copy);
    if edit {
        return run_editor(ctx, &mut session).await;
    }

    let saved = session.save().await;
    ctx.flush();
    saved?;

    if let Some(id) = session.plan().id() {
        println!("New plan ID: {}", id);
    }
    Ok(())
}

pub async fn activate_plan(ctx: &mut AppContext, plan: &PlanRef) -> Result<()> {
    let mut session = open_session(ctx, plan).await?;
    let result = session.activate().await;
    ctx.flush();
    result?;
    Ok(())
}

pub async fn rate_plan(
    ctx: &mut AppContext,
    plan: &PlanRef,
    stars: u8,
    comment: Option<String>,
) -> Result<()> {
    let feedback = PlanFeedback::new(stars, comment)?;

    match ctx
        .api
        .submit_plan_feedback(plan.kind(), &plan.id, &feedback)
        .await
    {
        Ok(_) => {
            ctx.notifier
                .success(format!("Rated plan {} {}", plan.id, feedback.stars()));
            Ok(())
        }
        Err(e) => {
            ctx.notifier.error(format!("Rating failed: {}", e));
            Err(e)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Rename,
    Describe,
    AddDay,
    RenameDay,
    RemoveDay,
    AddExercise,
    ReplaceExercise,
    RemoveExercise,
    EditParameters,
    Save,
    Discard,
}

impl EditAction {
    pub fn label(&self) -> &'static str {
        match self {
            EditAction::Rename => "Rename plan",
            EditAction::Describe => "Edit description",
            EditAction::AddDay => "Add day",
            EditAction::RenameDay => "Rename day",
            EditAction::RemoveDay => "Remove day",
            EditAction::AddExercise => "Add exercise",
            EditAction::ReplaceExercise => "Replace exercise",
            EditAction::RemoveExercise => "Remove exercise",
            EditAction::EditParameters => "Edit sets / reps / rest",
            EditAction::Save => "Save",
            EditAction::Discard => "Discard changes",
        }
    }

    /// Standard plans have no endpoints for adding slots or changing days
    pub fn available(kind: PlanKind) -> Vec<EditAction> {
        use EditAction::*;
        match kind {
            PlanKind::Custom => vec![
                Rename, Describe, AddDay, RenameDay, RemoveDay, AddExercise, ReplaceExercise,
                RemoveExercise, EditParameters, Save, Discard,
            ],
            PlanKind::Standard => vec![
                Rename, Describe, ReplaceExercise, RemoveExercise, EditParameters, Save, Discard,
            ],
        }
    }
}

/// Catalog fetched on first use
struct Catalog {
    exercises: Option<Vec<Exercise>>,
}

impl Catalog {
    async fn get(&mut self, ctx: &AppContext) -> Result<Vec<Exercise>> {
        if let Some(exercises) = &self.exercises {
            return Ok(exercises.clone());
        }

        let exercises = with_spinner(
            "Loading exercise catalog...",
            ctx.api.list_exercises(ctx.config.api.catalog_limit),
        )
        .await?;
        self.exercises = Some(exercises.clone());
        Ok(exercises)
    }
}

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn choose_day(session: &PlanSession) -> Result<Option<usize>> {
    let days = session.plan().days();
    if days.is_empty() {
        println!("This plan has no days yet.");
        return Ok(None);
    }

    let labels: Vec<String> = days
        .iter()
        .map(|day| format!("Day {}: {} ({} exercises)", day.order, day.title, day.exercises.len()))
        .collect();

    let index = Select::with_theme(&theme())
        .with_prompt("Day")
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(index)
}

fn choose_exercise(session: &PlanSession) -> Result<Option<(usize, usize)>> {
    let Some(day) = choose_day(session)? else {
        return Ok(None);
    };

    let exercises = &session.plan().days()[day].exercises;
    if exercises.is_empty() {
        println!("That day has no exercises.");
        return Ok(None);
    }

    let labels: Vec<String> = exercises
        .iter()
        .map(|e| format!("{}. {}", e.order, exercise_line(e)))
        .collect();

    let index = Select::with_theme(&theme())
        .with_prompt("Exercise")
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(index.map(|i| (day, i)))
}

fn prompt_text(prompt: &str, initial: &str) -> Result<String> {
    let value = Input::<String>::with_theme(&theme())
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

fn report_edit<T>(ctx: &AppContext, result: Result<T, lasko::EditError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            ctx.notifier.warning(e.to_string());
            None
        }
    }
}

/// Menu loop over an open draft. Returns once the draft is saved or discarded.
async fn run_editor(ctx: &mut AppContext, session: &mut PlanSession) -> Result<()> {
    let actions = EditAction::available(session.editor().kind());
    let labels: Vec<&str> = actions.iter().map(EditAction::label).collect();
    let mut catalog = Catalog { exercises: None };
    let delay = Duration::from_millis(ctx.config.ui.search_debounce_ms);

    loop {
        println!();
        print!("{}", render_plan(session.plan()));
        if session.editor().is_dirty() {
            println!("(unsaved changes)");
        }
        println!();

        let Some(choice) = Select::with_theme(&theme())
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact_opt()?
        else {
            continue;
        };

        match actions[choice] {
            EditAction::Rename => {
                let name = prompt_text("Plan name", &session.plan().details().name)?;
                report_edit(ctx, session.set_name(name.trim()));
            }
            EditAction::Describe => {
                let current = session.plan().details().description.clone();
                let description = prompt_text("Description", &current)?;
                report_edit(ctx, session.set_description(description.trim()));
            }
            EditAction::AddDay => {
                let next = session.plan().days().len() + 1;
                let title = prompt_text("Day title", &format!("Day {}", next))?;
                report_edit(ctx, session.add_day(title.trim()));
            }
            EditAction::RenameDay => {
                if let Some(day) = choose_day(session)? {
                    let current = session.plan().days()[day].title.clone();
                    let title = prompt_text("Day title", &current)?;
                    report_edit(ctx, session.rename_day(day, title.trim()));
                }
            }
            EditAction::RemoveDay => {
                if let Some(day) = choose_day(session)? {
                    report_edit(ctx, session.remove_day(day));
                }
            }
            EditAction::AddExercise => {
                if let Some(day) = choose_day(session)? {
                    let exercises = catalog.get(ctx).await?;
                    if let Some(exercise) = pick_exercise("Add exercise", exercises, delay)? {
                        report_edit(ctx, session.add_exercise(day, &exercise));
                    }
                }
            }
            EditAction::ReplaceExercise => {
                if let Some((day, index)) = choose_exercise(session)? {
                    let exercises = catalog.get(ctx).await?;
                    if let Some(exercise) = pick_exercise("Replace exercise", exercises, delay)? {
                        // Outcome is reported through the notifier
                        let _ = session.replace_exercise(day, index, &exercise).await;
                    }
                }
            }
            EditAction::RemoveExercise => {
                if let Some((day, index)) = choose_exercise(session)? {
                    let _ = session.remove_exercise(day, index).await;
                }
            }
            EditAction::EditParameters => {
                if let Some((day, index)) = choose_exercise(session)? {
                    edit_parameters(ctx, session, day, index)?;
                }
            }
            EditAction::Save => {
                if session.save().await.is_ok() {
                    ctx.flush();
                    if let Some(id) = session.plan().id() {
                        println!("Plan ID: {}", id);
                    }
                    return Ok(());
                }
            }
            EditAction::Discard => {
                let confirmed = !session.editor().is_dirty()
                    || Confirm::with_theme(&theme())
                        .with_prompt("Discard unsaved changes?")
                        .default(false)
                        .interact()?;
                if confirmed {
                    session.cancel().await?;
                    println!("Changes discarded.");
                    return Ok(());
                }
            }
        }

        ctx.flush();
    }
}

fn edit_parameters(
    ctx: &AppContext,
    session: &mut PlanSession,
    day: usize,
    index: usize,
) -> Result<()> {
    let fields = [
        ("Sets", ExerciseField::TargetSets),
        ("Reps", ExerciseField::TargetReps),
        ("Rest seconds", ExerciseField::RestSeconds),
    ];
    let labels: Vec<&str> = fields.iter().map(|(label, _)| *label).collect();

    let Some(choice) = Select::with_theme(&theme())
        .with_prompt("Field")
        .items(&labels)
        .default(0)
        .interact_opt()?
    else {
        return Ok(());
    };
    let (label, field) = fields[choice];

    let Some(slot) = report_edit(ctx, session.editor().exercise(day, index)) else {
        return Ok(());
    };
    let current = match field {
        ExerciseField::TargetSets => slot.target_sets.clone(),
        ExerciseField::TargetReps => slot.target_reps.clone(),
        ExerciseField::RestSeconds => slot.rest_seconds.to_string(),
    };

    let value = prompt_text(label, &current)?;
    report_edit(ctx, session.update_exercise_field(day, index, field, &value));
    Ok(())
}
