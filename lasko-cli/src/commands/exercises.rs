use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lasko::catalog::ExerciseQuery;

use super::plans::with_spinner;
use super::AppContext;

#[derive(Args)]
pub struct ExercisesCommand {
    /// Filter by muscle group (exact, case-insensitive)
    #[arg(short, long)]
    muscle: Option<String>,

    /// Filter by exercise type (exact, case-insensitive)
    #[arg(short, long)]
    r#type: Option<String>,

    /// Search names and descriptions
    #[arg(short, long)]
    search: Option<String>,

    /// Number of catalog entries to request (defaults to the configured limit)
    #[arg(short, long)]
    limit: Option<usize>,
}

impl ExercisesCommand {
    pub fn query(&self) -> ExerciseQuery {
        ExerciseQuery {
            muscle_group: self.muscle.clone(),
            exercise_type: self.r#type.clone(),
            search: self.search.clone(),
        }
    }

    pub async fn execute(self, ctx: &mut AppContext) -> Result<()> {
        let limit = self.limit.unwrap_or(ctx.config.api.catalog_limit);
        let loading = with_spinner("Loading exercise catalog...", ctx.api.list_exercises(limit));
        let exercises = match loading.await {
            Ok(exercises) => exercises,
            Err(e) => {
                ctx.notifier.error(format!("Failed to load exercises: {}", e));
                return Err(e);
            }
        };

        let query = self.query();
        let matches = query.apply(&exercises);

        println!("Exercises ({} of {})", matches.len(), exercises.len());
        println!("────────────────────────────────");

        if matches.is_empty() {
            println!("No exercises match these filters.");
            return Ok(());
        }

        for exercise in matches {
            let kind = exercise.exercise_type.as_deref().unwrap_or("-");
            println!("{:>6}  {}  {}", exercise.id, exercise, kind.dimmed());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        cmd: ExercisesCommand,
    }

    #[test]
    fn test_flags_build_query() {
        let args = ["exercises", "--muscle", "Chest", "--search", "press"];
        let harness = Harness::try_parse_from(args).unwrap();
        let query = harness.cmd.query();

        assert_eq!(query.muscle_group.as_deref(), Some("Chest"));
        assert_eq!(query.search.as_deref(), Some("press"));
        assert_eq!(query.exercise_type, None);
    }
}
