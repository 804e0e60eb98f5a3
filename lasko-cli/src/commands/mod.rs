mod config_cmd;
mod exercises;
mod plans;
mod schedule;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use lasko::{ApiClient, Config, Notifier, PlanKind};
use std::path::PathBuf;

use crate::ui::Toasts;

pub use exercises::ExercisesCommand;
pub use schedule::ScheduleSetCommand;

#[derive(Parser)]
#[command(name = "lasko")]
#[command(
    about = "Edit, schedule and rate Lasko training plans from the terminal",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "LASKO_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse, edit and activate training plans
    #[command(subcommand)]
    Plans(PlansSubcommands),

    /// Search the exercise catalog
    Exercises(ExercisesCommand),

    /// Assign training days to the week
    #[command(subcommand)]
    Schedule(ScheduleSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Plan id plus the endpoint family it lives in
#[derive(Args, Debug, Clone)]
pub struct PlanRef {
    /// Plan ID
    pub id: String,

    /// The id refers to a custom plan rather than a standard one
    #[arg(long)]
    pub custom: bool,
}

impl PlanRef {
    pub fn kind(&self) -> PlanKind {
        if self.custom {
            PlanKind::Custom
        } else {
            PlanKind::Standard
        }
    }
}

#[derive(Subcommand)]
enum PlansSubcommands {
    /// List your plans
    List {
        /// Only custom plans
        #[arg(long, conflicts_with = "standard")]
        custom: bool,

        /// Only standard plans
        #[arg(long)]
        standard: bool,
    },

    /// Show a plan's days and exercises
    Show(PlanRef),

    /// Edit a plan interactively
    Edit(PlanRef),

    /// Build a new custom plan interactively
    New {
        /// Plan name
        #[arg(short, long)]
        name: String,

        /// Training days per week
        #[arg(
            short,
            long,
            default_value = "3",
            value_parser = clap::value_parser!(u32).range(1..=7)
        )]
        days: u32,
    },

    /// Copy a plan into a new custom plan you own
    Copy {
        #[command(flatten)]
        plan: PlanRef,

        /// Name for the copy
        #[arg(short, long)]
        name: Option<String>,

        /// Open the copy in the editor before saving
        #[arg(short, long)]
        edit: bool,
    },

    /// Make a plan your active plan
    Activate(PlanRef),

    /// Rate a plan
    Rate {
        #[command(flatten)]
        plan: PlanRef,

        /// Rating from 1 to 5
        #[arg(short, long)]
        stars: u8,

        /// Optional comment
        #[arg(short, long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand)]
enum ScheduleSubcommands {
    /// Show the saved weekly schedule
    Show,

    /// Save training days for the active plan
    Set(ScheduleSetCommand),
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// What an authenticated command needs: configuration, an API client and a
/// notifier whose toasts are printed as they arrive
pub struct AppContext {
    pub config: Config,
    pub api: ApiClient,
    pub notifier: Notifier,
    pub toasts: Toasts,
}

impl AppContext {
    pub fn connect(config: Config) -> Result<Self> {
        if !config.is_authenticated() {
            bail!(
                "Not logged in. Set LASKO_TOKEN or add a token to the [auth] section \
                 of the config file."
            );
        }

        let api = ApiClient::new(&config)?;
        let notifier = Notifier::new();
        let toasts = Toasts::new(&notifier);

        Ok(Self {
            config,
            api,
            notifier,
            toasts,
        })
    }

    /// Print pending toasts
    pub fn flush(&mut self) {
        self.toasts.flush();
    }

    /// Print what is left and cancel the dismissal timers
    pub fn finish(mut self) {
        self.toasts.flush();
        self.notifier.shutdown();
    }
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        match &self.command {
            Commands::Config(subcmd) => {
                let path = match &self.config {
                    Some(path) => path.clone(),
                    None => Config::config_file()?,
                };
                return match subcmd {
                    ConfigSubcommands::Show => config_cmd::show_config(&path).await,
                    ConfigSubcommands::Edit => config_cmd::edit_config(&path).await,
                    ConfigSubcommands::Init { force } => {
                        config_cmd::init_config(&path, *force).await
                    }
                };
            }
            Commands::Completions { shell } => {
                generate_completions(*shell);
                return Ok(());
            }
            _ => {}
        }

        let mut ctx = AppContext::connect(self.load_config()?)?;

        let result = match self.command {
            Commands::Plans(subcmd) => match subcmd {
                PlansSubcommands::List { custom, standard } => {
                    plans::list_plans(&mut ctx, custom, standard).await
                }
                PlansSubcommands::Show(plan) => plans::show_plan(&mut ctx, &plan).await,
                PlansSubcommands::Edit(plan) => plans::edit_plan(&mut ctx, &plan).await,
                PlansSubcommands::New { name, days } => {
                    plans::new_plan(&mut ctx, &name, days).await
                }
                PlansSubcommands::Copy { plan, name, edit } => {
                    plans::copy_plan(&mut ctx, &plan, name, edit).await
                }
                PlansSubcommands::Activate(plan) => plans::activate_plan(&mut ctx, &plan).await,
                PlansSubcommands::Rate {
                    plan,
                    stars,
                    comment,
                } => plans::rate_plan(&mut ctx, &plan, stars, comment).await,
            },
            Commands::Exercises(cmd) => cmd.execute(&mut ctx).await,
            Commands::Schedule(subcmd) => match subcmd {
                ScheduleSubcommands::Show => schedule::show_schedule(&mut ctx).await,
                ScheduleSubcommands::Set(cmd) => cmd.execute(&mut ctx).await,
            },
            Commands::Config(_) | Commands::Completions { .. } => Ok(()),
        };

        ctx.finish();
        result
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
