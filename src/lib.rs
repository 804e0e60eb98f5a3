// Lasko client core: plan editing, schedule assignment, catalog queries and
// the REST client they talk through.

pub mod api;
pub mod catalog;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod notify;
pub mod persistence;
pub mod schedule;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use editor::PlanEditor;
pub use error::{EditError, FeedbackError, SaveError};
pub use models::{Day, Exercise, Plan, PlanDetails, PlanExercise, PlanKind};
pub use notify::{Notification, NotificationEvent, Notifier, Severity};
pub use persistence::PlanSession;
pub use schedule::ScheduleAssigner;
