// Terminal output: toasts, plan rendering and the exercise picker

mod picker;
mod plan_view;
mod toast;

pub use picker::{pick_exercise, PickerOutcome, PickerState};
pub use plan_view::{exercise_line, render_plan, render_plan_list};
pub use toast::{format_toast, Toasts};
