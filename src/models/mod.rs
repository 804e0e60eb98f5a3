// Data models shared by the editor, the REST client and the CLI

pub mod exercise;
pub mod feedback;
pub mod plan;
pub mod schedule;
pub mod wire;

pub use exercise::*;
pub use feedback::*;
pub use plan::*;
pub use schedule::*;
