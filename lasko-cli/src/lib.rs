// Library exports for the Lasko CLI so command helpers can be tested

pub mod commands;
pub mod ui;
