pub mod config;
pub mod console;
pub mod error;
pub mod forms;
pub mod model;
pub mod remote;
pub mod tui;

mod tui_shell;
