use anyhow::Result;

mod app;
mod input;
mod modal;
mod table;
mod view;

// Core TUI types for submodules via `super::...`.
use app::{App, Focus, Notice};
use modal::Modal;
use view::{RenderCtx, fmt_ts_ui, render_view_chrome};

pub fn run() -> Result<()> {
    run_with_options(crate::tui::TuiRunOptions::default())
}

pub fn run_with_options(opts: crate::tui::TuiRunOptions) -> Result<()> {
    app::run(opts)
}
