use std::io::IsTerminal;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use super::*;

/// Raw mode and the alternate screen, restored when dropped (including on early error).
struct ConsoleTerminal {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl ConsoleTerminal {
    fn enter() -> Result<Self> {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            anyhow::bail!(
                "the console needs an interactive terminal; use a subcommand instead (see `studio --help`)"
            );
        }
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err).context("enter alternate screen");
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                Err(err).context("create terminal")
            }
        }
    }
}

impl Drop for ConsoleTerminal {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

pub(in crate::tui_shell) fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    let mut console = ConsoleTerminal::enter()?;
    console.terminal.clear().context("clear terminal")?;

    let mut app = App::load(opts);
    app.poll_session(true);
    event_loop::run_loop(&mut console.terminal, &mut app)
}
