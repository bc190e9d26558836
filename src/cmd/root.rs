use crate::calc::today;
use crate::data::AppSettings;
use crate::ui::week_view::{App, run_app};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;

pub fn run(settings: &AppSettings) -> Result<()> {
    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut app = App::new(today(), settings.planner_options())?;
    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    // Hand the final summary to the shell so it can be copied or piped.
    let summary = app.summary();
    if !summary.is_empty() {
        println!("{summary}");
    }

    result
}
