use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tasktrack::{
    board::TaskBoard, client::TaskClient, config::ClientConfig, logging, status::LocalClock,
    ui::run_app,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ClientConfig::from_env()?;
    logging::init_file(&config.log_file)?;
    tracing::info!(api_url = %config.api_url, "starting task client");

    let api = TaskClient::new(config.api_url);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut board = TaskBoard::new();
    let result = run_app(&mut terminal, &mut board, &api, &LocalClock);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "terminal client failed");
        eprintln!("{:?}", err);
    }
    Ok(())
}
