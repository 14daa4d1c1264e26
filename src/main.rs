use std::{env, error::Error, io, time::Duration};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use roam_browser::app::App;
use roam_browser::constants::{
    CONTROL_CHANNEL_CAPACITY, DEFAULT_SEED_URL, EVENT_CHANNEL_CAPACITY, EVENT_POLL_TIMEOUT_MS,
};
use roam_browser::event_handler::{handle_key_event, handle_session_event};
use roam_browser::models::{ControlMessage, SessionEvent};
use roam_browser::session::{Session, SurfConfig, run_session};
use roam_browser::ui::ui;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Diagnostics go to stderr; the alternate screen owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let seed_url = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SEED_URL.to_string());
    let config = SurfConfig {
        seed_url: seed_url.clone(),
        ..SurfConfig::default()
    };

    // This hook catches panics and restores the terminal before printing the error
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Wire the control surface and status feed
    let (control_tx, control_rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let session_task = tokio::spawn(run_session(Session::new(config, event_tx), control_rx));

    let app = App::new(seed_url);
    let res = run_app(&mut terminal, app, control_tx, event_rx).await;

    // Teardown
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // run_app dropped its control sender, so the session loop winds down
    let _ = session_task.await;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    control: mpsc::Sender<ControlMessage>,
    mut events: mpsc::Receiver<SessionEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, &app))?;

        // Handle session events
        while let Ok(event) = events.try_recv() {
            handle_session_event(&mut app, event);
        }

        // Handle input events
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key_event(&mut app, key, &control).await
                {
                    return Ok(()); // Quit signal received
                }
            }
        }
    }
}
