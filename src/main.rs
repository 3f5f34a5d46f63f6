use crossterm::event::EventStream;
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    io::{self, Stdout},
    path::PathBuf,
};
use tokio::sync::mpsc;

const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod commit_view;
mod config;
mod events;
mod git_repo;
mod logging;
mod redraw;
mod refresh_task;
mod repo_data;
mod scroll;
mod terminal;
mod theme;
mod ui;

use app::App;
use config::Config;
use events::EventResult;
use redraw::{RedrawRequest, RedrawSender};

#[tokio::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    // Handle --version / -V
    if let Some(arg) = env::args().nth(1) {
        if arg == "--version" || arg == "-V" {
            println!("lzlog {}", VERSION);
            return Ok(());
        }
    }

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default().with_env_overrides(), Some(e)),
    };
    if let Err(e) = logging::init(&config) {
        eprintln!("lzlog: cannot open log file: {e}");
    }
    if let Some(e) = config_error {
        tracing::warn!("{e}; using default settings");
    }

    let start_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let repo_root = git_repo::repo_root(&start_path).map_err(|e| {
        io::Error::other(format!("{} is not a git repository: {e}", start_path.display()))
    })?;

    let (redraw, redraw_rx) = RedrawSender::channel();
    let mut app = App::new(repo_root, redraw, &config);

    let terminal_guard = terminal::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    app.start();
    let result = run(&mut terminal, &mut app, redraw_rx).await;
    drop(terminal_guard);

    if let Err(e) = &result {
        tracing::error!("event loop failed: {e}");
    }
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    mut redraw_rx: mpsc::Receiver<RedrawRequest>,
) -> io::Result<()> {
    // Create event stream for async terminal event handling
    let mut event_stream = EventStream::new();

    loop {
        terminal.draw(|f| app.draw(f))?;

        tokio::select! {
            Some(_) = redraw_rx.recv() => {
                // One frame covers every request queued so far.
                while redraw_rx.try_recv().is_ok() {}
            }
            event = event_stream.next() => match event {
                Some(Ok(event)) => {
                    if let EventResult::Quit = events::handle_event(app, event) {
                        return Ok(());
                    }
                }
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            },
        }
    }
}
