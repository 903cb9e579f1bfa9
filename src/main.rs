mod app;
mod config;
mod display;
mod lookup;
mod replay;
mod theme;
mod trace;
mod ui;
mod users;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use config::AppConfig;
use theme::Theme;
use trace::TraceBuffer;
use users::UserId;

/// Filter used when RUST_LOG is not set and tracing is on
const TRACE_FILTER: &str = "lookup=debug,memo=debug,render=debug,rerender=info";

#[derive(Parser, Debug)]
#[command(name = "rerender")]
#[command(version)]
#[command(about = "Compare a naive lookup component with a memoized one, side by side")]
struct Args {
    /// User id selected at startup (overrides the config file)
    #[arg(short, long)]
    user: Option<UserId>,

    /// Run headless: comma-separated steps such as "force,force,select=2"
    #[arg(short, long, value_name = "STEPS")]
    replay: Option<String>,

    /// Print replay snapshots as JSON lines
    #[arg(long, requires = "replay")]
    json: bool,

    /// Disable lookup/render/memo traces
    #[arg(long)]
    no_trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let replay = args.replay.is_some();

    // Headless runs never write a default config file
    let loaded = AppConfig::load(!replay);
    let mut config = loaded.config;
    if let Some(user) = args.user {
        config.initial_user = user;
    }
    if args.no_trace {
        config.trace.enabled = false;
    }

    let (filter, sink) = log_plan(&config, replay);
    let console = match &sink {
        LogSink::Console(buffer) => Some(buffer.clone()),
        LogSink::Stderr | LogSink::Discard => None,
    };
    init_logging(filter, sink);
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    if let Some(script) = args.replay.as_deref() {
        return run_replay(&config, script, args.json);
    }

    ui::init_theme(Theme::from_config(&config.theme));
    run_tui(&config, console)
}

/// Where formatted trace events end up
#[derive(Debug)]
enum LogSink {
    Stderr,
    Console(TraceBuffer),
    /// TUI without a console: anything on stderr would garble the screen
    Discard,
}

/// Default filter and sink for this run; `RUST_LOG` still overrides the filter
fn log_plan(config: &AppConfig, replay: bool) -> (&'static str, LogSink) {
    let filter = if config.trace.enabled { TRACE_FILTER } else { "warn" };
    let sink = if replay {
        LogSink::Stderr
    } else if config.trace.enabled {
        LogSink::Console(TraceBuffer::new(config.trace.capacity))
    } else {
        LogSink::Discard
    };
    (filter, sink)
}

fn init_logging(default_filter: &str, sink: LogSink) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    match sink {
        LogSink::Stderr => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
        LogSink::Console(buffer) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .without_time()
                    .with_writer(move || buffer.writer()),
            )
            .init(),
        LogSink::Discard => registry.init(),
    }
}

fn run_replay(config: &AppConfig, script: &str, json: bool) -> Result<()> {
    let steps = replay::parse_steps(script).context("Invalid replay script")?;
    let mut app = App::new(config, None);

    for snapshot in replay::run(&mut app, &steps) {
        if json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            print!("{}", snapshot);
        }
    }
    Ok(())
}

fn run_tui(config: &AppConfig, console: Option<TraceBuffer>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, console);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Err(e) = app.handle_key(key) {
                        app.status_message = Some(format!("Error: {}", e));
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        app.tick();
    }
}
