use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::{self, OpenOptions},
    io::{self, stdin, Write},
    path::PathBuf,
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;
use typist::{
    app::{Action, App},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    passage::{PassageError, PassageLibrary},
    personal_best::{FileStore, KeyValueStore},
    runtime::{AppEvent, ChannelEventSource, EventSource, FixedTicker, Runner, Ticker},
    settings::{Difficulty, Mode},
    timer::Clock,
    typing_test::TypingTest,
};

/// typing speed test with live wpm, accuracy and personal bests
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a passage as fast and as accurately as you can. Words per minute and accuracy update live, and your best run is kept as a personal best to beat."
)]
pub struct Cli {
    /// passage difficulty (defaults to the last one used)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// timed: 60 second countdown, passage: untimed until the passage is typed
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// custom passage to type, used for every difficulty
    #[clap(short = 'p', long, conflicts_with = "passages")]
    prompt: Option<String>,

    /// directory holding easy.json, medium.json and hard.json passage files
    #[clap(long)]
    passages: Option<PathBuf>,

    /// log file location (defaults to the state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn passage_library(&self) -> Result<PassageLibrary, PassageError> {
        match (&self.prompt, &self.passages) {
            (Some(prompt), _) => PassageLibrary::single(prompt.clone()),
            (None, Some(dir)) => PassageLibrary::from_dir(dir),
            (None, None) => PassageLibrary::embedded(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    if let Err(err) = init_tracing(log_path) {
        eprintln!("logging disabled: {err:#}");
    }

    let config_store = FileConfigStore::new();
    let config = config_store.load().merged(cli.difficulty, cli.mode);
    let library = cli
        .passage_library()
        .context("unable to load passages")?;
    let test = TypingTest::new(Box::new(library), config.difficulty, config.mode)?;
    let mut app = App::new(test, FileStore::with_path(AppDirs::store_path()));
    tracing::info!(difficulty = %config.difficulty, mode = %config.mode, "starting");

    let outcome = {
        let _guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let runner = Runner::new(ChannelEventSource::terminal(), FixedTicker::default());
        start_tui(&mut terminal, &mut app, &runner)
    };

    if let Err(err) = config_store.save(&app.config()) {
        tracing::warn!(error = %err, "unable to save config");
    }

    outcome
}

/// Raw mode plus the alternate screen, undone on drop so every exit path
/// leaves the terminal usable
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = restore_terminal(&mut io::stdout()) {
            tracing::warn!(error = %err, "unable to restore terminal");
        }
    }
}

fn restore_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen, Show)
}

fn init_tracing(path: PathBuf) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("unable to open {}", path.display()))?;

    let filter = EnvFilter::try_from_env("TYPIST_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the terminal UI, so everything goes to the file
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))
}

fn start_tui<B, S, C, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C>,
    runner: &Runner<E, T>,
) -> anyhow::Result<()>
where
    B: Backend,
    S: KeyValueStore,
    C: Clock,
    E: EventSource,
    T: Ticker,
{
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        // ticks only flow while an attempt is running
        let Some(event) = runner.next_event(app.needs_ticks()) else {
            break;
        };

        match event {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Action::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
