use anyhow::Context as _;
use calloop::{
    EventLoop,
    signals::{Signal, Signals},
};
use clap::{Parser, Subcommand};
use magpie::{
    Shell,
    config::{self, RuntimeConfig},
    headless::HeadlessToolkit,
    ipc,
    launcher::CommandLauncher,
};
use smithay::utils::Rectangle;
use std::{backtrace::Backtrace, fs, path::PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Workspace-aware window management shell", long_about = None)]
struct Cli {
    /// Read this config file instead of ~/.config/magpie/magpie.config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of workspaces, overriding the config file
    #[arg(long)]
    workspaces: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the windows of a running session
    Clients,
    /// Print the workspace ring of a running session
    Workspaces,
    /// Send a raw command to a running session, e.g. `send key alt+ctrl+up`
    Send {
        #[arg(required = true, trailing_var_arg = true)]
        words: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let request = match &cli.command {
        Some(Command::Clients) => Some("clients".to_owned()),
        Some(Command::Workspaces) => Some("workspaces".to_owned()),
        Some(Command::Send { words }) => Some(words.join(" ")),
        None => None,
    };
    if let Some(request) = request {
        let socket = ipc::find_socket()?;
        let output = ipc::send_command(&socket, &request)?;
        print!("{output}");
        return Ok(());
    }

    init_logging()?;
    std::panic::set_hook(Box::new(|panic_info| {
        let backtrace = Backtrace::force_capture();
        tracing::error!("panic: {panic_info}\n{backtrace}");
        eprintln!("panic: {panic_info}\n{backtrace}");
    }));

    let mut config = load_config(&cli)?;
    if let Some(count) = cli.workspaces {
        config.set_workspaces(count);
    }

    run_session(config)
}

fn load_config(cli: &Cli) -> anyhow::Result<RuntimeConfig> {
    match &cli.config {
        Some(path) => config::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let loaded = config::load_or_create_default().context("failed to load config")?;
            tracing::info!(path = %loaded.path.display(), "config loaded");
            Ok(loaded.config)
        }
    }
}

fn run_session(config: RuntimeConfig) -> anyhow::Result<()> {
    let mut event_loop: EventLoop<Shell<HeadlessToolkit, CommandLauncher>> =
        EventLoop::try_new().context("failed to create event loop")?;

    let output = Rectangle::new((0, 0).into(), (config.output_width, config.output_height).into());
    let mut toolkit = HeadlessToolkit::new(output).with_panel_height(config.panel_height);
    toolkit.set_loop_signal(event_loop.get_signal());

    let launcher_app = toolkit.register_app("launcher");
    let launcher = CommandLauncher::new(config.launcher.clone()).with_app(launcher_app.id);

    let mut shell = Shell::new(toolkit, launcher, config);
    shell.spawn_wallpaper();

    let socket = ipc::socket_path()?;
    ipc::init_ipc_listener(&event_loop.handle(), &socket)?;

    let signals = Signals::new(&[Signal::SIGINT, Signal::SIGTERM])
        .context("failed to install signal handlers")?;
    event_loop
        .handle()
        .insert_source(signals, |event, _, shell| {
            tracing::info!(signal = ?event.signal(), "shutting down");
            shell.toolkit.stop();
        })
        .map_err(|err| anyhow::anyhow!("failed to register signal source: {err}"))?;

    tracing::info!(socket = %socket.display(), "magpie running");
    let result = event_loop
        .run(None, &mut shell, |_| {})
        .context("event loop failed");

    if let Err(err) = fs::remove_file(&socket) {
        tracing::warn!("failed to remove ipc socket {}: {err}", socket.display());
    }
    result
}

const DEFAULT_LOG_FILTER: &str = "magpie=debug";

fn log_dir() -> anyhow::Result<PathBuf> {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME")
        && !state.is_empty()
    {
        return Ok(PathBuf::from(state).join("magpie"));
    }

    let home = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .context("unable to resolve log directory: HOME and XDG_STATE_HOME are unset")?;
    Ok(PathBuf::from(home).join(".local").join("state").join("magpie"))
}

fn init_logging() -> anyhow::Result<()> {
    let log_dir = log_dir()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "magpie.log");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender),
        )
        .init();

    let log_file = log_dir.join("magpie.log");
    tracing::info!(path = %log_file.display(), "logging initialized");

    Ok(())
}
