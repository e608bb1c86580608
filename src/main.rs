use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use boardpass::{
    cli::{self, Cli, Commands},
    config::Config,
    service::{BoardingPassService, SimulatedService},
    tui::App,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "boardpass=info");
    }

    let config = Config::from_env()?;
    config.validate()?;

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(&config, interactive);

    let mut service = SimulatedService::new(config.submit_delay());
    if let Some(seed) = config.submission.seed {
        service = service.with_seed(seed);
    }
    let service: Arc<dyn BoardingPassService> = Arc::new(service);

    match cli.command {
        None | Some(Commands::Tui) => run_tui(config, service).await,
        Some(Commands::Airlines { json }) => {
            print!("{}", cli::format_airlines(json)?);
            Ok(())
        }
        Some(Commands::Generate { airline, pnr, last_name, json }) => {
            let result = cli::generate(
                service,
                config.submit_timeout(),
                &airline,
                &pnr,
                &last_name,
            )
            .await?;

            let output = cli::format_result(&result, json)?;
            if result.success {
                print!("{}", output);
            } else {
                eprint!("{}", output);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Log to the configured file, and to stderr as well when not drawing the TUI
fn init_logging(config: &Config, interactive: bool) {
    let directory = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = config
        .log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "boardpass.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env());

    // The terminal belongs to the TUI while it runs
    let stderr_layer = (!interactive).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

async fn run_tui(config: Config, service: Arc<dyn BoardingPassService>) -> Result<()> {
    info!("Starting boarding pass TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, service);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(_) => {
            info!("Boarding pass TUI exited successfully");
            Ok(())
        }
        Err(e) => {
            error!("Boarding pass TUI encountered an error: {}", e);
            Err(e)
        }
    }
}
