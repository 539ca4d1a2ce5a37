use clap::Parser;
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use folio::api::HttpApi;
use folio::core::Action;
use folio::core::config::{self, CliOverrides, FolioConfig};
use folio::core::storage::{FileStorage, MemoryStorage, Storage};
use folio::document::HtmlFileDocument;
use folio::render::RenderLoop;
use folio::router::{MemoryLocation, Router};
use folio::shell::{self, Command};

#[derive(Parser)]
#[command(name = "folio", about = "Hash-routed blog client with a line-command shell")]
struct Args {
    /// Backend base URL, e.g. http://localhost:8000/api
    #[arg(long)]
    api_base: Option<String>,

    /// Route to open first
    #[arg(long)]
    route: Option<String>,

    /// HTML file every committed page is written to
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON file holding the session and theme
    #[arg(long)]
    storage: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to folio.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("folio.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("{}, falling back to defaults", e);
        eprintln!("folio: {e}, falling back to defaults");
        FolioConfig::default()
    });
    let config = config::resolve(
        &file_config,
        &CliOverrides {
            api_base: args.api_base,
            storage: args.storage,
            route: args.route,
            out: args.out,
        },
    );
    info!("Folio starting up: {:?}", config);

    let storage: Arc<dyn Storage> = match FileStorage::open(config.storage_path.clone()) {
        Ok(storage) => {
            info!("Session stored in {}", storage.path().display());
            Arc::new(storage)
        }
        Err(e) => {
            warn!("{}; keeping this session in memory", e);
            eprintln!("folio: {e}; keeping this session in memory");
            Arc::new(MemoryStorage::new())
        }
    };

    let api = HttpApi::new(config.api_base.clone());
    info!("Backend at {}", api.base_url());

    let (location, changes) = MemoryLocation::new(&config.start_route);
    let render = RenderLoop::new(
        Arc::new(api),
        Router::new(location.clone()),
        HtmlFileDocument::new(config.output.clone()),
        storage,
    );

    let (actions_tx, actions_rx) = mpsc::unbounded_channel();
    tokio::spawn(read_commands(location, actions_tx));

    eprintln!(
        "folio: rendering to {} (type `help` for commands)",
        config.output.display()
    );
    let render = render.run(changes, actions_rx).await;
    info!("Folio exiting at {}", render.router().current_route());
    Ok(())
}

/// Feeds stdin commands to the loop. Returning drops the sender, which
/// stops the loop.
async fn read_commands(location: Arc<MemoryLocation>, actions: UnboundedSender<Action>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                break;
            }
        };

        match shell::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Dispatch(action))) => {
                if actions.send(action).is_err() {
                    break;
                }
            }
            Ok(Some(Command::Back)) => {
                if !location.back() {
                    eprintln!("folio: no earlier page");
                }
            }
            Ok(Some(Command::Forward)) => {
                if !location.forward() {
                    eprintln!("folio: no later page");
                }
            }
            Ok(Some(Command::Help)) => println!("{}", shell::HELP),
            Ok(Some(Command::Quit)) => break,
            Err(e) => eprintln!("folio: {e}"),
        }
    }
}
