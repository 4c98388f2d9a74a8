use std::error::Error;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use relay_chat::common::Session;
use relay_chat::config::{self, AppConfig};
use relay_chat::network::{ApiClient, ChatClient, PollIntervals};
use relay_chat::storage::{self, SessionStore};
use relay_chat::ui::ChatApp;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "relay_chat", version, about = "Desktop client for a REST chat backend")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Backend URL; `/api` is appended when missing
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Forget the stored session and exit
    Logout,
    /// Print the signed-in user and exit
    Whoami,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    app_config.apply_overrides(config::api_url_from_env(), cli.api_url);

    storage::ensure_parent_dir(&app_config.session_db)?;
    let store = SessionStore::with_path(&app_config.session_db)?;

    match cli.mode {
        Some(Mode::Logout) => {
            store.clear()?;
            println!("Signed out");
            Ok(())
        }
        Some(Mode::Whoami) => {
            match store.load()? {
                Some(session) => println!("{} (@{})", session.user.name, session.user.username),
                None => println!("not signed in"),
            }
            Ok(())
        }
        None => {
            let session = store.load()?;
            run_full_client(app_config, store, session).await
        }
    }
}

async fn run_full_client(
    app_config: AppConfig,
    store: SessionStore,
    session: Option<Session>,
) -> Result<(), Box<dyn Error>> {
    let base_url = app_config.base_url();
    let api = ApiClient::new(base_url.clone(), app_config.request_timeout())?
        .with_token(session.as_ref().map(|s| s.token.clone()));
    let intervals = PollIntervals {
        contacts: app_config.contacts_poll_interval(),
        thread: app_config.thread_poll_interval(),
    };

    // UI -> network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    tokio::spawn(async move {
        let client = ChatClient::new(api, store, intervals, event_tx, cmd_rx);
        if let Err(err) = client.run().await {
            log::error!("Network worker terminated: {err}");
        }
    });

    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let user = session.map(|s| s.user);

    match &user {
        Some(user) => log::info!("Resuming session for {}", user.username),
        None => log::info!("No stored session; showing sign-in"),
    }

    eframe::run_native(
        "Relay Chat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            Ok(Box::new(ChatApp::new(
                cc,
                user.clone(),
                base_url.clone(),
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )?;

    Ok(())
}
