use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use gesture_catalog::api::{ApiClient, SessionStore};
use gesture_catalog::config::Config;
use gesture_catalog::logging::init_tracing;
use gesture_catalog::model::{Credentials, Gesture, PictureFile};
use gesture_catalog::store::{Mutation, Store};

#[derive(Debug, Parser)]
#[command(name = "gesture-catalog", version, about = "Browse and edit a hand-gesture catalogue")]
struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log in as this user before running the command
    #[arg(long, global = true, requires = "password")]
    username: Option<String>,

    /// Password for --username
    #[arg(long, global = true, requires = "username")]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List one page of gestures
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Free-text filter
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one gesture from the first page of a search
    Show {
        id: String,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Delete a gesture and everything attached to it
    DeleteGesture { id: String },
    /// Upload a picture for a gesture
    UploadPicture {
        gesture_id: String,
        file: PathBuf,
        /// Languages as a ';'-separated list, e.g. "fr;us"
        #[arg(long, default_value = "")]
        langs: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    let api = ApiClient::new(&config.api, SessionStore::new()).context("building API client")?;
    tracing::debug!(base_url = %api.base_url(), "Using catalogue backend");
    let store = Store::new(api, &config.search);

    if let (Some(username), Some(password)) = (cli.username, cli.password) {
        if !store.login(&Credentials::new(username, password)).await {
            report(&store);
            return Ok(false);
        }
    }

    let ok = match cli.command {
        Command::List { page, search } => {
            let ok = list(&store, page, search).await;
            if ok {
                for gesture in store.gestures() {
                    print_gesture(&gesture);
                }
                let search = store.search();
                println!("page {}/{}", search.page, search.total_pages);
            }
            ok
        }
        Command::Show { id, search } => {
            if !list(&store, 1, search).await {
                report(&store);
                return Ok(false);
            }
            store.select_gesture(Some(id.clone()));
            let Some(gesture) = store.selected_gesture() else {
                bail!("gesture '{}' is not on the first page of results", id);
            };
            println!("{}", serde_json::to_string_pretty(&gesture)?);
            true
        }
        Command::DeleteGesture { id } => store.delete_gesture(&id).await,
        Command::UploadPicture {
            gesture_id,
            file,
            langs,
        } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading picture '{}'", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "picture".to_string());
            let langs: Vec<String> = langs
                .split(';')
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect();

            store
                .add_picture(&gesture_id, &langs, PictureFile::new(file_name, bytes))
                .await
        }
    };

    report(&store);
    Ok(ok)
}

async fn list(store: &Store, page: u32, search: String) -> bool {
    store.commit(Mutation::SetSearch(search));
    store.set_page(page).await
}

fn report(store: &Store) {
    if let Some(notification) = store.notification() {
        if notification.success {
            println!("{}", notification.message);
        } else {
            eprintln!("{}", notification.message);
        }
    }
}

fn print_gesture(gesture: &Gesture) {
    let summary = gesture
        .descriptions
        .first()
        .map(|d| d.value.as_str())
        .unwrap_or("(no description)");
    println!(
        "{}  {}  [{} meanings, {} pictures]",
        gesture.id,
        summary,
        gesture.meanings.len(),
        gesture.pictures.len()
    );
}
