//! Command-line runtime for the EcoCampus core.
//!
//! This binary is the thin integration layer between the library and a
//! terminal. It plays the part a mobile shell would: it owns the event loop,
//! talks to the store worker thread, and executes the actions returned by the
//! library's event handler.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │      Main Thread        │
//! │  ┌──────────────────┐   │
//! │  │ AppState (app)   │   │  ← event handling, derived feed state
//! │  └──────────────────┘   │
//! │          │  mpsc        │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │ StoreWorker      │   │  ← JSON store operations
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Commands
//!
//! - `feed [--category <name>]`: ranked feed (default)
//! - `featured`: featured carousel
//! - `search <query>`: articles matching the query
//! - `categories`: category chips
//! - `users [--search <query>]`: user directory (administrators only)
//!
//! Every command accepts `--config <path>` pointing at a TOML file.

#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ecocampus::app::FeedStatus;
use ecocampus::domain::{Article, UserRecord};
use ecocampus::worker::{spawn_worker, StoreWorker, WorkerHandle, WorkerMessage};
use ecocampus::{handle_event, Action, AppState, Config, Event, Result};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Print the ranked feed.
    Feed {
        /// Only show one category.
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the featured carousel.
    Featured,
    /// Print the articles matching a query.
    Search { query: String },
    /// Print the category chips.
    Categories,
    /// Print the user directory (administrators only).
    Users {
        /// Only show users whose name or email contains this text.
        #[arg(long)]
        search: Option<String>,
    },
}

/// Runtime wrapper pairing the library state with the worker connection.
struct Runtime {
    app: AppState,
    worker: WorkerHandle,
    /// Messages posted whose response has not been handled yet.
    pending: usize,
}

impl Runtime {
    fn new(config: &Config) -> Result<Self> {
        let worker = spawn_worker(StoreWorker::open(config)?)?;
        Ok(Self {
            app: ecocampus::initialize(config),
            worker,
            pending: 0,
        })
    }

    /// Feeds one event through the handler and executes the resulting actions.
    fn dispatch(&mut self, event: &Event) -> Result<()> {
        let (should_render, actions) = handle_event(&mut self.app, event)?;
        tracing::debug!(
            action_count = actions.len(),
            should_render = should_render,
            "event handled successfully"
        );
        for action in actions {
            self.execute_action(action)?;
        }
        Ok(())
    }

    fn post(&mut self, message: WorkerMessage) -> Result<()> {
        tracing::debug!(operation = message.operation().as_str(), "posting message to worker");
        self.worker.post(message)?;
        self.pending += 1;
        Ok(())
    }

    /// Handles worker responses until every posted message has been answered,
    /// including messages posted while handling responses.
    fn drain(&mut self) -> Result<()> {
        while self.pending > 0 {
            let response = self.worker.recv()?;
            self.pending -= 1;
            self.dispatch(&Event::WorkerResponse(response))?;
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::PostToWorker(message) => self.post(message)?,
            Action::ShowAlert { title, message } => {
                eprintln!("{title}: {message}");
            }
            Action::NavigateToArticle(id) => {
                tracing::debug!(id = %id, "navigate to article");
            }
            Action::NavigateToLogin => {
                tracing::debug!("navigate to login");
            }
        }
        Ok(())
    }

    fn shutdown(self) -> Result<()> {
        self.worker.shutdown()
    }
}

fn print_articles(articles: &[Article]) {
    for article in articles {
        let mut flags = String::new();
        if article.is_new {
            flags.push('N');
        }
        if article.featured {
            flags.push('*');
        }
        println!(
            "{:>4}  {:<2}  {:<12}  {:<14}  {}",
            article.id.to_string(),
            flags,
            article.date,
            article.category,
            article.title
        );
    }
}

fn print_users(users: &[UserRecord]) {
    for user in users {
        println!(
            "{:<4}  {:<8}  {:<24}  {}",
            user.initials(),
            user.role.label(),
            user.name,
            user.email
        );
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    ecocampus::observability::init_tracing(&config);

    let span = tracing::debug_span!("cli_run", command = ?cli.command);
    let _guard = span.entered();

    let mut runtime = Runtime::new(&config)?;
    runtime.post(WorkerMessage::load_session())?;
    runtime.dispatch(&Event::Refresh)?;
    runtime.drain()?;

    let loaded = runtime.app.status != FeedStatus::Failed;
    tracing::info!(
        articles = runtime.app.articles.len(),
        user = runtime.app.display_name(),
        "feed loaded"
    );

    match cli.command.unwrap_or(Command::Feed { category: None }) {
        Command::Feed { category } => {
            if let Some(category) = category {
                runtime.dispatch(&Event::SelectCategory(category))?;
            }
            print_articles(&runtime.app.visible);
        }
        Command::Featured => print_articles(&runtime.app.featured),
        Command::Search { query } => {
            runtime.dispatch(&Event::OpenSearch)?;
            runtime.dispatch(&Event::SearchInput(query))?;
            runtime.dispatch(&Event::SubmitSearch)?;
            print_articles(&runtime.app.search.results);
        }
        Command::Categories => {
            for category in &runtime.app.categories {
                println!("{category}");
            }
        }
        Command::Users { search } => {
            runtime.dispatch(&Event::OpenUserManagement)?;
            runtime.drain()?;
            if let Some(search) = search {
                runtime.dispatch(&Event::SearchUsers(search))?;
            }
            print_users(&runtime.app.users.visible);
        }
    }

    runtime.shutdown()?;
    Ok(loaded)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "ecocampus failed");
            eprintln!("ecocampus: {e}");
            ExitCode::FAILURE
        }
    }
}
