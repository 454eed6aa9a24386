//! Storefront CLI - browse the app catalog, search with AI suggestions,
//! open listings and simulate installs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_core::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use storefront_core::render;
use storefront_core::{
    CatalogEntry, DetailView, GeminiClient, GenAiConfig, InstallState, Review, SearchSession,
    Storefront, TextGenerator, Ticket,
};

type Store = Storefront<dyn TextGenerator>;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "App marketplace storefront with AI-generated suggestions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: Format,

    /// Generative API key (falls back to API_KEY)
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used for suggestions and reviews
    #[arg(long, global = true, env = "STOREFRONT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Generative API base URL
    #[arg(long, global = true, env = "STOREFRONT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true, env = "STOREFRONT_TIMEOUT")]
    timeout_secs: Option<u64>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog grouped by category
    Home,

    /// Search the catalog and fetch AI suggestions
    Search {
        /// Search query
        query: String,
    },

    /// Show a listing with its reviews
    Show {
        /// Listing id
        id: String,
    },

    /// Simulate installing a listing
    Install {
        /// Listing id
        id: String,
    },

    /// Interactive session
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match cli.api_key {
        Some(key) => GenAiConfig::new(Some(key)),
        None => GenAiConfig::from_env(),
    }
    .with_model(cli.model)
    .with_endpoint(cli.endpoint)
    .with_timeout(cli.timeout_secs.map(Duration::from_secs));

    let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new());
    let store: Store = Storefront::new(config, generator);

    match cli.command {
        Commands::Home => run_home(&store, cli.format)?,
        Commands::Search { query } => run_search(&store, &query, cli.format).await?,
        Commands::Show { id } => run_show(&store, &id, cli.format).await?,
        Commands::Install { id } => run_install(&store, &id, cli.format).await?,
        Commands::Shell => run_shell(&store).await?,
    }

    Ok(())
}

/// Show a spinner on stderr while `fut` runs
async fn with_spinner<F: Future>(message: &str, fut: F) -> Result<F::Output> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.magenta} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    pb.finish_and_clear();
    Ok(out)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn run_home(store: &Store, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(store.catalog().entries()),
        Format::Text => {
            print!("{}", render::home(store.catalog()));
            Ok(())
        }
    }
}

async fn run_search(store: &Store, query: &str, format: Format) -> Result<()> {
    let mut session = store.open_search(query);

    if format == Format::Text {
        print!("{}", render::search_local(&session));
    }

    if session.wants_suggestions() {
        let task = store.suggestions_task(&session);
        let (ticket, entries) = if format == Format::Text && store.ai_enabled() {
            with_spinner("Generating suggestions...", task).await?
        } else {
            task.await
        };
        session.apply_suggestions(ticket, entries);
    }

    match format {
        Format::Json => print_json(&session),
        Format::Text => {
            print!("{}", render::search_suggestions(&session));
            Ok(())
        }
    }
}

fn detail_json(view: &DetailView) -> serde_json::Value {
    serde_json::json!({
        "entry": view.entry,
        "reviews": view.reviews,
        "install": view.install.state(),
    })
}

async fn run_show(store: &Store, id: &str, format: Format) -> Result<()> {
    let Some(entry) = store.lookup(id, None) else {
        println!("{}", render::APP_NOT_FOUND);
        return Ok(());
    };

    let (mut view, task) = store.navigate_detail(entry);
    if format == Format::Text {
        print!("{}", render::detail_header(&view));
    }

    if let Some(task) = task {
        let (ticket, reviews) = if format == Format::Text && store.ai_enabled() {
            with_spinner("Loading reviews...", task).await?
        } else {
            task.await
        };
        view.apply_reviews(ticket, reviews);
    }

    match format {
        Format::Json => print_json(&detail_json(&view)),
        Format::Text => {
            print!("{}", render::reviews(&view));
            Ok(())
        }
    }
}

async fn run_install(store: &Store, id: &str, format: Format) -> Result<()> {
    let Some(entry) = store.lookup(id, None) else {
        println!("{}", render::APP_NOT_FOUND);
        return Ok(());
    };

    let view = store.open_detail(entry);
    let mut rx = view.install.subscribe();
    view.install.start();

    loop {
        let state = *rx.borrow_and_update();
        match format {
            Format::Json => println!(
                "{}",
                serde_json::json!({ "id": view.entry.id, "state": state })
            ),
            Format::Text => println!("{}: {}", view.entry.name, render::install_label(state)),
        }
        if state == InstallState::Installed {
            break;
        }
        rx.changed().await.context("Install state channel closed")?;
    }

    Ok(())
}

// ─── Interactive shell ──────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum ShellCommand {
    Home,
    Search(String),
    Show(String),
    Install(String),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };

    match (verb, arg) {
        ("", _) => ShellCommand::Empty,
        ("home", _) => ShellCommand::Home,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", _) => ShellCommand::Quit,
        ("search" | "s", query) => ShellCommand::Search(query.to_string()),
        ("show" | "open", id) if !id.is_empty() => ShellCommand::Show(id.to_string()),
        ("install", id) if !id.is_empty() => ShellCommand::Install(id.to_string()),
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

const SHELL_HELP: &str = "Commands: home | search <query> | show <id> | install <id> | help | quit";

/// Generated content delivered back to the shell loop
enum ShellEvent {
    Suggestions(Ticket, Vec<CatalogEntry>),
    Reviews(Ticket, Vec<Review>),
}

async fn run_shell(store: &Store) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ShellEvent>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut search: Option<SearchSession> = None;
    let mut detail: Option<DetailView> = None;

    println!("{}", SHELL_HELP);
    if !store.ai_enabled() {
        println!("(AI suggestions and reviews are disabled: no API key)");
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match parse_command(&line) {
                    ShellCommand::Empty => {}
                    ShellCommand::Quit => break,
                    ShellCommand::Help => println!("{}", SHELL_HELP),
                    ShellCommand::Unknown(cmd) => println!("Unknown command: {}\n{}", cmd, SHELL_HELP),
                    ShellCommand::Home => print!("{}", render::home(store.catalog())),
                    ShellCommand::Search(query) => {
                        search = Some(begin_search(store, &query, &tx));
                    }
                    ShellCommand::Show(id) => {
                        let Some(entry) = store.lookup(&id, search.as_ref()) else {
                            println!("{}", render::APP_NOT_FOUND);
                            continue;
                        };
                        detail = Some(open_listing(store, entry, &tx));
                    }
                    ShellCommand::Install(id) => {
                        let already_open = detail.as_ref().is_some_and(|d| d.entry.id == id);
                        if !already_open {
                            let Some(entry) = store.lookup(&id, search.as_ref()) else {
                                println!("{}", render::APP_NOT_FOUND);
                                continue;
                            };
                            detail = Some(open_listing(store, entry, &tx));
                        }
                        if let Some(view) = detail.as_ref() {
                            spawn_install_printer(view);
                        }
                    }
                }
            }
            Some(event) = rx.recv() => match event {
                ShellEvent::Suggestions(ticket, entries) => {
                    if let Some(session) = search.as_mut() {
                        if session.apply_suggestions(ticket, entries) {
                            print!("{}", render::search_suggestions(session));
                        }
                    }
                }
                ShellEvent::Reviews(ticket, reviews) => {
                    if let Some(view) = detail.as_mut() {
                        if view.apply_reviews(ticket, reviews) {
                            print!("{}", render::reviews(view));
                        }
                    }
                }
            },
        }
    }

    Ok(())
}

/// Print local results and, unless the query is blank, fetch suggestions
/// in the background
fn begin_search(
    store: &Store,
    query: &str,
    tx: &mpsc::UnboundedSender<ShellEvent>,
) -> SearchSession {
    let session = store.open_search(query);
    print!("{}", render::search_local(&session));
    print!("{}", render::search_suggestions(&session));

    if session.wants_suggestions() {
        let task = store.suggestions_task(&session);
        let tx = tx.clone();
        tokio::spawn(async move {
            let (ticket, entries) = task.await;
            let _ = tx.send(ShellEvent::Suggestions(ticket, entries));
        });
    }
    session
}

/// Show a listing and fetch its reviews in the background when it has none
fn open_listing(
    store: &Store,
    entry: CatalogEntry,
    tx: &mpsc::UnboundedSender<ShellEvent>,
) -> DetailView {
    let (view, task) = store.navigate_detail(entry);
    print!("{}", render::detail_header(&view));
    print!("{}", render::reviews(&view));

    if let Some(task) = task {
        let tx = tx.clone();
        tokio::spawn(async move {
            let (ticket, reviews) = task.await;
            let _ = tx.send(ShellEvent::Reviews(ticket, reviews));
        });
    }
    view
}

/// Start the install and echo each state change as it happens
fn spawn_install_printer(view: &DetailView) {
    let mut rx = view.install.subscribe();
    if !view.install.start() {
        println!("{}: {}", view.entry.name, render::install_label(view.install.state()));
        return;
    }

    let name = view.entry.name.clone();
    tokio::spawn(async move {
        loop {
            let state = *rx.borrow_and_update();
            println!("{}: {}", name, render::install_label(state));
            if state == InstallState::Installed || rx.changed().await.is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storefront_core::{GenAiError, GenerationRequest};

    struct Counting {
        reply: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TextGenerator for Counting {
        async fn generate(
            &self,
            _config: &GenAiConfig,
            _request: &GenerationRequest,
        ) -> Result<String, GenAiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    fn store(reply: &'static str) -> (Store, Arc<Counting>) {
        let generator = Arc::new(Counting {
            reply,
            calls: AtomicUsize::new(0),
        });
        let shared: Arc<dyn TextGenerator> = generator.clone();
        let config = GenAiConfig::new(Some("test-key".to_string()));
        (Storefront::new(config, shared), generator)
    }

    #[tokio::test]
    async fn test_shell_blank_search_spawns_nothing() {
        let (store, generator) = store("[]");
        let (tx, mut rx) = mpsc::unbounded_channel();
        for query in ["", "   "] {
            let session = begin_search(&store, query, &tx);
            assert!(session.suggestions.items().is_empty());
        }
        drop(tx);
        assert!(rx.recv().await.is_none());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shell_install_listing_loads_reviews() {
        let (store, generator) = store(
            r#"[{"user":"Ana","rating":5,"text":"Great"},{"user":"Ben","rating":4,"text":"Good"},{"user":"Cy","rating":3,"text":"Fine"}]"#,
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let entry = store.lookup("4", None).unwrap();
        let mut view = open_listing(&store, entry, &tx);
        assert!(view.needs_reviews());

        match rx.recv().await {
            Some(ShellEvent::Reviews(ticket, reviews)) => {
                assert!(view.apply_reviews(ticket, reviews));
            }
            _ => panic!("expected a review delivery"),
        }
        assert_eq!(view.reviews.items().len(), 3);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  "), ShellCommand::Empty);
        assert_eq!(parse_command("home"), ShellCommand::Home);
        assert_eq!(
            parse_command("search  lo-fi music "),
            ShellCommand::Search("lo-fi music".to_string())
        );
        assert_eq!(parse_command("search"), ShellCommand::Search(String::new()));
        assert_eq!(parse_command("show 3"), ShellCommand::Show("3".to_string()));
        assert_eq!(
            parse_command("install ai-17-0"),
            ShellCommand::Install("ai-17-0".to_string())
        );
        assert_eq!(parse_command("quit"), ShellCommand::Quit);
        assert_eq!(parse_command("show"), ShellCommand::Unknown("show".to_string()));
        assert_eq!(
            parse_command("launch 3"),
            ShellCommand::Unknown("launch 3".to_string())
        );
    }
}
