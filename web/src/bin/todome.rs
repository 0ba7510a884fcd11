//! `todome`: command-line client for the Todo-me API.
//!
//! Every list-changing command runs through the client controller: the list
//! is loaded, the change is applied optimistically and confirmed by the
//! server, and the resulting list is printed.
//!
//! ```text
//! todome add "Buy milk" --priority low --due 2024-10-01
//! todome done 3
//! todome list --priority high --within 7
//! ```

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use todo::client::{
    ClientAction, ClientEnvironment, ClientReducer, ClientState, DateFilter, PriorityFilter,
};
use todo::{CreateTodoRequest, TodoId, TodoItem};
use todome_postgres::PostgresTodoRepository;
use todome_runtime::Store;
use todome_web::{telemetry::init_tracing, Config, HttpTodoRepository};

type ClientStore = Store<
    ClientState,
    ClientAction,
    ClientEnvironment<HttpTodoRepository>,
    ClientReducer<HttpTodoRepository>,
>;

/// Upper bound on a single command round trip
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "todome", version, about = "Manage your todo list")]
struct Cli {
    /// Base URL of the todo API [default: `TODOME_API_URL` or http://localhost:3000]
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show todos, optionally filtered
    List {
        /// `all`, `high`, `medium` or `low`
        #[arg(long, default_value = "all")]
        priority: PriorityFilter,
        /// `all`, or 0, 1, 3, 7 or 30 days after today
        #[arg(long, default_value = "all", value_parser = DateFilter::preset)]
        within: DateFilter,
    },
    /// Add a todo
    Add {
        /// What needs doing
        content: String,
        /// Due date, e.g. `2024-10-01` or an RFC 3339 timestamp
        #[arg(long)]
        due: Option<String>,
        /// `high`, `medium` (default) or `low`
        #[arg(long)]
        priority: Option<String>,
    },
    /// Mark a todo as completed
    Done {
        /// Todo id
        id: i32,
    },
    /// Mark a todo as not completed
    Undo {
        /// Todo id
        id: i32,
    },
    /// Replace the content of a todo
    Edit {
        /// Todo id
        id: i32,
        /// New content
        content: String,
    },
    /// Delete a todo
    Rm {
        /// Todo id
        id: i32,
    },
    /// Apply database migrations (uses `DATABASE_URL`)
    Migrate,
    /// Insert the sample todos into an empty database (uses `DATABASE_URL`)
    Seed,
}

impl Command {
    /// The controller action for a list-changing command
    fn action(self) -> Option<ClientAction> {
        let action = match self {
            Self::List { .. } | Self::Migrate | Self::Seed => return None,
            Self::Add {
                content,
                due,
                priority,
            } => ClientAction::Create {
                request: CreateTodoRequest {
                    content: Some(content),
                    submit_date: due,
                    priority,
                },
            },
            Self::Done { id } => ClientAction::SetCompleted {
                id: TodoId::new(id),
                completed: true,
            },
            Self::Undo { id } => ClientAction::SetCompleted {
                id: TodoId::new(id),
                completed: false,
            },
            Self::Edit { id, content } => ClientAction::EditContent {
                id: TodoId::new(id),
                content,
            },
            Self::Rm { id } => ClientAction::Delete { id: TodoId::new(id) },
        };
        Some(action)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("warn");
    let cli = Cli::parse();
    let config = Config::from_env();
    let api_url = cli.api_url.unwrap_or(config.client.api_url.clone());

    match cli.command {
        Command::Migrate => migrate(&config).await,
        Command::Seed => seed(&config).await,
        Command::List { priority, within } => {
            let store = connect(&api_url)?;
            dispatch(&store, ClientAction::Load).await?;
            dispatch(&store, ClientAction::SetPriorityFilter(priority)).await?;
            dispatch(&store, ClientAction::SetDateFilter(within)).await?;
            finish(&store).await
        },
        command => {
            let store = connect(&api_url)?;
            dispatch(&store, ClientAction::Load).await?;
            if let Some(action) = command.action() {
                dispatch(&store, action).await?;
            }
            finish(&store).await
        },
    }
}

fn connect(api_url: &str) -> anyhow::Result<ClientStore> {
    let repository = HttpTodoRepository::new(api_url)?;
    let environment = ClientEnvironment::new(Arc::new(repository)).with_error_timeout(None);
    Ok(Store::new(ClientState::new(), ClientReducer::new(), environment))
}

/// Sends `action`, waits for its effects and fails on a reported error
async fn dispatch(store: &ClientStore, action: ClientAction) -> anyhow::Result<()> {
    let mut handle = store.send(action).await?;
    handle
        .wait_with_timeout(COMMAND_TIMEOUT)
        .await
        .context("The API did not answer in time")?;

    if let Some(error) = store.state(|s| s.error.clone()).await {
        bail!(error);
    }
    Ok(())
}

/// Drains remaining effects, then prints the list
async fn finish(store: &ClientStore) -> anyhow::Result<()> {
    store.shutdown(COMMAND_TIMEOUT).await?;
    print_list(store).await;
    Ok(())
}

async fn print_list(store: &ClientStore) {
    let today = Utc::now().date_naive();
    let (lines, completed) = store
        .state(|s| {
            let lines: Vec<String> = s.visible(today).into_iter().map(render).collect();
            (lines, s.completed_count())
        })
        .await;

    if lines.is_empty() {
        println!("No todos.");
    }
    for line in lines {
        println!("{line}");
    }
    println!("Completed Todos: {completed}");
}

fn render(todo: &TodoItem) -> String {
    let check = if todo.completed { 'x' } else { ' ' };
    let due = todo
        .submit_date
        .map(|d| format!(", due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    format!("[{check}] #{} {} ({}{due})", todo.id, todo.content, todo.priority)
}

async fn postgres(config: &Config) -> anyhow::Result<PostgresTodoRepository> {
    let pool = todome_postgres::connect(&config.database.url, &config.database.pool_config())
        .await
        .context("Failed to connect to PostgreSQL")?;
    Ok(PostgresTodoRepository::new(pool))
}

async fn migrate(config: &Config) -> anyhow::Result<()> {
    postgres(config).await?.migrate().await?;
    println!("Migrations applied.");
    Ok(())
}

async fn seed(config: &Config) -> anyhow::Result<()> {
    let repository = postgres(config).await?;
    repository.migrate().await?;
    let inserted = repository.seed().await?;
    if inserted.is_empty() {
        println!("The todos table is not empty; nothing seeded.");
    }
    for todo in &inserted {
        println!("{}", render(todo));
    }
    Ok(())
}
