//! dynotes - Notes CRUD against a DynamoDB table
//!
//! Every subcommand runs one table operation and prints the result; `ui`
//! starts the HTML front-end instead.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use dynotes::dynamo::{DynamoClient, NoteStore, StoreError};
use dynotes::notes::{CreateNoteRequest, Note, UpdateNoteRequest};
use dynotes::web::{self, ServerState};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dynotes")]
#[command(about = "Notes CRUD against a DynamoDB table")]
struct Cli {
    /// DynamoDB table name
    #[arg(
        long,
        global = true,
        env = "NOTES_TABLE_NAME",
        default_value = "Notes_Table"
    )]
    table: String,

    /// Partition key attribute name (default: detect from the table, or 'id')
    #[arg(long, global = true)]
    key_name: Option<String>,

    /// Sort key (range) attribute name, if the table has one
    #[arg(long, global = true)]
    sort_key: Option<String>,

    /// User id value for operations on tables keyed with a sort key
    #[arg(long, global = true)]
    user_id: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a note
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        /// Client-generated idempotency id to avoid duplicate creates
        #[arg(long)]
        client_id: Option<String>,
    },

    /// List all notes
    List,

    /// Fetch one note by id
    Get {
        #[arg(long)]
        id: String,
    },

    /// Update a note's title and/or content
    Update {
        #[arg(long)]
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Start the web UI
    Ui {
        /// Host to bind the web UI
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind the web UI
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing; logs go to stderr so JSON output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,dynotes=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => report(err),
    }
}

/// Storage failures exit 3, everything else 4
fn report(err: anyhow::Error) -> ExitCode {
    if let Some(storage) = err.downcast_ref::<StoreError>() {
        eprintln!("Storage error: {storage}");
        ExitCode::from(3)
    } else {
        eprintln!("Error: {err:#}");
        ExitCode::from(4)
    }
}

fn print_item(note: &Note, store: &dyn NoteStore) -> Result<()> {
    let json = note.to_table_json(store.key_name(), store.sort_key_name());
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::from(1));
    };

    let store = DynamoClient::new(
        &cli.table,
        cli.key_name.as_deref(),
        cli.sort_key.as_deref(),
    )
    .await;
    let user_id = cli.user_id;

    match command {
        Commands::Add {
            title,
            content,
            client_id,
        } => {
            let note = store
                .create(CreateNoteRequest {
                    title,
                    content,
                    user_id,
                    client_id,
                })
                .await?;
            print_item(&note, &store)?;
        }

        Commands::List => {
            let notes = store.list(user_id.as_deref()).await?;
            let items: Vec<_> = notes
                .iter()
                .map(|n| n.to_table_json(store.key_name(), store.sort_key_name()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }

        Commands::Get { id } => {
            let Some(note) = store.get(&id, user_id.as_deref()).await? else {
                eprintln!("Note not found");
                return Ok(ExitCode::from(2));
            };
            print_item(&note, &store)?;
        }

        Commands::Update { id, title, content } => {
            if title.is_none() && content.is_none() {
                anyhow::bail!("at least one of --title or --content must be provided");
            }
            let note = store
                .update(&id, UpdateNoteRequest { title, content }, user_id.as_deref())
                .await?;
            print_item(&note, &store)?;
        }

        Commands::Delete { id } => {
            store.delete(&id, user_id.as_deref()).await?;
            println!("deleted");
        }

        Commands::Ui { host, port } => {
            serve_ui(store, user_id, &host, port).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn serve_ui(
    store: DynamoClient,
    default_user_id: Option<String>,
    host: &str,
    port: u16,
) -> Result<()> {
    let state = Arc::new(ServerState {
        store: Arc::new(store),
        default_user_id,
    });
    let app = web::create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("web UI listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_before_or_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dynotes", "--table", "Other", "get", "--id", "n1", "--user-id", "alice",
        ])
        .unwrap();
        assert_eq!(cli.table, "Other");
        assert_eq!(cli.user_id.as_deref(), Some("alice"));

        let cli =
            Cli::try_parse_from(["dynotes", "list", "--table", "Other", "--sort-key", "UserId"])
                .unwrap();
        assert_eq!(cli.table, "Other");
        assert_eq!(cli.sort_key.as_deref(), Some("UserId"));
    }

    #[test]
    fn test_add_requires_title_and_content() {
        assert!(Cli::try_parse_from(["dynotes", "add", "--title", "t"]).is_err());
        assert!(Cli::try_parse_from([
            "dynotes", "add", "--title", "t", "--content", "c", "--client-id", "n1",
        ])
        .is_ok());
    }

    #[test]
    fn test_ui_defaults() {
        let cli = Cli::try_parse_from(["dynotes", "ui"]).unwrap();
        match cli.command {
            Some(Commands::Ui { host, port }) => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 5000);
            }
            _ => panic!("expected ui subcommand"),
        }
    }

    #[test]
    fn test_table_falls_back_to_env_then_default() {
        // parallel tests share the process env, so read it instead of setting it
        let expected =
            std::env::var("NOTES_TABLE_NAME").unwrap_or_else(|_| "Notes_Table".to_string());
        let cli = Cli::try_parse_from(["dynotes", "list"]).unwrap();
        assert_eq!(cli.table, expected);
    }

    #[test]
    fn test_update_accepts_partial_fields() {
        let cli =
            Cli::try_parse_from(["dynotes", "update", "--id", "n1", "--title", "t"]).unwrap();
        match cli.command {
            Some(Commands::Update { title, content, .. }) => {
                assert_eq!(title.as_deref(), Some("t"));
                assert!(content.is_none());
            }
            _ => panic!("expected update subcommand"),
        }
    }
}
