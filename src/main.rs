//! Library Desk - front desk client for the library service

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_desk::{
    config::AppConfig,
    models::{client::ClientStatus, ClientKind, RosterKind},
    AppError, AppState,
};

use cli::{Cli, Commands, RegisterCommands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Commands::Loan { days: Some(days), .. } = &cli.command {
        config.loans.default_duration_days = *days;
    }

    init_tracing(&config);
    tracing::debug!(
        "Library Desk v{} using {}",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let state = AppState::new(config).context("Failed to initialise the library desk")?;

    match cli.command {
        Commands::Books => list_books(&state).await,
        Commands::Clients { status } => list_clients(&state, status).await,
        Commands::Copies => list_copies(&state).await,
        Commands::Loan {
            client_id, copy_id, ..
        } => create_loan(&state, client_id, copy_id).await,
        Commands::Register { kind } => register_client(&state, kind).await,
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_desk={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn list_books(state: &AppState) -> anyhow::Result<()> {
    let books = state.services.catalog.list_books().await?;
    for book in books {
        println!(
            "{} | {} | {} | {} | {} | {}",
            book.isbn,
            book.title,
            book.author.as_deref().unwrap_or("-"),
            book.publisher.as_deref().unwrap_or("-"),
            book.language.as_deref().unwrap_or("-"),
            book.rating_label()
        );
    }
    Ok(())
}

async fn list_clients(state: &AppState, status: ClientStatus) -> anyhow::Result<()> {
    let clients = state.services.clients.list(status).await?;
    for client in clients {
        let kind = client.kind.map(|k| k.as_str()).unwrap_or("?");
        let address = client
            .address
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        println!(
            "{:>5} {} {} | {} | {} | {}",
            client.id,
            kind,
            client.display_name,
            client.document.as_deref().unwrap_or("-"),
            client.email.as_deref().unwrap_or("-"),
            address
        );
    }
    Ok(())
}

async fn list_copies(state: &AppState) -> anyhow::Result<()> {
    for copy in state.services.catalog.list_copies().await? {
        println!("{}", copy);
    }
    Ok(())
}

async fn create_loan(state: &AppState, client_id: i32, copy_id: i32) -> anyhow::Result<()> {
    let mut composer = state.services.loan_composer();

    let handle = composer.teardown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.teardown();
        }
    });

    composer.load_rosters().await?;
    composer.select(RosterKind::Client, client_id)?;
    composer.select(RosterKind::Copy, copy_id)?;

    let receipt = composer.submit().await?;
    println!(
        "{}",
        receipt.message.as_deref().unwrap_or("Loan created successfully.")
    );
    if let Some(due_date) = receipt.due_date {
        println!("Due date: {}", due_date);
    }
    Ok(())
}

async fn register_client(state: &AppState, command: RegisterCommands) -> anyhow::Result<()> {
    let mut registration = state.services.clients.registration();
    let kind = match command {
        RegisterCommands::Individual { .. } => ClientKind::Individual,
        RegisterCommands::Organization { .. } => ClientKind::Organization,
    };
    registration.set_kind(kind)?;
    for (field, value) in command.into_fields() {
        registration.set_field(field, value)?;
    }

    match registration.submit().await {
        Ok(created) => {
            println!(
                "{}",
                created.message.as_deref().unwrap_or("Client registered.")
            );
            Ok(())
        }
        Err(AppError::InvalidClient(errors)) => {
            for violation in errors.violations() {
                eprintln!("{} {}", violation.field, violation.violation);
            }
            anyhow::bail!("{} field(s) need attention", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}
