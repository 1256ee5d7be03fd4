use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    AppShell, Field, FormController, InMemoryStore, LocalStore, RemoteStore, SubmissionStore,
};
use shared::{
    calendar::{CalendarDay, CalendarMonth, DEFAULT_MONTH, DEFAULT_YEAR},
    domain::{ContractType, Position},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "availability", about = "Collect staff availability for one month")]
struct Cli {
    #[arg(
        long,
        value_enum,
        env = "AVAILABILITY_STORE",
        default_value_t = StoreKind::Local,
        global = true
    )]
    store: StoreKind,
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://./data/availability.db",
        global = true
    )]
    database_url: String,
    #[arg(
        long,
        env = "AVAILABILITY_SERVER_URL",
        default_value = "http://127.0.0.1:8443",
        global = true
    )]
    server_url: String,
    #[arg(long, default_value_t = DEFAULT_YEAR, global = true)]
    year: i32,
    #[arg(long, default_value_t = DEFAULT_MONTH, global = true)]
    month: u32,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// Process-local, with simulated network latency.
    Memory,
    /// SQLite file, same rules as the server.
    Local,
    /// HTTP server.
    Remote,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the month grid.
    Calendar {
        #[arg(long = "select", value_name = "DATE")]
        select: Vec<CalendarDay>,
    },
    /// Register availability, then print the list.
    Submit {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value_t = ContractType::Intermittent)]
        contract: ContractType,
        #[arg(long, default_value_t = Position::Monitor)]
        position: Position,
        #[arg(long = "date", value_name = "DATE")]
        dates: Vec<CalendarDay>,
    },
    /// Print every submission, sorted by last name.
    List,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let month = CalendarMonth::new(cli.year, cli.month)?;

    match cli.command {
        Command::Calendar { ref select } => {
            let mut form = FormController::new(month);
            select_days(&mut form, select);
            let today = CalendarDay::from_datetime(&chrono::Local::now());
            print!("{}", render::calendar(&month, &form.calendar(Some(today))));
            Ok(ExitCode::SUCCESS)
        }
        Command::Submit {
            ref first_name,
            ref last_name,
            contract,
            position,
            ref dates,
        } => {
            let mut shell = AppShell::new(open_store(&cli, month).await?, month);
            load(&mut shell).await;

            let form = shell.form_mut();
            form.update_field(Field::FirstName(first_name.clone()));
            form.update_field(Field::LastName(last_name.clone()));
            form.update_field(Field::Contract(contract));
            form.update_field(Field::Position(position));
            select_days(form, dates);

            match shell.submit_form().await {
                Ok(submission) => {
                    info!(submission_id = %submission.id, "submitted");
                    println!("Disponibilidade registrada para {}.\n", submission.full_name());
                    print!("{}", render::list(&shell.list_entries()));
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::List => {
            let mut shell = AppShell::new(open_store(&cli, month).await?, month);
            if !load(&mut shell).await {
                return Ok(ExitCode::FAILURE);
            }
            print!("{}", render::list(&shell.list_entries()));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn open_store(cli: &Cli, month: CalendarMonth) -> Result<Arc<dyn SubmissionStore>> {
    let store: Arc<dyn SubmissionStore> = match cli.store {
        StoreKind::Memory => Arc::new(InMemoryStore::mock_network().with_month(month)),
        StoreKind::Local => Arc::new(
            LocalStore::open(&cli.database_url, month)
                .await
                .with_context(|| format!("failed to open {}", cli.database_url))?,
        ),
        StoreKind::Remote => Arc::new(
            RemoteStore::new(&cli.server_url)
                .with_context(|| format!("invalid server url {}", cli.server_url))?,
        ),
    };
    Ok(store)
}

/// Initial fetch. A failure is reported and the shell stays usable.
async fn load(shell: &mut AppShell) -> bool {
    shell.refresh().await;
    match shell.load_error() {
        Some(err) => {
            eprintln!("{}", err.user_message());
            false
        }
        None => true,
    }
}

fn select_days(form: &mut FormController, days: &[CalendarDay]) {
    for day in days {
        if !form.toggle_date(*day) {
            warn!(%day, "date outside {}, skipped", form.month().title());
            eprintln!("{day} fora de {}, ignorada.", form.month().title());
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
