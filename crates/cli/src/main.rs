use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use catalog_import_service::TransactionScope;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "catalog-import", version)]
#[command(about = "Import university and program listings from a JSON file", long_about = None)]
struct Cli {
    /// JSON file holding an array of program records
    file: PathBuf,
    /// PostgreSQL connection string (falls back to DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
    /// Per-record savepoints, or one transaction with no savepoints
    #[arg(long, default_value_t = TransactionScope::Savepoint)]
    transaction_scope: TransactionScope,
    /// Process everything, then roll back
    #[arg(long)]
    dry_run: bool,
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version land here too and are not failures.
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        },
    };

    if let Err(err) = init_tracing() {
        eprintln!("Failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    let args = commands::import::ImportArgs {
        file: cli.file,
        database_url: cli.database_url,
        scope: cli.transaction_scope,
        dry_run: cli.dry_run,
    };

    match commands::import::run(args).await {
        Ok(report) => {
            tracing::info!("Data import completed successfully");
            println!("Import completed: {report}");
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::error!("Import failed: {err:#}");
            ExitCode::FAILURE
        },
    }
}
