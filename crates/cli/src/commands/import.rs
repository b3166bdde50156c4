//! Import a JSON file of program listings into PostgreSQL.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use catalog_import_core::env_config::resolve_required;
use catalog_import_core::DATABASE_URL_VAR;
use catalog_import_service::{
    load, ImportError, ImportEvents, ImportOptions, ImportReport, Importer, TracingEvents,
    TransactionScope,
};
use catalog_import_storage::PgCatalog;

pub(crate) struct ImportArgs {
    pub file: PathBuf,
    pub database_url: Option<String>,
    pub scope: TransactionScope,
    pub dry_run: bool,
}

/// Run import command.
///
/// Configuration is checked first and the file is loaded before connecting,
/// so neither a missing variable nor a bad input file touches the database.
pub(crate) async fn run(args: ImportArgs) -> Result<ImportReport> {
    let database_url = resolve_required(args.database_url, DATABASE_URL_VAR)?;

    let records = load(&args.file)?;
    TracingEvents.records_loaded(&args.file, records.len());

    let catalog = PgCatalog::connect(&database_url).await.map_err(ImportError::Connection)?;
    let options = ImportOptions { scope: args.scope, dry_run: args.dry_run };
    tracing::info!(scope = %options.scope, dry_run = options.dry_run, "Starting import");

    let importer = Importer::new(catalog, Arc::new(TracingEvents)).with_options(options);
    let result = importer.import_records(records).await;
    importer.store().close().await;

    Ok(result?)
}
