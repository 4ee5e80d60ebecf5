//! `folio-admin` binary.

use anyhow::Context;
use clap::Parser;
use folio_admin::cli::{Cli, Command};
use folio_admin::{ApiError, AppConfig, Caller, InvoiceService, ServiceError, TokenVerifier};
use folio_core::{CreateInvoiceRequest, PatchInvoiceRequest};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    folio_admin::init_tracing();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!(backend = %config.store.backend, "Starting folio-admin");

    let service = folio_admin::bootstrap(&config)
        .await
        .context("Failed to open invoice store")?;
    let caller = TokenVerifier::new(config.auth.jwt_secret.clone()).identify(cli.token.as_deref());

    match dispatch(&service, &config, &caller, cli.command).await? {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let api = ApiError::from(err);
            eprintln!("{}", serde_json::to_string_pretty(&json!({ "error": api }))?);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Runs one command. The outer error is for local I/O problems, the inner
/// one is what the service reported.
async fn dispatch(
    service: &InvoiceService,
    config: &AppConfig,
    caller: &Caller,
    command: Command,
) -> anyhow::Result<Result<Value, ServiceError>> {
    let result = match command {
        Command::Create(args) => {
            let payload = read_payload(&args.file).await?;
            match CreateInvoiceRequest::from_json(&payload) {
                Ok(request) => service
                    .create(caller, &request)
                    .await
                    .map(|id| json!({ "success": true, "id": id })),
                Err(err) => Err(err.into()),
            }
        }
        Command::List => service.list(caller).await.map(|invoices| json!(invoices)),
        Command::Get(args) => service.get(caller, &args.id).await.map(|invoice| json!(invoice)),
        Command::Patch(args) => {
            let payload = read_payload(&args.file).await?;
            match PatchInvoiceRequest::from_json(&payload) {
                Ok(request) => service
                    .patch(caller, &args.id, &request)
                    .await
                    .map(|success| json!({ "success": success })),
                Err(err) => Err(err.into()),
            }
        }
        Command::Delete(args) => service
            .delete(caller, &args.id)
            .await
            .map(|success| json!({ "success": success })),
        Command::Render(args) => match service.render(caller, &args.id).await {
            Ok(document) => {
                let out = args.out.unwrap_or_else(|| PathBuf::from(&document.filename));
                tokio::fs::write(&out, &document.bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                Ok(json!({
                    "path": out.display().to_string(),
                    "contentType": document.content_type,
                    "bytes": document.bytes.len(),
                }))
            }
            Err(err) => Err(err),
        },
        Command::Migrate(args) => match caller.require_admin() {
            Ok(()) => {
                let snapshot = args.snapshot.unwrap_or_else(|| config.store.snapshot_path.clone());
                folio_db::migrate_legacy_snapshot(service.store().as_ref(), &snapshot)
                    .await
                    .map(|imported| json!({ "imported": imported }))
                    .map_err(ServiceError::from)
            }
            Err(err) => Err(err),
        },
    };

    Ok(result)
}

async fn read_payload(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}
