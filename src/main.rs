//! ricalco: command-line export client. Fetches every topic's document from
//! a publishing API and renders the JSON node trees to static HTML files.
#![deny(clippy::all, clippy::pedantic)]

use std::process;

use clap::Parser;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

use ricalco::application::error::AppError;
use ricalco::application::export::ExportService;
use ricalco::application::render::{HtmlRenderService, RenderService};
use ricalco::config::{Cli, Command, ExportArgs, RenderArgs};
use ricalco::domain::document::Document;
use ricalco::infra::api::ApiClient;
use ricalco::infra::key::ExportKey;
use ricalco::infra::telemetry;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    telemetry::init(cli.log_format)?;

    match cli.command {
        Command::Export(args) => run_export(args).await,
        Command::Render(args) => run_render(args).await,
    }
}

async fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let raw_key = read_export_key(&args)?;
    let key = ExportKey::decode(&raw_key)?;
    let base = args.site.clone().unwrap_or_else(|| key.base_url());

    let client = ApiClient::new(&base, key.jwt)?;
    let renderer = HtmlRenderService::new();
    let service = ExportService::new(&client, &renderer, args.out_dir);

    info!(base = %base, "starting export");
    service.run().await?;
    Ok(())
}

fn read_export_key(args: &ExportArgs) -> Result<String, AppError> {
    if let Some(path) = &args.key_file {
        return std::fs::read_to_string(path)
            .map(|raw| raw.trim().to_string())
            .map_err(|source| AppError::key_file(path, source));
    }
    args.export_key.clone().ok_or(AppError::MissingKey)
}

async fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let raw = tokio::fs::read_to_string(&args.input)
        .await
        .map_err(|source| AppError::read_input(&args.input, source))?;
    let document = parse_document_file(&raw)?;

    let renderer = HtmlRenderService::new();
    let output = renderer.render(&document);

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &output.html)
                .await
                .map_err(|source| AppError::write(path, source))?;
            info!(path = %path.display(), blocks = output.stats.blocks, "rendered");
        }
        None => println!("{}", output.html),
    }
    Ok(())
}

/// Accepts either an API document envelope (whose `content` field is the
/// JSON-encoded tree) or a bare node tree.
fn parse_document_file(raw: &str) -> Result<Document, AppError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if let Some(content) = value.get("content").and_then(serde_json::Value::as_str) {
        return Ok(serde_json::from_str(content)?);
    }
    Ok(serde_json::from_value(value)?)
}
