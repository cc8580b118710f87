use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bfly_server::{ButterflyServer, ServerConfig};
use bfly_store::{demo_document, JsonFileStore};
use bfly_types::Collection;
use bfly_validate::{schema_for, ValidationResult};
use colored::Colorize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::InitDb(args) => cmd_init_db(args),
        Command::Check(args) => cmd_check(args, &cli.format),
    }
}

/// Config file (or defaults), then environment, then command-line flags.
fn resolve_config(
    config: Option<&Path>,
    bind: Option<SocketAddr>,
    db: Option<PathBuf>,
) -> anyhow::Result<ServerConfig> {
    let mut resolved = ServerConfig::load(config)?;
    if let Some(bind) = bind {
        resolved.bind_addr = bind;
    }
    if let Some(db) = db {
        resolved.db_path = db;
    }
    debug!(
        bind = %resolved.bind_addr,
        db = %resolved.db_path.display(),
        "resolved configuration"
    );
    Ok(resolved)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(args.config.as_deref(), args.bind, args.db)?;
    let db_path = config.db_path.clone();
    let server = ButterflyServer::open(config)
        .with_context(|| format!("failed to load store {}", db_path.display()))?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    info!("server stopped");
    Ok(())
}

fn cmd_init_db(args: InitDbArgs) -> anyhow::Result<()> {
    let config = resolve_config(args.config.as_deref(), None, args.db)?;
    let doc = demo_document();
    let store = JsonFileStore::create(&config.db_path, doc.clone())
        .with_context(|| format!("failed to write store {}", config.db_path.display()))?;
    info!(path = %store.path().display(), records = doc.total(), "seeded demo data");
    println!(
        "{} Initialized store {}",
        "✓".green().bold(),
        store.path().display().to_string().bold()
    );
    for c in Collection::ALL {
        println!("  {}: {}", c.to_string().cyan(), doc.len(c));
    }
    Ok(())
}

fn check_value(collection: Collection, value: &Value) -> ValidationResult<()> {
    schema_for(collection).validate(value)
}

fn cmd_check(args: CheckArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;
    let result = check_value(args.collection, &value);
    debug!(
        collection = %args.collection,
        file = %args.file.display(),
        valid = result.is_ok(),
        "checked record"
    );

    match format {
        OutputFormat::Json => {
            let violations: Vec<String> = match &result {
                Ok(()) => Vec::new(),
                Err(e) => e.violations.iter().map(ToString::to_string).collect(),
            };
            let report = json!({
                "collection": args.collection,
                "valid": result.is_ok(),
                "violations": violations,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => match &result {
            Ok(()) => println!("{} valid {} record", "✓".green().bold(), args.collection),
            Err(e) => {
                println!("{} invalid {} record", "✗".red().bold(), args.collection);
                for line in e.to_string().lines() {
                    println!("  {line}");
                }
            }
        },
    }

    result.map_err(|e| anyhow::anyhow!("{} violation(s) found", e.violations.len()))
}
