//! relaycache - query cached relay registry state from the command line.
//!
//! Every command prints JSON on stdout. Logs go to `relaycache.log` in the
//! cache directory; use RUST_LOG to control the level (default `warn`).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use relaycache_core::storage::DATABASE_NAME;
use relaycache_core::{
    Config, FileStorage, HttpRegistryClient, RelaySync, SnapshotStore, StaticAccount,
};

/// Log file name inside the cache directory
const LOG_FILE: &str = "relaycache.log";

const USAGE: &str = "\
Usage: relaycache [--force] <command>

Commands:
  verified            List verified relays
  claimable           List claimable relays
  credit <fp>         Check whether a fingerprint has a registration credit
  family <fp>         Check whether a fingerprint's family is fully verified
  serials             List hardware relay serials
  nicknames           List relay nicknames
  refresh             Rebuild the cached snapshot from the registry
  status              Show the cached snapshot without fetching
  clear               Delete the cached snapshot";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Query(Query),
    Status,
    Clear,
}

/// Commands served through the sync coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Query {
    Verified,
    Claimable,
    Credit(String),
    Family(String),
    Serials,
    Nicknames,
    Refresh,
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    command: Command,
    force_refresh: bool,
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let force_refresh = args.iter().any(|a| a == "--force");
    let rest: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--force")
        .collect();

    let command = match rest.as_slice() {
        ["verified"] => Command::Query(Query::Verified),
        ["claimable"] => Command::Query(Query::Claimable),
        ["credit", fp] => Command::Query(Query::Credit(fp.to_string())),
        ["family", fp] => Command::Query(Query::Family(fp.to_string())),
        ["serials"] => Command::Query(Query::Serials),
        ["nicknames"] => Command::Query(Query::Nicknames),
        ["refresh"] => Command::Query(Query::Refresh),
        ["status"] => Command::Status,
        ["clear"] => Command::Clear,
        _ => anyhow::bail!("{}", USAGE),
    };

    Ok(Invocation {
        command,
        force_refresh,
    })
}

/// Initialize the tracing subscriber, writing to a log file so stdout stays JSON
fn init_tracing(cache_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(cache_dir)
        .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(cache_dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_args(&args)?;

    let config = Config::load()?;
    let cache_dir = config.cache_dir()?;
    let _log_guard = init_tracing(&cache_dir)?;
    info!(command = ?invocation.command, "relaycache starting");

    let storage = Arc::new(FileStorage::new(&cache_dir, DATABASE_NAME));
    let store = SnapshotStore::new(storage);

    let output = match invocation.command {
        Command::Status => status(&store).await?,
        Command::Clear => {
            store.clear().await.context("Failed to clear relay cache")?;
            json!({ "cleared": true })
        }
        Command::Query(query) => {
            let registry_url = config.registry_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("No registry URL configured; set RELAYCACHE_REGISTRY_URL")
            })?;
            let registry = Arc::new(HttpRegistryClient::new(registry_url)?);
            let account = Arc::new(StaticAccount::new(config.account_address.clone()));
            let sync = RelaySync::new(store, registry, account);
            run_query(&sync, query, invocation.force_refresh).await?
        }
    };

    print_json(&output)
}

async fn run_query(sync: &RelaySync, query: Query, force: bool) -> Result<serde_json::Value> {
    let output = match query {
        Query::Verified => serde_json::to_value(sync.get_verified_relays(force).await)?,
        Query::Claimable => serde_json::to_value(sync.get_claimable_relays(force).await)?,
        Query::Serials => serde_json::to_value(sync.get_serials(force).await)?,
        Query::Nicknames => serde_json::to_value(sync.get_nicknames(force).await)?,
        Query::Credit(fp) => {
            let answer = match sync.has_registration_credit(&fp, force).await {
                Some(answer) => Some(answer),
                // Snapshot was rebuilt, ask again
                None => sync.has_registration_credit(&fp, false).await,
            };
            json!({ "fingerprint": fp, "registrationCredit": answer })
        }
        Query::Family(fp) => {
            // The predicate checks members against the view, so load it first
            sync.get_verified_relays(force).await;
            let answer = match sync.family_verified(&fp).await {
                Some(answer) => Some(answer),
                None => sync.family_verified(&fp).await,
            };
            json!({ "fingerprint": fp, "familyVerified": answer })
        }
        Query::Refresh => {
            let outcome = sync.refresh().await;
            json!({ "outcome": format!("{:?}", outcome) })
        }
    };
    Ok(output)
}

async fn status(store: &SnapshotStore) -> Result<serde_json::Value> {
    let snapshot = store.peek().await.context("Failed to read relay cache")?;
    let output = match snapshot {
        Some(snapshot) => json!({
            "cached": true,
            "age": snapshot.age_display(),
            "fresh": snapshot.is_fresh(SnapshotStore::ttl()),
            "verified": snapshot.data.verified.len(),
            "claimable": snapshot.data.claimable.len(),
            "registrationCredits": snapshot.data.registration_credits.len(),
            "families": snapshot.data.families.len(),
        }),
        None => json!({ "cached": false }),
    };
    Ok(output)
}
