//! Command execution.
//!
//! Builds a [`Session`] over the configured tool and store and runs one
//! subcommand against it, writing human or JSON output.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use netcfg::command::{CommandRunner, ProcessRunner};
use netcfg::config::{Command, SetArgs, StoreBackend, ValidatedConfig};
use netcfg::network::AdapterRecord;
use netcfg::network::listing::ListingParser;
use netcfg::session::{Session, SessionError};
use netcfg::settings::ApplyError;
use netcfg::store::{FileStore, KeyValueStore};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Discovery or apply failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The requested adapter was not discovered (or is filtered out).
    #[error("Adapter '{name}' not found; run 'netcfg list' to see adapter names")]
    UnknownAdapter {
        /// Requested name
        name: String,
    },

    /// JSON output could not be produced.
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    /// Output could not be written.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// The configured store backend does not exist on this platform.
    #[cfg(not(windows))]
    #[error("The registry store is only available on Windows")]
    RegistryUnavailable,
}

/// One adapter as printed by `list --json` and `show --json`.
#[derive(Debug, Serialize)]
struct AdapterView<'a> {
    #[serde(flatten)]
    record: &'a AdapterRecord,
    dhcp_failure: bool,
}

impl<'a> From<&'a AdapterRecord> for AdapterView<'a> {
    fn from(record: &'a AdapterRecord) -> Self {
        Self {
            record,
            dhcp_failure: record.has_dhcp_failure(),
        }
    }
}

/// Runs `command` with the configured tool and store.
///
/// # Errors
///
/// Returns an error if discovery, apply or output fails.
///
/// # Coverage Note
///
/// Excluded from coverage because it drives the real tool and store.
#[cfg(not(tarpaulin_include))]
pub async fn execute(mut config: ValidatedConfig, command: Command) -> Result<(), RunError> {
    let hide_loopback = matches!(command, Command::List { all: false, .. });
    let filter = config.take_filter(hide_loopback);
    let parser = ListingParser::with_labels(config.dialect.classifier(), config.labels.clone());
    let runner = ProcessRunner::new(config.program.as_str());
    let layout = config.layout.clone();
    let mut out = std::io::stdout();

    match config.store {
        StoreBackend::File(path) => {
            let session = Session::new(runner, FileStore::new(path), layout, parser, filter);
            run(&session, command, &mut out).await
        }
        #[cfg(windows)]
        StoreBackend::Registry => {
            let store = netcfg::store::RegistryStore::new();
            let session = Session::new(runner, store, layout, parser, filter);
            run(&session, command, &mut out).await
        }
        #[cfg(not(windows))]
        StoreBackend::Registry => Err(RunError::RegistryUnavailable),
    }
}

/// Runs one subcommand against `session`.
///
/// # Errors
///
/// Returns an error if discovery, apply or output fails.
pub async fn run<R, S, W>(session: &Session<R, S>, command: Command, out: &mut W) -> Result<(), RunError>
where
    R: CommandRunner + 'static,
    S: KeyValueStore + 'static,
    W: Write,
{
    match command {
        Command::List { json, .. } => list(session, json, out).await,
        Command::Show { name, json } => show(session, &name, json, out).await,
        Command::Set(args) => set(session, &args, out).await,
        // Handled before configuration is loaded
        Command::Init { .. } | Command::Hosts { .. } => Ok(()),
    }
}

async fn list<R, S, W>(session: &Session<R, S>, json: bool, out: &mut W) -> Result<(), RunError>
where
    R: CommandRunner + 'static,
    S: KeyValueStore + 'static,
    W: Write,
{
    let adapters = session.refresh().await?;

    if json {
        let views: Vec<AdapterView<'_>> = adapters.iter().map(AdapterView::from).collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&views)?)?;
        return Ok(());
    }

    if adapters.is_empty() {
        writeln!(out, "No adapters found")?;
    }
    for adapter in &adapters {
        write_adapter(out, adapter)?;
    }
    Ok(())
}

async fn show<R, S, W>(session: &Session<R, S>, name: &str, json: bool, out: &mut W) -> Result<(), RunError>
where
    R: CommandRunner + 'static,
    S: KeyValueStore + 'static,
    W: Write,
{
    session.refresh().await?;
    let adapter = find(session, name).await?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&AdapterView::from(&adapter))?)?;
    } else {
        write_adapter(out, &adapter)?;
    }
    Ok(())
}

async fn set<R, S, W>(session: &Session<R, S>, args: &SetArgs, out: &mut W) -> Result<(), RunError>
where
    R: CommandRunner + 'static,
    S: KeyValueStore + 'static,
    W: Write,
{
    session.refresh().await?;
    let current = find(session, &args.name).await?;
    let desired = args.desired(current.settings());

    if args.dry_run {
        let plan = session.plan(&args.name, &desired).await?;
        writeln!(out, "{plan}")?;
        return Ok(());
    }

    match session.apply(&args.name, desired).await {
        Ok(updated) => {
            write_adapter(out, &updated)?;
            Ok(())
        }
        Err(e) => {
            if !matches!(e, SessionError::Apply(ApplyError::Validation(_))) {
                tracing::warn!(
                    "'{}' may be partially configured; run 'netcfg show {}' to see its state",
                    args.name,
                    args.name
                );
            }
            Err(e.into())
        }
    }
}

async fn find<R, S>(session: &Session<R, S>, name: &str) -> Result<AdapterRecord, RunError>
where
    R: CommandRunner + 'static,
    S: KeyValueStore + 'static,
{
    session.get(name).await.ok_or_else(|| RunError::UnknownAdapter {
        name: name.to_string(),
    })
}

fn write_adapter<W: Write>(out: &mut W, adapter: &AdapterRecord) -> std::io::Result<()> {
    writeln!(out, "{adapter}")?;
    if adapter.has_dhcp_failure() {
        writeln!(
            out,
            "  warning: DHCP is enabled but no server answered (self-assigned {})",
            adapter.ip
        )?;
    }
    Ok(())
}
