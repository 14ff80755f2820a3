use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qsgroup::aws::auth;
use qsgroup::aws::client::AwsClient;
use qsgroup::config::Config;
use qsgroup::provider::{Changes, Provider, ProviderMeta};
use qsgroup::resource::{default_resource_type, get_resource, Diagnostics, ResourceData};
use qsgroup::state::StateFile;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage Amazon QuickSight groups declaratively
#[derive(Parser, Debug)]
#[command(name = "qsgroup", version = qsgroup::VERSION, about, long_about = None)]
struct Args {
    /// AWS region to use
    #[arg(long, global = true)]
    region: Option<String>,

    /// Named profile from the shared AWS config files
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Default account for groups that do not name one
    #[arg(long, global = true)]
    account_id: Option<String>,

    /// Override the service endpoint (e.g. a local mock)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// State file path
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a group and record it in state
    Create {
        #[arg(long)]
        group_name: String,
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long)]
        aws_account_id: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "main")]
        address: String,
    },
    /// Refresh a group from QuickSight
    Read {
        #[arg(long, default_value = "main")]
        address: String,
    },
    /// Change the description of a group
    Update {
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        #[arg(long, default_value = "main")]
        address: String,
    },
    /// Delete a group and forget it
    Delete {
        #[arg(long, default_value = "main")]
        address: String,
    },
    /// Adopt an existing group by AWS_ACCOUNT_ID/NAMESPACE/GROUP_NAME
    Import {
        id: String,
        #[arg(long, default_value = "main")]
        address: String,
    },
    /// Print the stored state of a group
    Show {
        #[arg(long, default_value = "main")]
        address: String,
        #[arg(long, value_enum, default_value = "json")]
        output: OutputFormat,
    },
    /// Persist the global options (region, profile, account, endpoint, state) as defaults
    Configure,
    /// Print the resource schema
    Schema {
        #[arg(long, value_enum, default_value = "json")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("qsgroup started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("qsgroup").join("qsgroup.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".qsgroup").join("qsgroup.log");
    }
    PathBuf::from("qsgroup.log")
}

fn print_value<T: Serialize>(value: &T, output: OutputFormat) -> Result<()> {
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Print diagnostics to stderr; fail if any is an error
fn report(operation: &str, diags: Diagnostics) -> Result<()> {
    let failed = diags.has_error();
    for diag in diags {
        eprintln!("{}", diag);
    }
    if failed {
        bail!("{} failed", operation);
    }
    Ok(())
}

/// Cancel `token` on Ctrl-C
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling in-flight request");
            child.cancel();
        }
    });
    token
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let config = Config::load().with_overrides(
        args.region.clone(),
        args.profile.clone(),
        args.account_id.clone(),
        args.endpoint.clone(),
        args.state.clone(),
    );
    let state_path = config.effective_state_path();

    // Commands that never touch AWS
    match args.command {
        Command::Configure => {
            config.save()?;
            match Config::config_path() {
                Some(path) => eprintln!("Saved configuration to {:?}", path),
                None => eprintln!("No configuration directory available; nothing saved"),
            }
            return Ok(());
        }
        Command::Schema { output } => {
            let resource = get_resource(default_resource_type())
                .ok_or_else(|| anyhow!("Unknown resource type: {}", default_resource_type()))?;
            return print_value(&resource.schema(), output);
        }
        Command::Show {
            ref address,
            output,
        } => {
            let state = StateFile::load(&state_path)?;
            let stored = state
                .get(address)
                .ok_or_else(|| anyhow!("No resource at address '{}' in {:?}", address, state_path))?;
            return print_value(stored, output);
        }
        _ => {}
    }

    let client = AwsClient::new(
        config.region.as_deref(),
        config.profile.as_deref(),
        config.endpoint.as_deref(),
    )
    .await;
    tracing::info!("Using region: {}", client.region());
    let cancel = cancel_on_interrupt();

    // Only create needs a default account; avoid an STS round trip otherwise
    let account_id = match args.command {
        Command::Create {
            ref aws_account_id, ..
        } if aws_account_id.is_none() => {
            client
                .resolve_account_id(&cancel, config.account_id.as_deref())
                .await?
        }
        _ => config
            .account_id
            .clone()
            .or_else(auth::get_default_account_id)
            .unwrap_or_default(),
    };

    let provider = Provider::new(ProviderMeta::new(Arc::new(client), &account_id));
    run(&provider, &cancel, args.command, &state_path).await
}

async fn run(
    provider: &Provider,
    cancel: &CancellationToken,
    command: Command,
    state_path: &Path,
) -> Result<()> {
    let resource_type = default_resource_type();
    let mut state = StateFile::load(state_path)?;

    match command {
        Command::Create {
            group_name,
            namespace,
            aws_account_id,
            description,
            address,
        } => {
            if state.get(&address).is_some() {
                bail!(
                    "A resource already exists at address '{}'. Delete it or pick another --address",
                    address
                );
            }

            let mut d = ResourceData::from_config([
                ("group_name", Some(group_name)),
                ("namespace", namespace),
                ("aws_account_id", aws_account_id),
                ("description", description),
            ]);
            let diags = provider.create(cancel, resource_type, &mut d).await?;

            // A failed read after a successful create still leaves a group behind
            state.put(&address, resource_type, d.clone());
            state.save(state_path)?;
            report("create", diags)?;
            print_value(&d, OutputFormat::Json)
        }
        Command::Read { address } => {
            let mut d = stored_data(&state, &address)?;
            let diags = provider.read(cancel, resource_type, &mut d).await?;
            report("read", diags)?;

            state.put(&address, resource_type, d.clone());
            state.save(state_path)?;
            if d.exists() {
                print_value(&d, OutputFormat::Json)?;
            }
            Ok(())
        }
        Command::Update {
            description,
            clear_description,
            address,
        } => {
            let mut changes = Changes::new();
            if clear_description {
                changes.insert("description".to_string(), None);
            } else if let Some(description) = description {
                changes.insert("description".to_string(), Some(description));
            } else {
                bail!("Nothing to update. Pass --description or --clear-description");
            }

            let mut d = stored_data(&state, &address)?;
            let diags = provider.update(cancel, resource_type, &mut d, &changes).await?;
            report("update", diags)?;

            state.put(&address, resource_type, d.clone());
            state.save(state_path)?;
            print_value(&d, OutputFormat::Json)
        }
        Command::Delete { address } => {
            let mut d = stored_data(&state, &address)?;
            let diags = provider.delete(cancel, resource_type, &mut d).await?;
            report("delete", diags)?;

            state.remove(&address);
            state.save(state_path)?;
            eprintln!("Deleted '{}'", address);
            Ok(())
        }
        Command::Import { id, address } => {
            if state.get(&address).is_some() {
                bail!("A resource already exists at address '{}'", address);
            }

            let (d, diags) = provider.import(cancel, resource_type, &id).await?;
            report("import", diags)?;

            state.put(&address, resource_type, d.clone());
            state.save(state_path)?;
            print_value(&d, OutputFormat::Json)
        }
        Command::Show { .. } | Command::Schema { .. } | Command::Configure => Ok(()),
    }
}

fn stored_data(state: &StateFile, address: &str) -> Result<ResourceData> {
    state
        .get(address)
        .map(|stored| stored.data.clone())
        .with_context(|| format!("No resource at address '{}'", address))
}
