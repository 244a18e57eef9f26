// # dnsplan - DNS Plan Daemon
//
// CRITICAL RULES:
// - This is a THIN integration layer ONLY
// - DO NOT add planning, ownership or diffing logic here
// - All reconciliation logic MUST be in dnsplan-core
// - Configuration is via environment variables ONLY
//
// The dnsplan daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Loading current/desired record snapshots on every tick
// 4. Calculating the plan and emitting the resulting changes
//
// ## Configuration
//
// ### Ownership
// - `DNSPLAN_OWNER_ID`: Owner identity of this planner (required)
// - `DNSPLAN_OWNER_ID_OLD`: Previous owner identity to migrate from
// - `DNSPLAN_OWNER_MIGRATE`: Enable owner migration (true/false)
//
// ### Planning
// - `DNSPLAN_MANAGED_RECORD_TYPES`: Comma-separated record types (default: A,AAAA,CNAME)
// - `DNSPLAN_DOMAIN_FILTER`: Comma-separated domains to include
// - `DNSPLAN_EXCLUDE_DOMAINS`: Comma-separated domains to exclude
// - `DNSPLAN_POLICY`: sync, upsert-only or create-only (default: sync)
// - `DNSPLAN_BOOLEAN_PROPERTIES`: Comma-separated `name=default` pairs, e.g. `proxied=false`
//
// ### Records
// - `DNSPLAN_CURRENT_PATH`: JSON snapshot of current records (required)
// - `DNSPLAN_DESIRED_PATH`: JSON snapshot of desired records (required)
// - `DNSPLAN_MISSING_PATH`: JSON snapshot of records to create unconditionally
//
// ### Loop
// - `DNSPLAN_INTERVAL_SECS`: Seconds between plans (default: 60)
// - `DNSPLAN_ONCE`: Calculate a single plan and exit (true/false)
// - `DNSPLAN_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export DNSPLAN_OWNER_ID=cluster-a
// export DNSPLAN_DOMAIN_FILTER=example.com
// export DNSPLAN_CURRENT_PATH=/var/lib/dnsplan/current.json
// export DNSPLAN_DESIRED_PATH=/var/lib/dnsplan/desired.json
// export DNSPLAN_ONCE=true
//
// dnsplan > changes.json
// ```

mod source;

use anyhow::{Context, Result};
use dnsplan_core::{Changes, PlanConfig, PolicyRegistry};
use source::{FileRecordSource, RecordSource};
use std::collections::BTreeMap;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum PlanExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<PlanExitCode> for ExitCode {
    fn from(code: PlanExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    plan: PlanConfig,
    current_path: String,
    desired_path: String,
    missing_path: Option<String>,
    interval_secs: u64,
    once: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut plan = PlanConfig::new(
            lookup("DNSPLAN_OWNER_ID").context("DNSPLAN_OWNER_ID is required")?,
        );
        plan.owner_id_old = lookup("DNSPLAN_OWNER_ID_OLD").filter(|s| !s.trim().is_empty());
        plan.owner_migrate = parse_flag("DNSPLAN_OWNER_MIGRATE", lookup("DNSPLAN_OWNER_MIGRATE"))?;

        if let Some(types) = lookup("DNSPLAN_MANAGED_RECORD_TYPES") {
            plan.managed_record_types = split_list(&types);
        }
        plan.domain_filter.include = lookup("DNSPLAN_DOMAIN_FILTER")
            .map(|s| split_list(&s))
            .unwrap_or_default();
        plan.domain_filter.exclude = lookup("DNSPLAN_EXCLUDE_DOMAINS")
            .map(|s| split_list(&s))
            .unwrap_or_default();
        if let Some(policy) = lookup("DNSPLAN_POLICY") {
            plan.policy = policy.trim().to_string();
        }
        if let Some(properties) = lookup("DNSPLAN_BOOLEAN_PROPERTIES") {
            plan.boolean_properties = parse_boolean_properties(&properties)?;
        }

        let interval_secs = match lookup("DNSPLAN_INTERVAL_SECS") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("DNSPLAN_INTERVAL_SECS is not a number: {}", value))?,
            None => 60,
        };

        Ok(Self {
            plan,
            current_path: lookup("DNSPLAN_CURRENT_PATH").context("DNSPLAN_CURRENT_PATH is required")?,
            desired_path: lookup("DNSPLAN_DESIRED_PATH").context("DNSPLAN_DESIRED_PATH is required")?,
            missing_path: lookup("DNSPLAN_MISSING_PATH").filter(|s| !s.trim().is_empty()),
            interval_secs,
            once: parse_flag("DNSPLAN_ONCE", lookup("DNSPLAN_ONCE"))?,
            log_level: lookup("DNSPLAN_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self, registry: &PolicyRegistry) -> Result<()> {
        self.plan.validate()?;

        if !registry.has_policy(&self.plan.policy) {
            anyhow::bail!(
                "DNSPLAN_POLICY '{}' is not supported. \
                Supported policies: {}",
                self.plan.policy,
                registry.list_policies().join(", ")
            );
        }

        if self.current_path.trim().is_empty() || self.desired_path.trim().is_empty() {
            anyhow::bail!("DNSPLAN_CURRENT_PATH and DNSPLAN_DESIRED_PATH cannot be empty");
        }

        if !self.once && !(1..=86400).contains(&self.interval_secs) {
            anyhow::bail!(
                "DNSPLAN_INTERVAL_SECS must be between 1 and 86400 seconds. Got: {}",
                self.interval_secs
            );
        }

        // Validate log level
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DNSPLAN_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn record_source(&self) -> FileRecordSource {
        let source = FileRecordSource::new(&self.current_path, &self.desired_path);
        match &self.missing_path {
            Some(path) => source.with_missing_path(path),
            None => source,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(name: &str, value: Option<String>) -> Result<bool> {
    match value.as_deref().map(|v| v.trim().to_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            _ => anyhow::bail!("{} must be true or false. Got: {}", name, v),
        },
    }
}

/// Parse `name=default` pairs, e.g. `proxied=false,ipv6=true`
fn parse_boolean_properties(value: &str) -> Result<BTreeMap<String, bool>> {
    split_list(value)
        .into_iter()
        .map(|pair| -> Result<(String, bool)> {
            let (name, default) = pair
                .split_once('=')
                .with_context(|| format!("DNSPLAN_BOOLEAN_PROPERTIES entry '{}' is not name=default", pair))?;
            let default = parse_flag("DNSPLAN_BOOLEAN_PROPERTIES", Some(default.to_string()))?;
            Ok((name.trim().to_string(), default))
        })
        .collect()
}

fn main() -> ExitCode {
    let registry = PolicyRegistry::with_defaults();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return PlanExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate(&registry) {
        eprintln!("Configuration validation error: {:#}", e);
        return PlanExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout carries only the emitted changes
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return PlanExitCode::ConfigError.into();
    }

    info!("Starting dnsplan daemon");
    info!(
        "Owner: {}, policy: {}, managed types: {}",
        config.plan.owner_id,
        config.plan.policy,
        config.plan.managed_record_types.join(",")
    );

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return PlanExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config, registry).await {
            error!("Daemon error: {:#}", e);
            PlanExitCode::RuntimeError
        } else {
            PlanExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config, registry: PolicyRegistry) -> Result<()> {
    let source = config.record_source();
    info!("Record source: {}", source.source_name());

    if config.once {
        run_once(&config.plan, &registry, &source).await?;
        return Ok(());
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_secs));
    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_once(&config.plan, &registry, &source).await {
                    // Continue running despite errors; the next tick retries
                    warn!("Plan calculation failed: {:#}", e);
                }
            }

            signal = &mut shutdown => {
                info!("Received shutdown signal: {}", signal?);
                info!("Shutting down daemon");
                break;
            }
        }
    }

    Ok(())
}

/// Load the records, calculate one plan and emit its changes
async fn run_once(
    plan_config: &PlanConfig,
    registry: &PolicyRegistry,
    source: &dyn RecordSource,
) -> Result<Changes> {
    let (current, desired, missing) = tokio::try_join!(
        source.current_records(),
        source.desired_records(),
        source.missing_records(),
    )
    .context("failed to load records")?;

    let plan = plan_config
        .build_plan(current, desired, registry)?
        .with_missing(missing)
        .calculate();
    let changes = plan.changes.unwrap_or_default();

    info!(
        create = changes.create.len(),
        update = changes.update_new.len(),
        delete = changes.delete.len(),
        migrated = plan.has_migrated,
        "Plan calculated"
    );

    if changes.has_changes() {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    }

    Ok(changes)
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
