//! Minimal embedding example for ranger-core
//!
//! This example builds a dual-stack router from configuration, loads a few
//! entries, and answers lookups for the addresses given on the command line.
//!
//! ## Configuration
//!
//! - `RANGER_CONFIG`: Path to a JSON router config (optional, defaults to the brute engine)
//! - `RANGER_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//!
//! ## Example
//!
//! ```bash
//! RANGER_LOG_LEVEL=debug embedded_usage 10.1.2.3 2001:db8::1 not-an-ip
//! ```

use anyhow::{Context, Result};
use ranger_core::{BasicRangeEntry, EngineRegistry, RouterConfig, VersionedRouter};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Entry metadata: a label describing the block
type Entry = BasicRangeEntry<String>;

/// Networks loaded at startup
const SEED_NETWORKS: &[(&str, &str)] = &[
    ("10.0.0.0/8", "rfc1918-a"),
    ("172.16.0.0/12", "rfc1918-b"),
    ("192.168.0.0/16", "rfc1918-c"),
    ("192.168.1.0/24", "home-lan"),
    ("2001:db8::/32", "documentation"),
    ("fd00::/8", "unique-local"),
];

fn load_config() -> Result<RouterConfig> {
    match env::var("RANGER_CONFIG") {
        Ok(path) => RouterConfig::from_file(&path)
            .with_context(|| format!("Failed to load router config from {}", path)),
        Err(_) => Ok(RouterConfig::default()),
    }
}

fn seed(router: &VersionedRouter<Entry>) -> Result<()> {
    for (network, label) in SEED_NETWORKS {
        let network = network
            .parse()
            .with_context(|| format!("Invalid seed network {}", network))?;
        router.insert(BasicRangeEntry::new(network, label.to_string()))?;
    }
    info!("Loaded {} networks", router.len());
    Ok(())
}

fn lookup(router: &VersionedRouter<Entry>, query: &str) {
    match router.containing_networks(query) {
        Ok(found) if found.is_empty() => println!("{:<20} no match", query),
        Ok(found) => {
            let labels: Vec<String> = found
                .iter()
                .map(|entry| format!("{} ({})", entry.network, entry.metadata))
                .collect();
            println!("{:<20} {}", query, labels.join(", "));
        }
        Err(e) if e.is_invalid_address() => warn!("Skipping {:?}: {}", query, e),
        Err(e) => error!("Lookup of {} failed: {}", query, e),
    }
}

fn run() -> Result<()> {
    let config = load_config()?;
    let registry = EngineRegistry::<Entry>::new();
    let router = VersionedRouter::from_config(&registry, &config)?;

    seed(&router)?;

    let queries: Vec<String> = env::args().skip(1).collect();
    if queries.is_empty() {
        for query in ["10.1.2.3", "192.168.1.20", "2001:db8::1", "::1"] {
            lookup(&router, query);
        }
    } else {
        for query in &queries {
            lookup(&router, query);
        }
    }

    let layout = router.prefix_layout();
    println!("IPv4 prefix layout: {}", serde_json::to_string(&layout.ipv4)?);
    println!("IPv6 prefix layout: {}", serde_json::to_string(&layout.ipv6)?);

    Ok(())
}

fn main() -> ExitCode {
    let log_level = match env::var("RANGER_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ExitCode::FAILURE;
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
