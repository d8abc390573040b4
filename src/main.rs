//! Vitals Hub - Biometric Kiosk Core Binary
//!
//! A standalone binary for pulling sensor-board measurements over the peer link
//! and serving classified vitals snapshots.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vitals_hub::{
    link::{start_link, LinkConfig},
    AggregatorConfig, RemoteSnapshot, SampleStore, VitalsAggregator, VitalsBus, VitalsProvider,
    VitalsSnapshot, DEFAULT_BIND_ADDR, DEFAULT_BUS_CAPACITY, DEFAULT_HEIGHT_REF_M,
    DEFAULT_INTERVAL_MS, DEFAULT_PEER_ADDR, DEFAULT_RESPONSE_WAIT_MS, DEFAULT_STALE_AFTER_MS,
};

#[derive(Parser)]
#[command(name = "vitals_hub")]
#[command(about = "🩺 Vitals Hub - Biometric Kiosk Core")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Austin Couch")]
#[command(long_about = "Pulls sensor-board measurements over the peer link and classifies them")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Local link bind address
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    /// Remote measurement board address
    #[arg(long, default_value = DEFAULT_PEER_ADDR)]
    peer: String,

    /// Aggregation interval in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_MS)]
    interval: u64,

    /// Overhead ranging reference distance in meters
    #[arg(long, default_value_t = DEFAULT_HEIGHT_REF_M)]
    height_ref: f64,

    /// Staleness window in milliseconds
    #[arg(long, default_value_t = DEFAULT_STALE_AFTER_MS)]
    stale_after: u64,

    /// Bounded wait for a snapshot response in milliseconds
    #[arg(long, default_value_t = DEFAULT_RESPONSE_WAIT_MS)]
    wait: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the kiosk core: pull from the peer and stream classified vitals (default)
    Run(RunArgs),

    /// Pull a single classified snapshot and exit
    Snapshot(SnapshotArgs),

    /// Stand in for the measurement board and answer snapshot requests
    Respond(RespondArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Broadcast bus capacity
    #[arg(long, default_value_t = DEFAULT_BUS_CAPACITY)]
    bus_capacity: usize,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[derive(Args)]
struct RespondArgs {
    /// Weight to report, in kilograms
    #[arg(long, default_value_t = 70.0)]
    weight: f32,

    /// Height to report, in centimeters
    #[arg(long, default_value_t = 175.0)]
    height_cm: f32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    init_logging(&cli)?;

    // Print banner
    print_banner();

    match &cli.command {
        Some(Commands::Run(args)) => {
            run_command(&cli, args).await?;
        }
        Some(Commands::Snapshot(args)) => {
            snapshot_command(&cli, args).await?;
        }
        Some(Commands::Respond(args)) => {
            respond_command(&cli, args).await?;
        }
        None => {
            // Default to run command
            let run_args = RunArgs {
                bus_capacity: DEFAULT_BUS_CAPACITY,
            };
            run_command(&cli, &run_args).await?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn print_banner() {
    println!("🩺 Vitals Hub - Biometric Kiosk Core");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!("   Peer-linked sensor aggregation and status classification");
    println!();
}

fn link_config(cli: &Cli) -> LinkConfig {
    LinkConfig::new(&cli.bind, &cli.peer).with_response_wait_ms(cli.wait)
}

fn aggregator_config(cli: &Cli) -> AggregatorConfig {
    AggregatorConfig::default()
        .with_height_ref_m(cli.height_ref)
        .with_stale_after_ms(cli.stale_after)
}

async fn run_command(cli: &Cli, args: &RunArgs) -> anyhow::Result<()> {
    info!("Starting vitals hub...");

    let store = SampleStore::new();
    let link = start_link(&link_config(cli), store.clone())
        .await
        .context("failed to start peer link")?;

    let mut aggregator = VitalsAggregator::new(store, aggregator_config(cli));
    let bus = VitalsBus::new(args.bus_capacity);

    info!("Aggregating vitals every {}ms", cli.interval);
    info!("  - Height reference: {:.2} m", cli.height_ref);
    info!("  - Staleness window: {}ms", cli.stale_after);

    // Pull from the peer at the same cadence; responses land asynchronously
    // through the receive task.
    let request_link = link.clone();
    let request_interval = cli.interval;
    let _requester = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(request_interval));
        loop {
            ticker.tick().await;
            if let Err(e) = request_link.request_snapshot().await {
                warn!("Snapshot request failed: {}", e);
            }
        }
    });

    let mut stream = aggregator.start_stream(cli.interval).await?;
    while let Some(snapshot) = stream.next().await {
        info!(
            "weight {:.1}kg [{}] | temp {:.1}°C [{}] | hr {:.0}bpm [{}] | spo2 {:.0}% [{}]",
            snapshot.weight.value,
            snapshot.weight.status,
            snapshot.body_temp.value,
            snapshot.body_temp.status,
            snapshot.heart_rate.value,
            snapshot.heart_rate.status,
            snapshot.spo2.value,
            snapshot.spo2.status,
        );
        bus.publish(snapshot);
    }

    Ok(())
}

async fn snapshot_command(cli: &Cli, args: &SnapshotArgs) -> anyhow::Result<()> {
    let store = SampleStore::new();
    let link = start_link(&link_config(cli), store.clone())
        .await
        .context("failed to start peer link")?;

    if let Err(e) = link.await_snapshot().await {
        warn!("No response from measurement board: {}", e);
    }

    let aggregator = VitalsAggregator::new(store, aggregator_config(cli));
    let snapshot = aggregator.aggregate().await;

    match args.format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&snapshot)?;
            println!("{}", json);
        }
        "pretty" => {
            print_pretty_snapshot(&snapshot);
        }
        _ => {
            error!("Unsupported format: {}. Use 'json' or 'pretty'", args.format);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn respond_command(cli: &Cli, args: &RespondArgs) -> anyhow::Result<()> {
    let weight_kg = args.weight;
    let height_cm = args.height_cm;
    let height_m = f64::from(height_cm) / 100.0;
    let bmi = f64::from(weight_kg) / (height_m * height_m);

    let store = SampleStore::new();
    let link = vitals_hub::PeerLink::bind(&link_config(cli), store)
        .await
        .context("failed to start peer link")?
        .with_responder(Arc::new(move || RemoteSnapshot {
            weight_kg,
            height_cm,
            bmi: bmi as f32,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs() as u32,
        }));

    info!("Answering snapshot requests on {}", link.local_addr()?);
    info!(
        "  - Reporting {:.1} kg / {:.1} cm (BMI {:.2})",
        weight_kg, height_cm, bmi
    );
    let _receiver = link.spawn_receiver();

    tokio::signal::ctrl_c().await?;
    info!("Responder stopped");

    Ok(())
}

fn print_pretty_snapshot(snapshot: &VitalsSnapshot) {
    println!(
        "🩺 Vitals Snapshot ({})",
        chrono::DateTime::from_timestamp_millis(snapshot.timestamp as i64)
            .unwrap_or_default()
            .format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("==========================================");
    println!();

    println!("⚖️  Body:");
    println!(
        "  Weight: {:.1} kg [{}]",
        snapshot.weight.value, snapshot.weight.status
    );
    println!(
        "  Height (laser): {:.2} m [{}]",
        snapshot.height_laser.value, snapshot.height_laser.status
    );
    println!(
        "  Height (sonar): {:.2} m [{}]",
        snapshot.height_sonar.value, snapshot.height_sonar.status
    );
    println!(
        "  BMI (laser): {:.1} [{}]",
        snapshot.bmi_laser.value, snapshot.bmi_laser.status
    );
    println!(
        "  BMI (sonar): {:.1} [{}]",
        snapshot.bmi_sonar.value, snapshot.bmi_sonar.status
    );
    println!();

    println!("🌡️  Temperature:");
    println!(
        "  Body: {:.1}°C [{}]",
        snapshot.body_temp.value, snapshot.body_temp.status
    );
    println!(
        "  Ambient: {:.1}°C [{}]",
        snapshot.ambient_temp.value, snapshot.ambient_temp.status
    );
    println!();

    println!("❤️  Pulse:");
    println!(
        "  Heart rate: {:.0} bpm [{}]",
        snapshot.heart_rate.value, snapshot.heart_rate.status
    );
    println!(
        "  SpO2: {:.0}% [{}]",
        snapshot.spo2.value, snapshot.spo2.status
    );
    println!();

    println!("🔩 Platform:");
    println!("  Lift height: {:.2} m", snapshot.lift_height_m);
    println!();

    println!("📡 Sources:");
    for (name, health) in [
        ("scale", snapshot.sources.scale),
        ("thermal", snapshot.sources.thermal),
        ("ranging", snapshot.sources.ranging),
        ("remote", snapshot.sources.remote),
        ("pulse", snapshot.sources.pulse),
    ] {
        match health.age_ms {
            Some(age) => println!(
                "  {}: {}ms old{}",
                name,
                age,
                if health.stale { " (STALE)" } else { "" }
            ),
            None => println!("  {}: no data", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["vitals_hub", "--peer", "10.0.0.2:47701"]).unwrap();
        assert_eq!(cli.peer, "10.0.0.2:47701");
    }

    #[test]
    fn test_default_values() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["vitals_hub"]).unwrap();
        assert_eq!(cli.bind, DEFAULT_BIND_ADDR);
        assert_eq!(cli.peer, DEFAULT_PEER_ADDR);
        assert_eq!(cli.interval, DEFAULT_INTERVAL_MS);
        assert_eq!(cli.height_ref, DEFAULT_HEIGHT_REF_M);
    }

    #[test]
    fn test_respond_args() {
        use clap::Parser;

        let cli = Cli::try_parse_from([
            "vitals_hub",
            "respond",
            "--weight",
            "82.5",
            "--height-cm",
            "180",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Respond(args)) => {
                assert_eq!(args.weight, 82.5);
                assert_eq!(args.height_cm, 180.0);
            }
            _ => panic!("expected respond subcommand"),
        }
    }
}
