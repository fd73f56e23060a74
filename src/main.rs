//! VitalWatch gateway: replay a telemetry capture through the alert pipeline.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  ReplayTransport   LogEventSink   JsonConfigFile  SystemClock  │
//! │  (20 B chunks)     (EventSink)    (ConfigPort)    (Clock)      │
//! │  JsonContactStore  DryRunChannel  FixedLocation   LogIndicator │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  Session (decoder · parser · evaluator · FSM · log)    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │  AlertRuntime (LocalExecutor · report channel) · Dispatcher    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info, warn};

use vitalwatch::adapters::clock::SystemClock;
use vitalwatch::adapters::config_file::JsonConfigFile;
use vitalwatch::adapters::contacts::JsonContactStore;
use vitalwatch::adapters::dry_run::DryRunChannel;
use vitalwatch::adapters::indicator::LogIndicator;
use vitalwatch::adapters::location::FixedLocation;
use vitalwatch::adapters::log_sink::LogEventSink;
use vitalwatch::app::commands::AppCommand;
use vitalwatch::app::events::AppEvent;
use vitalwatch::app::ports::{ConfigError, ConfigPort, EventSink};
use vitalwatch::dispatch::{AlertTrigger, DispatchReport};
use vitalwatch::link::transport::{DEFAULT_CHUNK_SIZE, ReplayTransport, Transport};
use vitalwatch::{AlertDispatcher, AlertRuntime, ContactKind, ContactTypes, GatewayConfig, Session};

#[derive(Parser)]
#[command(name = "vitalwatch")]
#[command(about = "Replay wearable telemetry through the emergency alert pipeline")]
struct Cli {
    /// Newline-delimited JSON capture; reads stdin when omitted or `-`.
    capture: Option<PathBuf>,

    /// Gateway configuration file (created with defaults if missing).
    #[arg(long, default_value = "vitalwatch.json")]
    config: PathBuf,

    /// Contact list, overriding `contacts_path` from the config.
    #[arg(long)]
    contacts: Option<PathBuf>,

    /// Bytes per simulated notification.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Send a manual alert with this message after the replay.
    #[arg(long)]
    manual_alert: Option<String>,

    /// Recipients of the manual alert.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [Recipient::Caregiver, Recipient::Medical])]
    to: Vec<Recipient>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Recipient {
    Caregiver,
    Medical,
}

impl From<Recipient> for ContactKind {
    fn from(r: Recipient) -> Self {
        match r {
            Recipient::Caregiver => ContactKind::Caregiver,
            Recipient::Medical => ContactKind::Medical,
        }
    }
}

/// Logs every event and prints dispatch outcomes for the operator.
struct CliSink {
    log: LogEventSink,
}

impl EventSink for CliSink {
    fn emit(&mut self, event: &AppEvent) {
        self.log.emit(event);
        if let AppEvent::DispatchCompleted(report) = event {
            print_report(report);
        }
    }
}

fn print_report(report: &DispatchReport) {
    let label = match report.trigger {
        AlertTrigger::Automatic { incident } => format!("incident #{incident}"),
        AlertTrigger::Manual => "manual alert".to_string(),
    };
    match &report.outcome {
        Ok(summary) => {
            println!(
                "{label}: sent to {} of {} contacts",
                summary.sent,
                summary.attempted()
            );
            for f in summary.failures() {
                if let Err(e) = &f.result {
                    println!("  failed: {} ({:?}): {}", f.contact.name, f.channel, e);
                }
            }
        }
        Err(e) => println!("{label}: not sent: {e}"),
    }
}

fn load_config(port: &JsonConfigFile) -> Result<GatewayConfig> {
    match port.load() {
        Ok(cfg) => Ok(cfg),
        Err(ConfigError::NotFound) => {
            info!("No config at {}, writing defaults", port.path().display());
            let cfg = GatewayConfig::default();
            if let Err(e) = port.save(&cfg) {
                warn!("Could not persist default config: {}", e);
            }
            Ok(cfg)
        }
        Err(e) => Err(e).with_context(|| format!("loading {}", port.path().display())),
    }
}

fn read_capture(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::read(p).with_context(|| format!("reading capture {}", p.display()))
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading capture from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    info!("VitalWatch v{}", env!("CARGO_PKG_VERSION"));

    // ── Config ──
    let mut config = load_config(&JsonConfigFile::new(&cli.config))?;
    if let Some(path) = cli.contacts {
        config.contacts_path = path;
    }
    config.validate().context("invalid configuration")?;

    // ── Alert pipeline ──
    let runtime = AlertRuntime::new();
    let sender = config.dispatch.sender_number.clone();
    let dispatcher = AlertDispatcher::new(
        JsonContactStore::new(&config.contacts_path),
        DryRunChannel::new(sender.clone()),
        DryRunChannel::new(sender),
        FixedLocation(config.dispatch.location),
        SystemClock,
        config.dispatch.clone(),
        runtime.executor(),
    )
    .context("invalid dispatch settings")?;

    let mut sink = CliSink {
        log: LogEventSink::new(),
    };
    let mut indicator = LogIndicator::new();
    let mut session = Session::connect(
        &config,
        Rc::new(dispatcher),
        runtime.clone(),
        SystemClock,
        &mut sink,
    );

    // ── Replay ──
    let capture = read_capture(cli.capture.as_deref())?;
    let mut transport = ReplayTransport::new(capture, cli.chunk_size);
    let mut buf = [0u8; 512];
    while transport.is_connected() {
        let n = transport.read(&mut buf).unwrap_or_else(|e| match e {});
        if n == 0 {
            break;
        }
        session.feed_chunk(&buf[..n], &mut indicator, &mut sink);
        runtime.run_pending();
        session.drain_reports(&mut sink);
    }

    if let Some(message) = cli.manual_alert {
        let types: ContactTypes = cli.to.iter().map(|r| ContactKind::from(*r)).collect();
        if let Err(e) = session.handle_command(AppCommand::ManualAlert { message, types }) {
            error!("Manual alert rejected: {}", e);
        }
    }

    // ── Teardown: in-flight alerts finish after the session is gone ──
    let stats = session.disconnect(&mut sink);
    for report in runtime.settle() {
        sink.emit(&AppEvent::DispatchCompleted(report));
    }
    if let Some(incident) = indicator.raised() {
        println!("emergency indicator still raised (incident #{incident})");
    }
    println!(
        "{} readings from {} chunks, {} dropped line(s), {} incident(s)",
        stats.readings, stats.chunks, stats.dropped_lines, stats.incidents
    );
    Ok(())
}
