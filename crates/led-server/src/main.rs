//! LED-Over-IP server entry point.
//!
//! This binary exposes one GPIO output line (typically an LED on a Raspberry
//! Pi) over a WebSocket endpoint. Exactly one client may hold the session at
//! a time; it controls the line with the plain-text commands `ON`, `OFF`, and
//! `STATUS`.
//!
//! # Usage
//!
//! ```text
//! led-server [OPTIONS]
//!
//! Options:
//!   --config <PATH>            TOML config file (optional)
//!   --bind <ADDR>              Listener bind address [default: 0.0.0.0]
//!   --port <PORT>              Listener TCP port [default: 8765]
//!   --gpio-pin <PIN>           BCM pin number of the LED [default: 17]
//!   --active-low               LED is wired active-low
//!   --poll-interval-ms <MS>    Session receive poll cadence [default: 50]
//!   --uplink-probe <ADDR>      Route-probe target [default: 8.8.8.8:53]
//!   --no-uplink-wait           Skip the network readiness wait
//!   --mock-gpio                Force the mock output driver
//! ```
//!
//! # Environment variable overrides
//!
//! Every option can also come from the environment. Precedence, highest
//! first: CLI flag, environment variable, config file, built-in default.
//!
//! | Variable               | Matching option      |
//! |------------------------|----------------------|
//! | `LED_CONFIG`           | `--config`           |
//! | `LED_BIND`             | `--bind`             |
//! | `LED_PORT`             | `--port`             |
//! | `LED_GPIO_PIN`         | `--gpio-pin`         |
//! | `LED_ACTIVE_LOW`       | `--active-low`       |
//! | `LED_POLL_INTERVAL_MS` | `--poll-interval-ms` |
//! | `LED_UPLINK_PROBE`     | `--uplink-probe`     |
//!
//! # Architecture overview
//!
//! ```text
//! WebSocket client  (plain text: ON / OFF / STATUS)
//!       ↕
//! led-server  ← this process
//!   domain/          ServerConfig schema and validation
//!   application/     admission gate, session loop, shared state
//!   infrastructure/
//!     ws_server/     accept loop + handshake
//!     ws_channel/    WebSocket ↔ session channel adapter
//!     gpio/          rppal pin driver (mock off-Pi)
//!     uplink/        network readiness probe
//!     storage/       TOML config loading
//!       ↕
//! GPIO pin (BCM 17 by default) → LED
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use led_server::application::ServerState;
use led_server::domain::ServerConfig;
use led_server::infrastructure::{
    build_controller, load_config, run_server, wait_for_uplink, DEFAULT_PROBE_INTERVAL,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// LED-Over-IP server.
///
/// Serves a single-client WebSocket endpoint that drives one GPIO output
/// line with the text commands `ON`, `OFF`, and `STATUS`.
///
/// Every field is optional so that unset flags fall through to the config
/// file, and unset file keys fall through to the built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "led-server",
    about = "Single-client WebSocket control server for a GPIO output line",
    version
)]
struct Cli {
    /// Path to a TOML config file.
    ///
    /// A missing file is not an error; the server logs it and runs on
    /// defaults, which keeps first boots on a fresh image working.
    #[arg(long, env = "LED_CONFIG")]
    config: Option<PathBuf>,

    /// IP address to bind the WebSocket listener to.
    ///
    /// Use `0.0.0.0` to accept connections from any interface, or
    /// `127.0.0.1` to accept only local connections.
    #[arg(long, env = "LED_BIND")]
    bind: Option<String>,

    /// TCP port for the WebSocket listener.
    #[arg(long, env = "LED_PORT")]
    port: Option<u16>,

    /// BCM number of the GPIO pin that drives the LED.
    #[arg(long, env = "LED_GPIO_PIN")]
    gpio_pin: Option<u8>,

    /// Treat the LED as wired active-low (engaged drives the pin low).
    #[arg(long, env = "LED_ACTIVE_LOW")]
    active_low: bool,

    /// Milliseconds between receive polls within a session.
    #[arg(long, env = "LED_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,

    /// Address used to probe for network readiness. Never contacted; the
    /// kernel is only asked whether a route to it exists.
    #[arg(long, env = "LED_UPLINK_PROBE")]
    uplink_probe: Option<String>,

    /// Skip the uplink readiness wait at startup.
    #[arg(long)]
    no_uplink_wait: bool,

    /// Force the mock output driver even where GPIO is available.
    #[arg(long)]
    mock_gpio: bool,
}

/// Merges the config file (if any) with CLI/environment overrides and
/// validates the result.
///
/// # Errors
///
/// Returns an error if the named config file exists but cannot be read or
/// parsed, or if the merged configuration fails validation.
fn resolve_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => match load_config(path)? {
            Some(file) => {
                info!("loaded configuration from {}", path.display());
                file
            }
            None => {
                warn!("config file {} not found; using defaults", path.display());
                ServerConfig::default()
            }
        },
        None => ServerConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.bind_address = bind.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(pin) = cli.gpio_pin {
        config.gpio_pin = pin;
    }
    if cli.active_low {
        config.active_low = true;
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(probe) = &cli.uplink_probe {
        config.uplink_probe = probe.clone();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised; the log level is controlled by
///    the `RUST_LOG` environment variable (e.g., `RUST_LOG=debug`).
/// 2. CLI arguments are parsed and merged with the config file.
/// 3. A Ctrl+C handler is spawned; it clears a shared `AtomicBool` that the
///    accept loop and session loop check on every poll.
/// 4. Startup blocks until the network uplink is ready (skippable with
///    `--no-uplink-wait`), because a headless Pi usually boots faster than
///    its DHCP lease arrives.
/// 5. The output driver is built and the line is driven to its disengaged
///    starting state.
/// 6. [`run_server`] binds the listener and accepts clients until shutdown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `EnvFilter::try_from_default_env()` reads the `RUST_LOG` environment
    // variable. If it is absent or invalid, fall back to `info` level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    info!(
        "LED server starting on {}:{} (GPIO pin {}, poll every {} ms)",
        config.bind_address, config.port, config.gpio_pin, config.poll_interval_ms
    );

    // Shared shutdown flag. `Relaxed` ordering is enough because the loops
    // only need the cleared value to propagate eventually.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    if cli.no_uplink_wait {
        info!("skipping uplink readiness wait (--no-uplink-wait)");
    } else {
        let probe = config.probe_addr()?;
        if wait_for_uplink(probe, DEFAULT_PROBE_INTERVAL, &running)
            .await
            .is_none()
        {
            // Ctrl+C arrived while the network was still down.
            return Ok(());
        }
    }

    let controller = build_controller(config.gpio_pin, config.active_low, cli.mock_gpio)
        .context("failed to initialise the output driver")?;

    // Drive the line to its known starting state before any client connects,
    // so STATUS and the hardware agree from the first session onward.
    controller
        .set_engaged(false)
        .context("failed to drive the output line to its initial state")?;

    let state = Arc::new(ServerState::new());

    run_server(&config, state, controller, Arc::clone(&running)).await?;

    info!("LED server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
