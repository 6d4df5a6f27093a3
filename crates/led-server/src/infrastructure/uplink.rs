//! Network uplink readiness probe.
//!
//! The server is meant to run headless on a Pi that joins the network via
//! DHCP. Starting before an address is assigned would bind the listener on a
//! host that nobody can route to, so startup blocks here until the uplink is
//! usable (or shutdown is requested first).
//!
//! # How the probe works (for beginners)
//!
//! Connecting a UDP socket transmits nothing. It only asks the kernel to pick
//! a route and a source address for the given destination, which is exactly
//! the question we want answered: "if a client tried to reach us, does the
//! network exist yet?" When no route is available the `connect` fails and we
//! retry after an interval. The probe target is never actually contacted, so
//! the default (a public DNS server) works even on networks that block DNS.

use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::sleep;
use tracing::{debug, info};

/// How long to wait between probe attempts while the uplink is down.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(1);

/// Blocks until the host has a route to `probe`, then returns the local
/// address the kernel chose for it.
///
/// Returns `None` if `running` is cleared before the uplink comes up, so a
/// Ctrl+C during boot still shuts the process down promptly.
pub async fn wait_for_uplink(
    probe: SocketAddr,
    interval: Duration,
    running: &AtomicBool,
) -> Option<IpAddr> {
    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown requested before the uplink came up");
            return None;
        }

        match probe_local_addr(probe).await {
            Ok(local) => {
                info!("network uplink ready, local address {local}");
                return Some(local);
            }
            Err(e) => {
                debug!("uplink not ready yet ({e}); retrying");
                sleep(interval).await;
            }
        }
    }
}

/// Asks the kernel which local address routes to `probe`. Sends no packets.
async fn probe_local_addr(probe: SocketAddr) -> std::io::Result<IpAddr> {
    let bind_addr = if probe.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.connect(probe).await?;
    Ok(socket.local_addr()?.ip())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
