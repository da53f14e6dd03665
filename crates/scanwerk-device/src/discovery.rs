// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mDNS service discovery for eSCL (AirScan) scanners on the local network.
//
// We browse for `_uscan._tcp.local.` (plain HTTP) and `_uscans._tcp.local.`
// (TLS) using the `mdns-sd` crate.  Resolved services are converted into
// `DiscoveredScanner` values that the rest of the application can consume.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use tracing::{debug, info, warn};

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{DiscoveredScanner, UnitKind};

/// mDNS service type for plain eSCL.
const USCAN_SERVICE: &str = "_uscan._tcp.local.";

/// mDNS service type for TLS-secured eSCL.
const USCANS_SERVICE: &str = "_uscans._tcp.local.";

/// Default browse duration before the initial snapshot is returned.
const DEFAULT_BROWSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Scanner discovery engine using mDNS-SD.
///
/// Wraps an `mdns-sd` `ServiceDaemon` that continuously browses for eSCL
/// services.  Discovered scanners are accumulated in a thread-safe map keyed
/// by their full service name so that duplicate events are deduplicated
/// automatically.
pub struct ScannerDiscovery {
    /// The underlying mDNS daemon handle.
    daemon: ServiceDaemon,
    /// Thread-safe map of discovered scanners keyed by mDNS full-name.
    scanners: Arc<Mutex<HashMap<String, DiscoveredScanner>>>,
    /// Whether we are currently browsing.
    browsing: bool,
}

impl ScannerDiscovery {
    /// Create a new discovery engine.
    ///
    /// This spawns the mDNS daemon thread but does **not** start browsing.
    /// Call [`start`] to begin service discovery.
    pub fn new() -> Result<Self> {
        let daemon = ServiceDaemon::new()
            .map_err(|e| ScanwerkError::Discovery(format!("failed to start mDNS daemon: {e}")))?;
        Ok(Self {
            daemon,
            scanners: Arc::new(Mutex::new(HashMap::new())),
            browsing: false,
        })
    }

    /// Start browsing for eSCL scanners over HTTP and HTTPS.
    ///
    /// Returns immediately.  Discovered scanners are accumulated internally
    /// and can be retrieved with [`scanners`].  Background `flume` receiver
    /// threads are spawned for each service type.
    pub fn start(&mut self) -> Result<()> {
        if self.browsing {
            debug!("scanner discovery already running");
            return Ok(());
        }

        let uscan_receiver = self
            .daemon
            .browse(USCAN_SERVICE)
            .map_err(|e| ScanwerkError::Discovery(format!("browse {USCAN_SERVICE}: {e}")))?;

        let uscans_receiver = self
            .daemon
            .browse(USCANS_SERVICE)
            .map_err(|e| ScanwerkError::Discovery(format!("browse {USCANS_SERVICE}: {e}")))?;

        // Spawn a background thread per service type to drain the receiver
        // channel and update the shared scanner map.
        Self::spawn_listener(
            USCAN_SERVICE,
            false,
            uscan_receiver,
            Arc::clone(&self.scanners),
        );
        Self::spawn_listener(
            USCANS_SERVICE,
            true,
            uscans_receiver,
            Arc::clone(&self.scanners),
        );

        self.browsing = true;
        info!("mDNS scanner discovery started");
        Ok(())
    }

    /// Stop browsing for scanners.
    pub fn stop(&mut self) -> Result<()> {
        if !self.browsing {
            return Ok(());
        }

        self.daemon
            .stop_browse(USCAN_SERVICE)
            .map_err(|e| ScanwerkError::Discovery(format!("stop browse {USCAN_SERVICE}: {e}")))?;
        self.daemon
            .stop_browse(USCANS_SERVICE)
            .map_err(|e| ScanwerkError::Discovery(format!("stop browse {USCANS_SERVICE}: {e}")))?;

        self.browsing = false;
        info!("mDNS scanner discovery stopped");
        Ok(())
    }

    /// Shut down the mDNS daemon entirely.
    ///
    /// After calling this the `ScannerDiscovery` instance cannot be reused.
    pub fn shutdown(self) -> Result<()> {
        let _status_rx = self
            .daemon
            .shutdown()
            .map_err(|e| ScanwerkError::Discovery(format!("daemon shutdown: {e}")))?;
        info!("mDNS daemon shut down");
        Ok(())
    }

    /// Return a snapshot of all currently discovered scanners.
    pub fn scanners(&self) -> Vec<DiscoveredScanner> {
        self.scanners
            .lock()
            .expect("scanner map lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Browse the network for scanners, wait up to `timeout` for initial
    /// results, then return whatever has been found.
    ///
    /// This is a convenience wrapper combining [`start`], a sleep, and
    /// [`scanners`].  Discovery continues running in the background after
    /// this call returns.
    pub fn discover(&mut self, timeout: Option<Duration>) -> Result<Vec<DiscoveredScanner>> {
        self.start()?;
        std::thread::sleep(timeout.unwrap_or(DEFAULT_BROWSE_TIMEOUT));
        Ok(self.scanners())
    }

    /// Whether the discovery engine is currently browsing.
    pub fn is_browsing(&self) -> bool {
        self.browsing
    }

    // -- internal helpers ---------------------------------------------------

    /// Spawn a thread that drains the `flume::Receiver<ServiceEvent>` produced
    /// by `ServiceDaemon::browse` and populates the shared scanner map.
    fn spawn_listener(
        service_type: &'static str,
        tls: bool,
        receiver: mdns_sd::Receiver<ServiceEvent>,
        scanners: Arc<Mutex<HashMap<String, DiscoveredScanner>>>,
    ) {
        std::thread::Builder::new()
            .name(format!("mdns-{service_type}"))
            .spawn(move || {
                // Block on the receiver until the channel is closed (which
                // happens when the daemon is shut down or browsing is stopped).
                while let Ok(event) = receiver.recv() {
                    match event {
                        ServiceEvent::SearchStarted(stype) => {
                            debug!(service_type = %stype, "mDNS search started");
                        }
                        ServiceEvent::ServiceFound(stype, fullname) => {
                            debug!(service_type = %stype, name = %fullname, "service found");
                        }
                        ServiceEvent::ServiceResolved(info) => {
                            let fullname = info.get_fullname().to_owned();
                            match service_info_to_scanner(&info, tls) {
                                Ok(scanner) => {
                                    info!(
                                        name = %scanner.name,
                                        uri = %scanner.uri,
                                        "scanner resolved"
                                    );
                                    scanners
                                        .lock()
                                        .expect("scanner map lock poisoned")
                                        .insert(fullname, scanner);
                                }
                                Err(e) => {
                                    warn!(
                                        fullname = %fullname,
                                        error = %e,
                                        "failed to convert resolved service to scanner"
                                    );
                                }
                            }
                        }
                        ServiceEvent::ServiceRemoved(stype, fullname) => {
                            info!(service_type = %stype, name = %fullname, "scanner removed");
                            scanners
                                .lock()
                                .expect("scanner map lock poisoned")
                                .remove(&fullname);
                        }
                        ServiceEvent::SearchStopped(stype) => {
                            debug!(service_type = %stype, "mDNS search stopped");
                            break;
                        }
                    }
                }
            })
            .expect("failed to spawn mDNS listener thread");
    }
}

/// Convert a resolved `ServiceInfo` into a `DiscoveredScanner`.
///
/// TXT record keys (case-insensitive) defined by the AirScan spec:
///   - `ty`     — human-readable make/model string
///   - `note`   — physical location
///   - `rs`     — resource path (e.g. "eSCL")
///   - `is`     — input sources, comma-separated ("platen,adf")
///   - `cs`     — color spaces, comma-separated ("color,grayscale,binary")
///   - `duplex` — "T" or "F"
fn service_info_to_scanner(info: &ServiceInfo, tls: bool) -> Result<DiscoveredScanner> {
    let name = info.get_fullname().to_owned();
    let port = info.get_port();

    // Pick the first address — prefer IPv4 for wider scanner compatibility.
    let ip: IpAddr = info
        .get_addresses()
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| info.get_addresses().iter().next())
        .copied()
        .ok_or_else(|| ScanwerkError::Discovery(format!("no address for service {name}")))?;

    // Build the eSCL base URI from the TXT `rs` key or fall back to "eSCL".
    let resource_path = info
        .get_property_val_str("rs")
        .map(|rs| rs.trim_matches('/'))
        .filter(|rs| !rs.is_empty())
        .unwrap_or("eSCL");

    let scheme = if tls { "https" } else { "http" };
    let uri = format!("{scheme}://{ip}:{port}/{resource_path}");

    let sources = info
        .get_property_val_str("is")
        .map(parse_sources)
        .unwrap_or_default();
    let color_spaces = info
        .get_property_val_str("cs")
        .map(parse_list)
        .unwrap_or_default();
    let supports_duplex = txt_bool(info, "duplex");

    let make_and_model = info.get_property_val_str("ty").map(String::from);
    let location = info.get_property_val_str("note").map(String::from);

    Ok(DiscoveredScanner {
        name,
        uri,
        ip,
        port,
        make_and_model,
        location,
        sources,
        color_spaces,
        supports_duplex,
        supports_tls: tls,
        last_seen: Utc::now(),
    })
}

/// Map the `is` TXT record onto functional-unit kinds.  "platen" is the
/// AirScan name for a flatbed glass bed.
fn parse_sources(value: &str) -> Vec<UnitKind> {
    let mut kinds = Vec::new();
    for item in parse_list(value) {
        let kind = match item.as_str() {
            "platen" => Some(UnitKind::Flatbed),
            "adf" | "adf duplex" => Some(UnitKind::Feeder),
            _ => None,
        };
        if let Some(kind) = kind {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
    }
    kinds
}

/// Split a comma-separated TXT value into trimmed lowercase items.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_ascii_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Read a boolean TXT record value.  AirScan uses "T"/"F".
fn txt_bool(info: &ServiceInfo, key: &str) -> bool {
    info.get_property_val_str(key)
        .map(|v| v.eq_ignore_ascii_case("t") || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_bool_logic_parses_true_variants() {
        // Tests the boolean-parsing logic used by `txt_bool`.
        // Full integration with `ServiceInfo` requires a live mDNS network.
        let parse = |v: &str| v.eq_ignore_ascii_case("t") || v.eq_ignore_ascii_case("true");
        assert!(parse("T"));
        assert!(parse("t"));
        assert!(parse("true"));
        assert!(parse("TRUE"));
        assert!(!parse("F"));
        assert!(!parse("false"));
        assert!(!parse(""));
    }

    #[test]
    fn sources_record_maps_to_unit_kinds() {
        assert_eq!(
            parse_sources("platen,adf"),
            vec![UnitKind::Flatbed, UnitKind::Feeder]
        );
        assert_eq!(parse_sources("ADF"), vec![UnitKind::Feeder]);
        assert_eq!(parse_sources("platen, platen"), vec![UnitKind::Flatbed]);
        assert!(parse_sources("camera").is_empty());
        assert!(parse_sources("").is_empty());
    }

    #[test]
    fn list_record_is_trimmed_and_lowercased() {
        assert_eq!(
            parse_list("Color, Grayscale ,BINARY"),
            vec!["color", "grayscale", "binary"]
        );
        assert!(parse_list("").is_empty());
    }
}
