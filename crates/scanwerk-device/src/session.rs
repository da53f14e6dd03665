// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The scan session state machine.
//
// One session drives one device from open to a terminal outcome:
//
//   Idle -> Opening -> Open -> SelectingUnit -> UnitReady -> Scanning
//        -> PageAcquired (loop) -> Completing -> Done
//
// Events are consumed strictly in arrival order. Some scanners deliver a
// unit-selected callback with an empty unit, a mismatched kind, or a spurious
// error even though a correct callback follows; those are tolerated as no-ops.
// Every other device error is terminal and never retried.

use std::io::Read;

use tracing::{debug, error, info, instrument, warn};

use scanwerk_core::catalog;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{PageFile, SessionId};
use scanwerk_core::ScanOptions;

use crate::device::{DeviceEvent, DeviceFault, EventReceiver, ScanDevice};
use crate::unit::{build_unit_settings, FunctionalUnit};

/// Lifecycle states of a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Opening,
    Open,
    SelectingUnit,
    UnitReady,
    Scanning,
    PageAcquired,
    Completing,
    Done,
}

/// Whether the operator wants another batch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDecision {
    Continue,
    Stop,
}

/// Source of the one-character batch continuation decision.
///
/// The state machine never touches stdin itself, so tests can drive the batch
/// loop with a scripted sequence.
pub trait ContinuePrompt {
    fn next_decision(&mut self) -> BatchDecision;
}

/// Production prompt: a blocking one-character read from stdin.
///
/// `s`/`S` stops the batch; any other byte (including the RETURN that
/// confirms it) continues. End-of-input stops rather than looping forever.
pub struct StdinPrompt;

impl ContinuePrompt for StdinPrompt {
    fn next_decision(&mut self) -> BatchDecision {
        eprintln!("Press RETURN to scan next page or S to stop");
        let mut byte = [0u8; 1];
        match std::io::stdin().read(&mut byte) {
            Ok(1) if byte[0] == b's' || byte[0] == b'S' => BatchDecision::Stop,
            Ok(1) => BatchDecision::Continue,
            _ => BatchDecision::Stop,
        }
    }
}

/// What the event handler tells the run loop to do next.
enum Flow {
    Continue,
    Finished,
}

/// Drives one scanner session from open to done and accumulates the page
/// files the device produces.
///
/// `run` resolves exactly once: `Ok` with the ordered pages on success, `Err`
/// on the first terminal failure. Pages are appended in notification order
/// and never reordered or deduplicated.
pub struct ScanSessionController<D: ScanDevice, P: ContinuePrompt> {
    id: SessionId,
    device: D,
    events: EventReceiver,
    options: ScanOptions,
    prompt: P,
    state: SessionState,
    pages: Vec<PageFile>,
}

impl<D: ScanDevice, P: ContinuePrompt> ScanSessionController<D, P> {
    pub fn new(device: D, events: EventReceiver, options: ScanOptions, prompt: P) -> Self {
        Self {
            id: SessionId::new(),
            device,
            events,
            options,
            prompt,
            state: SessionState::Idle,
            pages: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Run the session to its terminal outcome.
    #[instrument(skip_all, fields(session = %self.id, device = self.device.name()))]
    pub async fn run(mut self) -> Result<Vec<PageFile>> {
        debug!(unit = %self.options.unit_kind, "opening session with scanner");
        self.state = SessionState::Opening;
        self.device.request_open_session()?;

        while let Some(event) = self.events.recv().await {
            match self.handle(event)? {
                Flow::Continue => {}
                Flow::Finished => {
                    info!(pages = self.pages.len(), "scan session complete");
                    return Ok(self.pages);
                }
            }
        }

        Err(ScanwerkError::Device(
            "device event stream ended before the scan completed".into(),
        ))
    }

    /// Apply one device event to the state machine.
    fn handle(&mut self, event: DeviceEvent) -> Result<Flow> {
        match event {
            DeviceEvent::SessionOpened { error: Some(fault) } => {
                error!(%fault, "could not open session");
                Err(ScanwerkError::SessionOpen(fault.message))
            }
            DeviceEvent::SessionOpened { error: None } => {
                debug!("session opened");
                self.state = SessionState::Open;
                Ok(Flow::Continue)
            }

            DeviceEvent::DeviceReady => {
                if self.state != SessionState::Open {
                    debug!(state = ?self.state, "ignoring device-ready");
                    return Ok(Flow::Continue);
                }
                debug!(unit = %self.options.unit_kind, "selecting functional unit");
                self.state = SessionState::SelectingUnit;
                self.device.request_select_unit(self.options.unit_kind)?;
                Ok(Flow::Continue)
            }

            DeviceEvent::UnitSelected { unit, error } => self.handle_unit_selected(unit, error),

            DeviceEvent::PageProduced { file } => {
                if !self.is_scanning() {
                    warn!(state = ?self.state, page = %file.path.display(), "ignoring stray page");
                    return Ok(Flow::Continue);
                }
                debug!(page = %file.path.display(), total = self.pages.len() + 1, "page acquired");
                self.pages.push(file);
                self.state = SessionState::PageAcquired;
                Ok(Flow::Continue)
            }

            DeviceEvent::ScanCompleted { error: Some(fault) } => {
                error!(%fault, "scan failed");
                Err(ScanwerkError::ScanFailed(fault.message))
            }
            DeviceEvent::ScanCompleted { error: None } => self.handle_scan_completed(),

            DeviceEvent::SessionClosed { error } => {
                // The device dropped the session under us. This is terminal
                // whether or not it bothered to attach an error.
                let reason = error
                    .map(|f| f.message)
                    .unwrap_or_else(|| "closed by device".into());
                error!(%reason, "session closed before completion");
                Err(ScanwerkError::SessionClosed(reason))
            }

            DeviceEvent::Fault { error } => {
                error!(%error, "device fault");
                Err(ScanwerkError::Device(error.message))
            }
        }
    }

    /// Unit-selection callback, with all its hardware quirks.
    ///
    /// An empty unit without an error happens in the wild; so does an error
    /// alongside a perfectly usable unit. The payload governs: act only on a
    /// unit of the desired kind, otherwise keep waiting for a later callback.
    fn handle_unit_selected(
        &mut self,
        unit: Option<FunctionalUnit>,
        error: Option<DeviceFault>,
    ) -> Result<Flow> {
        if let Some(fault) = error {
            warn!(%fault, "unit selection reported an error; waiting for a usable unit");
        }

        let Some(unit) = unit else {
            debug!("unit-selected callback without a unit; ignoring");
            return Ok(Flow::Continue);
        };

        if self.state != SessionState::SelectingUnit {
            debug!(state = ?self.state, "ignoring unit-selected");
            return Ok(Flow::Continue);
        }
        if unit.kind() != self.options.unit_kind {
            debug!(got = %unit.kind(), want = %self.options.unit_kind, "ignoring mismatched unit");
            return Ok(Flow::Continue);
        }

        debug!(
            unit = %unit.kind(),
            document_types = catalog::supported_names(&unit.document_types).join("; "),
            "functional unit selected"
        );
        self.state = SessionState::UnitReady;

        let settings = build_unit_settings(&unit, &self.options)?;
        debug!(
            resolution = settings.resolution_dpi,
            bits = settings.color_mode.bit_depth(),
            document_type = ?settings.document_type,
            duplex = settings.duplex,
            "configuring unit"
        );
        self.device.configure(&settings)?;

        info!("starting scan");
        self.state = SessionState::Scanning;
        self.device.request_scan()?;
        Ok(Flow::Continue)
    }

    /// A scan pass finished without error: done, or another batch pass.
    fn handle_scan_completed(&mut self) -> Result<Flow> {
        if !self.is_scanning() {
            debug!(state = ?self.state, "ignoring scan-completed");
            return Ok(Flow::Continue);
        }

        if self.options.batch {
            match self.prompt.next_decision() {
                BatchDecision::Continue => {
                    debug!(pages = self.pages.len(), "continuing batch scan");
                    self.state = SessionState::Scanning;
                    self.device.request_scan()?;
                    return Ok(Flow::Continue);
                }
                BatchDecision::Stop => debug!("batch stopped by operator"),
            }
        }

        self.state = SessionState::Completing;
        if let Err(err) = self.device.request_close_session() {
            debug!(%err, "session close request failed");
        }
        self.state = SessionState::Done;
        Ok(Flow::Finished)
    }

    fn is_scanning(&self) -> bool {
        matches!(
            self.state,
            SessionState::Scanning | SessionState::PageAcquired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::{VirtualFault, VirtualProfile, VirtualScanner};
    use scanwerk_core::types::{OutputFormat, UnitKind};
    use std::collections::VecDeque;
    use std::path::PathBuf;

    /// Scripted prompt for batch tests.
    struct ScriptedPrompt {
        decisions: VecDeque<BatchDecision>,
    }

    impl ScriptedPrompt {
        fn new(decisions: &[BatchDecision]) -> Self {
            Self {
                decisions: decisions.iter().copied().collect(),
            }
        }
    }

    impl ContinuePrompt for ScriptedPrompt {
        fn next_decision(&mut self) -> BatchDecision {
            self.decisions.pop_front().expect("prompt script exhausted")
        }
    }

    /// Prompt that fails the test if the session ever consults it.
    struct PanicPrompt;

    impl ContinuePrompt for PanicPrompt {
        fn next_decision(&mut self) -> BatchDecision {
            panic!("single-shot session consulted the batch prompt");
        }
    }

    fn options(download_dir: PathBuf) -> ScanOptions {
        ScanOptions {
            output_root: PathBuf::from("/unused"),
            download_dir,
            ..ScanOptions::default()
        }
    }

    #[tokio::test]
    async fn flatbed_session_produces_one_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = ScanOptions {
            unit_kind: UnitKind::Flatbed,
            ..options(dir.path().to_path_buf())
        };
        let (device, events) = VirtualScanner::new(VirtualProfile::default());
        let session = ScanSessionController::new(device, events, opts, PanicPrompt);

        let pages = session.run().await.expect("session succeeds");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].path.exists());
        assert_eq!(
            pages[0].path.extension().and_then(|e| e.to_str()),
            Some("jpg")
        );
    }

    #[tokio::test]
    async fn feeder_session_collects_pages_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = VirtualProfile {
            feeder_page_count: 3,
            ..VirtualProfile::default()
        };
        let (device, events) = VirtualScanner::new(profile);
        let session = ScanSessionController::new(
            device,
            events,
            options(dir.path().to_path_buf()),
            PanicPrompt,
        );

        let pages = session.run().await.expect("session succeeds");
        assert_eq!(pages.len(), 3);
        let names: Vec<String> = pages
            .iter()
            .map(|p| p.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted, "pages arrive in production order");
    }

    #[tokio::test]
    async fn duplex_doubles_feeder_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = VirtualProfile {
            feeder_page_count: 2,
            ..VirtualProfile::default()
        };
        let opts = ScanOptions {
            duplex: true,
            ..options(dir.path().to_path_buf())
        };
        let (device, events) = VirtualScanner::new(profile);
        let session = ScanSessionController::new(device, events, opts, PanicPrompt);

        let pages = session.run().await.expect("session succeeds");
        assert_eq!(pages.len(), 4);
    }

    #[tokio::test]
    async fn batch_reissues_scans_until_stop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = VirtualProfile {
            feeder_page_count: 2,
            ..VirtualProfile::default()
        };
        let opts = ScanOptions {
            batch: true,
            ..options(dir.path().to_path_buf())
        };
        let (device, events) = VirtualScanner::new(profile);
        let prompt = ScriptedPrompt::new(&[
            BatchDecision::Continue,
            BatchDecision::Continue,
            BatchDecision::Stop,
        ]);
        let session = ScanSessionController::new(device, events, opts, prompt);

        // Three passes of two pages each.
        let pages = session.run().await.expect("session succeeds");
        assert_eq!(pages.len(), 6);
    }

    #[tokio::test]
    async fn spurious_empty_unit_callback_is_tolerated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = VirtualProfile {
            spurious_empty_unit: true,
            ..VirtualProfile::default()
        };
        let (device, events) = VirtualScanner::new(profile);
        let session = ScanSessionController::new(
            device,
            events,
            options(dir.path().to_path_buf()),
            PanicPrompt,
        );

        let pages = session.run().await.expect("session succeeds");
        assert_eq!(pages.len(), 1);
    }

    #[tokio::test]
    async fn mismatched_unit_callback_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = VirtualProfile {
            spurious_wrong_unit: true,
            feeder_page_count: 1,
            ..VirtualProfile::default()
        };
        let (device, events) = VirtualScanner::new(profile);
        let session = ScanSessionController::new(
            device,
            events,
            options(dir.path().to_path_buf()),
            PanicPrompt,
        );

        let pages = session.run().await.expect("session succeeds");
        assert_eq!(pages.len(), 1);
    }

    #[tokio::test]
    async fn open_failure_ends_session_with_no_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = VirtualProfile {
            fault: Some(VirtualFault::OpenSession("scanner is busy".into())),
            ..VirtualProfile::default()
        };
        let (device, events) = VirtualScanner::new(profile);
        let session = ScanSessionController::new(
            device,
            events,
            options(dir.path().to_path_buf()),
            PanicPrompt,
        );

        match session.run().await {
            Err(ScanwerkError::SessionOpen(msg)) => assert!(msg.contains("busy")),
            other => panic!("expected SessionOpen error, got {other:?}"),
        }
        // No page files were downloaded.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn scan_completion_error_is_terminal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = VirtualProfile {
            fault: Some(VirtualFault::Scan("paper jam".into())),
            ..VirtualProfile::default()
        };
        let (device, events) = VirtualScanner::new(profile);
        let session = ScanSessionController::new(
            device,
            events,
            options(dir.path().to_path_buf()),
            PanicPrompt,
        );

        assert!(matches!(
            session.run().await,
            Err(ScanwerkError::ScanFailed(msg)) if msg.contains("jam")
        ));
    }

    #[tokio::test]
    async fn mid_scan_fault_is_terminal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = VirtualProfile {
            feeder_page_count: 3,
            fault: Some(VirtualFault::MidScan("feeder mispick".into())),
            ..VirtualProfile::default()
        };
        let (device, events) = VirtualScanner::new(profile);
        let session = ScanSessionController::new(
            device,
            events,
            options(dir.path().to_path_buf()),
            PanicPrompt,
        );

        assert!(matches!(
            session.run().await,
            Err(ScanwerkError::Device(msg)) if msg.contains("mispick")
        ));
    }

    #[tokio::test]
    async fn unsolicited_close_is_terminal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = VirtualProfile {
            fault: Some(VirtualFault::CloseEarly),
            ..VirtualProfile::default()
        };
        let (device, events) = VirtualScanner::new(profile);
        let session = ScanSessionController::new(
            device,
            events,
            options(dir.path().to_path_buf()),
            PanicPrompt,
        );

        assert!(matches!(
            session.run().await,
            Err(ScanwerkError::SessionClosed(_))
        ));
    }

    #[tokio::test]
    async fn unknown_document_type_aborts_before_scanning() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = ScanOptions {
            document_type: Some("quarto".into()),
            ..options(dir.path().to_path_buf())
        };
        let (device, events) = VirtualScanner::new(VirtualProfile::default());
        let session = ScanSessionController::new(device, events, opts, PanicPrompt);

        assert!(matches!(
            session.run().await,
            Err(ScanwerkError::UnknownDocumentType(name)) if name == "quarto"
        ));
        // The fatal configuration error fired before any scan request.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn tiff_format_scans_tiff_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = ScanOptions {
            format: OutputFormat::Tiff,
            ..options(dir.path().to_path_buf())
        };
        let (device, events) = VirtualScanner::new(VirtualProfile::default());
        let session = ScanSessionController::new(device, events, opts, PanicPrompt);

        let pages = session.run().await.expect("session succeeds");
        assert_eq!(
            pages[0].path.extension().and_then(|e| e.to_str()),
            Some("tif")
        );
    }
}
