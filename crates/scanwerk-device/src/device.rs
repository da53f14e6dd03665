// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The scanner device seam: a capability-set trait plus the asynchronous
// notification stream every backend delivers its callbacks on.
//
// Request methods return quickly; the actual outcome arrives later as a
// `DeviceEvent` on the paired channel. The session state machine consumes
// events strictly in arrival order.

use thiserror::Error;
use tokio::sync::mpsc;

use scanwerk_core::Result;
use scanwerk_core::types::{PageFile, UnitKind};

use crate::unit::{FunctionalUnit, UnitSettings};

/// An error reported by the device itself, carried inside events.
///
/// Converted into a `ScanwerkError` at the session boundary once the state
/// machine decides it is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DeviceFault {
    pub message: String,
}

impl DeviceFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Asynchronous notifications a scanner backend delivers to the session.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// Session-open request finished.
    SessionOpened { error: Option<DeviceFault> },
    /// The device closed the session, solicited or not.
    SessionClosed { error: Option<DeviceFault> },
    /// Device finished its post-open warmup and accepts unit selection.
    DeviceReady,
    /// Functional-unit selection finished.
    ///
    /// Some hardware delivers this with an empty unit, or with an error and a
    /// usable unit at the same time; the session layer sorts that out.
    UnitSelected {
        unit: Option<FunctionalUnit>,
        error: Option<DeviceFault>,
    },
    /// One page image landed in the download directory.
    PageProduced { file: PageFile },
    /// The current scan pass finished.
    ScanCompleted { error: Option<DeviceFault> },
    /// Device-level error outside any specific request.
    Fault { error: DeviceFault },
}

/// Sender half handed to a backend when it is constructed.
pub type EventSender = mpsc::UnboundedSender<DeviceEvent>;

/// Receiver half the session state machine drains.
pub type EventReceiver = mpsc::UnboundedReceiver<DeviceEvent>;

/// Create the event channel pair connecting a backend to a session.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Capability set of a physical (or simulated) scanner.
///
/// All methods are requests: success means the request was accepted, not that
/// the operation completed. Completion and failure arrive as [`DeviceEvent`]s.
pub trait ScanDevice {
    /// Human-readable device name for logs and output.
    fn name(&self) -> &str;

    fn request_open_session(&mut self) -> Result<()>;

    fn request_close_session(&mut self) -> Result<()>;

    /// Ask the device to switch to the functional unit of the given kind.
    fn request_select_unit(&mut self, kind: UnitKind) -> Result<()>;

    /// Apply settings to the currently selected unit.
    fn configure(&mut self, settings: &UnitSettings) -> Result<()>;

    /// Start one scan pass on the configured unit.
    fn request_scan(&mut self) -> Result<()>;
}
