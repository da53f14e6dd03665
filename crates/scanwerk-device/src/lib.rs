// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk Device — scanner backends, mDNS discovery, and the scan session
// state machine.  This crate bridges between the core domain types defined in
// `scanwerk-core` and the devices that produce page images.

pub mod device;
pub mod discovery;
pub mod session;
pub mod simulator;
pub mod unit;

pub use device::{DeviceEvent, DeviceFault, EventReceiver, EventSender, ScanDevice};
pub use discovery::ScannerDiscovery;
pub use session::{BatchDecision, ContinuePrompt, ScanSessionController, SessionState, StdinPrompt};
pub use simulator::{VirtualFault, VirtualProfile, VirtualScanner};
pub use unit::{FunctionalUnit, ScanArea, UnitDetail, UnitSettings};
