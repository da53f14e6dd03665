// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Virtual scanner backend.
//
// Implements the full device contract in software: it answers every request
// with the same event sequence a networked scanner would deliver, renders
// synthetic page images into the download directory, and can replay the
// hardware quirks and faults real devices exhibit. The CLI scan path and the
// session tests both run against it.

use image::{Rgb, RgbImage};
use tracing::debug;

use scanwerk_core::catalog::DocumentTypeId;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{ColorMode, PageFile, UnitKind};

use crate::device::{
    event_channel, DeviceEvent, DeviceFault, EventReceiver, EventSender, ScanDevice,
};
use crate::unit::{FunctionalUnit, ScanArea, UnitDetail, UnitSettings};

/// Synthetic page raster size, small enough that tests stay fast.
const PAGE_WIDTH: u32 = 320;
const PAGE_HEIGHT: u32 = 440;

/// Failure the virtual device injects into an otherwise clean run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualFault {
    /// Session open fails with this message.
    OpenSession(String),
    /// The scan pass completes with this error and no pages.
    Scan(String),
    /// One page is produced, then the device raises a fault.
    MidScan(String),
    /// The device drops the session unprompted instead of scanning.
    CloseEarly,
}

/// Shape and behavior of a virtual device.
#[derive(Debug, Clone)]
pub struct VirtualProfile {
    pub name: String,
    /// Functional units the device advertises.
    pub units: Vec<FunctionalUnit>,
    /// Pages one feeder pass produces (per side when duplexing).
    pub feeder_page_count: u32,
    /// Deliver a unit-selected callback with no unit before the real one.
    pub spurious_empty_unit: bool,
    /// Deliver a unit of the wrong kind before the real one.
    pub spurious_wrong_unit: bool,
    pub fault: Option<VirtualFault>,
}

impl Default for VirtualProfile {
    fn default() -> Self {
        Self {
            name: "Virtual Duplex MFP".into(),
            units: vec![default_feeder(), default_flatbed()],
            feeder_page_count: 1,
            spurious_empty_unit: false,
            spurious_wrong_unit: false,
            fault: None,
        }
    }
}

fn default_feeder() -> FunctionalUnit {
    FunctionalUnit {
        resolutions: vec![75, 100, 150, 200, 300, 600],
        document_types: vec![
            DocumentTypeId::UsLetter,
            DocumentTypeId::UsLegal,
            DocumentTypeId::UsLedger,
            DocumentTypeId::A4,
            DocumentTypeId::A5,
            DocumentTypeId::IsoB5,
        ],
        detail: UnitDetail::Feeder {
            duplex_capable: true,
        },
    }
}

fn default_flatbed() -> FunctionalUnit {
    FunctionalUnit {
        resolutions: vec![75, 150, 300, 600, 1200],
        document_types: Vec::new(),
        detail: UnitDetail::Flatbed {
            bed: ScanArea {
                width_in: 8.5,
                height_in: 11.7,
            },
        },
    }
}

/// In-process scanner that speaks the device event protocol.
pub struct VirtualScanner {
    profile: VirtualProfile,
    tx: EventSender,
    selected: Option<FunctionalUnit>,
    settings: Option<UnitSettings>,
    page_seq: u32,
}

impl VirtualScanner {
    /// Build the device and the event stream its session will drain.
    pub fn new(profile: VirtualProfile) -> (Self, EventReceiver) {
        let (tx, rx) = event_channel();
        (
            Self {
                profile,
                tx,
                selected: None,
                settings: None,
                page_seq: 0,
            },
            rx,
        )
    }

    fn emit(&self, event: DeviceEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| ScanwerkError::Device("device event channel closed".into()))
    }

    /// A unit of the opposite kind, for the wrong-unit quirk.
    fn fabricate_other_unit(&self, kind: UnitKind) -> FunctionalUnit {
        match kind {
            UnitKind::Feeder => default_flatbed(),
            UnitKind::Flatbed => default_feeder(),
        }
    }

    /// Render one synthetic page and announce it.
    fn produce_page(&mut self, settings: &UnitSettings) -> Result<()> {
        self.page_seq += 1;
        let name = format!(
            "{}-{:03}.{}",
            settings.document_name, self.page_seq, settings.page_extension
        );
        let path = settings.download_dir.join(name);

        let image = render_page(self.page_seq, settings.color_mode);
        image
            .save(&path)
            .map_err(|err| ScanwerkError::ImageError(err.to_string()))?;

        debug!(page = %path.display(), "virtual page written");
        self.emit(DeviceEvent::PageProduced {
            file: PageFile::new(path),
        })
    }

    fn pages_per_pass(&self, settings: &UnitSettings) -> u32 {
        match &self.selected {
            Some(unit) if unit.kind() == UnitKind::Feeder => {
                let sides = if settings.duplex && unit.duplex_capable() {
                    2
                } else {
                    1
                };
                self.profile.feeder_page_count * sides
            }
            _ => 1,
        }
    }
}

impl ScanDevice for VirtualScanner {
    fn name(&self) -> &str {
        &self.profile.name
    }

    fn request_open_session(&mut self) -> Result<()> {
        if let Some(VirtualFault::OpenSession(message)) = &self.profile.fault {
            return self.emit(DeviceEvent::SessionOpened {
                error: Some(DeviceFault::new(message.clone())),
            });
        }
        self.emit(DeviceEvent::SessionOpened { error: None })?;
        self.emit(DeviceEvent::DeviceReady)
    }

    fn request_close_session(&mut self) -> Result<()> {
        self.selected = None;
        self.settings = None;
        self.emit(DeviceEvent::SessionClosed { error: None })
    }

    fn request_select_unit(&mut self, kind: UnitKind) -> Result<()> {
        if self.profile.spurious_empty_unit {
            self.emit(DeviceEvent::UnitSelected {
                unit: None,
                error: None,
            })?;
        }
        if self.profile.spurious_wrong_unit {
            self.emit(DeviceEvent::UnitSelected {
                unit: Some(self.fabricate_other_unit(kind)),
                error: Some(DeviceFault::new("unit momentarily unavailable")),
            })?;
        }

        match self.profile.units.iter().find(|u| u.kind() == kind) {
            Some(unit) => {
                self.selected = Some(unit.clone());
                self.emit(DeviceEvent::UnitSelected {
                    unit: Some(unit.clone()),
                    error: None,
                })
            }
            None => self.emit(DeviceEvent::Fault {
                error: DeviceFault::new(format!("device has no {kind} unit")),
            }),
        }
    }

    fn configure(&mut self, settings: &UnitSettings) -> Result<()> {
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn request_scan(&mut self) -> Result<()> {
        let settings = self
            .settings
            .clone()
            .ok_or_else(|| ScanwerkError::Device("scan requested before configuration".into()))?;

        match self.profile.fault.clone() {
            Some(VirtualFault::Scan(message)) => self.emit(DeviceEvent::ScanCompleted {
                error: Some(DeviceFault::new(message)),
            }),
            Some(VirtualFault::CloseEarly) => self.emit(DeviceEvent::SessionClosed {
                error: Some(DeviceFault::new("connection to scanner lost")),
            }),
            Some(VirtualFault::MidScan(message)) => {
                self.produce_page(&settings)?;
                self.emit(DeviceEvent::Fault {
                    error: DeviceFault::new(message),
                })
            }
            _ => {
                for _ in 0..self.pages_per_pass(&settings) {
                    self.produce_page(&settings)?;
                }
                self.emit(DeviceEvent::ScanCompleted { error: None })
            }
        }
    }
}

/// Gradient raster with a page-number stripe so pages are distinguishable.
fn render_page(seq: u32, mode: ColorMode) -> RgbImage {
    let mut image = RgbImage::new(PAGE_WIDTH, PAGE_HEIGHT);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let base = ((x + y + seq * 17) % 256) as u8;
        *pixel = match mode {
            ColorMode::Color => Rgb([base, 255 - base, (x % 256) as u8]),
            ColorMode::Monochrome => {
                let level = if base > 127 { 255 } else { 0 };
                Rgb([level, level, level])
            }
        };
    }
    let stripe = (seq * 13) % PAGE_HEIGHT;
    for x in 0..PAGE_WIDTH {
        image.put_pixel(x, stripe, Rgb([0, 0, 0]));
    }
    image
}
