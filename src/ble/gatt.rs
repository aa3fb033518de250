//! GATT server - HID-over-GATT service (UUID 0x1812).
//!
//! The `#[nrf_softdevice::gatt_service]` macro generates the attribute
//! table, `*_set` / `*_notify` helpers, and the `HidServiceEvent` enum for
//! client writes.

use defmt::{info, warn};
use heapless::Vec;
use keymouse::error::{Error, Result};
use keymouse::hid::report_map::{
    CONTROL_POINT_EXIT_SUSPEND, CONTROL_POINT_SUSPEND, HID_INFORMATION, PROTOCOL_MODE_REPORT,
    REPORT_MAP, REPORT_MAP_CAPACITY,
};
use keymouse::hid::KEYBOARD_WIRE_LEN;
use keymouse::platform::ReportSink;
use nrf_softdevice::ble::Connection;

#[nrf_softdevice::gatt_service(uuid = "1812")]
pub struct HidService {
    /// HID Information - bcdHID, country code, flags.
    #[characteristic(uuid = "2a4a", read)]
    pub hid_info: [u8; 4],

    /// HID Report Map - the report descriptor.
    #[characteristic(uuid = "2a4b", read)]
    pub report_map: Vec<u8, REPORT_MAP_CAPACITY>,

    /// HID Report - report-ID-prefixed keyboard and mouse input reports.
    #[characteristic(uuid = "2a4d", read, notify)]
    pub report: Vec<u8, KEYBOARD_WIRE_LEN>,

    /// Protocol Mode - only Report Protocol is supported.
    #[characteristic(uuid = "2a4e", read, write_without_response)]
    pub protocol_mode: u8,

    /// HID Control Point - suspend / exit suspend.
    #[characteristic(uuid = "2a4c", write_without_response)]
    pub control_point: u8,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub hid: HidService,
}

impl Server {
    /// Load the static characteristic values. Called once after
    /// registration, before advertising starts.
    pub fn load_values(&self) -> Result<()> {
        let report_map = Vec::from_slice(REPORT_MAP).map_err(|_| Error::BufferOverflow)?;

        self.hid
            .hid_info_set(&HID_INFORMATION)
            .map_err(|_| Error::GattValue)?;
        self.hid
            .report_map_set(&report_map)
            .map_err(|_| Error::GattValue)?;
        self.hid
            .protocol_mode_set(&PROTOCOL_MODE_REPORT)
            .map_err(|_| Error::GattValue)?;

        info!("HID service ready ({} byte report map)", REPORT_MAP.len());
        Ok(())
    }
}

/// Log the client writes that need no action.
pub fn on_hid_write(event: &HidServiceEvent) {
    match event {
        HidServiceEvent::ProtocolModeWrite(mode) => {
            if *mode != PROTOCOL_MODE_REPORT {
                warn!("host asked for protocol mode {} - staying in report mode", mode);
            }
        }
        HidServiceEvent::ControlPointWrite(CONTROL_POINT_SUSPEND) => info!("host suspended"),
        HidServiceEvent::ControlPointWrite(CONTROL_POINT_EXIT_SUSPEND) => info!("host resumed"),
        HidServiceEvent::ControlPointWrite(other) => warn!("unknown control point value {}", other),
        HidServiceEvent::ReportCccdWrite { .. } => {}
    }
}

/// Notifies reports on the HID report characteristic of one connection.
pub struct NotifySink<'a> {
    server: &'a Server,
    conn: &'a Connection,
}

impl<'a> NotifySink<'a> {
    pub fn new(server: &'a Server, conn: &'a Connection) -> Self {
        Self { server, conn }
    }
}

impl ReportSink for NotifySink<'_> {
    fn notify(&mut self, report: &[u8]) -> Result<()> {
        let value: Vec<u8, KEYBOARD_WIRE_LEN> =
            Vec::from_slice(report).map_err(|_| Error::BufferOverflow)?;
        self.server
            .hid
            .report_notify(self.conn, &value)
            .map_err(|e| {
                warn!("report notify failed: {:?}", e);
                Error::Notify
            })
    }
}
