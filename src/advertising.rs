//! Legacy advertising and scan response payloads.
//!
//! Built once at startup from the device name and handed to the SoftDevice
//! as raw AD structures (`len`, `type`, `data...`).

use heapless::Vec;

use crate::config::BLE_APPEARANCE_HID;
use crate::error::{Error, Result};

/// Legacy advertising PDU payload limit.
pub const ADV_PAYLOAD_MAX: usize = 31;

pub type AdvPayload = Vec<u8, ADV_PAYLOAD_MAX>;

const AD_FLAGS: u8 = 0x01;
const AD_UUID16_COMPLETE: u8 = 0x03;
const AD_COMPLETE_LOCAL_NAME: u8 = 0x09;
const AD_APPEARANCE: u8 = 0x19;

/// LE General Discoverable, BR/EDR not supported.
const FLAGS_GENERAL_DISC_NO_BREDR: u8 = 0x06;

const HID_SERVICE_UUID: u16 = 0x1812;

/// Flags, HID appearance, the HID service UUID, and the complete name.
pub fn advertising_data(name: &str) -> Result<AdvPayload> {
    let mut payload = AdvPayload::new();
    push_ad(&mut payload, AD_FLAGS, &[FLAGS_GENERAL_DISC_NO_BREDR])?;
    push_ad(&mut payload, AD_APPEARANCE, &BLE_APPEARANCE_HID.to_le_bytes())?;
    push_ad(&mut payload, AD_UUID16_COMPLETE, &HID_SERVICE_UUID.to_le_bytes())?;
    push_ad(&mut payload, AD_COMPLETE_LOCAL_NAME, name.as_bytes())?;
    Ok(payload)
}

/// The complete name again, for active scanners.
pub fn scan_response(name: &str) -> Result<AdvPayload> {
    let mut payload = AdvPayload::new();
    push_ad(&mut payload, AD_COMPLETE_LOCAL_NAME, name.as_bytes())?;
    Ok(payload)
}

fn push_ad(payload: &mut AdvPayload, ad_type: u8, data: &[u8]) -> Result<()> {
    let len = u8::try_from(data.len() + 1).map_err(|_| Error::BufferOverflow)?;
    payload.push(len).map_err(|_| Error::BufferOverflow)?;
    payload.push(ad_type).map_err(|_| Error::BufferOverflow)?;
    payload
        .extend_from_slice(data)
        .map_err(|_| Error::BufferOverflow)
}
