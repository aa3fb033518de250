//! Peripheral connection loop.
//!
//! Advertise, accept one central, secure the link, then run three things
//! side by side until the link drops:
//!
//! 1. the GATT server, which turns CCCD writes into subscription events;
//! 2. the report pump, which runs the dispatcher on every wake signal;
//! 3. the security supervisor, which deletes bonds and disconnects when
//!    the link is not encrypted in time, and replays a bonded host's stored
//!    report subscription once it is.

use defmt::{error, info, unwrap, warn};
use embassy_futures::select::{select3, Either3};
use embassy_time::{Delay, Duration, Timer};
use keymouse::advertising::{advertising_data, scan_response};
use keymouse::config;
use keymouse::dispatch::ReportDispatcher;
use keymouse::error::Error;
use keymouse::link::{cccd_notifications_enabled, on_stack_event, Reaction, StackEvent};
use nrf_softdevice::ble::advertisement_builder::ConnectableAdvertisement;
use nrf_softdevice::ble::{gatt_server, peripheral, Connection, SecurityMode};
use nrf_softdevice::{raw, Softdevice};

use super::bonder::Bonder;
use super::gatt::{on_hid_write, HidServiceEvent, NotifySink, Server, ServerEvent};
use crate::wake::WAKE;
use crate::STATE;

pub async fn run(sd: &'static Softdevice, server: &'static Server, bonder: &'static Bonder) -> ! {
    let adv_data = unwrap!(advertising_data(config::DEVICE_NAME));
    let scan_data = unwrap!(scan_response(config::DEVICE_NAME));
    let adv_config = peripheral::Config {
        interval: config::BLE_ADV_INTERVAL,
        ..Default::default()
    };
    let mut dispatcher = ReportDispatcher::new();

    let mut reaction = on_stack_event(&STATE, StackEvent::Boot);

    loop {
        if matches!(reaction, Reaction::StartAdvertising | Reaction::RestartAdvertising) {
            info!("advertising as \"{}\"", config::DEVICE_NAME);
        }

        let adv = ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data,
            scan_data: &scan_data,
        };
        let conn = match peripheral::advertise_pairable(sd, adv, &adv_config, bonder).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("advertise_pairable: {:?}", e);
                defmt::panic!("{}", Error::Advertise);
            }
        };

        if on_stack_event(&STATE, StackEvent::ConnectionOpened) == Reaction::IncreaseSecurity {
            if let Err(e) = conn.request_security() {
                error!("request_security: {:?}", e);
                defmt::panic!("{}", Error::Security);
            }
        }
        request_fast_params(&conn);

        let events = gatt_server::run(&conn, server, |event| match event {
            ServerEvent::Hid(HidServiceEvent::ReportCccdWrite { notifications, .. }) => {
                on_stack_event(&STATE, StackEvent::ReportSubscription { notifications });
            }
            ServerEvent::Hid(other) => on_hid_write(&other),
        });

        match select3(
            events,
            pump_reports(&mut dispatcher, server, &conn),
            supervise_security(&conn, server, bonder),
        )
        .await
        {
            Either3::First(e) => info!("gatt server stopped: {:?}", e),
            Either3::Second(never) | Either3::Third(never) => match never {},
        }

        reaction = on_stack_event(&STATE, StackEvent::ConnectionClosed);
    }
}

fn request_fast_params(conn: &Connection) {
    let params = raw::ble_gap_conn_params_t {
        min_conn_interval: config::BLE_CONN_INTERVAL_MIN,
        max_conn_interval: config::BLE_CONN_INTERVAL_MAX,
        slave_latency: config::BLE_SLAVE_LATENCY,
        conn_sup_timeout: config::BLE_SUP_TIMEOUT,
    };
    if let Err(e) = conn.set_conn_params(params) {
        warn!("connection parameter update rejected: {:?}", e);
    }
}

/// Run the dispatcher on every wake signal for the lifetime of `conn`.
async fn pump_reports(
    dispatcher: &mut ReportDispatcher,
    server: &Server,
    conn: &Connection,
) -> core::convert::Infallible {
    let mut sink = NotifySink::new(server, conn);
    let mut delay = Delay;

    loop {
        WAKE.wait().await;
        if on_stack_event(&STATE, StackEvent::ExternalSignal) != Reaction::Dispatch {
            continue;
        }
        if let Err(e) = dispatcher.dispatch(&STATE, &mut sink, &mut delay).await {
            defmt::panic!("report dispatch failed: {}", e);
        }
    }
}

async fn wait_for_secure_link(conn: &Connection) -> bool {
    for _ in 0..config::SECURITY_POLL_COUNT {
        match conn.security_mode() {
            SecurityMode::NoAccess | SecurityMode::Open => {
                Timer::after(Duration::from_millis(config::SECURITY_POLL_INTERVAL_MS)).await
            }
            _ => return true,
        }
    }
    false
}

/// Notification bit of the report CCCD as currently held by the SoftDevice
/// for `conn`. After a bonded reconnect this is the value restored from the
/// bond, which the host does not write again.
fn report_cccd_notifications(server: &Server, conn: &Connection) -> Option<bool> {
    let conn_handle = conn.handle()?;
    let mut cccd = [0u8; 2];
    let mut value = raw::ble_gatts_value_t {
        len: cccd.len() as u16,
        offset: 0,
        p_value: cccd.as_mut_ptr(),
    };
    let ret = unsafe {
        raw::sd_ble_gatts_value_get(conn_handle, server.hid.report_cccd_handle, &mut value)
    };
    if ret != raw::NRF_SUCCESS {
        warn!("report CCCD read failed: {}", ret);
        return None;
    }
    Some(cccd_notifications_enabled(u16::from_le_bytes(cccd)))
}

/// Wait for encryption, then idle until the connection ends.
async fn supervise_security(
    conn: &Connection,
    server: &Server,
    bonder: &Bonder,
) -> core::convert::Infallible {
    let event = if wait_for_secure_link(conn).await {
        StackEvent::Bonded
    } else {
        StackEvent::BondingFailed
    };

    match on_stack_event(&STATE, event) {
        Reaction::DeleteBondsAndDisconnect => {
            bonder.clear();
            if let Err(e) = conn.disconnect() {
                error!("disconnect after failed bonding: {:?}", e);
            }
        }
        _ => {
            if report_cccd_notifications(server, conn) == Some(true) {
                info!("restored report subscription from bond");
                on_stack_event(&STATE, StackEvent::ReportSubscription { notifications: true });
            }
        }
    }

    core::future::pending().await
}
