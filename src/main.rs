//! keymouse firmware entry point (nRF52840 + SoftDevice S140).
//!
//! Task layout:
//!
//! | Task                  | Role                                          |
//! |-----------------------|-----------------------------------------------|
//! | `softdevice_task`     | SoftDevice event pump                         |
//! | `button_task` x2      | edge handlers feeding the edge latch          |
//! | `classifier_task`     | gesture classifier, one pass per tick         |
//! | `debounce_timer_task` | one-shot debounce timer and its expiry        |
//! | `ble_task`            | advertising, GATT server, report dispatch     |

#![no_std]
#![no_main]

mod ble;
mod buttons;
mod debounce_timer;
mod leds;
mod wake;

use core::mem;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::Pin as _;
use embassy_nrf::interrupt::Priority;
use embassy_time::{Duration, Ticker};
use keymouse::config;
use keymouse::gesture::GestureClassifier;
use keymouse::latch::ButtonId;
use keymouse::state::SharedState;
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;
use {defmt_rtt as _, nrf_softdevice_s140 as _, panic_probe as _};

use crate::ble::bonder::{bonder, Bonder};
use crate::ble::gatt::Server;
use crate::debounce_timer::{debounce_timer_task, SignalTimer};
use crate::leds::Led;
use crate::wake::WAKE;

/// Latch, pending intent, and subscription flag shared by every task.
pub static STATE: SharedState = SharedState::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn classifier_task() -> ! {
    let mut classifier = GestureClassifier::new();
    let mut timer = SignalTimer;
    let mut ticker = Ticker::every(Duration::from_millis(config::CLASSIFIER_TICK_MS));

    loop {
        if let Err(e) = classifier.tick(&STATE, &mut timer, &WAKE) {
            defmt::panic!("gesture classifier: {}", e);
        }
        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server, bonder: &'static Bonder) -> ! {
    ble::peripheral::run(sd, server, bonder).await
}

fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 64 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: config::DEVICE_NAME.as_ptr() as _,
            current_len: config::DEVICE_NAME.len() as u16,
            max_len: config::DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("keymouse starting");

    // The SoftDevice reserves interrupt priorities 0, 1 and 4.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);

    let sd = Softdevice::enable(&softdevice_config());

    static SERVER: StaticCell<Server> = StaticCell::new();
    let server: &'static Server = SERVER.init(unwrap!(Server::new(sd)));
    unwrap!(server.load_values());

    let ret = unsafe { raw::sd_ble_gap_appearance_set(config::BLE_APPEARANCE_HID) };
    if ret != raw::NRF_SUCCESS {
        defmt::warn!("appearance not set: {}", ret);
    }

    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    unwrap!(spawner.spawn(buttons::button_task(p.P0_11.degrade(), ButtonId::A)));
    unwrap!(spawner.spawn(buttons::button_task(p.P0_12.degrade(), ButtonId::B)));

    let leds = [Led::new(p.P0_13.degrade()), Led::new(p.P0_14.degrade())];
    unwrap!(spawner.spawn(debounce_timer_task(leds)));
    unwrap!(spawner.spawn(classifier_task()));

    unwrap!(spawner.spawn(ble_task(sd, server, bonder())));
}
